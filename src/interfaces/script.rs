use crate::application::engine::GameEngine;
use crate::domain::phase::Phase;
use crate::domain::snapshot::GameSnapshot;
use crate::error::Result;
use std::time::Duration;

/// One presentation-layer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptEvent {
    Navigate(Phase),
    Tap(usize),
    Reset,
    Tick,
    /// Let wall-clock time pass so armed timers can fire.
    Wait(Duration),
    /// Host-level request to end the process.
    Exit,
}

/// Forwards an engine-level event. `Wait` and `Exit` belong to the host and
/// yield `None`.
pub async fn dispatch(engine: &GameEngine, event: ScriptEvent) -> Result<Option<GameSnapshot>> {
    let snapshot = match event {
        ScriptEvent::Navigate(phase) => engine.navigate(phase).await?,
        ScriptEvent::Tap(index) => engine.select_tile(index).await?,
        ScriptEvent::Reset => engine.manual_reset().await?,
        ScriptEvent::Tick => engine.tick().await?,
        ScriptEvent::Wait(_) | ScriptEvent::Exit => return Ok(None),
    };
    Ok(Some(snapshot))
}
