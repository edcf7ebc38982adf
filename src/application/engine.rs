use crate::application::timers::RoundTimers;
use crate::config::GameConfig;
use crate::domain::phase::Phase;
use crate::domain::ports::LayoutGeneratorBox;
use crate::domain::round::{RoundId, Selection, TickOutcome};
use crate::domain::session::{GUIDELINES, GameSession};
use crate::domain::snapshot::GameSnapshot;
use crate::error::Result;
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info};

pub const UPDATE_BUFFER_SIZE: usize = 256;

/// The single owner of all mutable game state.
///
/// Every operation takes the state lock, applies one synchronous transition
/// and publishes the resulting snapshot before releasing it, so taps, clock
/// pulses and the deferred completion never interleave. Rejected calls leave
/// the state untouched and publish nothing.
///
/// Cloning yields another handle to the same game. Timer tasks only hold a
/// weak reference and stop once the last handle is dropped.
#[derive(Clone)]
pub struct GameEngine {
    shared: Arc<Shared>,
}

struct Shared {
    config: GameConfig,
    state: Mutex<EngineState>,
    updates: broadcast::Sender<GameSnapshot>,
}

struct EngineState {
    session: GameSession,
    layouts: LayoutGeneratorBox,
    timers: RoundTimers,
}

impl GameEngine {
    /// Creates an engine on the start screen with a first round already dealt.
    ///
    /// # Arguments
    ///
    /// * `config` - Round length, timer periods and clock mode.
    /// * `layouts` - Source of the boards dealt for each round.
    pub fn new(config: GameConfig, mut layouts: LayoutGeneratorBox) -> Self {
        let session = GameSession::new(layouts.as_mut(), config.round_seconds);
        let (updates, _) = broadcast::channel(UPDATE_BUFFER_SIZE);
        Self {
            shared: Arc::new(Shared {
                config,
                state: Mutex::new(EngineState {
                    session,
                    layouts,
                    timers: RoundTimers::new(),
                }),
                updates,
            }),
        }
    }

    /// Registers a new observer. It receives every snapshot published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<GameSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn guidelines(&self) -> &'static [&'static str] {
        &GUIDELINES
    }

    pub async fn snapshot(&self) -> GameSnapshot {
        self.shared.state.lock().await.session.snapshot()
    }

    /// Publishes the current state without changing it, e.g. for a first render.
    pub async fn refresh(&self) -> GameSnapshot {
        let state = self.shared.state.lock().await;
        self.shared.publish(&state.session)
    }

    pub async fn start(&self) -> Result<GameSnapshot> {
        self.navigate(Phase::Playing).await
    }

    /// Requests a screen change.
    ///
    /// Entering `Playing` deals a fresh round and arms its ticker. Any
    /// successful navigation cancels the timers of the round left behind.
    pub async fn navigate(&self, to: Phase) -> Result<GameSnapshot> {
        let mut state = self.shared.state.lock().await;
        let EngineState {
            session,
            layouts,
            timers,
        } = &mut *state;

        let from = session.navigate(to, layouts.as_mut())?;
        timers.cancel_all();
        if to == Phase::Playing {
            let round = session.round();
            self.shared.arm_ticker(timers, round.id());
            info!(round = %round.id(), wildcard = %round.wildcard(), "round started");
        }
        debug!(%from, %to, "navigated");

        Ok(self.shared.publish(session))
    }

    /// Taps the tile at `index`.
    ///
    /// Completing the last pair stops the clock and schedules the return to
    /// the start screen after the configured delay.
    pub async fn select_tile(&self, index: usize) -> Result<GameSnapshot> {
        let mut state = self.shared.state.lock().await;
        let EngineState {
            session, timers, ..
        } = &mut *state;

        match session.select_tile(index)? {
            Selection::Picked | Selection::Unpicked => {}
            Selection::Matched {
                pair,
                completed: false,
            } => debug!(?pair, score = session.round().score(), "pair matched"),
            Selection::Matched {
                completed: true, ..
            } => {
                let round = session.round().id();
                timers.cancel_ticker();
                timers.arm_completion(self.shared.spawn_completion(round));
                info!(
                    %round,
                    high_score = session.high_score(),
                    "all pairs found"
                );
            }
            Selection::Mismatched { pair } => debug!(?pair, "wrong selection"),
        }

        Ok(self.shared.publish(session))
    }

    /// One clock pulse from an external timing source.
    pub async fn tick(&self) -> Result<GameSnapshot> {
        let mut state = self.shared.state.lock().await;
        self.shared.advance_clock(&mut state, false)
    }

    /// Deals a new round without leaving the current screen.
    pub async fn manual_reset(&self) -> Result<GameSnapshot> {
        let mut state = self.shared.state.lock().await;
        let EngineState {
            session,
            layouts,
            timers,
        } = &mut *state;

        timers.cancel_all();
        let round = session.begin_round(layouts.as_mut());
        if session.phase() == Phase::Playing {
            self.shared.arm_ticker(timers, round);
        }
        info!(%round, wildcard = %session.round().wildcard(), "round reset");

        Ok(self.shared.publish(session))
    }

    /// Cancels every pending timer. The state itself is kept.
    pub async fn shutdown(&self) {
        let mut state = self.shared.state.lock().await;
        let timers = &mut state.timers;
        debug!(
            ticking = timers.is_ticking(),
            pending_completion = timers.has_pending_completion(),
            "engine shutting down"
        );
        timers.cancel_all();
    }
}

impl Shared {
    fn publish(&self, session: &GameSession) -> GameSnapshot {
        let snapshot = session.snapshot();
        // no subscribers is fine
        let _ = self.updates.send(snapshot.clone());
        snapshot
    }

    fn advance_clock(
        self: &Arc<Self>,
        state: &mut EngineState,
        from_ticker: bool,
    ) -> Result<GameSnapshot> {
        let EngineState {
            session,
            layouts,
            timers,
        } = state;

        if session.tick(layouts.as_mut())? == TickOutcome::Expired {
            if from_ticker {
                timers.release_ticker();
            }
            timers.cancel_all();
            let round = session.round().id();
            self.arm_ticker(timers, round);
            info!(%round, "time's up, board redealt");
        }

        Ok(self.publish(session))
    }

    fn arm_ticker(self: &Arc<Self>, timers: &mut RoundTimers, round: RoundId) {
        if self.config.auto_tick {
            timers.arm_ticker(self.spawn_ticker(round));
        }
    }

    fn spawn_ticker(self: &Arc<Self>, round: RoundId) -> JoinHandle<()> {
        let shared = Arc::downgrade(self);
        let period = self.config.tick_interval();

        tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if !Self::pulse(&shared, round).await {
                    break;
                }
            }
        })
    }

    /// Applies one ticker pulse for `round`. Returns whether the ticker should keep going.
    async fn pulse(shared: &Weak<Self>, round: RoundId) -> bool {
        let Some(shared) = shared.upgrade() else {
            return false;
        };
        let mut state = shared.state.lock().await;
        if state.session.round().id() != round || state.session.phase() != Phase::Playing {
            debug!(%round, "stale ticker stopped");
            return false;
        }

        match shared.advance_clock(&mut state, true) {
            Ok(snapshot) => snapshot.round_id == round,
            Err(err) => {
                debug!(%round, error = %err, "ticker stopped");
                false
            }
        }
    }

    fn spawn_completion(self: &Arc<Self>, round: RoundId) -> JoinHandle<()> {
        let shared = Arc::downgrade(self);
        let delay = self.config.completion_delay();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let Some(shared) = shared.upgrade() else {
                return;
            };

            let mut state = shared.state.lock().await;
            let EngineState {
                session,
                layouts,
                timers,
            } = &mut *state;

            if session.conclude_round(round, layouts.as_mut()) {
                timers.release_completion();
                timers.cancel_all();
                info!(%round, next = %session.round().id(), "back to start screen");
                shared.publish(session);
            } else {
                debug!(%round, "stale completion ignored");
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::round::{MSG_COMPLETED, MSG_CORRECT, MSG_TIME_UP, MSG_WRONG};
    use crate::domain::tile::TileLayout;
    use crate::error::GameError;
    use crate::infrastructure::fixed_layout::FixedLayout;
    use std::time::Duration;

    const BOARD: &str = "red,green,blue,red,green,blue,yellow,yellow,pink";
    const PAIRS: [(usize, usize); 4] = [(0, 3), (1, 4), (2, 5), (6, 7)];

    fn engine(auto_tick: bool) -> GameEngine {
        let layout: TileLayout = BOARD.parse().unwrap();
        let config = GameConfig {
            auto_tick,
            ..GameConfig::default()
        };
        GameEngine::new(config, Box::new(FixedLayout::repeating(layout)))
    }

    async fn clear_board(engine: &GameEngine) -> GameSnapshot {
        let mut last = None;
        for (a, b) in PAIRS {
            engine.select_tile(a).await.unwrap();
            last = Some(engine.select_tile(b).await.unwrap());
        }
        last.unwrap()
    }

    #[tokio::test]
    async fn test_correct_selection() {
        let engine = engine(false);
        engine.start().await.unwrap();
        engine.select_tile(0).await.unwrap();
        let snapshot = engine.select_tile(3).await.unwrap();

        assert_eq!(snapshot.score, 1);
        assert_eq!(snapshot.matched, vec![0, 3]);
        assert!(snapshot.selected.is_empty());
        assert_eq!(snapshot.message, MSG_CORRECT);
    }

    #[tokio::test]
    async fn test_wrong_selection() {
        let engine = engine(false);
        engine.start().await.unwrap();
        engine.select_tile(0).await.unwrap();
        let snapshot = engine.select_tile(8).await.unwrap();

        assert_eq!(snapshot.score, 0);
        assert!(snapshot.matched.is_empty());
        assert!(snapshot.selected.is_empty());
        assert_eq!(snapshot.message, MSG_WRONG);
    }

    #[tokio::test]
    async fn test_rejected_calls_publish_nothing() {
        let engine = engine(false);
        engine.start().await.unwrap();
        engine.select_tile(0).await.unwrap();
        engine.select_tile(3).await.unwrap();
        let before = engine.snapshot().await;

        let mut updates = engine.subscribe();
        assert!(matches!(
            engine.select_tile(9).await,
            Err(GameError::TileOutOfRange { .. })
        ));
        assert!(matches!(
            engine.select_tile(3).await,
            Err(GameError::TileAlreadyMatched { index: 3 })
        ));
        assert!(matches!(
            engine.navigate(Phase::Scoreboard).await,
            Err(GameError::InvalidTransition { .. })
        ));

        assert!(updates.try_recv().is_err());
        assert_eq!(engine.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_tick_outside_playing_rejected() {
        let engine = engine(false);
        assert!(matches!(
            engine.tick().await,
            Err(GameError::NotPlaying {
                phase: Phase::Start
            })
        ));
        let snapshot = engine.navigate(Phase::Guidelines).await.unwrap();
        assert!(engine.tick().await.is_err());
        assert_eq!(snapshot.guidelines, engine.guidelines());
    }

    #[tokio::test]
    async fn test_manual_clock_timeout() {
        let engine = engine(false);
        let started = engine.start().await.unwrap();

        for remaining in (1..30).rev() {
            let snapshot = engine.tick().await.unwrap();
            assert_eq!(snapshot.time_remaining_seconds, remaining);
        }
        let snapshot = engine.tick().await.unwrap();

        assert_eq!(snapshot.message, MSG_TIME_UP);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.time_remaining_seconds, 30);
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_ne!(snapshot.round_id, started.round_id);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_mutation() {
        let engine = engine(false);
        let mut updates = engine.subscribe();

        engine.start().await.unwrap();
        engine.select_tile(4).await.unwrap();
        engine.select_tile(4).await.unwrap();

        assert_eq!(updates.recv().await.unwrap().phase, Phase::Playing);
        assert_eq!(updates.recv().await.unwrap().selected, vec![4]);
        assert!(updates.recv().await.unwrap().selected.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_counts_down_and_redeals() {
        let engine = engine(true);
        let started = engine.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(engine.snapshot().await.time_remaining_seconds, 29);

        tokio::time::sleep(Duration::from_secs(29)).await;
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.message, MSG_TIME_UP);
        assert_eq!(snapshot.time_remaining_seconds, 30);
        assert_ne!(snapshot.round_id, started.round_id);

        // the next round has its own ticker
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(engine.snapshot().await.time_remaining_seconds, 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completion_returns_to_start_after_delay() {
        let engine = engine(true);
        engine.start().await.unwrap();
        let finished = clear_board(&engine).await;

        assert!(finished.finished);
        assert_eq!(finished.message, MSG_COMPLETED);
        assert_eq!(finished.high_score, 4);

        tokio::time::sleep(Duration::from_millis(1900)).await;
        let waiting = engine.snapshot().await;
        assert_eq!(waiting.phase, Phase::Playing);
        assert_eq!(waiting.round_id, finished.round_id);
        // the clock stopped with the last pair
        assert_eq!(waiting.time_remaining_seconds, 30);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let after = engine.snapshot().await;
        assert_eq!(after.phase, Phase::Start);
        assert_ne!(after.round_id, finished.round_id);
        assert_eq!(after.score, 0);
        assert_eq!(after.high_score, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leaving_cancels_completion() {
        let engine = engine(true);
        engine.start().await.unwrap();
        clear_board(&engine).await;

        engine.navigate(Phase::Start).await.unwrap();
        let replay = engine.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let snapshot = engine.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Playing);
        assert_eq!(snapshot.round_id, replay.round_id);
        assert_eq!(snapshot.time_remaining_seconds, 27);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_reset_replaces_ticker() {
        let engine = engine(true);
        engine.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        let reset = engine.manual_reset().await.unwrap();
        assert_eq!(reset.time_remaining_seconds, 30);
        assert_eq!(reset.phase, Phase::Playing);

        // the old ticker would have fired at 2s
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(engine.snapshot().await.time_remaining_seconds, 30);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.snapshot().await.time_remaining_seconds, 29);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exit_to_start_stops_clock() {
        let engine = engine(true);
        engine.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let left = engine.navigate(Phase::Start).await.unwrap();
        assert_eq!(left.time_remaining_seconds, 28);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.snapshot().await.time_remaining_seconds, 28);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timers() {
        let engine = engine(true);
        engine.start().await.unwrap();
        engine.shutdown().await;

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.snapshot().await.time_remaining_seconds, 30);
    }
}
