use crate::domain::phase::Phase;
use crate::error::{GameError, Result};
use crate::interfaces::script::ScriptEvent;
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum EventKind {
    Start,
    Guidelines,
    Scoreboard,
    Back,
    Tap,
    Reset,
    Tick,
    Wait,
    Exit,
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    event: EventKind,
    #[serde(default)]
    value: Option<u64>,
}

impl TryFrom<EventRecord> for ScriptEvent {
    type Error = GameError;

    fn try_from(record: EventRecord) -> Result<Self> {
        let event = match (record.event, record.value) {
            (EventKind::Start, _) => ScriptEvent::Navigate(Phase::Playing),
            (EventKind::Guidelines, _) => ScriptEvent::Navigate(Phase::Guidelines),
            (EventKind::Scoreboard, _) => ScriptEvent::Navigate(Phase::Scoreboard),
            (EventKind::Back, _) => ScriptEvent::Navigate(Phase::Start),
            (EventKind::Tap, Some(index)) => {
                let index = usize::try_from(index)
                    .map_err(|_| GameError::InvalidEvent(format!("tile index {}", index)))?;
                ScriptEvent::Tap(index)
            }
            (EventKind::Reset, _) => ScriptEvent::Reset,
            (EventKind::Tick, _) => ScriptEvent::Tick,
            (EventKind::Wait, Some(millis)) => ScriptEvent::Wait(Duration::from_millis(millis)),
            (EventKind::Exit, _) => ScriptEvent::Exit,
            (kind, None) => {
                return Err(GameError::InvalidEvent(format!(
                    "{:?} needs a value",
                    kind
                )));
            }
        };
        Ok(event)
    }
}

/// Reads presentation events from a CSV script with an `event,value` header.
///
/// Whitespace is trimmed and the value column may be left out for events
/// that take none.
pub struct EventReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> EventReader<R> {
    /// Creates a new `EventReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily parses events. A bad row yields an `Err` and reading continues.
    pub fn events(self) -> impl Iterator<Item = Result<ScriptEvent>> {
        self.reader.into_deserialize::<EventRecord>().map(|result| {
            result
                .map_err(GameError::from)
                .and_then(|record: EventRecord| ScriptEvent::try_from(record))
        })
    }
}
