//! Pure game rules: tiles, rounds, navigation phases and the session that ties
//! them together. Nothing in here knows about time or tasks.

pub mod phase;
pub mod ports;
pub mod round;
pub mod session;
pub mod snapshot;
pub mod tile;
