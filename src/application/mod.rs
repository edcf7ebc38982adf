//! Application layer: the `GameEngine` that serializes every state transition
//! and owns the cancellable per-round timers.
//!
//! Mutations happen under one `tokio` mutex; observers are notified through a
//! broadcast channel after each successful transition.

pub mod engine;
pub mod timers;
