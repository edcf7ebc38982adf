//! Presentation-side adapters: where events come from and where snapshots go.

pub mod csv;
pub mod json;
pub mod script;
