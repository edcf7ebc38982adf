//! Adapters for the domain ports.

pub mod fixed_layout;
pub mod random_layout;
