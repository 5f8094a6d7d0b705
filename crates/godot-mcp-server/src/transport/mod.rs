//! Transport adapters

pub mod stdio;
