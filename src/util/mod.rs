//! Shared helpers

pub mod parse;
pub mod time;
