//! Query execution and classification for the playground.
//!
//! This module isolates console handling from the HTTP layer.

pub mod console;

pub use console::{count_query, estimate_affected_rows, ConsoleOutcome, QueryConsole};
