//! CLI module for the Cadence command-line interface.
//!
//! This module provides command handlers for running scheduling operations
//! directly against the configured event store.

mod commands;
mod output;

pub use commands::*;
