//! CLI command handlers.
//!
//! This module provides handlers for parsing sentences, walking the
//! clarification loop interactively, and inspecting the loaded directory.

mod commands;
mod output;

pub use commands::*;
