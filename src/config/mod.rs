//! Configuration for the confab parser.
//!
//! This module provides:
//! - Parser settings loaded from TOML (timezone offset, defaults, policies)
//! - The read-only attendee directory (persons, teams with aliases)
//! - The exclusion-word set used to clean candidate attendee names
//!
//! Everything here is loaded once and treated as immutable afterwards;
//! resolvers borrow these objects and never mutate them.

mod directory;
mod settings;

pub use directory::{Directory, ExclusionWords, Person, Team};
pub use settings::{
    Config, DirectoryConfig, ParserConfig, PastDatePolicy, TimezoneConfig,
};
