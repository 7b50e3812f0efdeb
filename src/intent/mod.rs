//! Meeting action detection.
//!
//! This module provides:
//! - Ordered pattern tables and keyword sets for the four action families
//! - A classifier that resolves conflicts with a fixed precedence
//!   (list > cancel > update > create)

pub mod classifier;
pub mod patterns;

pub use classifier::*;
pub use patterns::{first_keyword, tokenize, PatternTable};
