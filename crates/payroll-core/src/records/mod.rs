//! Record extraction from page text and manifests.

pub mod manifest;
mod parser;
pub mod rules;

pub use manifest::parse_manifest;
pub use parser::{PageOutcome, PageParser, TimeCardParser};

use crate::error::ParseError;

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
