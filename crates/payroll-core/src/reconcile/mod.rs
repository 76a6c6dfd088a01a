//! Duplicate tagging and time card / check copy matching.

pub mod dedup;
pub mod matcher;

pub use dedup::{
    CHECK_COPY_DUPLICATE_MARKER, Duplicable, DuplicateTagger, ProcessingMode,
    TIME_CARD_DUPLICATE_MARKER,
};
pub use matcher::{MatchOutcome, MatchedPair, Matcher};
