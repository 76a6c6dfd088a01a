//! Reconciliation report produced at the end of a run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::IdentitySource;

/// One time card paired with one check copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedEntry {
    pub time_card: String,
    pub check_copy: String,
    pub merged: String,
}

/// Outcome of a full inbox run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,

    /// Identity field used for matching.
    pub identity_source: IdentitySource,

    /// Pairs written to the merged folder, in matching order.
    pub matched: Vec<MatchedEntry>,

    /// Time card output names with no check copy, sorted.
    pub unmatched_time_cards: Vec<String>,

    /// Check copy output names with no time card, sorted.
    pub unmatched_check_copies: Vec<String>,

    /// Manifest records whose page never turned up in the batch PDF, sorted.
    pub missing_check_copy_pages: Vec<String>,
}

impl ReconciliationReport {
    pub fn new(identity_source: IdentitySource) -> Self {
        Self {
            generated_at: Utc::now(),
            identity_source,
            matched: Vec::new(),
            unmatched_time_cards: Vec::new(),
            unmatched_check_copies: Vec::new(),
            missing_check_copy_pages: Vec::new(),
        }
    }

    /// True when every record found a partner.
    pub fn is_fully_reconciled(&self) -> bool {
        self.unmatched_time_cards.is_empty()
            && self.unmatched_check_copies.is_empty()
            && self.missing_check_copy_pages.is_empty()
    }
}
