//! Duplicate detection within a batch.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::config::IdentitySource;
use crate::models::records::{CheckCopy, MatchKey, TimeCard};

/// Marker appended to a time card seen twice in one batch.
pub const TIME_CARD_DUPLICATE_MARKER: &str = "_DUPLICATE_CC";

/// Marker appended to a check copy seen twice in one batch.
pub const CHECK_COPY_DUPLICATE_MARKER: &str = "_DUPLICATE_TC";

/// Whether a batch is a regular submission or a correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    #[default]
    Standard,
    /// Corrections replace earlier records instead of being flagged.
    Revision,
}

/// A record that can be flagged as a duplicate.
pub trait Duplicable {
    /// Marker appended to both name parts.
    const MARKER: &'static str;

    /// Key two records must share to be duplicates. `None` exempts the
    /// record from tagging.
    fn duplicate_key(&self, identity_source: IdentitySource) -> Option<MatchKey>;

    /// Append [`Self::MARKER`] to the payee name.
    fn mark_duplicate(&mut self);

    /// Output file name, for logging.
    fn describe(&self) -> String;
}

impl Duplicable for TimeCard {
    const MARKER: &'static str = TIME_CARD_DUPLICATE_MARKER;

    fn duplicate_key(&self, _identity_source: IdentitySource) -> Option<MatchKey> {
        Some(self.match_key())
    }

    fn mark_duplicate(&mut self) {
        self.payee.mark(Self::MARKER);
    }

    fn describe(&self) -> String {
        self.output_file_name()
    }
}

impl Duplicable for CheckCopy {
    const MARKER: &'static str = CHECK_COPY_DUPLICATE_MARKER;

    /// Same key the matcher uses, so several checks to one payee under one
    /// invoice stay distinct when their amounts differ.
    fn duplicate_key(&self, identity_source: IdentitySource) -> Option<MatchKey> {
        self.match_key(identity_source)
    }

    fn mark_duplicate(&mut self) {
        self.payee.mark(Self::MARKER);
    }

    fn describe(&self) -> String {
        self.output_file_name()
    }
}

/// Flags the second and later records sharing a key.
///
/// The first record with a key passes through untouched. Later ones get the
/// marker on both name parts, which changes their output file name and
/// their match key, so they surface as unmatched for manual review.
#[derive(Debug, Default)]
pub struct DuplicateTagger {
    mode: ProcessingMode,
    identity_source: IdentitySource,
    seen: HashSet<MatchKey>,
}

impl DuplicateTagger {
    pub fn new(mode: ProcessingMode, identity_source: IdentitySource) -> Self {
        Self {
            mode,
            identity_source,
            seen: HashSet::new(),
        }
    }

    /// Check `record` against the keys seen so far, marking it if it repeats
    /// one. Returns true when the record was marked. Revision batches are
    /// never marked.
    pub fn tag<R: Duplicable>(&mut self, record: &mut R) -> bool {
        if self.mode == ProcessingMode::Revision {
            return false;
        }

        let Some(key) = record.duplicate_key(self.identity_source) else {
            return false;
        };
        if self.seen.insert(key) {
            return false;
        }

        record.mark_duplicate();
        warn!("Detected duplicate! Marking file: {}", record.describe());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::records::{CardIdentity, PayPeriod, Payee};
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn card(last: &str, first: &str, invoice: &str) -> TimeCard {
        TimeCard {
            payee: Payee::new(last, first),
            pay_period: PayPeriod::new("04", "03", "2021"),
            identity: CardIdentity::InvoiceNumber(invoice.to_string()),
            source_path: PathBuf::from("WE_040321_INV001_.pdf"),
            raw_text: String::new(),
        }
    }

    fn check(last: &str, first: &str, amount: u64) -> CheckCopy {
        CheckCopy {
            pay_period: PayPeriod::new("04", "03", "2021"),
            page_number: "1".to_string(),
            payee: Payee::new(last, first),
            invoice_number: "INV001".to_string(),
            check_amount_cents: Some(amount),
            pdf_page_found: true,
        }
    }

    #[test]
    fn test_second_time_card_is_marked() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, IdentitySource::InvoiceNumber);
        let mut first = card("DOE", "JANE", "INV001");
        let mut second = card("DOE", "JANE", "INV001");

        assert!(!tagger.tag(&mut first));
        assert!(tagger.tag(&mut second));

        assert_eq!(first.payee, Payee::new("DOE", "JANE"));
        assert_eq!(second.payee, Payee::new("DOE_DUPLICATE_CC", "JANE_DUPLICATE_CC"));
        assert_eq!(
            second.output_file_name(),
            "TC-DOE_DUPLICATE_CC,JANE_DUPLICATE_CC-04032021-INV001.pdf"
        );
    }

    #[test]
    fn test_third_copy_is_marked_once() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, IdentitySource::InvoiceNumber);
        let mut cards = vec![card("DOE", "JANE", "INV001"); 3];

        let marked: Vec<bool> = cards.iter_mut().map(|c| tagger.tag(c)).collect();
        assert_eq!(marked, vec![false, true, true]);
        assert_eq!(cards[2].payee.last_name, "DOE_DUPLICATE_CC");
    }

    #[test]
    fn test_different_keys_are_not_marked() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, IdentitySource::InvoiceNumber);
        assert!(!tagger.tag(&mut card("DOE", "JANE", "INV001")));
        assert!(!tagger.tag(&mut card("DOE", "JANE", "INV002")));
        assert!(!tagger.tag(&mut card("DOE", "JOHN", "INV001")));
    }

    #[test]
    fn test_check_copies_key_on_invoice_under_invoice_identity() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, IdentitySource::InvoiceNumber);
        let mut first = check("DOE", "JANE", 100);
        let mut second = check("DOE", "JANE", 200);

        assert!(!tagger.tag(&mut first));
        assert!(tagger.tag(&mut second));
        assert_eq!(second.payee, Payee::new("DOE_DUPLICATE_TC", "JANE_DUPLICATE_TC"));
    }

    #[test]
    fn test_check_copies_key_on_amount_under_grand_total() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, IdentitySource::GrandTotal);
        let mut first = check("PINCKLEY", "DENISE", 709_497);
        let mut second = check("PINCKLEY", "DENISE", 468_200);
        let mut repeat = check("PINCKLEY", "DENISE", 468_200);

        assert!(!tagger.tag(&mut first));
        assert!(!tagger.tag(&mut second));
        assert!(tagger.tag(&mut repeat));
        assert_eq!(second.payee, Payee::new("PINCKLEY", "DENISE"));
        assert_eq!(repeat.payee.last_name, "PINCKLEY_DUPLICATE_TC");
    }

    #[test]
    fn test_check_copy_without_amount_is_not_tagged_under_grand_total() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, IdentitySource::GrandTotal);
        let mut first = check("DOE", "JANE", 100);
        let mut second = check("DOE", "JANE", 100);
        first.check_amount_cents = None;
        second.check_amount_cents = None;

        assert!(!tagger.tag(&mut first));
        assert!(!tagger.tag(&mut second));
    }

    #[test]
    fn test_revision_mode_never_marks() {
        let mut tagger = DuplicateTagger::new(ProcessingMode::Revision, IdentitySource::InvoiceNumber);
        let mut first = card("DOE", "JANE", "INV001");
        let mut second = card("DOE", "JANE", "INV001");

        assert!(!tagger.tag(&mut first));
        assert!(!tagger.tag(&mut second));
        assert_eq!(second.payee, Payee::new("DOE", "JANE"));
    }
}
