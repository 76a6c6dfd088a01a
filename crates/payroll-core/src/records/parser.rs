//! Time card page parser.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{MissingField, ParseError};
use crate::models::config::IdentitySource;
use crate::models::records::{CardIdentity, TimeCard};

use super::Result;
use super::rules::patterns::{END_OF_BATCH, GRAND_TOTAL_LABEL};
use super::rules::{
    FieldExtractor, GrandTotalExtractor, NameExtractor, PayPeriodExtractor,
    extract_invoice_number,
};

/// How a single page was classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Placeholder page between batches.
    EndOfBatch,
    /// Second physical page of a two-page time card.
    Continuation,
    /// A complete, verified time card.
    TimeCard(TimeCard),
}

/// Trait for page parsing.
pub trait PageParser {
    /// Parse one page of extracted text. `source_path` is the batch file the
    /// page was split from.
    fn parse_page(&self, text: &str, source_path: &Path) -> Result<PageOutcome>;
}

/// Line-oriented time card parser.
#[derive(Debug, Clone, Default)]
pub struct TimeCardParser {
    identity_source: IdentitySource,
}

impl TimeCardParser {
    /// Create a parser using the default identity source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identity source.
    pub fn with_identity_source(mut self, identity_source: IdentitySource) -> Self {
        self.identity_source = identity_source;
        self
    }

    pub fn is_end_of_batch(text: &str) -> bool {
        text.contains(END_OF_BATCH)
    }

    /// Only checked for the invoice-number layout; the grand-total layout has
    /// no continuation pages.
    pub fn is_continuation(&self, text: &str) -> bool {
        self.identity_source == IdentitySource::InvoiceNumber && !text.contains(GRAND_TOTAL_LABEL)
    }

    fn extract_identity(&self, text: &str, source_path: &Path) -> Option<CardIdentity> {
        match self.identity_source {
            IdentitySource::InvoiceNumber => {
                extract_invoice_number(source_path).map(CardIdentity::InvoiceNumber)
            }
            IdentitySource::GrandTotal => {
                let cents = GrandTotalExtractor::new().extract(text).unwrap_or_else(|| {
                    warn!(
                        "No grand total found on a page of {}, using 0.00",
                        source_path.display()
                    );
                    0
                });
                Some(CardIdentity::GrandTotalCents(cents))
            }
        }
    }
}

impl PageParser for TimeCardParser {
    fn parse_page(&self, text: &str, source_path: &Path) -> Result<PageOutcome> {
        if Self::is_end_of_batch(text) {
            return Ok(PageOutcome::EndOfBatch);
        }
        if self.is_continuation(text) {
            return Ok(PageOutcome::Continuation);
        }

        let payee = NameExtractor::new().extract(text);
        let pay_period = PayPeriodExtractor::new().extract(text);
        let identity = self.extract_identity(text, source_path);

        let mut missing = Vec::new();
        if payee.is_none() {
            missing.push(MissingField::PayeeName);
        }
        if pay_period.is_none() {
            missing.push(MissingField::PayPeriodEndingDate);
        }
        if identity.is_none() {
            missing.push(MissingField::InvoiceNumber);
        }

        match (payee, pay_period, identity) {
            (Some(payee), Some(pay_period), Some(identity)) => {
                let card = TimeCard {
                    payee,
                    pay_period,
                    identity,
                    source_path: source_path.to_path_buf(),
                    raw_text: text.to_string(),
                };
                debug!("Parsed time card {}", card.output_file_name());
                Ok(PageOutcome::TimeCard(card))
            }
            _ => Err(ParseError::Verification {
                missing,
                source_path: source_path.to_path_buf(),
                raw_text: text.to_string(),
            }),
        }
    }
}
