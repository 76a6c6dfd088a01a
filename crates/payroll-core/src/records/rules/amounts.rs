//! Dollar amount extraction and normalization.

use rust_decimal::Decimal;
use tracing::{trace, warn};

use super::FieldExtractor;
use super::patterns::{DOLLAR_AMOUNT_LINE, GRAND_TOTAL, SPLIT_CODING};
use crate::error::ParseError;

/// Extracts the grand total from a time card page.
///
/// Amount lines are collected between the `Grand Total` line and the
/// `Split Coding` line; the last one wins. Pages often repeat the total or
/// list hours and subtotals first:
///
/// ```text
/// Grand Total:
/// 50.0 5,740.00
/// 1,006.00
/// 6,746.00
/// Split Coding
/// ```
pub struct GrandTotalExtractor;

impl GrandTotalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GrandTotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for GrandTotalExtractor {
    type Output = u64;

    fn extract(&self, text: &str) -> Option<u64> {
        let mut capturing = false;
        let mut last_amount = None;

        for line in text.lines() {
            if line.contains(SPLIT_CODING) {
                break;
            } else if capturing {
                if DOLLAR_AMOUNT_LINE.is_match(line) {
                    trace!("Grand total candidate: {}", line);
                    last_amount = Some(line);
                }
            } else if line.contains(GRAND_TOTAL) {
                capturing = true;
            }
        }

        let amount = last_amount?;
        match parse_cents(amount) {
            Ok(cents) => Some(cents),
            Err(e) => {
                warn!("Unreadable grand total {:?}: {}", amount, e);
                None
            }
        }
    }
}

/// Extract the grand total in cents, if the page has one.
pub fn extract_grand_total(text: &str) -> Option<u64> {
    GrandTotalExtractor::new().extract(text)
}

/// Normalize a dollar string with exactly one decimal point to cents.
///
/// Commas are dropped and a single fractional digit is padded, since the
/// payroll export sometimes truncates `1,293.30` to `1,293.3`.
pub fn parse_cents(amount: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidAmount(amount.to_string());

    let cleaned = amount.trim().replace(',', "");
    let (whole, fraction) = cleaned.split_once('.').ok_or_else(invalid)?;

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if fraction.is_empty() || fraction.len() > 2 || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let dollars: u64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut cents: u64 = fraction.parse().map_err(|_| invalid())?;
    if fraction.len() == 1 {
        cents *= 10;
    }

    dollars
        .checked_mul(100)
        .and_then(|d| d.checked_add(cents))
        .ok_or_else(invalid)
}

/// Format cents as a two-decimal dollar string, e.g. `709497` -> `7094.97`.
pub fn format_dollars(cents: u64) -> String {
    Decimal::from_i128_with_scale(i128::from(cents), 2).to_string()
}
