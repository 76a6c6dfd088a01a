//! Time card and check copy records.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::config::IdentitySource;
use crate::records::rules::amounts::format_dollars;

/// Payee name as printed, "Last, First".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payee {
    pub last_name: String,
    pub first_name: String,
}

impl Payee {
    pub fn new(last_name: impl Into<String>, first_name: impl Into<String>) -> Self {
        Self {
            last_name: last_name.into(),
            first_name: first_name.into(),
        }
    }

    /// Append a marker to both name parts.
    pub fn mark(&mut self, marker: &str) {
        self.last_name.push_str(marker);
        self.first_name.push_str(marker);
    }

    /// Per-payee counter key, `"last,first"`.
    pub fn counter_key(&self) -> String {
        format!("{},{}", self.last_name, self.first_name)
    }
}

/// Pay period ending date, kept as the zero-padded strings found on the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    pub month: String,
    pub day: String,
    pub year: String,
}

impl PayPeriod {
    pub fn new(month: impl Into<String>, day: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            month: month.into(),
            day: day.into(),
            year: year.into(),
        }
    }

    /// `{month}{day}{year}` as used in output file names.
    pub fn compact(&self) -> String {
        format!("{}{}{}", self.month, self.day, self.year)
    }
}

/// The field that identifies a time card for matching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardIdentity {
    /// Invoice number recovered from the batch file name.
    InvoiceNumber(String),
    /// Grand total in cents.
    GrandTotalCents(u64),
}

impl CardIdentity {
    fn file_name_segment(&self) -> String {
        match self {
            Self::InvoiceNumber(invoice) => invoice.clone(),
            Self::GrandTotalCents(cents) => format_dollars(*cents),
        }
    }
}

/// Exact-equality key used for matching and duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    pub last_name: String,
    pub first_name: String,
    pub month: String,
    pub day: String,
    pub year: String,
    pub identity: KeyIdentity,
}

/// Identity component of a [`MatchKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyIdentity {
    Invoice(String),
    Cents(u64),
}

impl MatchKey {
    fn new(payee: &Payee, period: &PayPeriod, identity: KeyIdentity) -> Self {
        Self {
            last_name: payee.last_name.clone(),
            first_name: payee.first_name.clone(),
            month: period.month.clone(),
            day: period.day.clone(),
            year: period.year.clone(),
            identity,
        }
    }
}

/// One parsed time card page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeCard {
    /// Payee name.
    pub payee: Payee,

    /// Pay period ending date.
    pub pay_period: PayPeriod,

    /// Invoice number or grand total.
    pub identity: CardIdentity,

    /// Batch file the page came from.
    pub source_path: PathBuf,

    /// Full extracted page text.
    #[serde(skip)]
    pub raw_text: String,
}

impl TimeCard {
    /// `TC-{last},{first}-{month}{day}{year}-{invoice_or_amount}.pdf`
    pub fn output_file_name(&self) -> String {
        format!(
            "TC-{},{}-{}-{}.pdf",
            self.payee.last_name,
            self.payee.first_name,
            self.pay_period.compact(),
            self.identity.file_name_segment()
        )
    }

    pub fn match_key(&self) -> MatchKey {
        let identity = match &self.identity {
            CardIdentity::InvoiceNumber(invoice) => KeyIdentity::Invoice(invoice.clone()),
            CardIdentity::GrandTotalCents(cents) => KeyIdentity::Cents(*cents),
        };
        MatchKey::new(&self.payee, &self.pay_period, identity)
    }
}

/// One check described by a manifest row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCopy {
    /// Date from the manifest header in effect for this row.
    pub pay_period: PayPeriod,

    /// Page of the batch PDF holding this check.
    pub page_number: String,

    /// Payee name.
    pub payee: Payee,

    /// Invoice number.
    pub invoice_number: String,

    /// Check amount in cents, when the manifest tracks amounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_amount_cents: Option<u64>,

    /// Set once the split page for this record has been located.
    pub pdf_page_found: bool,
}

impl CheckCopy {
    /// `CC-{last},{first}-{month}{day}{year}-{invoice}[-{amount}].pdf`
    pub fn output_file_name(&self) -> String {
        let amount = self
            .check_amount_cents
            .map(|cents| format!("-{}", format_dollars(cents)))
            .unwrap_or_default();
        format!(
            "CC-{},{}-{}-{}{}.pdf",
            self.payee.last_name,
            self.payee.first_name,
            self.pay_period.compact(),
            self.invoice_number,
            amount
        )
    }

    /// `LLS2-PR-TC[-0N]-{last},{first},{month}{day}{year}-{invoice}.pdf`
    ///
    /// The counter segment only appears for a payee's second and later check.
    pub fn merged_output_name(&self, nth_check: u32) -> String {
        let counter = if nth_check > 1 {
            format!("-{nth_check:02}")
        } else {
            String::new()
        };
        format!(
            "LLS2-PR-TC{}-{},{},{}-{}.pdf",
            counter,
            self.payee.last_name,
            self.payee.first_name,
            self.pay_period.compact(),
            self.invoice_number
        )
    }

    /// Key on name, date and invoice number, whatever the identity source.
    pub fn invoice_key(&self) -> MatchKey {
        let identity = KeyIdentity::Invoice(self.invoice_number.clone());
        MatchKey::new(&self.payee, &self.pay_period, identity)
    }

    /// Key under the given identity source. `None` when amounts are
    /// required but this record has none.
    pub fn match_key(&self, source: IdentitySource) -> Option<MatchKey> {
        match source {
            IdentitySource::InvoiceNumber => Some(self.invoice_key()),
            IdentitySource::GrandTotal => {
                let cents = self.check_amount_cents?;
                Some(MatchKey::new(&self.payee, &self.pay_period, KeyIdentity::Cents(cents)))
            }
        }
    }
}
