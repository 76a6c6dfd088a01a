//! Rule-based field extractors for time card pages.

pub mod amounts;
pub mod dates;
pub mod invoice;
pub mod names;
pub mod patterns;

pub use amounts::{GrandTotalExtractor, extract_grand_total, format_dollars, parse_cents};
pub use dates::{PayPeriodExtractor, extract_pay_period};
pub use invoice::extract_invoice_number;
pub use names::{NameExtractor, extract_name};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from page text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}
