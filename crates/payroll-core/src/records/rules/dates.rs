//! Pay period ending date extraction.

use super::FieldExtractor;
use super::patterns::PAY_PERIOD_ENDING;
use crate::models::records::PayPeriod;

/// Extracts the date printed before `Pay Period Ending`, e.g.
/// `03/13/2021Pay Period Ending :`.
pub struct PayPeriodExtractor;

impl PayPeriodExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PayPeriodExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for PayPeriodExtractor {
    type Output = PayPeriod;

    fn extract(&self, text: &str) -> Option<PayPeriod> {
        let line = text.lines().find(|line| line.contains(PAY_PERIOD_ENDING))?;
        let date = line.split("Pay").next().unwrap_or_default();

        let parts: Vec<&str> = date.split('/').collect();
        match parts.as_slice() {
            [month, day, year, ..] if !month.is_empty() && !day.is_empty() && !year.is_empty() => {
                Some(PayPeriod::new(*month, *day, *year))
            }
            _ => None,
        }
    }
}

/// Extract the pay period ending date from time card text.
pub fn extract_pay_period(text: &str) -> Option<PayPeriod> {
    PayPeriodExtractor::new().extract(text)
}
