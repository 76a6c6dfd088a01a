//! Payee name extraction.

use super::FieldExtractor;
use crate::models::records::Payee;

/// Extracts the payee from the first comma-bearing line.
///
/// Examples: `PINCKLEY, DENISE`, `LIDDIARD, JOAQUIN SSN`. Anything after the
/// first space on the first-name side (SSN label, middle initial) is dropped.
pub struct NameExtractor;

impl NameExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for NameExtractor {
    type Output = Payee;

    fn extract(&self, text: &str) -> Option<Payee> {
        let line = text.lines().find(|line| line.contains(','))?;

        let mut parts = line.split(", ");
        let last_name = parts.next().unwrap_or_default();
        let first_name = parts.next()?.split(' ').next().unwrap_or_default();

        if last_name.is_empty() || first_name.is_empty() {
            return None;
        }
        Some(Payee::new(last_name, first_name))
    }
}

/// Extract the payee name from time card text.
pub fn extract_name(text: &str) -> Option<Payee> {
    NameExtractor::new().extract(text)
}
