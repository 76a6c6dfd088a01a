//! Check copy manifest ("list file") parsing.
//!
//! A manifest sits beside a check copy batch with the same stem and `.txt`
//! extension:
//!
//! ```text
//! Date:04/03/2021
//! PAGE,LAST,FIRST,INVOICE,AMOUNT
//! 12,PINCKLEY,DENISE,EYM788,7094.97
//! 13,PINCKLEY,DENISE,EYM788,4682.00
//! ```
//!
//! Malformed rows are skipped, never fatal.

use tracing::{debug, warn};

use super::rules::parse_cents;
use super::rules::patterns::{MANIFEST_DATE, MANIFEST_HEADER};
use crate::models::config::IdentitySource;
use crate::models::records::{CheckCopy, PayPeriod, Payee};

/// Parse manifest content into check copy records, in row order.
///
/// The amount column is required and parsed only for the grand-total
/// identity source.
pub fn parse_manifest(content: &str, identity_source: IdentitySource) -> Vec<CheckCopy> {
    let track_amounts = identity_source == IdentitySource::GrandTotal;
    let min_fields = if track_amounts { 5 } else { 4 };

    let mut date = PayPeriod::new("", "", "");
    let mut records = Vec::new();

    for line in content.lines() {
        if line.contains(MANIFEST_DATE) {
            match parse_date_header(line) {
                Some(period) => date = period,
                None => warn!("Ignoring unreadable manifest date line: {:?}", line),
            }
            continue;
        }
        if line.contains(MANIFEST_HEADER) {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < min_fields {
            if !line.trim().is_empty() {
                debug!("Skipping manifest row with {} fields: {:?}", fields.len(), line);
            }
            continue;
        }

        let check_amount_cents = if track_amounts {
            match parse_cents(fields[4]) {
                Ok(cents) => Some(cents),
                Err(e) => {
                    warn!("Skipping manifest row {:?}: {}", line, e);
                    continue;
                }
            }
        } else {
            None
        };

        records.push(CheckCopy {
            pay_period: date.clone(),
            page_number: fields[0].to_string(),
            payee: Payee::new(fields[1], fields[2]),
            invoice_number: fields[3].to_string(),
            check_amount_cents,
            pdf_page_found: false,
        });
    }

    records
}

fn parse_date_header(line: &str) -> Option<PayPeriod> {
    let compact: String = line
        .replace(MANIFEST_DATE, "")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let parts: Vec<&str> = compact.split('/').collect();
    match parts.as_slice() {
        [month, day, year, ..] => Some(PayPeriod::new(*month, *day, *year)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_amount_manifest() {
        let content = "Date:04/03/2021\n\
                       PAGE,LAST,FIRST,INVOICE,AMOUNT\n\
                       12,PINCKLEY,DENISE,EYM788,7094.97\n\
                       13,PINCKLEY,DENISE,EYM788,4682.00\n";

        let records = parse_manifest(content, IdentitySource::GrandTotal);
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.pay_period, PayPeriod::new("04", "03", "2021"));
        assert_eq!(first.page_number, "12");
        assert_eq!(first.payee, Payee::new("PINCKLEY", "DENISE"));
        assert_eq!(first.invoice_number, "EYM788");
        assert_eq!(first.check_amount_cents, Some(709_497));
        assert!(!first.pdf_page_found);

        assert_eq!(records[1].check_amount_cents, Some(468_200));
    }

    #[test]
    fn test_parse_invoice_manifest() {
        let content = "Date:04/03/2021\nPAGE,LAST,FIRST,INVOICE\n12,PINCKLEY,DENISE,EYM788\n";

        let records = parse_manifest(content, IdentitySource::InvoiceNumber);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].check_amount_cents, None);
        assert_eq!(records[0].output_file_name(), "CC-PINCKLEY,DENISE-04032021-EYM788.pdf");
    }

    #[test]
    fn test_date_header_is_whitespace_insensitive() {
        let content = " Date: 04 / 10 / 2021 \n1,DOE,JANE,ABC123\n";

        let records = parse_manifest(content, IdentitySource::InvoiceNumber);
        assert_eq!(records[0].pay_period, PayPeriod::new("04", "10", "2021"));
    }

    #[test]
    fn test_latest_date_header_applies() {
        let content = "Date:04/03/2021\n\
                       1,DOE,JANE,ABC123\n\
                       Date:04/10/2021\n\
                       2,ROE,RICH,DEF456\n";

        let records = parse_manifest(content, IdentitySource::InvoiceNumber);
        assert_eq!(records[0].pay_period.day, "03");
        assert_eq!(records[1].pay_period.day, "10");
    }

    #[test]
    fn test_short_rows_are_skipped() {
        let content = "Date:04/03/2021\n\
                       1,DOE,JANE\n\
                       \n\
                       2,ROE,RICH,DEF456\n";

        let records = parse_manifest(content, IdentitySource::InvoiceNumber);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].page_number, "2");

        // Four fields are not enough when amounts are tracked.
        assert!(parse_manifest(content, IdentitySource::GrandTotal).is_empty());
    }

    #[test]
    fn test_bad_amount_row_is_skipped() {
        let content = "Date:04/03/2021\n1,DOE,JANE,ABC123,n/a\n2,ROE,RICH,DEF456,10.5\n";

        let records = parse_manifest(content, IdentitySource::GrandTotal);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].check_amount_cents, Some(1_050));
    }

    #[test]
    fn test_bad_date_header_keeps_previous_date() {
        let content = "Date:04/03/2021\nDate:soon\n1,DOE,JANE,ABC123\n";

        let records = parse_manifest(content, IdentitySource::InvoiceNumber);
        assert_eq!(records[0].pay_period, PayPeriod::new("04", "03", "2021"));
    }
}
