//! Literal markers and regex patterns for time card and manifest text.

use lazy_static::lazy_static;
use regex::Regex;

/// Placeholder page the payroll system inserts between batches.
pub const END_OF_BATCH: &str = "END of BATCH";

/// Only the first page of a time card carries this label.
pub const GRAND_TOTAL_LABEL: &str = "Grand Total:";

/// Opens the block of totals.
pub const GRAND_TOTAL: &str = "Grand Total";

/// Closes the block of totals.
pub const SPLIT_CODING: &str = "Split Coding";

/// Line holding the pay period date, e.g. `03/13/2021Pay Period Ending :`.
pub const PAY_PERIOD_ENDING: &str = "Pay Period Ending";

/// Manifest date header prefix, e.g. `Date:04/03/2021`.
pub const MANIFEST_DATE: &str = "Date:";

/// Manifest column header. The amount variant extends it with `,AMOUNT`.
pub const MANIFEST_HEADER: &str = "PAGE,LAST,FIRST,INVOICE";

lazy_static! {
    // Invoice number between underscores in a batch file name: WE_041021_EYY896_CONSTRUCTION.pdf
    pub static ref INVOICE_IN_PATH: Regex = Regex::new(
        r"_[A-Z]{3}[0-9]{3}_"
    ).unwrap();

    // A line that is nothing but a dollar amount: 6,746.00 or 165,687.3
    pub static ref DOLLAR_AMOUNT_LINE: Regex = Regex::new(
        r"^[0-9,]+\.[0-9]{1,2}$"
    ).unwrap();
}
