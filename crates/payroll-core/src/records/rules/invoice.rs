//! Invoice number recovery from batch file names.

use std::path::Path;

use super::patterns::INVOICE_IN_PATH;

/// Find an underscore-delimited invoice token in a batch path.
///
/// `inbox/WE_041021_EYY896_CONSTRUCTION (2).pdf` yields `EYY896`.
pub fn extract_invoice_number(path: &Path) -> Option<String> {
    let path = path.to_string_lossy();
    INVOICE_IN_PATH
        .find(&path)
        .map(|m| m.as_str().replace('_', ""))
}
