//! Error types for the payroll-core library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the payroll library.
#[derive(Error, Debug)]
pub enum PayrollError {
    /// Document service error (split, extract, merge).
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Page or manifest parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised by a document service.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted: {0}")]
    Encrypted(PathBuf),

    /// Failed to split a PDF into pages.
    #[error("failed to split {path}: {reason}")]
    Split { path: PathBuf, reason: String },

    /// Failed to extract text from a PDF.
    #[error("failed to extract text from {path}: {reason}")]
    TextExtraction { path: PathBuf, reason: String },

    /// Failed to merge two PDFs.
    #[error("failed to merge into {target}: {reason}")]
    Merge { target: PathBuf, reason: String },

    /// External tool exited unsuccessfully.
    #[error("`{command}` failed with {status}: {stderr}")]
    Command {
        command: String,
        status: String,
        stderr: String,
    },

    /// I/O error while reading or writing a document.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A required time card field that could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    /// Last and/or first name.
    PayeeName,
    /// Any of month, day, year.
    PayPeriodEndingDate,
    /// Invoice number recovered from the file name.
    InvoiceNumber,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PayeeName => "Payee name",
            Self::PayPeriodEndingDate => "Pay period ending date",
            Self::InvoiceNumber => "Invoice Number",
        };
        f.write_str(label)
    }
}

/// Errors related to page and manifest parsing.
#[derive(Error, Debug)]
pub enum ParseError {
    /// A time card page is missing required fields.
    #[error(
        "couldn't get the following information from {}: {}\nExtracted text from the PDF for troubleshooting:\n --------\n{}\n --------",
        source_path.display(),
        join_missing(missing),
        raw_text
    )]
    Verification {
        missing: Vec<MissingField>,
        source_path: PathBuf,
        raw_text: String,
    },

    /// A dollar amount could not be normalized to cents.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}

fn join_missing(missing: &[MissingField]) -> String {
    missing
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for the payroll library.
pub type Result<T> = std::result::Result<T, PayrollError>;
