//! Core library for film payroll reconciliation.
//!
//! This crate provides:
//! - Time card page parsing (payee, pay period, invoice number or grand total)
//! - Check copy manifest parsing
//! - Duplicate tagging and time card / check copy matching
//! - PDF split, text extraction and merge behind a `DocumentService` seam
//! - The inbox-to-outbox batch pipeline and its reconciliation report

pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod reconcile;
pub mod records;

pub use error::{DocumentError, MissingField, ParseError, PayrollError, Result};
pub use models::config::{DocumentBackend, IdentitySource, PayrollConfig};
pub use models::records::{CardIdentity, CheckCopy, PayPeriod, Payee, TimeCard};
pub use models::report::{MatchedEntry, ReconciliationReport};
pub use pdf::{DocumentService, NativeDocumentService, PdfBoxService, SplitPage, create_service};
pub use pipeline::{BatchKind, BatchSummary, InboxEntry, Reconciler};
pub use reconcile::{DuplicateTagger, MatchOutcome, MatchedPair, Matcher, ProcessingMode};
pub use records::{PageOutcome, PageParser, TimeCardParser, parse_manifest};
