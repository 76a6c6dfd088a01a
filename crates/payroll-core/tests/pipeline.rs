//! End-to-end runs of the batch pipeline over temp directories.
//!
//! A fake document service stands in for the PDF backends: a "PDF" is a
//! text file whose pages are separated by form feeds.

use std::fs;
use std::path::Path;

use payroll_core::pdf::{self, SplitPage};
use payroll_core::{
    DocumentError, DocumentService, IdentitySource, ParseError, PayrollConfig, PayrollError,
    Reconciler,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PAGE_BREAK: &str = "\u{c}";

struct TextDocuments;

impl DocumentService for TextDocuments {
    fn split_pages(&self, path: &Path) -> pdf::Result<Vec<SplitPage>> {
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut pages = Vec::new();
        for (i, text) in content.split(PAGE_BREAK).enumerate() {
            let number = i as u32 + 1;
            let page_path = pdf::split_page_path(path, number);
            fs::write(&page_path, text).map_err(|source| DocumentError::Io {
                path: page_path.clone(),
                source,
            })?;
            pages.push(SplitPage {
                number,
                path: page_path,
            });
        }
        Ok(pages)
    }

    fn extract_text(&self, path: &Path) -> pdf::Result<String> {
        fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn merge_pages(&self, first: &Path, second: &Path, target: &Path) -> pdf::Result<()> {
        let merged = format!(
            "{}{}{}",
            self.extract_text(first)?,
            PAGE_BREAK,
            self.extract_text(second)?
        );
        fs::write(target, merged).map_err(|source| DocumentError::Io {
            path: target.to_path_buf(),
            source,
        })
    }
}

struct Workspace {
    _root: TempDir,
    config: PayrollConfig,
}

impl Workspace {
    fn new(identity_source: IdentitySource) -> Self {
        let root = tempfile::tempdir().unwrap();
        let mut config = PayrollConfig::default();
        config.folders.inbox = root.path().join("inbox");
        config.folders.outbox = root.path().join("outbox");
        config.folders.scratch = root.path().join("scratch");
        config.matching.identity_source = identity_source;
        fs::create_dir_all(&config.folders.inbox).unwrap();
        Self { _root: root, config }
    }

    fn add(&self, name: &str, pages: &[&str]) {
        let content = pages.join(PAGE_BREAK);
        fs::write(self.config.folders.inbox.join(name), content).unwrap();
    }

    fn add_manifest(&self, name: &str, content: &str) {
        fs::write(self.config.folders.inbox.join(name), content).unwrap();
    }

    fn reconciler(&self) -> Reconciler<TextDocuments> {
        Reconciler::new(self.config.clone(), TextDocuments)
    }

    fn files(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(&self.config.folders.scratch).unwrap().next().is_none()
    }
}

fn time_card(last: &str, first: &str, date: &str, total: &str) -> String {
    format!(
        "{last}, {first} SSN\n{date}Pay Period Ending :\nHours 10.0\nGrand Total:\n1,006.00\n{total}\nSplit Coding\nACCT 100\n"
    )
}

#[test]
fn test_grand_total_run_matches_and_merges() {
    let ws = Workspace::new(IdentitySource::GrandTotal);
    ws.add(
        "WE_040321_BATCH.pdf",
        &[
            &time_card("PINCKLEY", "DENISE", "04/03/2021", "7,094.97"),
            &time_card("PINCKLEY", "DENISE", "04/03/2021", "4,682.0"),
            &time_card("LIDDIARD", "JOAQUIN", "04/03/2021", "300.00"),
            "END of BATCH",
        ],
    );
    ws.add("checks_0403.pdf", &["check 1", "check 2", "check 3"]);
    ws.add_manifest(
        "checks_0403.txt",
        "Date:04/03/2021\nPAGE,LAST,FIRST,INVOICE,AMOUNT\n1,PINCKLEY,DENISE,EYM788,7094.97\n2,PINCKLEY,DENISE,EYM789,4682.00\n3,SMITH,ANN,EYM790,50.00\n",
    );

    let report = ws.reconciler().run().unwrap();

    let merged: Vec<&str> = report.matched.iter().map(|m| m.merged.as_str()).collect();
    assert_eq!(
        merged,
        vec![
            "LLS2-PR-TC-PINCKLEY,DENISE,04032021-EYM788.pdf",
            "LLS2-PR-TC-02-PINCKLEY,DENISE,04032021-EYM789.pdf",
        ]
    );
    assert_eq!(
        report.unmatched_time_cards,
        vec!["TC-LIDDIARD,JOAQUIN-04032021-300.00.pdf"]
    );
    assert_eq!(
        report.unmatched_check_copies,
        vec!["CC-SMITH,ANN-04032021-EYM790-50.00.pdf"]
    );
    assert!(report.missing_check_copy_pages.is_empty());
    assert!(!report.is_fully_reconciled());

    let folders = &ws.config.folders;
    assert_eq!(
        ws.files(&folders.time_card_dir()),
        vec![
            "TC-LIDDIARD,JOAQUIN-04032021-300.00.pdf",
            "TC-PINCKLEY,DENISE-04032021-4682.00.pdf",
            "TC-PINCKLEY,DENISE-04032021-7094.97.pdf",
        ]
    );
    assert_eq!(ws.files(&folders.check_copy_dir()).len(), 3);

    let final_file = folders
        .merged_dir()
        .join("LLS2-PR-TC-PINCKLEY,DENISE,04032021-EYM788.pdf");
    let content = fs::read_to_string(final_file).unwrap();
    assert!(content.contains("7,094.97"));
    assert!(content.ends_with("check 1"));

    assert!(ws.scratch_is_empty());
}

#[test]
fn test_grand_total_run_keeps_checks_sharing_an_invoice() {
    let ws = Workspace::new(IdentitySource::GrandTotal);
    ws.add(
        "WE_040321_BATCH.pdf",
        &[
            &time_card("PINCKLEY", "DENISE", "04/03/2021", "7,094.97"),
            &time_card("PINCKLEY", "DENISE", "04/03/2021", "4,682.00"),
        ],
    );
    ws.add("checks_0403.pdf", &["check 1", "check 2"]);
    ws.add_manifest(
        "checks_0403.txt",
        "Date:04/03/2021\nPAGE,LAST,FIRST,INVOICE,AMOUNT\n1,PINCKLEY,DENISE,EYM788,7094.97\n2,PINCKLEY,DENISE,EYM788,4682.00\n",
    );

    let report = ws.reconciler().run().unwrap();

    let merged: Vec<&str> = report.matched.iter().map(|m| m.merged.as_str()).collect();
    assert_eq!(
        merged,
        vec![
            "LLS2-PR-TC-PINCKLEY,DENISE,04032021-EYM788.pdf",
            "LLS2-PR-TC-02-PINCKLEY,DENISE,04032021-EYM788.pdf",
        ]
    );
    assert!(report.is_fully_reconciled());
    assert_eq!(
        ws.files(&ws.config.folders.check_copy_dir()),
        vec![
            "CC-PINCKLEY,DENISE-04032021-EYM788-4682.00.pdf",
            "CC-PINCKLEY,DENISE-04032021-EYM788-7094.97.pdf",
        ]
    );
}

#[test]
fn test_invoice_run_discards_continuation_pages() {
    let ws = Workspace::new(IdentitySource::InvoiceNumber);
    ws.add(
        "WE_040321_EYM788_CONSTRUCTION.pdf",
        &[
            &time_card("PINCKLEY", "DENISE", "04/03/2021", "7,094.97"),
            "Hours continued\n8.0 8.0\n",
            "END of BATCH",
        ],
    );
    ws.add("checks.pdf", &["check 1"]);
    ws.add_manifest(
        "checks.txt",
        "Date:04/03/2021\nPAGE,LAST,FIRST,INVOICE\n1,PINCKLEY,DENISE,EYM788\n",
    );

    let report = ws.reconciler().run().unwrap();

    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.matched[0].time_card, "TC-PINCKLEY,DENISE-04032021-EYM788.pdf");
    assert_eq!(report.matched[0].check_copy, "CC-PINCKLEY,DENISE-04032021-EYM788.pdf");
    assert!(report.is_fully_reconciled());
}

#[test]
fn test_duplicate_time_card_is_marked_and_left_unmatched() {
    let ws = Workspace::new(IdentitySource::GrandTotal);
    let card = time_card("DOE", "JANE", "04/03/2021", "100.00");
    ws.add("WE_040321.pdf", &[&card, &card]);
    ws.add("checks.pdf", &["check 1"]);
    ws.add_manifest("checks.txt", "Date:04/03/2021\n1,DOE,JANE,INV001,100.00\n");

    let report = ws.reconciler().run().unwrap();

    assert_eq!(report.matched.len(), 1);
    assert_eq!(
        report.unmatched_time_cards,
        vec!["TC-DOE_DUPLICATE_CC,JANE_DUPLICATE_CC-04032021-100.00.pdf"]
    );
}

#[test]
fn test_revision_replaces_pooled_card() {
    let ws = Workspace::new(IdentitySource::InvoiceNumber);
    ws.add(
        "WE_040321_INV001_.pdf",
        &[&time_card("DOE", "JANE", "04/03/2021", "100.00")],
    );
    ws.add(
        "WE_040321_INV001_REVISED.pdf",
        &[
            &time_card("DOE", "JANE", "04/03/2021", "120.00"),
            &time_card("DOE", "JANE", "04/03/2021", "120.00"),
        ],
    );
    ws.add("checks.pdf", &["check 1"]);
    ws.add_manifest("checks.txt", "Date:04/03/2021\n1,DOE,JANE,INV001\n");

    let mut reconciler = ws.reconciler();
    reconciler.prepare_folders().unwrap();
    let entries = reconciler.scan_inbox().unwrap();
    let names: Vec<String> = entries
        .iter()
        .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["WE_040321_INV001_.pdf", "checks.pdf", "WE_040321_INV001_REVISED.pdf"]
    );
    for entry in &entries {
        reconciler.process(entry).unwrap();
    }
    let report = reconciler.finish().unwrap();

    // Neither revised page is tagged; both replace the same pooled card.
    assert_eq!(report.matched.len(), 1);
    assert!(report.unmatched_time_cards.is_empty());

    let written = ws
        .config
        .folders
        .time_card_dir()
        .join("TC-DOE,JANE-04032021-INV001.pdf");
    assert!(fs::read_to_string(written).unwrap().contains("120.00"));
}

#[test]
fn test_missing_manifest_page_is_reported() {
    let ws = Workspace::new(IdentitySource::InvoiceNumber);
    ws.add("checks.pdf", &["check 1"]);
    ws.add_manifest(
        "checks.txt",
        "Date:04/03/2021\n1,DOE,JANE,INV001\n7,ROE,RICH,INV002\n",
    );

    let mut reconciler = ws.reconciler();
    reconciler.prepare_folders().unwrap();
    let entries = reconciler.scan_inbox().unwrap();
    assert_eq!(entries.len(), 1);

    let summary = reconciler.process(&entries[0]).unwrap();
    assert_eq!(summary.records, 1);
    assert_eq!(summary.missing_pages, 1);

    let report = reconciler.finish().unwrap();
    assert_eq!(
        report.missing_check_copy_pages,
        vec!["CC-ROE,RICH-04032021-INV002.pdf"]
    );
    assert_eq!(
        report.unmatched_check_copies,
        vec!["CC-DOE,JANE-04032021-INV001.pdf"]
    );
}

#[test]
fn test_check_copies_without_manifest_bind_nothing() {
    let ws = Workspace::new(IdentitySource::GrandTotal);
    ws.add("checks.pdf", &["check 1", "check 2"]);

    let report = ws.reconciler().run().unwrap();

    assert!(report.unmatched_check_copies.is_empty());
    assert!(ws.files(&ws.config.folders.check_copy_dir()).is_empty());
    assert!(ws.scratch_is_empty());
}

#[test]
fn test_verification_failure_aborts_before_copying() {
    let ws = Workspace::new(IdentitySource::GrandTotal);
    ws.add(
        "WE_040321.pdf",
        &[
            &time_card("DOE", "JANE", "04/03/2021", "100.00"),
            "Grand Total:\n12.00\nSplit Coding\n",
        ],
    );

    let err = ws.reconciler().run().unwrap_err();

    match err {
        PayrollError::Parse(ParseError::Verification { missing, .. }) => assert_eq!(missing.len(), 2),
        other => panic!("expected verification failure, got {other:?}"),
    }
    assert!(ws.files(&ws.config.folders.time_card_dir()).is_empty());
    assert!(ws.scratch_is_empty());
}
