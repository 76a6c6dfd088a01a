//! Batch orchestration: inbox to outbox.
//!
//! A run stages every inbox batch into scratch, splits it, binds or parses
//! each page, copies the named pages to the outbox, and finally matches the
//! pooled time cards against the pooled check copies and merges each pair.

pub mod inbox;
pub mod scratch;

pub use inbox::{BatchKind, InboxEntry, classify};
pub use scratch::{Scratch, Staged, path_hash};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::config::{IdentitySource, PayrollConfig};
use crate::models::records::{CheckCopy, TimeCard};
use crate::models::report::{MatchedEntry, ReconciliationReport};
use crate::pdf::DocumentService;
use crate::reconcile::{DuplicateTagger, MatchedPair, Matcher, ProcessingMode};
use crate::records::{PageOutcome, PageParser, TimeCardParser, parse_manifest};

/// Records produced by one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub kind: BatchKind,
    /// Time cards parsed or check copy pages bound.
    pub records: usize,
    /// Manifest rows whose page was not in the batch PDF.
    pub missing_pages: usize,
}

/// Drives a reconciliation run over one inbox.
pub struct Reconciler<D: DocumentService> {
    config: PayrollConfig,
    documents: D,
    scratch: Scratch,
    parser: TimeCardParser,
    time_cards: Vec<TimeCard>,
    check_copies: Vec<CheckCopy>,
    missing_pages: Vec<CheckCopy>,
}

impl<D: DocumentService> Reconciler<D> {
    pub fn new(config: PayrollConfig, documents: D) -> Self {
        let scratch = Scratch::new(&config.folders.scratch);
        let parser = TimeCardParser::new().with_identity_source(config.matching.identity_source);
        Self {
            config,
            documents,
            scratch,
            parser,
            time_cards: Vec::new(),
            check_copies: Vec::new(),
            missing_pages: Vec::new(),
        }
    }

    fn identity_source(&self) -> IdentitySource {
        self.config.matching.identity_source
    }

    /// Create the scratch directory and the outbox subfolders.
    pub fn prepare_folders(&self) -> Result<()> {
        let folders = &self.config.folders;
        for dir in [
            folders.scratch.clone(),
            folders.time_card_dir(),
            folders.check_copy_dir(),
            folders.merged_dir(),
        ] {
            fs::create_dir_all(&dir)?;
        }
        Ok(())
    }

    /// Batches in the configured inbox, in processing order.
    pub fn scan_inbox(&self) -> Result<Vec<InboxEntry>> {
        inbox::scan(&self.config.folders.inbox)
    }

    /// Process one inbox batch, adding its records to the pools.
    pub fn process(&mut self, entry: &InboxEntry) -> Result<BatchSummary> {
        let mut summary = BatchSummary {
            kind: entry.kind,
            records: 0,
            missing_pages: 0,
        };

        match entry.kind {
            BatchKind::TimeCards { revised } => {
                let mode = if revised {
                    ProcessingMode::Revision
                } else {
                    ProcessingMode::Standard
                };
                summary.records = self.process_time_card_batch(&entry.path, mode)?;
            }
            BatchKind::CheckCopies => {
                let missing_before = self.missing_pages.len();
                summary.records = self.process_check_copy_batch(&entry.path)?;
                summary.missing_pages = self.missing_pages.len() - missing_before;
            }
            BatchKind::Manifest | BatchKind::Unrecognized => {
                debug!("Nothing to do for {}", entry.path.display());
            }
        }

        Ok(summary)
    }

    /// Split, parse and copy a time card batch. Returns the number of time
    /// cards added to (or replaced in) the pool.
    ///
    /// Every page is parsed before anything is copied, so a page failing
    /// verification leaves no output from this batch behind.
    pub fn process_time_card_batch(&mut self, path: &Path, mode: ProcessingMode) -> Result<usize> {
        info!("Detected time card batch: {}", display_name(path));
        let out_dir = self.config.folders.time_card_dir();

        let cards = self.scratch.with_staged(path, |staged| {
            let pages = self.documents.split_pages(&staged.path)?;
            debug!("Split {} into {} pages", display_name(path), pages.len());

            let mut parsed = Vec::new();
            for page in pages {
                let text = self.documents.extract_text(&page.path)?;
                match self.parser.parse_page(&text, path)? {
                    PageOutcome::EndOfBatch => {
                        info!("Page {}: END of BATCH page, discarding", page.number)
                    }
                    PageOutcome::Continuation => {
                        info!("Page {}: second page of a time card, discarding", page.number)
                    }
                    PageOutcome::TimeCard(card) => parsed.push((page.path, card)),
                }
            }

            let mut tagger = DuplicateTagger::new(mode, self.identity_source());
            let mut cards = Vec::with_capacity(parsed.len());
            for (page_path, mut card) in parsed {
                tagger.tag(&mut card);
                let target = out_dir.join(card.output_file_name());
                fs::copy(&page_path, &target)?;
                info!("Time card written: {}", target.display());
                cards.push(card);
            }
            Ok(cards)
        })?;

        let count = cards.len();
        match mode {
            ProcessingMode::Standard => self.time_cards.extend(cards),
            ProcessingMode::Revision => cards.into_iter().for_each(|card| self.revise(card)),
        }
        Ok(count)
    }

    /// Replace the pooled time card with the same key, or add it.
    fn revise(&mut self, card: TimeCard) {
        let key = card.match_key();
        match self.time_cards.iter_mut().find(|c| c.match_key() == key) {
            Some(existing) => {
                info!("Revision replaces {}", existing.output_file_name());
                *existing = card;
            }
            None => self.time_cards.push(card),
        }
    }

    /// Read the manifest, split the batch and bind pages to manifest rows.
    /// Returns the number of pages bound.
    pub fn process_check_copy_batch(&mut self, path: &Path) -> Result<usize> {
        info!("Detected check copy batch: {}", display_name(path));

        let manifest_path = path.with_extension("txt");
        let mut records = if manifest_path.exists() {
            let content = fs::read_to_string(&manifest_path)?;
            let records = parse_manifest(&content, self.identity_source());
            info!("Check copy list found with {} records", records.len());
            records
        } else {
            warn!(
                "No check list found for {}, need {}",
                path.display(),
                manifest_path.display()
            );
            Vec::new()
        };

        let out_dir = self.config.folders.check_copy_dir();
        self.scratch.with_staged(path, |staged| {
            let pages = self.documents.split_pages(&staged.path)?;
            let mut tagger = DuplicateTagger::new(ProcessingMode::Standard, self.identity_source());

            for page in pages {
                let number = page.number.to_string();
                let Some(record) = records.iter_mut().find(|r| r.page_number == number) else {
                    debug!("Page {}: no manifest record, ignoring", page.number);
                    continue;
                };

                tagger.tag(record);
                let target = out_dir.join(record.output_file_name());
                fs::copy(&page.path, &target)?;
                record.pdf_page_found = true;
                info!("Page {}: check copy written: {}", page.number, target.display());
            }
            Ok(())
        })?;

        let (found, missing): (Vec<_>, Vec<_>) =
            records.into_iter().partition(|r| r.pdf_page_found);
        for record in &missing {
            warn!(
                "Manifest lists page {} ({}) but the batch has no such page",
                record.page_number,
                record.output_file_name()
            );
        }

        let count = found.len();
        self.check_copies.extend(found);
        self.missing_pages.extend(missing);
        Ok(count)
    }

    /// Match the pools, write a merged file per pair and build the report.
    pub fn finish(self) -> Result<ReconciliationReport> {
        info!(
            "Matching {} time cards against {} check copies",
            self.time_cards.len(),
            self.check_copies.len()
        );
        let outcome =
            Matcher::new(self.identity_source()).match_records(self.time_cards, self.check_copies);

        let mut report = ReconciliationReport::new(self.config.matching.identity_source);
        for pair in &outcome.pairs {
            let merged = merge_pair(&self.documents, &self.scratch, &self.config, pair)?;
            report.matched.push(MatchedEntry {
                time_card: pair.time_card.output_file_name(),
                check_copy: pair.check_copy.output_file_name(),
                merged,
            });
        }

        report.unmatched_time_cards = outcome
            .unmatched_time_cards
            .iter()
            .map(TimeCard::output_file_name)
            .collect();
        report.unmatched_check_copies = outcome
            .unmatched_check_copies
            .iter()
            .map(CheckCopy::output_file_name)
            .collect();
        report.missing_check_copy_pages = self
            .missing_pages
            .iter()
            .map(CheckCopy::output_file_name)
            .collect();
        report.missing_check_copy_pages.sort();

        Ok(report)
    }

    /// Prepare folders, process every inbox batch and finish.
    pub fn run(mut self) -> Result<ReconciliationReport> {
        self.prepare_folders()?;
        for entry in self.scan_inbox()? {
            self.process(&entry)?;
        }
        self.finish()
    }
}

/// Merge the outbox copies of a pair into the merged folder. Returns the
/// merged file name.
fn merge_pair<D: DocumentService>(
    documents: &D,
    scratch: &Scratch,
    config: &PayrollConfig,
    pair: &MatchedPair,
) -> Result<String> {
    let folders = &config.folders;
    let time_card = folders.time_card_dir().join(pair.time_card.output_file_name());
    let check_copy = folders.check_copy_dir().join(pair.check_copy.output_file_name());
    let name = pair.merged_output_name();
    let target: PathBuf = folders.merged_dir().join(&name);

    scratch.with_staged(&time_card, |tc| {
        scratch.with_staged(&check_copy, |cc| {
            let merged = cc.merged_path();
            documents.merge_pages(&tc.path, &cc.path, &merged)?;
            fs::copy(&merged, &target)?;
            Ok(())
        })
    })?;

    info!("Merged file written: {}", name);
    Ok(name)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
