//! Parse command - run the time card parser on one page.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use payroll_core::{DocumentService, PageOutcome, PageParser, TimeCardParser, create_service};

use super::{IdentityArg, load_config};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Page to parse: a PDF, or a text file holding extracted text
    #[arg(required = true)]
    input: PathBuf,

    /// Identity field (overrides config)
    #[arg(long, value_enum)]
    identity: Option<IdentityArg>,

    /// Batch file name to take the invoice number from (default: the input)
    #[arg(long)]
    source_path: Option<PathBuf>,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let is_pdf = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

    let text = if is_pdf {
        info!("Extracting text from {}", args.input.display());
        create_service(&config.documents).extract_text(&args.input)?
    } else {
        fs::read_to_string(&args.input)?
    };

    let identity_source = args
        .identity
        .map(Into::into)
        .unwrap_or(config.matching.identity_source);
    let parser = TimeCardParser::new().with_identity_source(identity_source);
    let source_path = args.source_path.as_deref().unwrap_or(&args.input);

    match parser.parse_page(&text, source_path)? {
        PageOutcome::EndOfBatch => {
            println!("{} END of BATCH page, discarded", style("ℹ").blue());
        }
        PageOutcome::Continuation => {
            println!("{} Second page of a time card, discarded", style("ℹ").blue());
        }
        PageOutcome::TimeCard(card) => {
            let output = json!({
                "output_file_name": card.output_file_name(),
                "time_card": card,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
