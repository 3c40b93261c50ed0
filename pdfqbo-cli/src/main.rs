use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use pdfqbo_core::{Config, StatementDocument};
use pdfqbo_ingest::{load_statement_lines, scan_statement};
use pdfqbo_ofx::{output_file_name, render_ofx};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "pdfqbo",
    version,
    about = "Convert TD Bank checking statement PDFs to QBO (OFX) files"
)]
struct Cli {
    /// Config file (default: ~/.pdfqbo/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a statement into `<OUTPUT_DIR>/<name>.qbo`
    Convert {
        /// Statement PDF (or pre-extracted .txt)
        input: PathBuf,

        /// Created if missing
        output_dir: PathBuf,
    },

    /// Print the extracted statement lines, one per line
    Lines { input: PathBuf },

    /// Parse a statement and print its transactions
    Transactions {
        input: PathBuf,

        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },

    /// Institution settings
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config to ~/.pdfqbo/config.toml
    Init,

    /// Print the effective config
    Show,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Convert { input, output_dir } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            convert(&input, &output_dir, &cfg)?;
        }

        Command::Lines { input } => {
            for line in read_lines(&input)? {
                println!("{line}");
            }
        }

        Command::Transactions { input, format } => {
            let cfg = config::load_config(cli.config.as_deref())?;
            let doc = parse_document(&input, &cfg)?;
            print_transactions(&doc, format)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                config::show_config(&cfg)?;
            }
        },
    }

    Ok(())
}

fn read_lines(input: &Path) -> Result<Vec<String>> {
    if !input.exists() {
        bail!("statement not found: {}", input.display());
    }
    load_statement_lines(input).with_context(|| format!("reading {}", input.display()))
}

fn parse_document(input: &Path, cfg: &Config) -> Result<StatementDocument> {
    let lines = read_lines(input)?;
    let draft = scan_statement(&lines).with_context(|| format!("parsing {}", input.display()))?;
    let doc = StatementDocument::assemble(draft, &cfg.institution)
        .with_context(|| format!("assembling statement from {}", input.display()))?;
    Ok(doc)
}

/// Nothing is written unless the whole statement parses and renders.
fn convert(input: &Path, output_dir: &Path, cfg: &Config) -> Result<()> {
    let doc = parse_document(input, cfg)?;
    let ofx = render_ofx(&doc, &cfg.statement, Utc::now())?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("create {}", output_dir.display()))?;
    let output_path = output_dir.join(output_file_name(input)?);

    info!(path = %output_path.display(), "writing OFX file");
    fs::write(&output_path, ofx).with_context(|| format!("write {}", output_path.display()))?;

    println!(
        "Wrote {} ({} transactions, ending balance {})",
        output_path.display(),
        doc.transactions().len(),
        doc.balances().ending
    );
    Ok(())
}

#[derive(Debug, Serialize)]
struct TransactionRow<'a> {
    date: String,
    #[serde(rename = "type")]
    txn_type: &'static str,
    amount: String,
    description: &'a str,
    fitid: &'a str,
}

fn print_transactions(doc: &StatementDocument, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(doc)?);
        }
        Format::Csv => {
            let mut wtr = csv::Writer::from_writer(io::stdout());
            for t in doc.transactions() {
                wtr.serialize(TransactionRow {
                    date: t.date.format("%Y-%m-%d").to_string(),
                    txn_type: t.txn_type.ofx_name(),
                    amount: t.amount.to_string(),
                    description: &t.description,
                    fitid: &t.fitid,
                })?;
            }
            wtr.flush()?;
        }
    }
    Ok(())
}
