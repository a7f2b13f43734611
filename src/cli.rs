//! Command-line surface shared by the `memoria` binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::artifacts::ArtifactStore;
use crate::builder::{BuildOptions, build};
use crate::constants::analysis::{DEFAULT_SEED, SAMPLE_SIZE};
use crate::constants::search::DEFAULT_LIMIT;
use crate::errors::MemoriaError;
use crate::search::SearchQuery;
use crate::views::View;

/// Offline aggregation and read-only dashboard views for veteran
/// memorial-card records.
#[derive(Debug, Parser)]
#[command(name = "memoria", disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the offline build: CSV source → aggregates + sample + full-text export.
    Prepare {
        /// Path to the raw source CSV.
        #[arg(long, short)]
        input: PathBuf,
        /// Artifact output root.
        #[arg(long, default_value = "data")]
        out: PathBuf,
        /// Target stratified sample size.
        #[arg(long, default_value_t = SAMPLE_SIZE, value_parser = parse_positive_usize)]
        sample_size: usize,
        /// Deterministic selection seed.
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },
    /// Render one read-only view to stdout.
    View {
        /// View to render.
        #[arg(value_enum)]
        view: ViewArg,
        /// Artifact root produced by `prepare`.
        #[arg(long, default_value = "data")]
        data: PathBuf,
    },
    /// Search the sample (or the full-text export when present).
    Search {
        /// Query text; tokens are matched case-insensitively.
        query: String,
        /// Optional region filter.
        #[arg(long)]
        region: Option<String>,
        /// Optional rank filter.
        #[arg(long)]
        rank: Option<String>,
        /// Max hits shown.
        #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = parse_positive_usize)]
        limit: usize,
        /// Artifact root produced by `prepare`.
        #[arg(long, default_value = "data")]
        data: PathBuf,
    },
}

/// The five non-interactive views selectable from the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ViewArg {
    /// Headline metrics and top-level counts.
    Overview,
    /// Publication time series and half-life.
    Dynamics,
    /// Narrative analytics.
    Texts,
    /// Migration flows.
    Geography,
    /// Age × rank demographics.
    Demography,
}

impl From<ViewArg> for View {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::Overview => View::Overview,
            ViewArg::Dynamics => View::Dynamics,
            ViewArg::Texts => View::Texts,
            ViewArg::Geography => View::Geography,
            ViewArg::Demography => View::Demography,
        }
    }
}

/// Execute a parsed command.
pub fn run(cli: Cli) -> Result<(), MemoriaError> {
    match cli.command {
        Command::Prepare {
            input,
            out,
            sample_size,
            seed,
        } => {
            let options = BuildOptions {
                input,
                out_dir: out,
                sample_size,
                seed,
            };
            let report = build(&options)?;
            if let Ok(json) = serde_json::to_string(&report) {
                debug!(report = %json, "build report");
            }
            println!(
                "Готово: {} строк прочитано, {} пропущено, {} артефактов + {} чанков полнотекстового экспорта → {}",
                report.rows_read,
                report.rows_skipped,
                report.artifacts_written,
                report.fts_parts,
                report.out_dir.display(),
            );
            Ok(())
        }
        Command::View { view, data } => {
            let store = ArtifactStore::new(data);
            let rendered = View::from(view).render(&store);
            println!("{}", rendered.to_text());
            Ok(())
        }
        Command::Search {
            query,
            region,
            rank,
            limit,
            data,
        } => {
            let store = ArtifactStore::new(data);
            let request = SearchQuery {
                text: query,
                region,
                rank,
                limit,
            };
            let rendered = View::Search(request).render(&store);
            println!("{}", rendered.to_text());
            Ok(())
        }
    }
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed: usize = value.parse().map_err(|_| "expected a positive integer")?;
    if parsed == 0 {
        return Err("value must be greater than zero".to_string());
    }
    Ok(parsed)
}
