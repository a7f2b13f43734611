//! Build orchestration: ingest, aggregate, stage, swap.
//!
//! All artifacts are computed and written into a temporary staging directory
//! inside the output root; only after every write has succeeded are the
//! namespace directories swapped into place. A failed build therefore leaves
//! any prior artifact set untouched, and a rerun on the same input overwrites
//! deterministically with no accumulation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::aggregates;
use crate::artifacts::write_table;
use crate::constants::analysis::{DEFAULT_SEED, SAMPLE_SIZE};
use crate::constants::artifacts::STAGING_PREFIX;
use crate::errors::MemoriaError;
use crate::fts;
use crate::ingest;
use crate::sample::stratified_sample;
use crate::tables::Namespace;

/// Build configuration.
#[derive(Clone, Debug)]
pub struct BuildOptions {
    /// Path to the raw source CSV.
    pub input: PathBuf,
    /// Artifact output root.
    pub out_dir: PathBuf,
    /// Target stratified sample size.
    pub sample_size: usize,
    /// Seed for deterministic selection.
    pub seed: u64,
}

impl BuildOptions {
    /// Options for `input` with the default output root, sample size, and seed.
    pub fn new(input: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: out_dir.into(),
            sample_size: SAMPLE_SIZE,
            seed: DEFAULT_SEED,
        }
    }
}

/// Summary of one completed build.
#[derive(Clone, Debug, Serialize)]
pub struct BuildReport {
    /// Source rows decoded.
    pub rows_read: usize,
    /// Malformed source rows skipped.
    pub rows_skipped: usize,
    /// Aggregate + sample files written.
    pub artifacts_written: usize,
    /// Rows in the stratified sample.
    pub sample_rows: usize,
    /// Rows in the full-text export.
    pub fts_rows: usize,
    /// Chunks in the full-text export.
    pub fts_parts: usize,
    /// Output root the artifacts were swapped into.
    pub out_dir: PathBuf,
}

/// Run the full offline build.
pub fn build(options: &BuildOptions) -> Result<BuildReport, MemoriaError> {
    if options.sample_size == 0 {
        return Err(MemoriaError::Configuration(
            "sample size must be greater than zero".into(),
        ));
    }
    info!(input = %options.input.display(), "build started");
    let ingested = ingest::read_records(&options.input)?;
    let records = &ingested.records;
    info!(
        rows = records.len(),
        skipped = ingested.skipped,
        "source ingested"
    );

    fs::create_dir_all(&options.out_dir)?;
    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(&options.out_dir)?;
    let staged_aggregated = staging.path().join(Namespace::Aggregated.dir_name());
    let staged_sample = staging.path().join(Namespace::Sample.dir_name());
    let staged_full = staging.path().join(Namespace::Full.dir_name());
    for dir in [&staged_aggregated, &staged_sample, &staged_full] {
        fs::create_dir_all(dir)?;
    }

    let mut artifacts_written = 0usize;

    let monthly = aggregates::monthly_counts(records);
    write_table(&staged_aggregated, &monthly)?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::yearly_stats(records))?;
    artifacts_written += 1;

    let region_rows = aggregates::region_stats(records);
    write_table(&staged_aggregated, &region_rows)?;
    artifacts_written += 1;

    write_table(
        &staged_aggregated,
        &aggregates::rank_age_distribution(records),
    )?;
    artifacts_written += 1;

    write_table(
        &staged_aggregated,
        &aggregates::narrative_types_yearly(records),
    )?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::sentiment_yearly(records))?;
    artifacts_written += 1;

    write_table(
        &staged_aggregated,
        &aggregates::mattr_yearly(records, options.seed),
    )?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::topic_keyword_rows())?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::topic_evolution(records))?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::migration_matrix(records))?;
    artifacts_written += 1;

    write_table(
        &staged_aggregated,
        &aggregates::dmi_by_region(&region_rows),
    )?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::ner_top_entities(records))?;
    artifacts_written += 1;

    let halflife_rows = aggregates::halflife_yearly(records);
    write_table(&staged_aggregated, &halflife_rows)?;
    artifacts_written += 1;

    write_table(&staged_aggregated, &aggregates::network_edges(records))?;
    artifacts_written += 1;

    let sample_rows = stratified_sample(records, options.sample_size, options.seed);
    write_table(&staged_sample, &sample_rows)?;
    artifacts_written += 1;
    info!(rows = sample_rows.len(), "sample staged");

    let fts_rows = fts::fts_rows(records);
    let fts_parts = fts::write_fts_chunks(&staged_full, &fts_rows)?;
    info!(rows = fts_rows.len(), parts = fts_parts, "full-text export staged");

    let headline = aggregates::headline_metrics(
        records,
        &monthly,
        &region_rows,
        &halflife_rows,
        sample_rows.len(),
        ingested.skipped,
    );
    write_table(&staged_aggregated, &[headline])?;
    artifacts_written += 1;

    // Every artifact staged successfully; swap the namespaces into place.
    swap_namespace(&staged_aggregated, &options.out_dir)?;
    swap_namespace(&staged_sample, &options.out_dir)?;
    swap_namespace(&staged_full, &options.out_dir)?;

    let report = BuildReport {
        rows_read: records.len(),
        rows_skipped: ingested.skipped,
        artifacts_written,
        sample_rows: sample_rows.len(),
        fts_rows: fts_rows.len(),
        fts_parts,
        out_dir: options.out_dir.clone(),
    };
    info!(
        artifacts = report.artifacts_written,
        out_dir = %report.out_dir.display(),
        "build complete"
    );
    Ok(report)
}

fn swap_namespace(staged: &Path, out_dir: &Path) -> Result<(), MemoriaError> {
    let name = staged
        .file_name()
        .ok_or_else(|| MemoriaError::Artifact("staging directory has no name".into()))?;
    let target = out_dir.join(name);
    if target.exists() {
        fs::remove_dir_all(&target)?;
    }
    fs::rename(staged, &target)?;
    Ok(())
}
