//! Typed artifact tables and their arrow encodings.
//!
//! Each aggregate persists as one parquet file with a fixed schema. Row
//! structs own the schema plus both directions of the `RecordBatch`
//! conversion, so the builder and the views share a single source of truth
//! for every table's shape.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::constants::analysis::TOPIC_COUNT;
use crate::constants::artifacts;
use crate::errors::MemoriaError;
use crate::topics::topic_slugs;

/// Artifact namespace a table is persisted under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Namespace {
    /// Small aggregate tables.
    Aggregated,
    /// The stratified sample.
    Sample,
    /// The chunked full-text export.
    Full,
}

impl Namespace {
    /// Directory name of this namespace under the artifact root.
    pub fn dir_name(self) -> &'static str {
        match self {
            Namespace::Aggregated => artifacts::AGGREGATED_DIR,
            Namespace::Sample => artifacts::SAMPLE_DIR,
            Namespace::Full => artifacts::FULL_DIR,
        }
    }
}

/// A typed artifact table: fixed file name, schema, and batch codecs.
pub trait ArtifactTable: Sized {
    /// File name inside the namespace directory.
    const FILE_NAME: &'static str;
    /// Namespace the table is persisted under.
    const NAMESPACE: Namespace = Namespace::Aggregated;

    /// Arrow schema of the persisted table.
    fn schema() -> SchemaRef;
    /// Encode rows into one `RecordBatch`.
    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError>;
    /// Decode all rows from a `RecordBatch`.
    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError>;
}

// ── arrow helpers ────────────────────────────────────────────────────

fn utf8(values: Vec<String>) -> ArrayRef {
    Arc::new(StringArray::from(values))
}

fn opt_utf8(values: Vec<Option<String>>) -> ArrayRef {
    Arc::new(StringArray::from(values))
}

fn int64(values: Vec<i64>) -> ArrayRef {
    Arc::new(Int64Array::from(values))
}

fn float64(values: Vec<f64>) -> ArrayRef {
    Arc::new(Float64Array::from(values))
}

fn opt_float64(values: Vec<Option<f64>>) -> ArrayRef {
    Arc::new(Float64Array::from(values))
}

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, MemoriaError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| MemoriaError::Artifact(format!("missing column '{name}'")))
}

fn str_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray, MemoriaError> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| MemoriaError::Artifact(format!("column '{name}' is not utf8")))
}

fn i64_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Int64Array, MemoriaError> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| MemoriaError::Artifact(format!("column '{name}' is not int64")))
}

fn f64_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float64Array, MemoriaError> {
    column(batch, name)?
        .as_any()
        .downcast_ref::<Float64Array>()
        .ok_or_else(|| MemoriaError::Artifact(format!("column '{name}' is not float64")))
}

fn opt_str_at(array: &StringArray, idx: usize) -> Option<String> {
    if array.is_null(idx) {
        None
    } else {
        Some(array.value(idx).to_string())
    }
}

fn opt_f64_at(array: &Float64Array, idx: usize) -> Option<f64> {
    if array.is_null(idx) {
        None
    } else {
        Some(array.value(idx))
    }
}

// ── aggregate tables ─────────────────────────────────────────────────

/// Card count per publication month.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyCountRow {
    /// Month key, `YYYY-MM`.
    pub month: String,
    /// Cards published that month.
    pub count: i64,
}

impl ArtifactTable for MonthlyCountRow {
    const FILE_NAME: &'static str = "monthly_counts.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("month", DataType::Utf8, false),
            Field::new("count", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.month.clone()).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let month = str_col(batch, "month")?;
        let count = i64_col(batch, "count")?;
        Ok((0..batch.num_rows())
            .map(|idx| MonthlyCountRow {
                month: month.value(idx).to_string(),
                count: count.value(idx),
            })
            .collect())
    }
}

/// Coverage counts per publication year.
#[derive(Clone, Debug, PartialEq)]
pub struct YearlyStatsRow {
    /// Publication year.
    pub year: i64,
    /// Cards published that year.
    pub total: i64,
    /// Cards carrying a narrative.
    pub with_story: i64,
    /// Cards with at least one photo.
    pub with_photo: i64,
    /// Cards with at least one award.
    pub with_awards: i64,
}

impl ArtifactTable for YearlyStatsRow {
    const FILE_NAME: &'static str = "yearly_stats.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int64, false),
            Field::new("total", DataType::Int64, false),
            Field::new("with_story", DataType::Int64, false),
            Field::new("with_photo", DataType::Int64, false),
            Field::new("with_awards", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.year).collect()),
                int64(rows.iter().map(|row| row.total).collect()),
                int64(rows.iter().map(|row| row.with_story).collect()),
                int64(rows.iter().map(|row| row.with_photo).collect()),
                int64(rows.iter().map(|row| row.with_awards).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let year = i64_col(batch, "year")?;
        let total = i64_col(batch, "total")?;
        let with_story = i64_col(batch, "with_story")?;
        let with_photo = i64_col(batch, "with_photo")?;
        let with_awards = i64_col(batch, "with_awards")?;
        Ok((0..batch.num_rows())
            .map(|idx| YearlyStatsRow {
                year: year.value(idx),
                total: total.value(idx),
                with_story: with_story.value(idx),
                with_photo: with_photo.value(idx),
                with_awards: with_awards.value(idx),
            })
            .collect())
    }
}

/// Coverage percentages per region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionStatsRow {
    /// Region name.
    pub region: String,
    /// Cards filed under the region.
    pub count: i64,
    /// Share of cards with a narrative, percent.
    pub story_pct: f64,
    /// Share of cards with a photo, percent.
    pub photo_pct: f64,
    /// Share of cards with awards, percent.
    pub awards_pct: f64,
}

impl ArtifactTable for RegionStatsRow {
    const FILE_NAME: &'static str = "region_stats.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("region", DataType::Utf8, false),
            Field::new("count", DataType::Int64, false),
            Field::new("story_pct", DataType::Float64, false),
            Field::new("photo_pct", DataType::Float64, false),
            Field::new("awards_pct", DataType::Float64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.region.clone()).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
                float64(rows.iter().map(|row| row.story_pct).collect()),
                float64(rows.iter().map(|row| row.photo_pct).collect()),
                float64(rows.iter().map(|row| row.awards_pct).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let region = str_col(batch, "region")?;
        let count = i64_col(batch, "count")?;
        let story_pct = f64_col(batch, "story_pct")?;
        let photo_pct = f64_col(batch, "photo_pct")?;
        let awards_pct = f64_col(batch, "awards_pct")?;
        Ok((0..batch.num_rows())
            .map(|idx| RegionStatsRow {
                region: region.value(idx).to_string(),
                count: count.value(idx),
                story_pct: story_pct.value(idx),
                photo_pct: photo_pct.value(idx),
                awards_pct: awards_pct.value(idx),
            })
            .collect())
    }
}

/// Demographic cross-tab: rank group × age at death × death year.
#[derive(Clone, Debug, PartialEq)]
pub struct RankAgeRow {
    /// Rank group display label.
    pub rank_group: String,
    /// Age at death.
    pub age: i64,
    /// Death year.
    pub death_year: i64,
    /// Cards in the bucket.
    pub count: i64,
}

impl ArtifactTable for RankAgeRow {
    const FILE_NAME: &'static str = "rank_age_distribution.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("rank_group", DataType::Utf8, false),
            Field::new("age", DataType::Int64, false),
            Field::new("death_year", DataType::Int64, false),
            Field::new("count", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.rank_group.clone()).collect()),
                int64(rows.iter().map(|row| row.age).collect()),
                int64(rows.iter().map(|row| row.death_year).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let rank_group = str_col(batch, "rank_group")?;
        let age = i64_col(batch, "age")?;
        let death_year = i64_col(batch, "death_year")?;
        let count = i64_col(batch, "count")?;
        Ok((0..batch.num_rows())
            .map(|idx| RankAgeRow {
                rank_group: rank_group.value(idx).to_string(),
                age: age.value(idx),
                death_year: death_year.value(idx),
                count: count.value(idx),
            })
            .collect())
    }
}

/// Narrative-type shares per publication year, percent.
#[derive(Clone, Debug, PartialEq)]
pub struct NarrativeTypesYearlyRow {
    /// Publication year.
    pub year: i64,
    /// Roster-form share.
    pub share_roster: f64,
    /// Memoir share.
    pub share_memoir: f64,
    /// Family-story share.
    pub share_family: f64,
    /// Mixed share.
    pub share_mixed: f64,
}

impl ArtifactTable for NarrativeTypesYearlyRow {
    const FILE_NAME: &'static str = "narrative_types_yearly.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int64, false),
            Field::new("share_roster", DataType::Float64, false),
            Field::new("share_memoir", DataType::Float64, false),
            Field::new("share_family", DataType::Float64, false),
            Field::new("share_mixed", DataType::Float64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.year).collect()),
                float64(rows.iter().map(|row| row.share_roster).collect()),
                float64(rows.iter().map(|row| row.share_memoir).collect()),
                float64(rows.iter().map(|row| row.share_family).collect()),
                float64(rows.iter().map(|row| row.share_mixed).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let year = i64_col(batch, "year")?;
        let share_roster = f64_col(batch, "share_roster")?;
        let share_memoir = f64_col(batch, "share_memoir")?;
        let share_family = f64_col(batch, "share_family")?;
        let share_mixed = f64_col(batch, "share_mixed")?;
        Ok((0..batch.num_rows())
            .map(|idx| NarrativeTypesYearlyRow {
                year: year.value(idx),
                share_roster: share_roster.value(idx),
                share_memoir: share_memoir.value(idx),
                share_family: share_family.value(idx),
                share_mixed: share_mixed.value(idx),
            })
            .collect())
    }
}

/// Mean lexicon sentiment per publication year, with per-type breakdowns.
///
/// A per-type column is null for years where no narrative of that type was
/// published (the type is excluded from that year's denominator, not zeroed).
#[derive(Clone, Debug, PartialEq)]
pub struct SentimentYearlyRow {
    /// Publication year.
    pub year: i64,
    /// Mean sentiment over all scored narratives.
    pub mean_score: f64,
    /// Mean sentiment of roster-form narratives.
    pub roster: Option<f64>,
    /// Mean sentiment of memoirs.
    pub memoir: Option<f64>,
    /// Mean sentiment of family stories.
    pub family: Option<f64>,
    /// Mean sentiment of mixed narratives.
    pub mixed: Option<f64>,
}

impl ArtifactTable for SentimentYearlyRow {
    const FILE_NAME: &'static str = "sentiment_yearly.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int64, false),
            Field::new("mean_score", DataType::Float64, false),
            Field::new("roster", DataType::Float64, true),
            Field::new("memoir", DataType::Float64, true),
            Field::new("family", DataType::Float64, true),
            Field::new("mixed", DataType::Float64, true),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.year).collect()),
                float64(rows.iter().map(|row| row.mean_score).collect()),
                opt_float64(rows.iter().map(|row| row.roster).collect()),
                opt_float64(rows.iter().map(|row| row.memoir).collect()),
                opt_float64(rows.iter().map(|row| row.family).collect()),
                opt_float64(rows.iter().map(|row| row.mixed).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let year = i64_col(batch, "year")?;
        let mean_score = f64_col(batch, "mean_score")?;
        let roster = f64_col(batch, "roster")?;
        let memoir = f64_col(batch, "memoir")?;
        let family = f64_col(batch, "family")?;
        let mixed = f64_col(batch, "mixed")?;
        Ok((0..batch.num_rows())
            .map(|idx| SentimentYearlyRow {
                year: year.value(idx),
                mean_score: mean_score.value(idx),
                roster: opt_f64_at(roster, idx),
                memoir: opt_f64_at(memoir, idx),
                family: opt_f64_at(family, idx),
                mixed: opt_f64_at(mixed, idx),
            })
            .collect())
    }
}

/// Mean MATTR per publication year, with per-type breakdowns.
#[derive(Clone, Debug, PartialEq)]
pub struct MattrYearlyRow {
    /// Publication year.
    pub year: i64,
    /// Mean MATTR over all scored narratives.
    pub mattr: f64,
    /// Mean MATTR of roster-form narratives.
    pub roster: Option<f64>,
    /// Mean MATTR of memoirs.
    pub memoir: Option<f64>,
    /// Mean MATTR of family stories.
    pub family: Option<f64>,
    /// Mean MATTR of mixed narratives.
    pub mixed: Option<f64>,
}

impl ArtifactTable for MattrYearlyRow {
    const FILE_NAME: &'static str = "mattr_yearly.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int64, false),
            Field::new("mattr", DataType::Float64, false),
            Field::new("roster", DataType::Float64, true),
            Field::new("memoir", DataType::Float64, true),
            Field::new("family", DataType::Float64, true),
            Field::new("mixed", DataType::Float64, true),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.year).collect()),
                float64(rows.iter().map(|row| row.mattr).collect()),
                opt_float64(rows.iter().map(|row| row.roster).collect()),
                opt_float64(rows.iter().map(|row| row.memoir).collect()),
                opt_float64(rows.iter().map(|row| row.family).collect()),
                opt_float64(rows.iter().map(|row| row.mixed).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let year = i64_col(batch, "year")?;
        let mattr = f64_col(batch, "mattr")?;
        let roster = f64_col(batch, "roster")?;
        let memoir = f64_col(batch, "memoir")?;
        let family = f64_col(batch, "family")?;
        let mixed = f64_col(batch, "mixed")?;
        Ok((0..batch.num_rows())
            .map(|idx| MattrYearlyRow {
                year: year.value(idx),
                mattr: mattr.value(idx),
                roster: opt_f64_at(roster, idx),
                memoir: opt_f64_at(memoir, idx),
                family: opt_f64_at(family, idx),
                mixed: opt_f64_at(mixed, idx),
            })
            .collect())
    }
}

/// One weighted keyword of one topic.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicKeywordRow {
    /// Topic id.
    pub topic_id: i64,
    /// Topic display label.
    pub topic_label: String,
    /// Keyword.
    pub word: String,
    /// Display weight.
    pub weight: f64,
}

impl ArtifactTable for TopicKeywordRow {
    const FILE_NAME: &'static str = "topic_keywords.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("topic_id", DataType::Int64, false),
            Field::new("topic_label", DataType::Utf8, false),
            Field::new("word", DataType::Utf8, false),
            Field::new("weight", DataType::Float64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.topic_id).collect()),
                utf8(rows.iter().map(|row| row.topic_label.clone()).collect()),
                utf8(rows.iter().map(|row| row.word.clone()).collect()),
                float64(rows.iter().map(|row| row.weight).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let topic_id = i64_col(batch, "topic_id")?;
        let topic_label = str_col(batch, "topic_label")?;
        let word = str_col(batch, "word")?;
        let weight = f64_col(batch, "weight")?;
        Ok((0..batch.num_rows())
            .map(|idx| TopicKeywordRow {
                topic_id: topic_id.value(idx),
                topic_label: topic_label.value(idx).to_string(),
                word: word.value(idx).to_string(),
                weight: weight.value(idx),
            })
            .collect())
    }
}

/// Per-topic share of assigned narratives, per publication year.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicEvolutionRow {
    /// Publication year.
    pub year: i64,
    /// Topic shares in topic-id order; each row sums to 1 (or 0 when no
    /// narrative that year matched any topic).
    pub shares: [f64; TOPIC_COUNT],
}

impl ArtifactTable for TopicEvolutionRow {
    const FILE_NAME: &'static str = "topic_evolution.parquet";

    fn schema() -> SchemaRef {
        let mut fields = vec![Field::new("year", DataType::Int64, false)];
        for slug in topic_slugs() {
            fields.push(Field::new(format!("topic_{slug}"), DataType::Float64, false));
        }
        Arc::new(Schema::new(fields))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let mut columns: Vec<ArrayRef> = vec![int64(rows.iter().map(|row| row.year).collect())];
        for topic_idx in 0..TOPIC_COUNT {
            columns.push(float64(
                rows.iter().map(|row| row.shares[topic_idx]).collect(),
            ));
        }
        let batch = RecordBatch::try_new(Self::schema(), columns)?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let year = i64_col(batch, "year")?;
        let slugs = topic_slugs();
        let mut share_cols = Vec::with_capacity(TOPIC_COUNT);
        for slug in slugs {
            share_cols.push(f64_col(batch, &format!("topic_{slug}"))?);
        }
        Ok((0..batch.num_rows())
            .map(|idx| {
                let mut shares = [0.0; TOPIC_COUNT];
                for (topic_idx, col) in share_cols.iter().enumerate() {
                    shares[topic_idx] = col.value(idx);
                }
                TopicEvolutionRow {
                    year: year.value(idx),
                    shares,
                }
            })
            .collect())
    }
}

/// Birth-region → submit-region card flow.
#[derive(Clone, Debug, PartialEq)]
pub struct MigrationRow {
    /// Region of birth.
    pub birth_region: String,
    /// Region the card was submitted from.
    pub submit_region: String,
    /// Cards with this (birth, submit) pair.
    pub count: i64,
}

impl ArtifactTable for MigrationRow {
    const FILE_NAME: &'static str = "migration_matrix.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("birth_region", DataType::Utf8, false),
            Field::new("submit_region", DataType::Utf8, false),
            Field::new("count", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.birth_region.clone()).collect()),
                utf8(rows.iter().map(|row| row.submit_region.clone()).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let birth_region = str_col(batch, "birth_region")?;
        let submit_region = str_col(batch, "submit_region")?;
        let count = i64_col(batch, "count")?;
        Ok((0..batch.num_rows())
            .map(|idx| MigrationRow {
                birth_region: birth_region.value(idx).to_string(),
                submit_region: submit_region.value(idx).to_string(),
                count: count.value(idx),
            })
            .collect())
    }
}

/// Composite digital-memory index per region.
#[derive(Clone, Debug, PartialEq)]
pub struct DmiRegionRow {
    /// Region name.
    pub region: String,
    /// Cards filed under the region.
    pub count: i64,
    /// Share of cards with a narrative, percent.
    pub story_pct: f64,
    /// Share of cards with a photo, percent.
    pub photo_pct: f64,
    /// Share of cards with awards, percent.
    pub awards_pct: f64,
    /// Composite index in [0, 1].
    pub dmi: f64,
}

impl ArtifactTable for DmiRegionRow {
    const FILE_NAME: &'static str = "dmi_by_region.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("region", DataType::Utf8, false),
            Field::new("count", DataType::Int64, false),
            Field::new("story_pct", DataType::Float64, false),
            Field::new("photo_pct", DataType::Float64, false),
            Field::new("awards_pct", DataType::Float64, false),
            Field::new("dmi", DataType::Float64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.region.clone()).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
                float64(rows.iter().map(|row| row.story_pct).collect()),
                float64(rows.iter().map(|row| row.photo_pct).collect()),
                float64(rows.iter().map(|row| row.awards_pct).collect()),
                float64(rows.iter().map(|row| row.dmi).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let region = str_col(batch, "region")?;
        let count = i64_col(batch, "count")?;
        let story_pct = f64_col(batch, "story_pct")?;
        let photo_pct = f64_col(batch, "photo_pct")?;
        let awards_pct = f64_col(batch, "awards_pct")?;
        let dmi = f64_col(batch, "dmi")?;
        Ok((0..batch.num_rows())
            .map(|idx| DmiRegionRow {
                region: region.value(idx).to_string(),
                count: count.value(idx),
                story_pct: story_pct.value(idx),
                photo_pct: photo_pct.value(idx),
                awards_pct: awards_pct.value(idx),
                dmi: dmi.value(idx),
            })
            .collect())
    }
}

/// One gazetteer entity with its narrative occurrence count.
#[derive(Clone, Debug, PartialEq)]
pub struct NerEntityRow {
    /// Entity type tag (`LOC` or `ORG`).
    pub entity_type: String,
    /// Entity surface form.
    pub entity: String,
    /// Narratives mentioning the entity.
    pub count: i64,
}

impl ArtifactTable for NerEntityRow {
    const FILE_NAME: &'static str = "ner_top_entities.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("entity_type", DataType::Utf8, false),
            Field::new("entity", DataType::Utf8, false),
            Field::new("count", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.entity_type.clone()).collect()),
                utf8(rows.iter().map(|row| row.entity.clone()).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let entity_type = str_col(batch, "entity_type")?;
        let entity = str_col(batch, "entity")?;
        let count = i64_col(batch, "count")?;
        Ok((0..batch.num_rows())
            .map(|idx| NerEntityRow {
                entity_type: entity_type.value(idx).to_string(),
                entity: entity.value(idx).to_string(),
                count: count.value(idx),
            })
            .collect())
    }
}

/// Fitted activity half-life per publication year.
#[derive(Clone, Debug, PartialEq)]
pub struct HalflifeYearlyRow {
    /// Publication year.
    pub year: i64,
    /// Fitted half-life in days.
    pub halflife_days: f64,
}

impl ArtifactTable for HalflifeYearlyRow {
    const FILE_NAME: &'static str = "halflife_yearly.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int64, false),
            Field::new("halflife_days", DataType::Float64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.year).collect()),
                float64(rows.iter().map(|row| row.halflife_days).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let year = i64_col(batch, "year")?;
        let halflife_days = f64_col(batch, "halflife_days")?;
        Ok((0..batch.num_rows())
            .map(|idx| HalflifeYearlyRow {
                year: year.value(idx),
                halflife_days: halflife_days.value(idx),
            })
            .collect())
    }
}

/// One directed off-diagonal migration flow.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkEdgeRow {
    /// Birth region.
    pub source: String,
    /// Submit region.
    pub target: String,
    /// Cards along the flow.
    pub count: i64,
}

impl ArtifactTable for NetworkEdgeRow {
    const FILE_NAME: &'static str = "network_edges.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("source", DataType::Utf8, false),
            Field::new("target", DataType::Utf8, false),
            Field::new("count", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.source.clone()).collect()),
                utf8(rows.iter().map(|row| row.target.clone()).collect()),
                int64(rows.iter().map(|row| row.count).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let source = str_col(batch, "source")?;
        let target = str_col(batch, "target")?;
        let count = i64_col(batch, "count")?;
        Ok((0..batch.num_rows())
            .map(|idx| NetworkEdgeRow {
                source: source.value(idx).to_string(),
                target: target.value(idx).to_string(),
                count: count.value(idx),
            })
            .collect())
    }
}

/// Singleton headline metrics row.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadlineRow {
    /// Total cards ingested.
    pub total_cards: i64,
    /// Share of cards with a narrative, percent.
    pub story_pct: f64,
    /// Share of cards published in the peak month, percent.
    pub may_share_pct: f64,
    /// Median fitted half-life in days; null when no year yielded a fit.
    pub halflife_days: Option<f64>,
    /// Gini coefficient over per-region card counts.
    pub dmi_gini: f64,
    /// Pearson r between per-region story and awards shares; null when the
    /// correlation is undefined (fewer than two regions or no variance).
    pub story_awards_r: Option<f64>,
    /// Rows in the stratified sample.
    pub sample_rows: i64,
    /// Malformed source rows skipped during ingest.
    pub rows_skipped: i64,
}

impl ArtifactTable for HeadlineRow {
    const FILE_NAME: &'static str = "headline_metrics.parquet";

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("total_cards", DataType::Int64, false),
            Field::new("story_pct", DataType::Float64, false),
            Field::new("may_share_pct", DataType::Float64, false),
            Field::new("halflife_days", DataType::Float64, true),
            Field::new("dmi_gini", DataType::Float64, false),
            Field::new("story_awards_r", DataType::Float64, true),
            Field::new("sample_rows", DataType::Int64, false),
            Field::new("rows_skipped", DataType::Int64, false),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                int64(rows.iter().map(|row| row.total_cards).collect()),
                float64(rows.iter().map(|row| row.story_pct).collect()),
                float64(rows.iter().map(|row| row.may_share_pct).collect()),
                opt_float64(rows.iter().map(|row| row.halflife_days).collect()),
                float64(rows.iter().map(|row| row.dmi_gini).collect()),
                opt_float64(rows.iter().map(|row| row.story_awards_r).collect()),
                int64(rows.iter().map(|row| row.sample_rows).collect()),
                int64(rows.iter().map(|row| row.rows_skipped).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let total_cards = i64_col(batch, "total_cards")?;
        let story_pct = f64_col(batch, "story_pct")?;
        let may_share_pct = f64_col(batch, "may_share_pct")?;
        let halflife_days = f64_col(batch, "halflife_days")?;
        let dmi_gini = f64_col(batch, "dmi_gini")?;
        let story_awards_r = f64_col(batch, "story_awards_r")?;
        let sample_rows = i64_col(batch, "sample_rows")?;
        let rows_skipped = i64_col(batch, "rows_skipped")?;
        Ok((0..batch.num_rows())
            .map(|idx| HeadlineRow {
                total_cards: total_cards.value(idx),
                story_pct: story_pct.value(idx),
                may_share_pct: may_share_pct.value(idx),
                halflife_days: opt_f64_at(halflife_days, idx),
                dmi_gini: dmi_gini.value(idx),
                story_awards_r: opt_f64_at(story_awards_r, idx),
                sample_rows: sample_rows.value(idx),
                rows_skipped: rows_skipped.value(idx),
            })
            .collect())
    }
}

// ── sample & full-text tables ────────────────────────────────────────

/// One stratified-sample card with the search-facing column subset.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRow {
    /// Card identifier.
    pub id: String,
    /// Public card URL.
    pub url: Option<String>,
    /// Full name.
    pub fio: Option<String>,
    /// Narrative text.
    pub story: Option<String>,
    /// Filing region.
    pub region: Option<String>,
    /// Rank as written.
    pub rank: Option<String>,
    /// Birth date string.
    pub birthday: Option<String>,
    /// Death date string.
    pub death: Option<String>,
    /// Award text.
    pub awards_txt: Option<String>,
    /// Award count.
    pub awards_cnt: Option<f64>,
    /// Photo count.
    pub photos_cnt: Option<f64>,
    /// Publication date string.
    pub pub_date: Option<String>,
}

impl ArtifactTable for SampleRow {
    const FILE_NAME: &'static str = artifacts::SAMPLE_FILE;
    const NAMESPACE: Namespace = Namespace::Sample;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("url", DataType::Utf8, true),
            Field::new("fio", DataType::Utf8, true),
            Field::new("story", DataType::Utf8, true),
            Field::new("region", DataType::Utf8, true),
            Field::new("rank", DataType::Utf8, true),
            Field::new("birthday", DataType::Utf8, true),
            Field::new("death", DataType::Utf8, true),
            Field::new("awards_txt", DataType::Utf8, true),
            Field::new("awards_cnt", DataType::Float64, true),
            Field::new("photos_cnt", DataType::Float64, true),
            Field::new("pub_date", DataType::Utf8, true),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.id.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.url.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.fio.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.story.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.region.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.rank.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.birthday.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.death.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.awards_txt.clone()).collect()),
                opt_float64(rows.iter().map(|row| row.awards_cnt).collect()),
                opt_float64(rows.iter().map(|row| row.photos_cnt).collect()),
                opt_utf8(rows.iter().map(|row| row.pub_date.clone()).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let id = str_col(batch, "id")?;
        let url = str_col(batch, "url")?;
        let fio = str_col(batch, "fio")?;
        let story = str_col(batch, "story")?;
        let region = str_col(batch, "region")?;
        let rank = str_col(batch, "rank")?;
        let birthday = str_col(batch, "birthday")?;
        let death = str_col(batch, "death")?;
        let awards_txt = str_col(batch, "awards_txt")?;
        let awards_cnt = f64_col(batch, "awards_cnt")?;
        let photos_cnt = f64_col(batch, "photos_cnt")?;
        let pub_date = str_col(batch, "pub_date")?;
        Ok((0..batch.num_rows())
            .map(|idx| SampleRow {
                id: id.value(idx).to_string(),
                url: opt_str_at(url, idx),
                fio: opt_str_at(fio, idx),
                story: opt_str_at(story, idx),
                region: opt_str_at(region, idx),
                rank: opt_str_at(rank, idx),
                birthday: opt_str_at(birthday, idx),
                death: opt_str_at(death, idx),
                awards_txt: opt_str_at(awards_txt, idx),
                awards_cnt: opt_f64_at(awards_cnt, idx),
                photos_cnt: opt_f64_at(photos_cnt, idx),
                pub_date: opt_str_at(pub_date, idx),
            })
            .collect())
    }
}

/// One full-text export card (every card with a usable narrative).
#[derive(Clone, Debug, PartialEq)]
pub struct FtsRow {
    /// Card identifier.
    pub id: String,
    /// Public card URL.
    pub url: Option<String>,
    /// Full name.
    pub fio: Option<String>,
    /// Narrative text.
    pub story: Option<String>,
    /// Filing region.
    pub region: Option<String>,
    /// Rank as written.
    pub rank: Option<String>,
    /// Birth date string.
    pub birthday: Option<String>,
    /// Death date string.
    pub death: Option<String>,
    /// Award text.
    pub awards_txt: Option<String>,
    /// Publication date string.
    pub pub_date: Option<String>,
}

impl ArtifactTable for FtsRow {
    // Chunked on disk; `FILE_NAME` names the first chunk and discovery goes
    // through `ArtifactStore::fts_parts`.
    const FILE_NAME: &'static str = "veterans_fts_part000.parquet";
    const NAMESPACE: Namespace = Namespace::Full;

    fn schema() -> SchemaRef {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("url", DataType::Utf8, true),
            Field::new("fio", DataType::Utf8, true),
            Field::new("story", DataType::Utf8, true),
            Field::new("region", DataType::Utf8, true),
            Field::new("rank", DataType::Utf8, true),
            Field::new("birthday", DataType::Utf8, true),
            Field::new("death", DataType::Utf8, true),
            Field::new("awards_txt", DataType::Utf8, true),
            Field::new("pub_date", DataType::Utf8, true),
        ]))
    }

    fn to_batch(rows: &[Self]) -> Result<RecordBatch, MemoriaError> {
        let batch = RecordBatch::try_new(
            Self::schema(),
            vec![
                utf8(rows.iter().map(|row| row.id.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.url.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.fio.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.story.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.region.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.rank.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.birthday.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.death.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.awards_txt.clone()).collect()),
                opt_utf8(rows.iter().map(|row| row.pub_date.clone()).collect()),
            ],
        )?;
        Ok(batch)
    }

    fn from_batch(batch: &RecordBatch) -> Result<Vec<Self>, MemoriaError> {
        let id = str_col(batch, "id")?;
        let url = str_col(batch, "url")?;
        let fio = str_col(batch, "fio")?;
        let story = str_col(batch, "story")?;
        let region = str_col(batch, "region")?;
        let rank = str_col(batch, "rank")?;
        let birthday = str_col(batch, "birthday")?;
        let death = str_col(batch, "death")?;
        let awards_txt = str_col(batch, "awards_txt")?;
        let pub_date = str_col(batch, "pub_date")?;
        Ok((0..batch.num_rows())
            .map(|idx| FtsRow {
                id: id.value(idx).to_string(),
                url: opt_str_at(url, idx),
                fio: opt_str_at(fio, idx),
                story: opt_str_at(story, idx),
                region: opt_str_at(region, idx),
                rank: opt_str_at(rank, idx),
                birthday: opt_str_at(birthday, idx),
                death: opt_str_at(death, idx),
                awards_txt: opt_str_at(awards_txt, idx),
                pub_date: opt_str_at(pub_date, idx),
            })
            .collect())
    }
}
