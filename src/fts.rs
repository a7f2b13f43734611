//! Chunked full-text export.
//!
//! Every card with a usable narrative is exported for full-corpus search,
//! split into fixed-size parquet chunks so no single artifact grows past
//! hosting-friendly limits. Chunks are numbered `veterans_fts_part000`,
//! `veterans_fts_part001`, ... and discovered back via `ArtifactStore`.

use std::path::Path;

use tracing::debug;

use crate::constants::analysis::MIN_FTS_STORY_CHARS;
use crate::constants::artifacts::{FTS_PART_PREFIX, FTS_ROWS_PER_CHUNK};
use crate::errors::MemoriaError;
use crate::record::MemorialRecord;
use crate::tables::{ArtifactTable, FtsRow};

/// Select and project the export rows: cards whose narrative is longer than
/// the minimum, in source order.
pub fn fts_rows(records: &[MemorialRecord]) -> Vec<FtsRow> {
    records
        .iter()
        .filter(|record| {
            record
                .story_text()
                .is_some_and(|story| story.chars().count() > MIN_FTS_STORY_CHARS)
        })
        .map(|record| FtsRow {
            id: record.id.clone(),
            url: record.url.clone(),
            fio: record.fio.clone(),
            story: record.story.clone(),
            region: record.region.clone(),
            rank: record.rank.clone(),
            birthday: record.birthday.clone(),
            death: record.death.clone(),
            awards_txt: record.awards_txt.clone(),
            pub_date: record.pub_date.clone(),
        })
        .collect()
}

/// Write `rows` into `dir` as numbered chunks; returns the chunk count.
///
/// An empty row set still produces one empty chunk, so a built corpus is
/// always distinguishable from a missing one.
pub fn write_fts_chunks(dir: &Path, rows: &[FtsRow]) -> Result<usize, MemoriaError> {
    let chunks: Vec<&[FtsRow]> = if rows.is_empty() {
        vec![&[]]
    } else {
        rows.chunks(FTS_ROWS_PER_CHUNK).collect()
    };

    for (chunk_idx, chunk) in chunks.iter().enumerate() {
        let path = dir.join(format!("{FTS_PART_PREFIX}{chunk_idx:03}.parquet"));
        let batch = FtsRow::to_batch(chunk)?;
        crate::artifacts::write_batch(&path, &batch)?;
        debug!(chunk = chunk_idx, rows = chunk.len(), path = %path.display(), "fts chunk written");
    }
    Ok(chunks.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::read_batch;
    use tempfile::tempdir;

    fn record_with_story(id: &str, story: &str) -> MemorialRecord {
        MemorialRecord {
            id: id.to_string(),
            story: Some(story.to_string()),
            ..MemorialRecord::default()
        }
    }

    #[test]
    fn short_and_missing_narratives_are_excluded() {
        let records = vec![
            record_with_story("1", "Воевал на Втором Белорусском фронте"),
            record_with_story("2", "кратко"),
            MemorialRecord {
                id: "3".into(),
                ..MemorialRecord::default()
            },
        ];
        let rows = fts_rows(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "1");
    }

    #[test]
    fn chunking_splits_on_the_row_limit() {
        let rows: Vec<FtsRow> = fts_rows(
            &(0..5)
                .map(|idx| record_with_story(&idx.to_string(), "Достаточно длинная история"))
                .collect::<Vec<_>>(),
        );
        let dir = tempdir().unwrap();
        let parts = write_fts_chunks(dir.path(), &rows).unwrap();
        assert_eq!(parts, 1);

        let batch = read_batch(&dir.path().join("veterans_fts_part000.parquet")).unwrap();
        assert_eq!(batch.num_rows(), 5);
    }

    #[test]
    fn empty_export_still_writes_one_chunk() {
        let dir = tempdir().unwrap();
        let parts = write_fts_chunks(dir.path(), &[]).unwrap();
        assert_eq!(parts, 1);
        assert!(dir.path().join("veterans_fts_part000.parquet").is_file());
    }
}
