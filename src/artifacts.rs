//! Parquet persistence and the read-through artifact store.

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use tracing::debug;
use walkdir::WalkDir;

use crate::constants::artifacts::FTS_PART_PREFIX;
use crate::errors::MemoriaError;
use crate::tables::{ArtifactTable, FtsRow, Namespace};

/// Fixed writer properties shared by every artifact, so rebuilds on identical
/// input stay byte-for-byte identical.
fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .build()
}

/// Write one `RecordBatch` as a parquet file at `path`.
pub fn write_batch(path: &Path, batch: &RecordBatch) -> Result<(), MemoriaError> {
    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(writer_properties()))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(())
}

/// Write a typed table into `dir` under its fixed file name.
pub fn write_table<T: ArtifactTable>(dir: &Path, rows: &[T]) -> Result<PathBuf, MemoriaError> {
    let path = dir.join(T::FILE_NAME);
    let batch = T::to_batch(rows)?;
    write_batch(&path, &batch)?;
    debug!(rows = rows.len(), path = %path.display(), "artifact written");
    Ok(path)
}

/// Read a parquet file into a single concatenated `RecordBatch`.
///
/// A file with no row groups decodes to an empty batch with the persisted
/// schema (legitimate for aggregates that can be empty, like the half-life
/// series when no year yields a fit).
pub fn read_batch(path: &Path) -> Result<RecordBatch, MemoriaError> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let mut batches = Vec::new();
    for batch in reader {
        batches.push(batch?);
    }
    if batches.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }
    Ok(concat_batches(&schema, batches.iter())?)
}

/// Read a typed table from an explicit path.
pub fn read_table<T: ArtifactTable>(path: &Path) -> Result<Vec<T>, MemoriaError> {
    T::from_batch(&read_batch(path)?)
}

struct CachedBatch {
    modified: SystemTime,
    batch: Arc<RecordBatch>,
}

/// Read-through artifact store over a build output root.
///
/// Loaded batches are cached process-wide, keyed by path; an entry is reused
/// only while the file's modification time is unchanged, so a rebuild under a
/// running process invalidates naturally. `clear_cache` drops everything
/// explicitly.
pub struct ArtifactStore {
    root: PathBuf,
    cache: RwLock<HashMap<PathBuf, CachedBatch>>,
}

impl ArtifactStore {
    /// Create a store over the artifact root (the `prepare` output directory).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Artifact root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path a table is expected at.
    pub fn table_path<T: ArtifactTable>(&self) -> PathBuf {
        self.root.join(T::NAMESPACE.dir_name()).join(T::FILE_NAME)
    }

    /// Load a typed table through the cache.
    pub fn load<T: ArtifactTable>(&self) -> Result<Vec<T>, MemoriaError> {
        let path = self.table_path::<T>();
        let batch = self.batch_for(&path, T::FILE_NAME)?;
        T::from_batch(&batch)
    }

    /// Sorted chunk paths of the full-text export, if any were built.
    pub fn fts_parts(&self) -> Vec<PathBuf> {
        let dir = self.root.join(Namespace::Full.dir_name());
        let mut parts: Vec<PathBuf> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.starts_with(FTS_PART_PREFIX) && name.ends_with(".parquet")
                    })
            })
            .collect();
        parts.sort();
        parts
    }

    /// Load every chunk of the full-text export through the cache.
    pub fn load_fts(&self) -> Result<Vec<FtsRow>, MemoriaError> {
        let parts = self.fts_parts();
        if parts.is_empty() {
            return Err(MemoriaError::MissingArtifact {
                name: "full-text export".into(),
                path: self.root.join(Namespace::Full.dir_name()),
            });
        }
        let mut rows = Vec::new();
        for part in parts {
            let name = part
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or(FTS_PART_PREFIX)
                .to_string();
            let batch = self.batch_for(&part, &name)?;
            rows.extend(FtsRow::from_batch(&batch)?);
        }
        Ok(rows)
    }

    /// Drop all cached batches.
    pub fn clear_cache(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Number of cached artifacts (visible for cache tests).
    pub fn cached_artifacts(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }

    fn batch_for(&self, path: &Path, name: &str) -> Result<Arc<RecordBatch>, MemoriaError> {
        let metadata = std::fs::metadata(path).map_err(|_| MemoriaError::MissingArtifact {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;
        let modified = metadata.modified()?;

        if let Ok(cache) = self.cache.read()
            && let Some(entry) = cache.get(path)
            && entry.modified == modified
        {
            return Ok(Arc::clone(&entry.batch));
        }

        let batch = Arc::new(read_batch(path)?);
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(
                path.to_path_buf(),
                CachedBatch {
                    modified,
                    batch: Arc::clone(&batch),
                },
            );
        }
        Ok(batch)
    }
}
