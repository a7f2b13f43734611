//! Raw CSV ingestion.
//!
//! The source export is a 25-column CSV keyed by `id`. Rows that fail to
//! decode (wrong field count, malformed numerics, invalid UTF-8) are skipped
//! and counted; the skip total surfaces in the build report. A missing or
//! unreadable file is fatal.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::MemoriaError;
use crate::record::MemorialRecord;

/// Decoded source rows plus ingest diagnostics.
#[derive(Clone, Debug)]
pub struct IngestReport {
    /// Rows decoded successfully, in file order.
    pub records: Vec<MemorialRecord>,
    /// Rows skipped because they failed to decode.
    pub skipped: usize,
    /// Source path the report was produced from.
    pub path: PathBuf,
}

/// Number of skipped rows logged individually before switching to a summary.
const SKIP_LOG_LIMIT: usize = 5;

/// Read all records from `path`.
pub fn read_records(path: &Path) -> Result<IngestReport, MemoriaError> {
    if !path.is_file() {
        return Err(MemoriaError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: "file does not exist".into(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|err| MemoriaError::SourceUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, row) in reader.deserialize::<MemorialRecord>().enumerate() {
        match row {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                if skipped <= SKIP_LOG_LIMIT {
                    warn!(row = row_idx + 1, %err, "skipping malformed row");
                }
            }
        }
    }
    if skipped > SKIP_LOG_LIMIT {
        warn!(
            skipped,
            "additional malformed rows were skipped without individual logging"
        );
    }
    debug!(
        rows = records.len(),
        skipped,
        path = %path.display(),
        "source ingest complete"
    );

    Ok(IngestReport {
        records,
        skipped,
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(contents.as_bytes()).expect("write fixture");
        file
    }

    #[test]
    fn reads_rows_and_treats_empty_fields_as_missing() {
        let file = write_fixture(
            "id,fio,region,story,awards_cnt,pub_date\n\
             1,Иванов Иван,Москва,Служил в артиллерии,2,2015-05-09\n\
             2,Петров Пётр,,,,\n",
        );
        let report = read_records(file.path()).expect("ingest");
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.records[0].awards_cnt, Some(2.0));
        assert!(report.records[1].region.is_none());
        assert!(!report.records[1].has_story());
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let file = write_fixture(
            "id,fio,awards_cnt\n\
             1,Иванов,1\n\
             2,Петров,не число\n\
             3,Сидоров,0\n",
        );
        let report = read_records(file.path()).expect("ingest");
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.records[1].id, "3");
    }

    #[test]
    fn missing_file_is_fatal_with_diagnostic() {
        let err = read_records(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(
            err,
            MemoriaError::SourceUnavailable { ref reason, .. } if reason.contains("does not exist")
        ));
    }
}
