use std::fs;
use std::path::{Path, PathBuf};

use memoria::builder::{BuildOptions, build};
use memoria::tables::{
    HalflifeYearlyRow, HeadlineRow, MonthlyCountRow, RegionStatsRow, YearlyStatsRow,
};
use memoria::{ArtifactStore, MemoriaError};

struct SourceRow {
    id: String,
    region: Option<String>,
    story: Option<String>,
    pub_date: Option<String>,
}

fn write_source_csv(path: &Path, rows: &[SourceRow]) {
    let mut out = String::from("id,fio,story,region,rank,birthplace,added_region,pub_date\n");
    for row in rows {
        out.push_str(&format!(
            "{},Боец {},{},{},рядовой,,,{}\n",
            row.id,
            row.id,
            row.story.as_deref().unwrap_or(""),
            row.region.as_deref().unwrap_or(""),
            row.pub_date.as_deref().unwrap_or(""),
        ));
    }
    fs::write(path, out).expect("write source csv");
}

/// 100 rows: 60 in region A, 40 in region B, 50 with a narrative.
fn synthetic_rows() -> Vec<SourceRow> {
    (0..100)
        .map(|idx| SourceRow {
            id: format!("card-{idx:03}"),
            region: Some(if idx < 60 { "Регион А" } else { "Регион Б" }.to_string()),
            story: (idx % 2 == 0).then(|| "Воевал на фронте и вернулся домой".to_string()),
            pub_date: Some(format!("2020-{:02}-{:02}", 5 + idx % 2, 1 + idx % 28)),
        })
        .collect()
}

fn build_fixture(rows: &[SourceRow], out_dir: &Path) -> memoria::BuildReport {
    let input = out_dir.with_extension("csv");
    write_source_csv(&input, rows);
    let options = BuildOptions {
        input,
        out_dir: out_dir.to_path_buf(),
        sample_size: 50,
        seed: 42,
    };
    build(&options).expect("build")
}

fn artifact_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for namespace in ["aggregated", "sample", "full"] {
        let dir = root.join(namespace);
        let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
            .expect("namespace dir")
            .map(|entry| entry.expect("entry").path())
            .collect();
        entries.sort();
        files.extend(entries);
    }
    files
}

#[test]
fn synthetic_input_produces_expected_regional_and_text_aggregates() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    let report = build_fixture(&synthetic_rows(), &out);

    assert_eq!(report.rows_read, 100);
    assert_eq!(report.rows_skipped, 0);
    assert_eq!(report.artifacts_written, 16);
    assert_eq!(report.fts_rows, 50);

    let store = ArtifactStore::new(&out);
    let regions: Vec<RegionStatsRow> = store.load().unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].region, "Регион А");
    assert_eq!(regions[0].count, 60);
    assert_eq!(regions[1].region, "Регион Б");
    assert_eq!(regions[1].count, 40);

    let total: i64 = regions.iter().map(|row| row.count).sum();
    assert_eq!(total, 100, "no rows silently dropped from the region aggregate");

    let headline: Vec<HeadlineRow> = store.load().unwrap();
    assert_eq!(headline.len(), 1);
    assert!((headline[0].story_pct - 50.0).abs() < 1e-9);
    assert_eq!(headline[0].total_cards, 100);

    let yearly: Vec<YearlyStatsRow> = store.load().unwrap();
    assert_eq!(yearly.len(), 1);
    assert_eq!(yearly[0].total, 100);
    assert_eq!(yearly[0].with_story, 50);
}

#[test]
fn rebuilds_on_identical_input_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let rows = synthetic_rows();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    build_fixture(&rows, &first);
    build_fixture(&rows, &second);

    let first_files = artifact_files(&first);
    let second_files = artifact_files(&second);
    assert_eq!(first_files.len(), second_files.len());
    assert!(!first_files.is_empty());

    for (left, right) in first_files.iter().zip(&second_files) {
        assert_eq!(left.file_name(), right.file_name());
        assert_eq!(
            fs::read(left).unwrap(),
            fs::read(right).unwrap(),
            "artifact {:?} differs between rebuilds",
            left.file_name()
        );
    }
}

#[test]
fn derived_metrics_are_reproducible_across_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    let rows = synthetic_rows();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    build_fixture(&rows, &first);
    build_fixture(&rows, &second);

    let first_headline: Vec<HeadlineRow> = ArtifactStore::new(&first).load().unwrap();
    let second_headline: Vec<HeadlineRow> = ArtifactStore::new(&second).load().unwrap();
    let (a, b) = (&first_headline[0], &second_headline[0]);
    assert!((a.dmi_gini - b.dmi_gini).abs() < 1e-3);
    match (a.story_awards_r, b.story_awards_r) {
        (Some(left), Some(right)) => assert!((left - right).abs() < 1e-3),
        (None, None) => {}
        other => panic!("correlation differs between rebuilds: {other:?}"),
    }
    match (a.halflife_days, b.halflife_days) {
        (Some(left), Some(right)) => assert!((left - right).abs() < 1e-3),
        (None, None) => {}
        other => panic!("half-life differs between rebuilds: {other:?}"),
    }
}

#[test]
fn identical_publication_dates_leave_half_life_undefined() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    let rows: Vec<SourceRow> = (0..40)
        .map(|idx| SourceRow {
            id: format!("same-day-{idx}"),
            region: Some("Регион".to_string()),
            story: None,
            pub_date: Some("2021-05-09".to_string()),
        })
        .collect();
    build_fixture(&rows, &out);

    let store = ArtifactStore::new(&out);
    let halflife: Vec<HalflifeYearlyRow> = store.load().unwrap();
    assert!(halflife.is_empty(), "no year should yield a half-life fit");

    let headline: Vec<HeadlineRow> = store.load().unwrap();
    assert_eq!(headline[0].halflife_days, None);

    let monthly: Vec<MonthlyCountRow> = store.load().unwrap();
    assert_eq!(monthly.len(), 1);
    assert_eq!(monthly[0].count, 40);
}

#[test]
fn failed_build_leaves_prior_artifacts_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    build_fixture(&synthetic_rows(), &out);

    let options = BuildOptions {
        input: dir.path().join("missing.csv"),
        out_dir: out.clone(),
        sample_size: 50,
        seed: 42,
    };
    let err = build(&options).unwrap_err();
    assert!(matches!(err, MemoriaError::SourceUnavailable { .. }));

    // Prior artifacts still load and no staging residue is left behind.
    let store = ArtifactStore::new(&out);
    let regions: Vec<RegionStatsRow> = store.load().unwrap();
    assert_eq!(regions.len(), 2);
    let staging_dirs: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with(".staging-")
        })
        .collect();
    assert!(staging_dirs.is_empty());
}

#[test]
fn rerun_replaces_namespaces_without_accumulation() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    build_fixture(&synthetic_rows(), &out);

    // A stale chunk from an earlier layout must not survive the rerun.
    let stale = out.join("full").join("veterans_fts_part999.parquet");
    fs::write(&stale, b"stale").unwrap();

    build_fixture(&synthetic_rows(), &out);
    assert!(!stale.exists());

    let store = ArtifactStore::new(&out);
    assert_eq!(store.fts_parts().len(), 1);
}

#[test]
fn malformed_rows_are_skipped_and_reported() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("data");
    let input = dir.path().join("cards.csv");
    fs::write(
        &input,
        "id,region,awards_cnt\n\
         1,Регион,2\n\
         2,Регион,не число\n\
         3,Регион,0\n\
         4,Регион\n",
    )
    .unwrap();

    let report = build(&BuildOptions {
        input,
        out_dir: out.clone(),
        sample_size: 50,
        seed: 42,
    })
    .expect("build tolerates malformed rows");
    assert_eq!(report.rows_read, 2);
    assert_eq!(report.rows_skipped, 2);

    let headline: Vec<HeadlineRow> = ArtifactStore::new(&out).load().unwrap();
    assert_eq!(headline[0].rows_skipped, 2);
}
