use std::fs;
use std::path::Path;

use memoria::builder::{BuildOptions, build};
use memoria::search::CorpusKind;
use memoria::tables::SampleRow;
use memoria::views::View;
use memoria::{ArtifactStore, SearchCorpus, SearchQuery};

fn write_source_csv(path: &Path, rows: &[(String, String, String)]) {
    let mut out = String::from("id,fio,story,region,pub_date\n");
    for (id, region, story) in rows {
        out.push_str(&format!("{id},Боец {id},{story},{region},2020-05-09\n"));
    }
    fs::write(path, out).expect("write source csv");
}

fn build_corpus_fixture(dir: &Path, rows: &[(String, String, String)]) -> ArtifactStore {
    let input = dir.join("cards.csv");
    write_source_csv(&input, rows);
    let out = dir.join("data");
    build(&BuildOptions {
        input,
        out_dir: out.clone(),
        sample_size: 1000,
        seed: 42,
    })
    .expect("build");
    ArtifactStore::new(out)
}

fn fixture_rows() -> Vec<(String, String, String)> {
    let mut rows = vec![(
        "hero-1".to_string(),
        "Волгоградская область".to_string(),
        "Оборонял Сталинград до последнего дня осады".to_string(),
    )];
    for idx in 0..30 {
        rows.push((
            format!("card-{idx:02}"),
            "Москва".to_string(),
            "Служил в пехоте и дошёл до Берлина".to_string(),
        ));
    }
    rows
}

#[test]
fn unique_token_in_sample_returns_exactly_one_hit() {
    let dir = tempfile::tempdir().unwrap();
    let store = build_corpus_fixture(dir.path(), &fixture_rows());

    let sample: Vec<SampleRow> = store.load().unwrap();
    let with_token = sample
        .iter()
        .filter(|row| {
            row.story
                .as_deref()
                .is_some_and(|story| story.contains("Сталинград"))
        })
        .count();
    assert_eq!(with_token, 1, "fixture must hold exactly one matching card");

    let corpus = SearchCorpus::from_sample(sample);
    let hits = corpus.search(&SearchQuery::new("Сталинград"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "hero-1");
}

#[test]
fn search_view_prefers_the_full_text_export() {
    let dir = tempfile::tempdir().unwrap();
    let store = build_corpus_fixture(dir.path(), &fixture_rows());

    let corpus = SearchCorpus::from_fts(store.load_fts().unwrap());
    assert_eq!(corpus.kind(), CorpusKind::Full);
    assert_eq!(corpus.len(), 31);

    let rendered = View::Search(SearchQuery::new("Сталинград")).render(&store);
    let text = rendered.to_text();
    assert!(text.contains("Полный корпус текстов"));
    assert!(text.contains("hero"));
    assert!(text.contains("Волгоградская область"));
}

#[test]
fn search_view_falls_back_to_the_sample_when_export_is_absent() {
    let dir = tempfile::tempdir().unwrap();
    let store = build_corpus_fixture(dir.path(), &fixture_rows());
    fs::remove_dir_all(store.root().join("full")).unwrap();

    let rendered = View::Search(SearchQuery::new("Берлина")).render(&store);
    let text = rendered.to_text();
    assert!(text.contains("Стратифицированный сэмпл"));
    assert!(text.contains("Москва"));
}

#[test]
fn sample_proportions_track_source_regions_within_one_point() {
    let dir = tempfile::tempdir().unwrap();
    let mut rows = Vec::new();
    for idx in 0..600 {
        rows.push((
            format!("a-{idx:04}"),
            "Регион А".to_string(),
            if idx % 2 == 0 {
                "Длинная история о фронтовой службе".to_string()
            } else {
                String::new()
            },
        ));
    }
    for idx in 0..400 {
        rows.push((
            format!("b-{idx:04}"),
            "Регион Б".to_string(),
            String::new(),
        ));
    }

    let input = dir.path().join("cards.csv");
    write_source_csv(&input, &rows);
    let out = dir.path().join("data");
    let report = build(&BuildOptions {
        input,
        out_dir: out.clone(),
        sample_size: 100,
        seed: 42,
    })
    .expect("build");
    assert_eq!(report.sample_rows, 100);

    let sample: Vec<SampleRow> = ArtifactStore::new(&out).load().unwrap();
    assert_eq!(sample.len(), 100);
    let region_a = sample
        .iter()
        .filter(|row| row.region.as_deref() == Some("Регион А"))
        .count();
    assert!(
        (59..=61).contains(&region_a),
        "source is 60% region A, sample got {region_a}"
    );
    let with_story = sample.iter().filter(|row| row.story.is_some()).count();
    assert!(
        (29..=31).contains(&with_story),
        "source is 30% with narrative, sample got {with_story}"
    );
}
