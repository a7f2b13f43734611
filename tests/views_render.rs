use std::fs;
use std::path::Path;

use memoria::builder::{BuildOptions, build};
use memoria::views::View;
use memoria::{ArtifactStore, SearchQuery};

/// A small but fully-populated source: two regions, narratives, ranks,
/// births/deaths, and a May-peaked publication series.
fn build_full_fixture(dir: &Path) -> ArtifactStore {
    let mut out = String::from(
        "id,fio,story,region,rank,birthplace,added_region,birthday,death,battles,awards_cnt,photos_cnt,pub_date\n",
    );
    for idx in 0..60 {
        let day = 9 + idx % 10;
        out.push_str(&format!(
            "m-{idx:02},Боец m-{idx:02},Мой дед оборонял Сталинград и вернулся с орденом,Москва,рядовой,Тульская область,Москва,1910,1944,Ржев,1,1,2020-05-{day:02}\n",
        ));
    }
    for idx in 0..40 {
        out.push_str(&format!(
            "t-{idx:02},Боец t-{idx:02},,Тула,лейтенант,Тула,Тула,1915,1943,,0,0,2020-06-{:02}\n",
            1 + idx % 20,
        ));
    }
    let input = dir.join("cards.csv");
    fs::write(&input, out).expect("write csv");
    let data = dir.join("data");
    build(&BuildOptions {
        input,
        out_dir: data.clone(),
        sample_size: 1000,
        seed: 42,
    })
    .expect("build");
    ArtifactStore::new(data)
}

#[test]
fn all_views_render_from_a_real_build() {
    let dir = tempfile::tempdir().unwrap();
    let store = build_full_fixture(dir.path());

    let overview = View::Overview.render(&store).to_text();
    assert!(overview.contains("Всего карточек: 100"));
    assert!(overview.contains("С текстом: 60.0%"));

    let dynamics = View::Dynamics.render(&store).to_text();
    assert!(dynamics.contains("Сезонность"));
    assert!(dynamics.contains("Май"));

    let texts = View::Texts.render(&store).to_text();
    assert!(texts.contains("Типы нарративов"));
    assert!(texts.contains("Боевой путь"));
    assert!(texts.contains("Сталинград"), "gazetteer location should be counted");

    let geography = View::Geography.render(&store).to_text();
    assert!(geography.contains("Локальная память"));
    assert!(geography.contains("Тульская область"));

    let demography = View::Demography.render(&store).to_text();
    assert!(demography.contains("Офицеры"));
    assert!(demography.contains("Рядовые"));

    let search = View::Search(SearchQuery::new("орденом")).render(&store).to_text();
    assert!(search.contains("Результаты по запросу «орденом»"));
    assert!(search.contains("релевантность"));

    // None of the views may degrade to a notice on a complete build.
    for text in [overview, dynamics, texts, geography, demography, search] {
        assert!(!text.contains("Данные недоступны"), "unexpected notice in: {text}");
    }
}
