//! Search: interactive keyword search over the sample or full-text export.

use super::{Rendered, Section, notice};
use crate::artifacts::ArtifactStore;
use crate::search::{CorpusKind, SearchCorpus, SearchQuery};
use crate::tables::SampleRow;
use crate::text;

pub(super) fn render(store: &ArtifactStore, query: &SearchQuery) -> Rendered {
    let corpus = match load_corpus(store) {
        Ok(corpus) => corpus,
        Err(section) => {
            return Rendered {
                title: "Поиск по карточкам".to_string(),
                sections: vec![section],
            };
        }
    };

    let source = Section {
        heading: "Источник".to_string(),
        body: match corpus.kind() {
            CorpusKind::Full => format!(
                "Полный корпус текстов: {} карточек\n",
                corpus.len()
            ),
            CorpusKind::Sample => format!(
                "Стратифицированный сэмпл: {} карточек (полный корпус не собран)\n",
                corpus.len()
            ),
        },
    };

    let hits = corpus.search(query);
    let facets = corpus.region_facets(query);

    let mut body = String::new();
    if hits.is_empty() {
        body.push_str("Ничего не найдено.\n");
    }
    for (rank, hit) in hits.iter().enumerate() {
        body.push_str(&format!(
            "{}. {} — {} / {} (релевантность {})\n",
            rank + 1,
            hit.fio.as_deref().unwrap_or("—"),
            hit.region.as_deref().unwrap_or("—"),
            hit.rank.as_deref().unwrap_or("—"),
            hit.score,
        ));
        if let Some(url) = hit.url.as_deref() {
            body.push_str(&format!("   {url}\n"));
        }
        if let Some(snippet) = hit.snippet.as_deref() {
            body.push_str(&format!("   «{snippet}»\n"));
        }
        if let Some(story) = hit.story.as_deref() {
            let metrics = text::card_metrics(story);
            body.push_str(&format!(
                "   Символов: {}, слов: {}, уникальных: {}, MATTR: {:.3}, тип: {}\n",
                metrics.chars,
                metrics.words,
                metrics.unique_words,
                metrics.mattr,
                metrics.kind.label(),
            ));
        }
    }

    let results = Section {
        heading: format!("Результаты по запросу «{}»", query.text.trim()),
        body,
    };

    let mut facet_body = String::new();
    for (region, count) in &facets {
        facet_body.push_str(&format!("{region}: {count}\n"));
    }
    if facet_body.is_empty() {
        facet_body.push_str("(нет совпадений)\n");
    }
    let facet_section = Section {
        heading: "Совпадения по регионам".to_string(),
        body: facet_body,
    };

    Rendered {
        title: "Поиск по карточкам".to_string(),
        sections: vec![source, results, facet_section],
    }
}

/// Prefer the full-text export; fall back to the sample; degrade to a notice
/// section when neither is available.
fn load_corpus(store: &ArtifactStore) -> Result<SearchCorpus, Section> {
    match store.load_fts() {
        Ok(rows) => Ok(SearchCorpus::from_fts(rows)),
        Err(_) => match store.load::<SampleRow>() {
            Ok(rows) => Ok(SearchCorpus::from_sample(rows)),
            Err(err) => Err(Section {
                heading: "Источник".to_string(),
                body: notice(&err),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::write_table;
    use crate::tables::Namespace;

    fn store_with_sample(rows: &[SampleRow]) -> (tempfile::TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let sample_dir = dir.path().join(Namespace::Sample.dir_name());
        std::fs::create_dir_all(&sample_dir).unwrap();
        write_table(&sample_dir, rows).unwrap();
        let store = ArtifactStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn renders_hits_with_card_metrics_from_the_sample() {
        let rows = vec![SampleRow {
            id: "1".into(),
            url: Some("https://example.org/card/1".into()),
            fio: Some("Иванов Иван".into()),
            story: Some("Оборонял Сталинград. Вернулся домой с орденом.".into()),
            region: Some("Москва".into()),
            rank: Some("сержант".into()),
            birthday: None,
            death: None,
            awards_txt: None,
            awards_cnt: None,
            photos_cnt: None,
            pub_date: None,
        }];
        let (_dir, store) = store_with_sample(&rows);
        let rendered = render(&store, &SearchQuery::new("Сталинград"));
        let text = rendered.to_text();
        assert!(text.contains("Стратифицированный сэмпл: 1 карточек"));
        assert!(text.contains("Иванов Иван"));
        assert!(text.contains("MATTR"));
        assert!(text.contains("Москва: 1"));
    }

    #[test]
    fn no_match_renders_empty_result_notice() {
        let (_dir, store) = store_with_sample(&[SampleRow {
            id: "1".into(),
            url: None,
            fio: None,
            story: Some("Служил на севере".into()),
            region: None,
            rank: None,
            birthday: None,
            death: None,
            awards_txt: None,
            awards_cnt: None,
            photos_cnt: None,
            pub_date: None,
        }]);
        let rendered = render(&store, &SearchQuery::new("Берлин"));
        let text = rendered.to_text();
        assert!(text.contains("Ничего не найдено"));
        assert!(text.contains("(нет совпадений)"));
    }
}
