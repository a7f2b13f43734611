//! Texts: narrative types, sentiment, lexical diversity, topics, entities.
//!
//! Everything shown here is precomputed by the builder; rendering does no
//! text analysis of its own.

use super::{Rendered, format_table, load_section, opt_metric};
use crate::artifacts::ArtifactStore;
use crate::constants::labels::{ENTITY_LOC, ENTITY_ORG};
use crate::tables::{
    MattrYearlyRow, NarrativeTypesYearlyRow, NerEntityRow, SentimentYearlyRow, TopicEvolutionRow,
    TopicKeywordRow,
};
use crate::text::NarrativeKind;
use crate::topics::topic;

/// Entities listed per type.
const ENTITIES_SHOWN: usize = 10;

pub(super) fn render(store: &ArtifactStore) -> Rendered {
    let kind_headers: Vec<&str> = {
        let mut headers = vec!["Год"];
        headers.extend(NarrativeKind::ALL.iter().map(|kind| kind.label()));
        headers
    };

    let narrative_types = load_section(
        store,
        "Типы нарративов по годам (%)",
        |rows: Vec<NarrativeTypesYearlyRow>| {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.year.to_string(),
                        format!("{:.1}", row.share_roster),
                        format!("{:.1}", row.share_memoir),
                        format!("{:.1}", row.share_family),
                        format!("{:.1}", row.share_mixed),
                    ]
                })
                .collect();
            format_table(&kind_headers, &table)
        },
    );

    let sentiment = load_section(
        store,
        "Тональность по годам",
        |rows: Vec<SentimentYearlyRow>| {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.year.to_string(),
                        format!("{:.3}", row.mean_score),
                        opt_metric(row.roster, 3),
                        opt_metric(row.memoir, 3),
                        opt_metric(row.family, 3),
                        opt_metric(row.mixed, 3),
                    ]
                })
                .collect();
            let mut headers = vec!["Год", "Средняя"];
            headers.extend(NarrativeKind::ALL.iter().map(|kind| kind.label()));
            format_table(&headers, &table)
        },
    );

    let mattr = load_section(
        store,
        "Лексическое разнообразие (MATTR)",
        |rows: Vec<MattrYearlyRow>| {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    vec![
                        row.year.to_string(),
                        format!("{:.3}", row.mattr),
                        opt_metric(row.roster, 3),
                        opt_metric(row.memoir, 3),
                        opt_metric(row.family, 3),
                        opt_metric(row.mixed, 3),
                    ]
                })
                .collect();
            let mut headers = vec!["Год", "Средний"];
            headers.extend(NarrativeKind::ALL.iter().map(|kind| kind.label()));
            format_table(&headers, &table)
        },
    );

    let topics = load_section(store, "Темы нарративов", |rows: Vec<TopicKeywordRow>| {
        if rows.is_empty() {
            return "(нет данных)".to_string();
        }
        let mut out = String::new();
        let mut current_topic: Option<i64> = None;
        for row in &rows {
            if current_topic != Some(row.topic_id) {
                if current_topic.is_some() {
                    out.push('\n');
                }
                out.push_str(&format!("{}. {}: ", row.topic_id, row.topic_label));
                current_topic = Some(row.topic_id);
            } else {
                out.push_str(", ");
            }
            out.push_str(&row.word);
        }
        out.push('\n');
        out
    });

    let evolution = load_section(
        store,
        "Эволюция тем по годам (доли)",
        |rows: Vec<TopicEvolutionRow>| {
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| {
                    let mut cells = vec![row.year.to_string()];
                    cells.extend(row.shares.iter().map(|share| format!("{share:.2}")));
                    cells
                })
                .collect();
            let mut headers = vec!["Год"];
            for topic_id in 0..crate::constants::analysis::TOPIC_COUNT {
                headers.push(topic(topic_id).label);
            }
            format_table(&headers, &table)
        },
    );

    let entities = load_section(store, "Именованные сущности", |rows: Vec<NerEntityRow>| {
        let mut out = String::new();
        for (entity_type, heading) in [(ENTITY_LOC, "Топонимы"), (ENTITY_ORG, "Организации")] {
            let table: Vec<Vec<String>> = rows
                .iter()
                .filter(|row| row.entity_type == entity_type)
                .take(ENTITIES_SHOWN)
                .map(|row| vec![row.entity.clone(), row.count.to_string()])
                .collect();
            out.push_str(heading);
            out.push('\n');
            out.push_str(&format_table(&["Сущность", "Карточек"], &table));
            out.push('\n');
        }
        out
    });

    Rendered {
        title: "Тексты".to_string(),
        sections: vec![
            narrative_types,
            sentiment,
            mattr,
            topics,
            evolution,
            entities,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregates::topic_keyword_rows;
    use crate::artifacts::write_table;
    use crate::tables::Namespace;

    #[test]
    fn topic_keywords_group_by_topic_line() {
        let dir = tempfile::tempdir().unwrap();
        let agg = dir.path().join(Namespace::Aggregated.dir_name());
        std::fs::create_dir_all(&agg).unwrap();
        write_table(&agg, &topic_keyword_rows()).unwrap();

        let store = ArtifactStore::new(dir.path());
        let text = render(&store).to_text();
        assert!(text.contains("0. Боевой путь: фронт"));
        assert!(text.contains("6. Труд/тыл"));
        // Absent artifacts still surface as notices, not failures.
        assert!(text.contains("Данные недоступны"));
    }
}
