//! Geography: inter-regional migration flows and local-memory share.

use std::collections::BTreeMap;

use super::{Rendered, format_table, load_section};
use crate::artifacts::ArtifactStore;
use crate::tables::{MigrationRow, NetworkEdgeRow};

/// Flows and regions listed in the tables.
const FLOWS_SHOWN: usize = 15;

pub(super) fn render(store: &ArtifactStore) -> Rendered {
    let matrix = load_section(store, "Матрица миграции памяти", |rows: Vec<MigrationRow>| {
        if rows.is_empty() {
            return "(нет данных)".to_string();
        }
        let total: i64 = rows.iter().map(|row| row.count).sum();
        let local: i64 = rows
            .iter()
            .filter(|row| row.birth_region == row.submit_region)
            .map(|row| row.count)
            .sum();
        let mut out = format!(
            "Пар регионов: {}, карточек в матрице: {total}\n",
            rows.len()
        );
        out.push_str(&format!(
            "Локальная память (регион рождения = регион подачи): {:.1}%\n\n",
            if total > 0 {
                local as f64 / total as f64 * 100.0
            } else {
                0.0
            }
        ));

        let mut sorted = rows.clone();
        sorted.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.birth_region.cmp(&b.birth_region))
        });
        sorted.truncate(FLOWS_SHOWN);
        let table: Vec<Vec<String>> = sorted
            .iter()
            .map(|row| {
                vec![
                    row.birth_region.clone(),
                    row.submit_region.clone(),
                    row.count.to_string(),
                ]
            })
            .collect();
        out.push_str(&format_table(
            &["Регион рождения", "Регион подачи", "Карточек"],
            &table,
        ));
        out
    });

    let inflow = load_section(store, "Принимающие регионы", |rows: Vec<MigrationRow>| {
        let mut incoming: BTreeMap<&str, i64> = BTreeMap::new();
        for row in rows.iter().filter(|row| row.birth_region != row.submit_region) {
            *incoming.entry(row.submit_region.as_str()).or_insert(0) += row.count;
        }
        let mut ranked: Vec<(&str, i64)> = incoming.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(FLOWS_SHOWN);
        let table: Vec<Vec<String>> = ranked
            .into_iter()
            .map(|(region, count)| vec![region.to_string(), count.to_string()])
            .collect();
        format_table(&["Регион подачи", "Принято карточек"], &table)
    });

    let edges = load_section(store, "Сеть переток памяти", |rows: Vec<NetworkEdgeRow>| {
        let table: Vec<Vec<String>> = rows
            .iter()
            .take(FLOWS_SHOWN)
            .map(|row| {
                vec![
                    format!("{} → {}", row.source, row.target),
                    row.count.to_string(),
                ]
            })
            .collect();
        format_table(&["Поток", "Карточек"], &table)
    });

    Rendered {
        title: "География памяти".to_string(),
        sections: vec![matrix, inflow, edges],
    }
}
