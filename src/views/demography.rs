//! Demography: age at death by rank group and the convergence gap.

use std::collections::BTreeMap;

use super::{Rendered, format_table, load_section};
use crate::artifacts::ArtifactStore;
use crate::record::RankGroup;
use crate::tables::RankAgeRow;

pub(super) fn render(store: &ArtifactStore) -> Rendered {
    let means = load_section(
        store,
        "Средний возраст смерти по группам званий",
        |rows: Vec<RankAgeRow>| {
            let by_year = mean_age_by_year(&rows);
            if by_year.is_empty() {
                return "(нет данных)".to_string();
            }
            let groups = group_labels();
            let table: Vec<Vec<String>> = by_year
                .iter()
                .map(|(year, means)| {
                    let mut cells = vec![year.to_string()];
                    for group in &groups {
                        cells.push(match means.get(*group) {
                            Some(mean) => format!("{mean:.1}"),
                            None => "—".to_string(),
                        });
                    }
                    cells
                })
                .collect();
            let mut headers = vec!["Год смерти"];
            headers.extend(groups.iter().copied());
            format_table(&headers, &table)
        },
    );

    let convergence = load_section(
        store,
        "Сходимость: офицеры и рядовые",
        |rows: Vec<RankAgeRow>| {
            let by_year = mean_age_by_year(&rows);
            let officer = RankGroup::Officers.label();
            let private = RankGroup::Privates.label();
            let gaps: Vec<(i64, f64)> = by_year
                .iter()
                .filter_map(|(year, means)| {
                    Some((*year, (means.get(officer)? - means.get(private)?).abs()))
                })
                .collect();
            match (gaps.first(), gaps.last()) {
                (Some((first_year, first_gap)), Some((last_year, last_gap)))
                    if gaps.len() > 1 =>
                {
                    format!(
                        "Разрыв среднего возраста: {first_gap:.1} лет ({first_year}) → {last_gap:.1} лет ({last_year})\n"
                    )
                }
                _ => "Недостаточно данных для сравнения групп по годам.".to_string(),
            }
        },
    );

    Rendered {
        title: "Демография".to_string(),
        sections: vec![means, convergence],
    }
}

fn group_labels() -> Vec<&'static str> {
    vec![
        RankGroup::Officers.label(),
        RankGroup::Sergeants.label(),
        RankGroup::Privates.label(),
        RankGroup::Other.label(),
        RankGroup::Unknown.label(),
    ]
}

/// Count-weighted mean age per rank group, keyed by death year.
fn mean_age_by_year(rows: &[RankAgeRow]) -> BTreeMap<i64, BTreeMap<String, f64>> {
    let mut sums: BTreeMap<i64, BTreeMap<String, (f64, i64)>> = BTreeMap::new();
    for row in rows {
        let entry = sums
            .entry(row.death_year)
            .or_default()
            .entry(row.rank_group.clone())
            .or_insert((0.0, 0));
        entry.0 += row.age as f64 * row.count as f64;
        entry.1 += row.count;
    }
    sums.into_iter()
        .map(|(year, groups)| {
            let means = groups
                .into_iter()
                .filter(|(_, (_, count))| *count > 0)
                .map(|(group, (sum, count))| (group, sum / count as f64))
                .collect();
            (year, means)
        })
        .collect()
}
