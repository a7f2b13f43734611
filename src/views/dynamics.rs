//! Dynamics: publication time series, seasonality, and activity half-life.

use std::collections::BTreeMap;

use super::{Rendered, bar, format_table, load_section};
use crate::artifacts::ArtifactStore;
use crate::constants::labels::MONTHS_RU;
use crate::stats;
use crate::tables::{HalflifeYearlyRow, MonthlyCountRow};

/// Years shown in the normalized seasonality comparison.
const PROFILE_YEARS: usize = 6;

pub(super) fn render(store: &ArtifactStore) -> Rendered {
    let series = load_section(store, "Помесячная динамика", |rows: Vec<MonthlyCountRow>| {
        if rows.is_empty() {
            return "(нет данных)".to_string();
        }
        let peak = rows
            .iter()
            .max_by(|a, b| a.count.cmp(&b.count).then_with(|| b.month.cmp(&a.month)));
        let total: i64 = rows.iter().map(|row| row.count).sum();
        let mut out = format!(
            "Месяцев в ряду: {} ({} — {}), всего карточек: {total}\n",
            rows.len(),
            rows.first().map(|row| row.month.as_str()).unwrap_or("—"),
            rows.last().map(|row| row.month.as_str()).unwrap_or("—"),
        );
        if let Some(peak) = peak {
            out.push_str(&format!("Пик: {} ({} карточек)\n", peak.month, peak.count));
        }
        out
    });

    let seasonality = load_section(store, "Сезонность", |rows: Vec<MonthlyCountRow>| {
        let totals = month_totals(&rows);
        let max = totals.iter().copied().max().unwrap_or(0) as f64;
        if max == 0.0 {
            return "(нет данных)".to_string();
        }
        let table: Vec<Vec<String>> = totals
            .iter()
            .enumerate()
            .map(|(month_idx, count)| {
                vec![
                    MONTHS_RU[month_idx].to_string(),
                    count.to_string(),
                    bar(*count as f64, max, 30),
                ]
            })
            .collect();
        format_table(&["Месяц", "Карточек", ""], &table)
    });

    let profiles = load_section(
        store,
        "Нормализованные профили по годам",
        |rows: Vec<MonthlyCountRow>| {
            let by_year = yearly_profiles(&rows);
            if by_year.is_empty() {
                return "(нет данных)".to_string();
            }
            let mut years: Vec<(&i32, &[i64; 12])> =
                by_year.iter().map(|(year, months)| (year, months)).collect();
            years.sort_by(|a, b| {
                let total_a: i64 = a.1.iter().sum();
                let total_b: i64 = b.1.iter().sum();
                total_b.cmp(&total_a).then_with(|| a.0.cmp(b.0))
            });
            years.truncate(PROFILE_YEARS);
            years.sort_by(|a, b| a.0.cmp(b.0));

            let table: Vec<Vec<String>> = years
                .into_iter()
                .map(|(year, months)| {
                    let total: i64 = months.iter().sum();
                    let mut row = vec![year.to_string()];
                    for count in months {
                        let pct = if total > 0 {
                            *count as f64 / total as f64 * 100.0
                        } else {
                            0.0
                        };
                        row.push(format!("{pct:.1}"));
                    }
                    row
                })
                .collect();
            let mut headers: Vec<&str> = vec!["Год"];
            headers.extend(MONTHS_RU);
            format_table(&headers, &table)
        },
    );

    let halflife = load_section(
        store,
        "Полураспад активности",
        |rows: Vec<HalflifeYearlyRow>| {
            if rows.is_empty() {
                return "Полураспад не определён ни для одного года.".to_string();
            }
            let table: Vec<Vec<String>> = rows
                .iter()
                .map(|row| vec![row.year.to_string(), format!("{:.1}", row.halflife_days)])
                .collect();
            let mut out = format_table(&["Год", "Полураспад (дни)"], &table);

            let xs: Vec<f64> = rows.iter().map(|row| row.year as f64).collect();
            let ys: Vec<f64> = rows.iter().map(|row| row.halflife_days).collect();
            if let Some((slope, _)) = stats::linear_fit(&xs, &ys) {
                out.push_str(&format!("\nТренд: {slope:+.2} дн/год\n"));
            }
            out
        },
    );

    Rendered {
        title: "Динамика публикаций".to_string(),
        sections: vec![series, seasonality, profiles, halflife],
    }
}

fn month_totals(rows: &[MonthlyCountRow]) -> [i64; 12] {
    let mut totals = [0i64; 12];
    for row in rows {
        if let Some(month_idx) = month_index(&row.month) {
            totals[month_idx] += row.count;
        }
    }
    totals
}

fn yearly_profiles(rows: &[MonthlyCountRow]) -> BTreeMap<i32, [i64; 12]> {
    let mut by_year: BTreeMap<i32, [i64; 12]> = BTreeMap::new();
    for row in rows {
        let (Some(year), Some(month_idx)) = (year_part(&row.month), month_index(&row.month)) else {
            continue;
        };
        by_year.entry(year).or_insert([0; 12])[month_idx] += row.count;
    }
    by_year
}

fn year_part(month_key: &str) -> Option<i32> {
    month_key.split('-').next()?.parse().ok()
}

fn month_index(month_key: &str) -> Option<usize> {
    let month: usize = month_key.split('-').nth(1)?.parse().ok()?;
    (1..=12).contains(&month).then(|| month - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::write_table;
    use crate::tables::Namespace;

    #[test]
    fn seasonality_and_trend_render() {
        let dir = tempfile::tempdir().unwrap();
        let agg = dir.path().join(Namespace::Aggregated.dir_name());
        std::fs::create_dir_all(&agg).unwrap();
        write_table(
            &agg,
            &[
                MonthlyCountRow {
                    month: "2019-05".into(),
                    count: 90,
                },
                MonthlyCountRow {
                    month: "2019-06".into(),
                    count: 10,
                },
                MonthlyCountRow {
                    month: "2020-05".into(),
                    count: 80,
                },
            ],
        )
        .unwrap();
        write_table(
            &agg,
            &[
                HalflifeYearlyRow {
                    year: 2019,
                    halflife_days: 9.0,
                },
                HalflifeYearlyRow {
                    year: 2020,
                    halflife_days: 7.0,
                },
            ],
        )
        .unwrap();

        let store = ArtifactStore::new(dir.path());
        let text = render(&store).to_text();
        assert!(text.contains("Пик: 2019-05"));
        assert!(text.contains("Май"));
        assert!(text.contains("Тренд: -2.00 дн/год"));
    }

    #[test]
    fn month_index_rejects_out_of_range_keys() {
        assert_eq!(month_index("2020-05"), Some(4));
        assert_eq!(month_index("2020-13"), None);
        assert_eq!(month_index("мусор"), None);
    }
}
