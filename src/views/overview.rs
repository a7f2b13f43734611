//! Overview: headline metrics and top-level counts. Display formatting only.

use super::{Rendered, format_table, load_section, opt_metric};
use crate::artifacts::ArtifactStore;
use crate::tables::{DmiRegionRow, HeadlineRow, YearlyStatsRow};

/// Regions listed in the digital-memory ranking.
const DMI_REGIONS_SHOWN: usize = 10;

pub(super) fn render(store: &ArtifactStore) -> Rendered {
    let headline = load_section(store, "Ключевые показатели", |rows: Vec<HeadlineRow>| {
        let Some(row) = rows.first() else {
            return "(нет данных)".to_string();
        };
        let mut out = String::new();
        out.push_str(&format!("Всего карточек: {}\n", row.total_cards));
        out.push_str(&format!("С текстом: {:.1}%\n", row.story_pct));
        out.push_str(&format!("Доля публикаций в мае: {:.1}%\n", row.may_share_pct));
        out.push_str(&format!(
            "Полураспад активности: {} дн.\n",
            opt_metric(row.halflife_days, 1)
        ));
        out.push_str(&format!("Неравенство памяти (Джини): {:.3}\n", row.dmi_gini));
        out.push_str(&format!(
            "Корреляция текст/награды: {}\n",
            opt_metric(row.story_awards_r, 2)
        ));
        out.push_str(&format!("Размер сэмпла: {}\n", row.sample_rows));
        if row.rows_skipped > 0 {
            out.push_str(&format!(
                "Пропущено некорректных строк при сборке: {}\n",
                row.rows_skipped
            ));
        }
        out
    });

    let yearly = load_section(store, "Публикации по годам", |rows: Vec<YearlyStatsRow>| {
        let table_rows: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                vec![
                    row.year.to_string(),
                    row.total.to_string(),
                    row.with_story.to_string(),
                    row.with_photo.to_string(),
                    row.with_awards.to_string(),
                ]
            })
            .collect();
        format_table(
            &["Год", "Всего", "С текстом", "С фото", "С наградами"],
            &table_rows,
        )
    });

    let dmi = load_section(
        store,
        "Индекс цифровой памяти: лидеры",
        |rows: Vec<DmiRegionRow>| {
            let mut ranked = rows;
            ranked.sort_by(|a, b| {
                b.dmi
                    .total_cmp(&a.dmi)
                    .then_with(|| a.region.cmp(&b.region))
            });
            ranked.truncate(DMI_REGIONS_SHOWN);
            let table: Vec<Vec<String>> = ranked
                .iter()
                .map(|row| {
                    vec![
                        row.region.clone(),
                        format!("{:.3}", row.dmi),
                        row.count.to_string(),
                    ]
                })
                .collect();
            format_table(&["Регион", "DMI", "Карточек"], &table)
        },
    );

    Rendered {
        title: "Обзор".to_string(),
        sections: vec![headline, yearly, dmi],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::write_table;
    use crate::tables::Namespace;

    #[test]
    fn renders_headline_and_yearly_sections() {
        let dir = tempfile::tempdir().unwrap();
        let agg = dir.path().join(Namespace::Aggregated.dir_name());
        std::fs::create_dir_all(&agg).unwrap();
        write_table(
            &agg,
            &[HeadlineRow {
                total_cards: 100,
                story_pct: 50.0,
                may_share_pct: 57.4,
                halflife_days: None,
                dmi_gini: 0.125,
                story_awards_r: Some(-0.56),
                sample_rows: 100,
                rows_skipped: 2,
            }],
        )
        .unwrap();
        write_table(
            &agg,
            &[YearlyStatsRow {
                year: 2020,
                total: 100,
                with_story: 50,
                with_photo: 10,
                with_awards: 20,
            }],
        )
        .unwrap();
        write_table(
            &agg,
            &[
                DmiRegionRow {
                    region: "Тула".into(),
                    count: 30,
                    story_pct: 20.0,
                    photo_pct: 10.0,
                    awards_pct: 10.0,
                    dmi: 0.1,
                },
                DmiRegionRow {
                    region: "Москва".into(),
                    count: 70,
                    story_pct: 80.0,
                    photo_pct: 60.0,
                    awards_pct: 40.0,
                    dmi: 0.9,
                },
            ],
        )
        .unwrap();

        let store = ArtifactStore::new(dir.path());
        let text = render(&store).to_text();
        assert!(text.contains("Всего карточек: 100"));
        assert!(text.contains("Полураспад активности: — дн."));
        assert!(text.contains("Пропущено некорректных строк при сборке: 2"));
        assert!(text.contains("2020"));
        // DMI ranking is sorted by score, best region first.
        let moscow = text.find("Москва").expect("dmi leader listed");
        let tula = text.find("Тула").expect("dmi trailer listed");
        assert!(moscow < tula);
    }
}
