//! Aggregate computations over ingested records.
//!
//! Every function here is a pure map from the record slice to one artifact's
//! rows. Grouping uses ordered maps and explicit sorts so the emitted row
//! order (and therefore the persisted bytes) is identical across rebuilds.
//! Records missing a field used by an aggregate are excluded from that
//! aggregate's denominator, never counted as zero.

use std::collections::BTreeMap;

use chrono::Datelike;
use rayon::prelude::*;

use crate::constants::analysis::{
    AGE_MAX, AGE_MIN, DMI_AWARDS_WEIGHT, DMI_PHOTO_WEIGHT, DMI_STORY_WEIGHT, MATTR_TEXT_CAP,
    MIGRATION_MIN_COUNT, MIN_NARRATIVE_CHARS, NER_TOP_PER_TYPE, NETWORK_EDGE_LIMIT, PEAK_MONTH,
    TOPIC_COUNT,
};
use crate::constants::labels::{ENTITY_LOC, ENTITY_ORG};
use crate::hash::stable_hash_str;
use crate::lexicon::{GAZETTEER_LOCATIONS, GAZETTEER_ORGS, TOPICS};
use crate::record::MemorialRecord;
use crate::stats;
use crate::tables::{
    DmiRegionRow, HalflifeYearlyRow, HeadlineRow, MattrYearlyRow, MigrationRow, MonthlyCountRow,
    NarrativeTypesYearlyRow, NerEntityRow, NetworkEdgeRow, RankAgeRow, RegionStatsRow,
    SentimentYearlyRow, TopicEvolutionRow, TopicKeywordRow, YearlyStatsRow,
};
use crate::text::{self, NarrativeKind};
use crate::topics::assign_topic;

/// Card counts per publication month.
pub fn monthly_counts(records: &[MemorialRecord]) -> Vec<MonthlyCountRow> {
    let mut counts: BTreeMap<(i32, u32), i64> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.publication_date() {
            *counts.entry((date.year(), date.month())).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .map(|((year, month), count)| MonthlyCountRow {
            month: format!("{year:04}-{month:02}"),
            count,
        })
        .collect()
}

/// Coverage counts per publication year.
pub fn yearly_stats(records: &[MemorialRecord]) -> Vec<YearlyStatsRow> {
    let mut per_year: BTreeMap<i32, YearlyStatsRow> = BTreeMap::new();
    for record in records {
        let Some(year) = record.publication_year() else {
            continue;
        };
        let entry = per_year.entry(year).or_insert(YearlyStatsRow {
            year: year as i64,
            total: 0,
            with_story: 0,
            with_photo: 0,
            with_awards: 0,
        });
        entry.total += 1;
        if record.has_story() {
            entry.with_story += 1;
        }
        if record.has_photo() {
            entry.with_photo += 1;
        }
        if record.has_awards() {
            entry.with_awards += 1;
        }
    }
    per_year.into_values().collect()
}

struct RegionTally {
    count: i64,
    with_story: i64,
    with_photo: i64,
    with_awards: i64,
}

/// Coverage percentages per filing region.
pub fn region_stats(records: &[MemorialRecord]) -> Vec<RegionStatsRow> {
    let mut tallies: BTreeMap<String, RegionTally> = BTreeMap::new();
    for record in records {
        let Some(region) = record.region.as_deref().map(str::trim).filter(|r| !r.is_empty())
        else {
            continue;
        };
        let tally = tallies.entry(region.to_string()).or_insert(RegionTally {
            count: 0,
            with_story: 0,
            with_photo: 0,
            with_awards: 0,
        });
        tally.count += 1;
        if record.has_story() {
            tally.with_story += 1;
        }
        if record.has_photo() {
            tally.with_photo += 1;
        }
        if record.has_awards() {
            tally.with_awards += 1;
        }
    }
    tallies
        .into_iter()
        .map(|(region, tally)| RegionStatsRow {
            region,
            count: tally.count,
            story_pct: percent(tally.with_story, tally.count),
            photo_pct: percent(tally.with_photo, tally.count),
            awards_pct: percent(tally.with_awards, tally.count),
        })
        .collect()
}

/// Demographic cross-tab over plausible ages at death.
pub fn rank_age_distribution(records: &[MemorialRecord]) -> Vec<RankAgeRow> {
    let mut counts: BTreeMap<(&'static str, i64, i64), i64> = BTreeMap::new();
    for record in records {
        let (Some(age), Some(death_year)) = (record.age_at_death(), record.death_year()) else {
            continue;
        };
        if !(AGE_MIN..=AGE_MAX).contains(&age) {
            continue;
        }
        let key = (record.rank_group().label(), age as i64, death_year as i64);
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|((rank_group, age, death_year), count)| RankAgeRow {
            rank_group: rank_group.to_string(),
            age,
            death_year,
            count,
        })
        .collect()
}

/// Narrative-type shares per publication year, percent.
pub fn narrative_types_yearly(records: &[MemorialRecord]) -> Vec<NarrativeTypesYearlyRow> {
    let mut counts: BTreeMap<i32, [i64; 4]> = BTreeMap::new();
    for record in records {
        let Some(year) = record.publication_year() else {
            continue;
        };
        let kind = NarrativeKind::classify_record(record);
        let slot = NarrativeKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or(0);
        counts.entry(year).or_insert([0; 4])[slot] += 1;
    }
    counts
        .into_iter()
        .map(|(year, kinds)| {
            let total: i64 = kinds.iter().sum();
            NarrativeTypesYearlyRow {
                year: year as i64,
                share_roster: percent(kinds[0], total),
                share_memoir: percent(kinds[1], total),
                share_family: percent(kinds[2], total),
                share_mixed: percent(kinds[3], total),
            }
        })
        .collect()
}

#[derive(Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Mean lexicon sentiment per year, with per-narrative-type breakdowns.
pub fn sentiment_yearly(records: &[MemorialRecord]) -> Vec<SentimentYearlyRow> {
    let scored: Vec<(i32, NarrativeKind, f64)> = records
        .par_iter()
        .filter_map(|record| {
            let year = record.publication_year()?;
            let story = record.story_text()?;
            Some((
                year,
                NarrativeKind::classify_record(record),
                text::sentiment_score(story),
            ))
        })
        .collect();

    let mut years: BTreeMap<i32, (MeanAccumulator, [MeanAccumulator; 4])> = BTreeMap::new();
    for (year, kind, score) in scored {
        let (overall, by_kind) = years.entry(year).or_default();
        overall.push(score);
        let slot = NarrativeKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or(0);
        by_kind[slot].push(score);
    }

    years
        .into_iter()
        .map(|(year, (overall, by_kind))| SentimentYearlyRow {
            year: year as i64,
            mean_score: overall.mean().unwrap_or(0.0),
            roster: by_kind[0].mean(),
            memoir: by_kind[1].mean(),
            family: by_kind[2].mean(),
            mixed: by_kind[3].mean(),
        })
        .collect()
}

/// Mean MATTR per year over long narratives, capped at `MATTR_TEXT_CAP`
/// texts chosen by stable hash of the card id (deterministic across runs).
pub fn mattr_yearly(records: &[MemorialRecord], seed: u64) -> Vec<MattrYearlyRow> {
    let mut eligible: Vec<&MemorialRecord> = records
        .iter()
        .filter(|record| {
            record.publication_year().is_some()
                && record
                    .story_text()
                    .is_some_and(|story| story.chars().count() > MIN_NARRATIVE_CHARS)
        })
        .collect();
    eligible.sort_by_key(|record| (stable_hash_str(seed, &record.id), record.id.clone()));
    eligible.truncate(MATTR_TEXT_CAP);

    let scored: Vec<(i32, NarrativeKind, f64)> = eligible
        .par_iter()
        .map(|record| {
            let story = record.story_text().unwrap_or("");
            (
                record.publication_year().unwrap_or(0),
                NarrativeKind::classify_record(record),
                text::mattr(story),
            )
        })
        .collect();

    let mut years: BTreeMap<i32, (MeanAccumulator, [MeanAccumulator; 4])> = BTreeMap::new();
    for (year, kind, value) in scored {
        let (overall, by_kind) = years.entry(year).or_default();
        overall.push(value);
        let slot = NarrativeKind::ALL
            .iter()
            .position(|candidate| *candidate == kind)
            .unwrap_or(0);
        by_kind[slot].push(value);
    }

    years
        .into_iter()
        .map(|(year, (overall, by_kind))| MattrYearlyRow {
            year: year as i64,
            mattr: overall.mean().unwrap_or(0.0),
            roster: by_kind[0].mean(),
            memoir: by_kind[1].mean(),
            family: by_kind[2].mean(),
            mixed: by_kind[3].mean(),
        })
        .collect()
}

/// The fixed topic keyword table.
pub fn topic_keyword_rows() -> Vec<TopicKeywordRow> {
    let mut rows = Vec::new();
    for topic in &TOPICS {
        for (word, weight) in topic.words {
            rows.push(TopicKeywordRow {
                topic_id: topic.id as i64,
                topic_label: topic.label.to_string(),
                word: (*word).to_string(),
                weight: *weight,
            });
        }
    }
    rows
}

/// Per-topic share of topic-assigned narratives, per publication year.
pub fn topic_evolution(records: &[MemorialRecord]) -> Vec<TopicEvolutionRow> {
    let assigned: Vec<(i32, usize)> = records
        .par_iter()
        .filter_map(|record| {
            let year = record.publication_year()?;
            let topic = assign_topic(record.story_text()?)?;
            Some((year, topic))
        })
        .collect();

    let mut years: BTreeMap<i32, [i64; TOPIC_COUNT]> = BTreeMap::new();
    for (year, topic) in assigned {
        years.entry(year).or_insert([0; TOPIC_COUNT])[topic] += 1;
    }

    years
        .into_iter()
        .map(|(year, counts)| {
            let total: i64 = counts.iter().sum();
            let mut shares = [0.0; TOPIC_COUNT];
            for (slot, count) in counts.iter().enumerate() {
                shares[slot] = *count as f64 / total as f64;
            }
            TopicEvolutionRow {
                year: year as i64,
                shares,
            }
        })
        .collect()
}

/// Birth-region → submit-region pairs above the reporting threshold.
pub fn migration_matrix(records: &[MemorialRecord]) -> Vec<MigrationRow> {
    migration_pairs(records)
        .into_iter()
        .filter(|(_, count)| *count > MIGRATION_MIN_COUNT)
        .map(|((birth_region, submit_region), count)| MigrationRow {
            birth_region,
            submit_region,
            count,
        })
        .collect()
}

/// Top off-diagonal flows for the network view.
pub fn network_edges(records: &[MemorialRecord]) -> Vec<NetworkEdgeRow> {
    let mut edges: Vec<((String, String), i64)> = migration_pairs(records)
        .into_iter()
        .filter(|((birth, submit), _)| birth != submit)
        .collect();
    edges.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    edges.truncate(NETWORK_EDGE_LIMIT);
    edges
        .into_iter()
        .map(|((source, target), count)| NetworkEdgeRow {
            source,
            target,
            count,
        })
        .collect()
}

fn migration_pairs(records: &[MemorialRecord]) -> BTreeMap<(String, String), i64> {
    let mut pairs: BTreeMap<(String, String), i64> = BTreeMap::new();
    for record in records {
        let (Some(birth), Some(submit)) = (record.birth_region(), record.submit_region()) else {
            continue;
        };
        *pairs.entry((birth, submit)).or_insert(0) += 1;
    }
    pairs
}

/// Composite digital-memory index from the per-region coverage table.
pub fn dmi_by_region(region_rows: &[RegionStatsRow]) -> Vec<DmiRegionRow> {
    let story_norm = stats::min_max_normalize(
        &region_rows.iter().map(|row| row.story_pct).collect::<Vec<_>>(),
    );
    let photo_norm = stats::min_max_normalize(
        &region_rows.iter().map(|row| row.photo_pct).collect::<Vec<_>>(),
    );
    let awards_norm = stats::min_max_normalize(
        &region_rows.iter().map(|row| row.awards_pct).collect::<Vec<_>>(),
    );

    region_rows
        .iter()
        .enumerate()
        .map(|(idx, row)| DmiRegionRow {
            region: row.region.clone(),
            count: row.count,
            story_pct: row.story_pct,
            photo_pct: row.photo_pct,
            awards_pct: row.awards_pct,
            dmi: DMI_STORY_WEIGHT * story_norm[idx]
                + DMI_PHOTO_WEIGHT * photo_norm[idx]
                + DMI_AWARDS_WEIGHT * awards_norm[idx],
        })
        .collect()
}

/// Gazetteer entity mentions counted over narratives, top-N per type.
pub fn ner_top_entities(records: &[MemorialRecord]) -> Vec<NerEntityRow> {
    let lowered_locations: Vec<String> = GAZETTEER_LOCATIONS
        .iter()
        .map(|entity| entity.to_lowercase())
        .collect();
    let lowered_orgs: Vec<String> = GAZETTEER_ORGS
        .iter()
        .map(|entity| entity.to_lowercase())
        .collect();

    let (loc_counts, org_counts) = records
        .par_iter()
        .filter_map(MemorialRecord::story_text)
        .map(|story| {
            let lowered = story.to_lowercase();
            let locs: Vec<usize> = lowered_locations
                .iter()
                .enumerate()
                .filter(|(_, entity)| lowered.contains(entity.as_str()))
                .map(|(idx, _)| idx)
                .collect();
            let orgs: Vec<usize> = lowered_orgs
                .iter()
                .enumerate()
                .filter(|(_, entity)| lowered.contains(entity.as_str()))
                .map(|(idx, _)| idx)
                .collect();
            (locs, orgs)
        })
        .fold(
            || (vec![0i64; GAZETTEER_LOCATIONS.len()], vec![0i64; GAZETTEER_ORGS.len()]),
            |(mut locs, mut orgs), (loc_hits, org_hits)| {
                for idx in loc_hits {
                    locs[idx] += 1;
                }
                for idx in org_hits {
                    orgs[idx] += 1;
                }
                (locs, orgs)
            },
        )
        .reduce(
            || (vec![0i64; GAZETTEER_LOCATIONS.len()], vec![0i64; GAZETTEER_ORGS.len()]),
            |(mut left_locs, mut left_orgs), (right_locs, right_orgs)| {
                for (left, right) in left_locs.iter_mut().zip(right_locs) {
                    *left += right;
                }
                for (left, right) in left_orgs.iter_mut().zip(right_orgs) {
                    *left += right;
                }
                (left_locs, left_orgs)
            },
        );

    let mut rows = Vec::new();
    rows.extend(top_entities(ENTITY_LOC, &GAZETTEER_LOCATIONS, &loc_counts));
    rows.extend(top_entities(ENTITY_ORG, &GAZETTEER_ORGS, &org_counts));
    rows
}

fn top_entities(entity_type: &str, names: &[&str], counts: &[i64]) -> Vec<NerEntityRow> {
    let mut entities: Vec<(&str, i64)> = names
        .iter()
        .zip(counts)
        .filter(|(_, count)| **count > 0)
        .map(|(name, count)| (*name, *count))
        .collect();
    entities.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entities.truncate(NER_TOP_PER_TYPE);
    entities
        .into_iter()
        .map(|(entity, count)| NerEntityRow {
            entity_type: entity_type.to_string(),
            entity: entity.to_string(),
            count,
        })
        .collect()
}

/// Fitted activity half-life per publication year.
///
/// Years where the post-peak series cannot support a fit (too few points or a
/// non-decaying slope) are omitted rather than given a fabricated value.
pub fn halflife_yearly(records: &[MemorialRecord]) -> Vec<HalflifeYearlyRow> {
    let mut daily: BTreeMap<i32, BTreeMap<u32, i64>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.publication_date() {
            *daily
                .entry(date.year())
                .or_default()
                .entry(date.ordinal())
                .or_insert(0) += 1;
        }
    }

    let mut rows = Vec::new();
    for (year, days) in daily {
        let Some((&peak_day, _)) = days.iter().max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        else {
            continue;
        };
        let points: Vec<(f64, f64)> = days
            .iter()
            .filter(|(day, _)| **day > peak_day)
            .map(|(day, count)| (f64::from(day - peak_day), *count as f64))
            .collect();
        if let Some(half_life) = stats::log_linear_half_life(&points) {
            rows.push(HalflifeYearlyRow {
                year: year as i64,
                halflife_days: half_life,
            });
        }
    }
    rows
}

/// Headline metrics assembled from the other aggregates.
pub fn headline_metrics(
    records: &[MemorialRecord],
    monthly: &[MonthlyCountRow],
    region_rows: &[RegionStatsRow],
    halflife_rows: &[HalflifeYearlyRow],
    sample_rows: usize,
    rows_skipped: usize,
) -> HeadlineRow {
    let total = records.len() as i64;
    let with_story = records.iter().filter(|record| record.has_story()).count() as i64;

    let monthly_total: i64 = monthly.iter().map(|row| row.count).sum();
    let peak_month_suffix = format!("-{PEAK_MONTH:02}");
    let may_total: i64 = monthly
        .iter()
        .filter(|row| row.month.ends_with(&peak_month_suffix))
        .map(|row| row.count)
        .sum();

    let halflives: Vec<f64> = halflife_rows.iter().map(|row| row.halflife_days).collect();
    let region_counts: Vec<f64> = region_rows.iter().map(|row| row.count as f64).collect();
    let story_pcts: Vec<f64> = region_rows.iter().map(|row| row.story_pct).collect();
    let awards_pcts: Vec<f64> = region_rows.iter().map(|row| row.awards_pct).collect();

    HeadlineRow {
        total_cards: total,
        story_pct: percent(with_story, total),
        may_share_pct: percent(may_total, monthly_total),
        halflife_days: stats::median(&halflives),
        dmi_gini: stats::gini(&region_counts),
        story_awards_r: stats::pearson(&story_pcts, &awards_pcts),
        sample_rows: sample_rows as i64,
        rows_skipped: rows_skipped as i64,
    }
}

fn percent(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> MemorialRecord {
        MemorialRecord {
            id: id.to_string(),
            ..MemorialRecord::default()
        }
    }

    #[test]
    fn monthly_counts_bucket_by_month_and_skip_missing_dates() {
        let mut records = Vec::new();
        for (idx, date) in ["2015-05-01", "2015-05-09", "2015-06-01"].iter().enumerate() {
            let mut r = record(&idx.to_string());
            r.pub_date = Some((*date).to_string());
            records.push(r);
        }
        records.push(record("no-date"));

        let rows = monthly_counts(&records);
        assert_eq!(
            rows,
            vec![
                MonthlyCountRow {
                    month: "2015-05".into(),
                    count: 2
                },
                MonthlyCountRow {
                    month: "2015-06".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn region_counts_cover_exactly_the_rows_with_regions() {
        let mut records = Vec::new();
        for idx in 0..6 {
            let mut r = record(&idx.to_string());
            r.region = Some(if idx < 4 { "A" } else { "B" }.to_string());
            if idx % 2 == 0 {
                r.story = Some("Достаточно длинный текст".into());
            }
            records.push(r);
        }
        records.push(record("no-region"));

        let rows = region_stats(&records);
        let total: i64 = rows.iter().map(|row| row.count).sum();
        assert_eq!(total, 6);
        assert_eq!(rows[0].region, "A");
        assert_eq!(rows[0].count, 4);
        assert!((rows[0].story_pct - 50.0).abs() < 1e-9);
        assert_eq!(rows[1].region, "B");
        assert_eq!(rows[1].count, 2);
    }

    #[test]
    fn rank_age_distribution_rejects_implausible_ages() {
        let mut valid = record("1");
        valid.rank = Some("рядовой".into());
        valid.birthday = Some("1920".into());
        valid.death = Some("1943".into());

        let mut too_old = record("2");
        too_old.birthday = Some("1820".into());
        too_old.death = Some("1943".into());

        let mut missing_death = record("3");
        missing_death.birthday = Some("1920".into());

        let rows = rank_age_distribution(&[valid, too_old, missing_death]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].rank_group, "Рядовые");
        assert_eq!(rows[0].age, 23);
        assert_eq!(rows[0].death_year, 1943);
        assert_eq!(rows[0].count, 1);
    }

    #[test]
    fn narrative_shares_sum_to_one_hundred() {
        let mut records = Vec::new();
        for idx in 0..4 {
            let mut r = record(&idx.to_string());
            r.pub_date = Some("2020-05-09".into());
            if idx == 0 {
                r.story = Some("Я помню своего деда. ".repeat(40));
            }
            records.push(r);
        }
        let rows = narrative_types_yearly(&records);
        assert_eq!(rows.len(), 1);
        let sum = rows[0].share_roster
            + rows[0].share_memoir
            + rows[0].share_family
            + rows[0].share_mixed;
        assert!((sum - 100.0).abs() < 1e-9);
        assert!((rows[0].share_family - 25.0).abs() < 1e-9);
    }

    #[test]
    fn topic_evolution_shares_are_over_assigned_narratives_only() {
        let mut awards = record("1");
        awards.pub_date = Some("2019-06-01".into());
        awards.story = Some("Орден и медаль за отвагу".into());
        let mut battle = record("2");
        battle.pub_date = Some("2019-06-02".into());
        battle.story = Some("Фронт, бой, наступление".into());
        let mut unmatched = record("3");
        unmatched.pub_date = Some("2019-06-03".into());
        unmatched.story = Some("Просто воспоминание без ключевых слов".into());

        let rows = topic_evolution(&[awards, battle, unmatched]);
        assert_eq!(rows.len(), 1);
        let shares = rows[0].shares;
        assert!((shares[0] - 0.5).abs() < 1e-9);
        assert!((shares[1] - 0.5).abs() < 1e-9);
        assert!((shares.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn migration_threshold_and_network_diagonal_exclusion() {
        let mut records = Vec::new();
        for idx in 0..15 {
            let mut r = record(&format!("move-{idx}"));
            r.birthplace = Some("Смоленская область".into());
            r.added_region = Some("Москва".into());
            records.push(r);
        }
        for idx in 0..12 {
            let mut r = record(&format!("stay-{idx}"));
            r.birthplace = Some("Москва".into());
            r.added_region = Some("Москва".into());
            records.push(r);
        }
        let mut rare = record("rare");
        rare.birthplace = Some("Тула".into());
        rare.added_region = Some("Москва".into());
        records.push(rare);

        let matrix = migration_matrix(&records);
        assert_eq!(matrix.len(), 2);
        assert!(matrix.iter().any(|row| row.birth_region == "Москва" && row.count == 12));

        let edges = network_edges(&records);
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].source, "Смоленская область");
        assert_eq!(edges[0].count, 15);
        assert_eq!(edges[1].count, 1);
    }

    #[test]
    fn dmi_combines_normalized_components() {
        let regions = vec![
            RegionStatsRow {
                region: "A".into(),
                count: 100,
                story_pct: 80.0,
                photo_pct: 60.0,
                awards_pct: 40.0,
            },
            RegionStatsRow {
                region: "B".into(),
                count: 50,
                story_pct: 20.0,
                photo_pct: 10.0,
                awards_pct: 10.0,
            },
        ];
        let rows = dmi_by_region(&regions);
        assert!((rows[0].dmi - 1.0).abs() < 1e-9);
        assert!(rows[1].dmi.abs() < 1e-9);
    }

    #[test]
    fn ner_counts_narratives_mentioning_entities() {
        let mut one = record("1");
        one.story = Some("Воевал под Сталинградом... нет, в Сталинград попал позже".into());
        let mut two = record("2");
        two.story = Some("Служил в РККА, защищал Сталинград".into());
        let rows = ner_top_entities(&[one, two]);

        let stalingrad = rows
            .iter()
            .find(|row| row.entity == "Сталинград")
            .expect("location counted");
        assert_eq!(stalingrad.entity_type, "LOC");
        assert_eq!(stalingrad.count, 2);

        let rkka = rows.iter().find(|row| row.entity == "РККА").expect("org counted");
        assert_eq!(rkka.entity_type, "ORG");
        assert_eq!(rkka.count, 1);
    }

    #[test]
    fn halflife_fits_decay_and_skips_flat_years() {
        let mut records = Vec::new();
        // 2020: peak on May 9 then clean 2^(-day/4) decay.
        let decay = [(9, 64), (10, 54), (11, 45), (12, 38), (13, 32), (17, 16)];
        for (day, count) in decay {
            for idx in 0..count {
                let mut r = record(&format!("2020-{day}-{idx}"));
                r.pub_date = Some(format!("2020-05-{day:02}"));
                records.push(r);
            }
        }
        // 2021: everything on one day, so there is no post-peak series.
        for idx in 0..10 {
            let mut r = record(&format!("2021-{idx}"));
            r.pub_date = Some("2021-05-09".into());
            records.push(r);
        }

        let rows = halflife_yearly(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2020);
        assert!((rows[0].halflife_days - 4.0).abs() < 0.2, "got {}", rows[0].halflife_days);
    }

    #[test]
    fn headline_metrics_report_undefined_values_as_null() {
        let mut records = Vec::new();
        for idx in 0..10 {
            let mut r = record(&idx.to_string());
            r.pub_date = Some("2021-05-09".into());
            if idx < 5 {
                r.story = Some("Текст воспоминания".into());
            }
            records.push(r);
        }
        let monthly = monthly_counts(&records);
        let regions = region_stats(&records);
        let halflives = halflife_yearly(&records);
        let headline = headline_metrics(&records, &monthly, &regions, &halflives, 10, 0);

        assert_eq!(headline.total_cards, 10);
        assert!((headline.story_pct - 50.0).abs() < 1e-9);
        assert!((headline.may_share_pct - 100.0).abs() < 1e-9);
        assert_eq!(headline.halflife_days, None);
        assert_eq!(headline.story_awards_r, None);
    }
}
