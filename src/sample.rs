//! Deterministic stratified sampling.
//!
//! Strata are (region, narrative presence). Target rows are apportioned to
//! strata proportionally with largest-remainder rounding, so per-region
//! proportions in the sample track the source within a fraction of a percent.
//! Within a stratum, rows are ordered by a stable seeded hash of the card id
//! and the prefix is taken: no RNG stream, same input + seed → same sample.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::labels::REGION_MISSING;
use crate::hash::stable_hash_str;
use crate::record::MemorialRecord;
use crate::tables::SampleRow;

/// Draw a stratified sample of up to `target` records.
///
/// When the source holds fewer than `target` records, everything is taken.
/// The returned rows are sorted by card id for stable output bytes.
pub fn stratified_sample(
    records: &[MemorialRecord],
    target: usize,
    seed: u64,
) -> Vec<SampleRow> {
    if records.is_empty() || target == 0 {
        return Vec::new();
    }
    if records.len() <= target {
        let mut rows: Vec<SampleRow> = records.iter().map(sample_row).collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        return rows;
    }

    let mut strata: BTreeMap<(String, bool), Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        let region = record
            .region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
            .unwrap_or(REGION_MISSING)
            .to_string();
        strata
            .entry((region, record.has_story()))
            .or_default()
            .push(idx);
    }

    let quotas = apportion(
        &strata.values().map(Vec::len).collect::<Vec<_>>(),
        records.len(),
        target,
    );

    let mut picked: Vec<usize> = Vec::with_capacity(target);
    for ((_, members), quota) in strata.iter().zip(&quotas) {
        let mut ordered: Vec<usize> = members.clone();
        ordered.sort_by_key(|&idx| (stable_hash_str(seed, &records[idx].id), idx));
        picked.extend(ordered.into_iter().take(*quota));
    }

    debug!(
        strata = strata.len(),
        picked = picked.len(),
        target,
        "stratified sample drawn"
    );

    let mut rows: Vec<SampleRow> = picked.into_iter().map(|idx| sample_row(&records[idx])).collect();
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows
}

/// Largest-remainder apportionment of `target` over stratum sizes.
///
/// Every quota is capped at its stratum size; seats freed by capping are
/// redistributed to strata with remaining capacity, so the total equals
/// `target` whenever `target <= Σ sizes`.
fn apportion(sizes: &[usize], total: usize, target: usize) -> Vec<usize> {
    let mut quotas: Vec<usize> = Vec::with_capacity(sizes.len());
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(sizes.len());
    for (idx, &size) in sizes.iter().enumerate() {
        let exact = target as f64 * size as f64 / total as f64;
        let floor = (exact.floor() as usize).min(size);
        quotas.push(floor);
        remainders.push((idx, exact - exact.floor()));
    }

    // Hand out remaining seats by largest fractional remainder, then by
    // stratum order for stability.
    remainders.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let mut assigned: usize = quotas.iter().sum();
    let mut cursor = 0usize;
    while assigned < target {
        let mut progressed = false;
        for &(idx, _) in remainders.iter().skip(cursor) {
            if assigned == target {
                break;
            }
            if quotas[idx] < sizes[idx] {
                quotas[idx] += 1;
                assigned += 1;
                progressed = true;
            }
            cursor += 1;
        }
        if cursor >= remainders.len() {
            if !progressed && assigned < target {
                // No capacity left anywhere.
                break;
            }
            cursor = 0;
        }
    }
    quotas
}

fn sample_row(record: &MemorialRecord) -> SampleRow {
    SampleRow {
        id: record.id.clone(),
        url: record.url.clone(),
        fio: record.fio.clone(),
        story: record.story.clone(),
        region: record.region.clone(),
        rank: record.rank.clone(),
        birthday: record.birthday.clone(),
        death: record.death.clone(),
        awards_txt: record.awards_txt.clone(),
        awards_cnt: record.awards_cnt,
        photos_cnt: record.photos_cnt,
        pub_date: record.pub_date.clone(),
    }
}
