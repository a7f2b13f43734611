//! Ranked keyword search over the sample or the full-text export.
//!
//! Matching is case-insensitive substring containment per query token,
//! constrained to the narrative and categorical fields. Ranking is a simple
//! weighted hit count: name matches weigh most, narrative occurrences next,
//! categorical fields least; ties break on card id so result order is stable.

use indexmap::IndexMap;
use rayon::prelude::*;

use crate::constants::search::{
    DEFAULT_LIMIT, FIELD_WEIGHT, NAME_WEIGHT, SNIPPET_CONTEXT_CHARS, STORY_WEIGHT,
};
use crate::tables::{FtsRow, SampleRow};
use crate::types::RecordId;

/// A search request.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    /// Free-text query; whitespace-separated tokens are AND-ed softly
    /// (any hit qualifies, more hits rank higher).
    pub text: String,
    /// Optional region filter (case-insensitive substring).
    pub region: Option<String>,
    /// Optional rank filter (case-insensitive substring).
    pub rank: Option<String>,
    /// Max hits returned.
    pub limit: usize,
}

impl SearchQuery {
    /// Query over `text` with default limit and no filters.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            region: None,
            rank: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One ranked search hit.
#[derive(Clone, Debug)]
pub struct SearchHit {
    /// Card identifier.
    pub id: RecordId,
    /// Full name.
    pub fio: Option<String>,
    /// Filing region.
    pub region: Option<String>,
    /// Rank as written.
    pub rank: Option<String>,
    /// Public card URL.
    pub url: Option<String>,
    /// Narrative text of the hit.
    pub story: Option<String>,
    /// Weighted match score.
    pub score: u32,
    /// Narrative excerpt around the first match, when the narrative matched.
    pub snippet: Option<String>,
}

/// Label of the corpus a search ran against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CorpusKind {
    /// The stratified sample.
    Sample,
    /// The chunked full-text export.
    Full,
}

struct SearchDoc {
    id: RecordId,
    fio: Option<String>,
    region: Option<String>,
    rank: Option<String>,
    url: Option<String>,
    awards_txt: Option<String>,
    story: Option<String>,
    story_lower: Option<String>,
}

/// An in-memory search corpus with lowered text prepared once.
pub struct SearchCorpus {
    kind: CorpusKind,
    docs: Vec<SearchDoc>,
}

impl SearchCorpus {
    /// Build a corpus from the stratified sample.
    pub fn from_sample(rows: Vec<SampleRow>) -> Self {
        let docs = rows
            .into_iter()
            .map(|row| SearchDoc {
                story_lower: row.story.as_deref().map(str::to_lowercase),
                id: row.id,
                fio: row.fio,
                region: row.region,
                rank: row.rank,
                url: row.url,
                awards_txt: row.awards_txt,
                story: row.story,
            })
            .collect();
        Self {
            kind: CorpusKind::Sample,
            docs,
        }
    }

    /// Build a corpus from the full-text export.
    pub fn from_fts(rows: Vec<FtsRow>) -> Self {
        let docs = rows
            .into_iter()
            .map(|row| SearchDoc {
                story_lower: row.story.as_deref().map(str::to_lowercase),
                id: row.id,
                fio: row.fio,
                region: row.region,
                rank: row.rank,
                url: row.url,
                awards_txt: row.awards_txt,
                story: row.story,
            })
            .collect();
        Self {
            kind: CorpusKind::Full,
            docs,
        }
    }

    /// Which corpus this is.
    pub fn kind(&self) -> CorpusKind {
        self.kind
    }

    /// Number of searchable cards.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// `true` when the corpus holds no cards.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Run a query, returning the top `query.limit` hits by score.
    pub fn search(&self, query: &SearchQuery) -> Vec<SearchHit> {
        let tokens: Vec<String> = query
            .text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }
        let region_filter = query.region.as_deref().map(str::to_lowercase);
        let rank_filter = query.rank.as_deref().map(str::to_lowercase);

        let mut hits: Vec<SearchHit> = self
            .docs
            .par_iter()
            .filter_map(|doc| {
                if !passes_filter(doc.region.as_deref(), region_filter.as_deref())
                    || !passes_filter(doc.rank.as_deref(), rank_filter.as_deref())
                {
                    return None;
                }
                score_doc(doc, &tokens)
            })
            .collect();

        hits.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        hits.truncate(query.limit);
        hits
    }

    /// Region counts over all hits of a query, in first-seen hit order.
    ///
    /// Runs the query unbounded to summarize the full match set, not just the
    /// returned page.
    pub fn region_facets(&self, query: &SearchQuery) -> IndexMap<String, usize> {
        let unbounded = SearchQuery {
            limit: usize::MAX,
            ..query.clone()
        };
        let mut facets: IndexMap<String, usize> = IndexMap::new();
        for hit in self.search(&unbounded) {
            let region = hit.region.unwrap_or_else(|| "—".to_string());
            *facets.entry(region).or_insert(0) += 1;
        }
        facets
    }
}

fn passes_filter(value: Option<&str>, filter: Option<&str>) -> bool {
    match filter {
        None => true,
        Some(filter) => value
            .map(str::to_lowercase)
            .is_some_and(|value| value.contains(filter)),
    }
}

fn score_doc(doc: &SearchDoc, tokens: &[String]) -> Option<SearchHit> {
    let mut score = 0u32;
    let mut first_story_match: Option<usize> = None;

    for token in tokens {
        if let Some(story) = doc.story_lower.as_deref() {
            let occurrences = count_occurrences(story, token);
            if occurrences > 0 {
                score += STORY_WEIGHT * occurrences as u32;
                let position = story.find(token.as_str()).unwrap_or(0);
                first_story_match = Some(match first_story_match {
                    Some(existing) => existing.min(position),
                    None => position,
                });
            }
        }
        if contains_ci(doc.fio.as_deref(), token) {
            score += NAME_WEIGHT;
        }
        if contains_ci(doc.region.as_deref(), token) {
            score += FIELD_WEIGHT;
        }
        if contains_ci(doc.rank.as_deref(), token) {
            score += FIELD_WEIGHT;
        }
        if contains_ci(doc.awards_txt.as_deref(), token) {
            score += FIELD_WEIGHT;
        }
    }

    if score == 0 {
        return None;
    }

    let snippet = match (doc.story.as_deref(), first_story_match) {
        (Some(story), Some(byte_pos)) => Some(snippet_around(story, byte_pos)),
        _ => None,
    };

    Some(SearchHit {
        id: doc.id.clone(),
        fio: doc.fio.clone(),
        region: doc.region.clone(),
        rank: doc.rank.clone(),
        url: doc.url.clone(),
        story: doc.story.clone(),
        score,
        snippet,
    })
}

fn contains_ci(value: Option<&str>, token: &str) -> bool {
    value.is_some_and(|value| value.to_lowercase().contains(token))
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let mut count = 0;
    let mut offset = 0;
    while let Some(position) = haystack[offset..].find(needle) {
        count += 1;
        offset += position + needle.len();
    }
    count
}

/// Cut a char-safe window around a byte position found in the lowered text.
///
/// Lowercasing is length-preserving for the character ranges in this corpus
/// (Cyrillic, Latin, digits), so the byte position transfers onto the
/// original text; the window is clamped to its char boundaries regardless.
fn snippet_around(story: &str, byte_pos: usize) -> String {
    let char_positions: Vec<usize> = story.char_indices().map(|(idx, _)| idx).collect();
    let match_char = char_positions.partition_point(|&idx| idx <= byte_pos.min(story.len())) - 1;

    let start_char = match_char.saturating_sub(SNIPPET_CONTEXT_CHARS);
    let end_char = (match_char + SNIPPET_CONTEXT_CHARS).min(char_positions.len());

    let start_byte = char_positions[start_char];
    let end_byte = if end_char == char_positions.len() {
        story.len()
    } else {
        char_positions[end_char]
    };

    let mut snippet = String::new();
    if start_char > 0 {
        snippet.push('…');
    }
    snippet.push_str(story[start_byte..end_byte].trim());
    if end_byte < story.len() {
        snippet.push('…');
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row(id: &str, fio: &str, region: &str, story: &str) -> SampleRow {
        SampleRow {
            id: id.to_string(),
            url: None,
            fio: Some(fio.to_string()),
            story: Some(story.to_string()),
            region: Some(region.to_string()),
            rank: Some("рядовой".to_string()),
            birthday: None,
            death: None,
            awards_txt: None,
            awards_cnt: None,
            photos_cnt: None,
            pub_date: None,
        }
    }

    fn corpus() -> SearchCorpus {
        SearchCorpus::from_sample(vec![
            sample_row(
                "1",
                "Иванов Иван",
                "Москва",
                "Оборонял Сталинград зимой сорок второго года.",
            ),
            sample_row(
                "2",
                "Петров Пётр",
                "Тула",
                "Служил сапёром, строил переправы через Днепр.",
            ),
            sample_row(
                "3",
                "Сидоров Андрей",
                "Москва",
                "Вернулся домой в сорок пятом. Сорок лет работал на заводе.",
            ),
        ])
    }

    #[test]
    fn unique_token_returns_exactly_one_hit() {
        let hits = corpus().search(&SearchQuery::new("Сталинград"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "1");
        assert!(hits[0].snippet.as_deref().unwrap().contains("Сталинград"));
    }

    #[test]
    fn repeated_occurrences_rank_higher() {
        let hits = corpus().search(&SearchQuery::new("сорок"));
        assert_eq!(hits.len(), 2);
        // Card 3 mentions the token twice.
        assert_eq!(hits[0].id, "3");
        assert_eq!(hits[1].id, "1");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn name_matches_outweigh_single_story_matches() {
        let hits = corpus().search(&SearchQuery::new("Иванов"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, NAME_WEIGHT);
        assert!(hits[0].snippet.is_none());
    }

    #[test]
    fn region_filter_constrains_hits() {
        let mut query = SearchQuery::new("сорок");
        query.region = Some("Тула".into());
        assert!(corpus().search(&query).is_empty());

        query.region = Some("москва".into());
        let hits = corpus().search(&query);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(corpus().search(&SearchQuery::new("   ")).is_empty());
    }

    #[test]
    fn limit_truncates_after_ranking() {
        let mut query = SearchQuery::new("сорок");
        query.limit = 1;
        let hits = corpus().search(&query);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "3");
    }

    #[test]
    fn facets_count_full_match_set_in_hit_order() {
        let facets = corpus().region_facets(&SearchQuery::new("сорок"));
        assert_eq!(facets.get("Москва"), Some(&2));
        assert_eq!(facets.len(), 1);
    }

    #[test]
    fn snippet_is_char_safe_on_cyrillic_text() {
        let long_story = format!("{} Сталинград {}", "а".repeat(500), "б".repeat(500));
        let rows = vec![sample_row("1", "Иванов", "Москва", &long_story)];
        let corpus = SearchCorpus::from_sample(rows);
        let hits = corpus.search(&SearchQuery::new("сталинград"));
        let snippet = hits[0].snippet.as_deref().unwrap();
        assert!(snippet.starts_with('…'));
        assert!(snippet.ends_with('…'));
        assert!(snippet.contains("Сталинград"));
    }
}
