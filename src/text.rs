//! Deterministic text analytics shared by the builder and the search view.

use std::collections::{HashMap, HashSet};

use crate::constants::analysis::{MATTR_WINDOW, MIN_NARRATIVE_CHARS};
use crate::lexicon;
use crate::record::MemorialRecord;

/// Lowercased whitespace tokens with surrounding punctuation stripped.
pub fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|word| word.trim_matches(|ch: char| !ch.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Moving-average type-token ratio over `MATTR_WINDOW`-token windows.
///
/// Texts shorter than one window fall back to the plain type-token ratio.
pub fn mattr(text: &str) -> f64 {
    let words = tokens(text);
    if words.is_empty() {
        return 0.0;
    }
    if words.len() < MATTR_WINDOW {
        let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
        return unique.len() as f64 / words.len() as f64;
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut distinct = 0usize;
    let mut total = 0.0f64;
    let window_count = words.len() - MATTR_WINDOW + 1;

    for (idx, word) in words.iter().enumerate() {
        let entry = counts.entry(word.as_str()).or_insert(0);
        if *entry == 0 {
            distinct += 1;
        }
        *entry += 1;

        if idx + 1 >= MATTR_WINDOW {
            total += distinct as f64 / MATTR_WINDOW as f64;
            let leaving = words[idx + 1 - MATTR_WINDOW].as_str();
            if let Some(count) = counts.get_mut(leaving) {
                *count -= 1;
                if *count == 0 {
                    counts.remove(leaving);
                    distinct -= 1;
                }
            }
        }
    }

    total / window_count as f64
}

/// Lexicon sentiment: (positive hits − negative hits) / token count, in [-1, 1].
pub fn sentiment_score(text: &str) -> f64 {
    let words = tokens(text);
    if words.is_empty() {
        return 0.0;
    }
    let mut positive = 0i64;
    let mut negative = 0i64;
    for word in &words {
        if lexicon::SENTIMENT_POSITIVE.contains(&word.as_str()) {
            positive += 1;
        } else if lexicon::SENTIMENT_NEGATIVE.contains(&word.as_str()) {
            negative += 1;
        }
    }
    ((positive - negative) as f64 / words.len() as f64).clamp(-1.0, 1.0)
}

/// Narrative class of a card text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NarrativeKind {
    /// Short roster-form entry (bare personal data).
    Roster,
    /// Long combat memoir.
    Memoir,
    /// First-person family recollection.
    FamilyStory,
    /// Mixed narrative.
    Mixed,
}

impl NarrativeKind {
    /// All kinds in stable artifact order.
    pub const ALL: [NarrativeKind; 4] = [
        NarrativeKind::Roster,
        NarrativeKind::Memoir,
        NarrativeKind::FamilyStory,
        NarrativeKind::Mixed,
    ];

    /// Display label used in artifacts and views.
    pub fn label(self) -> &'static str {
        match self {
            NarrativeKind::Roster => "Формуляр",
            NarrativeKind::Memoir => "Мемуар",
            NarrativeKind::FamilyStory => "Семейная история",
            NarrativeKind::Mixed => "Смешанный",
        }
    }

    /// Classify a full record: narrative length plus the battles field.
    pub fn classify_record(record: &MemorialRecord) -> NarrativeKind {
        let story = record.story_text().unwrap_or("");
        let length = story.chars().count();
        if length < MIN_NARRATIVE_CHARS {
            return NarrativeKind::Roster;
        }

        let lowered = story.to_lowercase();
        let first_person = lexicon::FIRST_PERSON_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker));
        let has_battles = record
            .battles
            .as_deref()
            .is_some_and(|battles| battles.trim().chars().count() > 5);

        if first_person && length > 500 {
            NarrativeKind::FamilyStory
        } else if length > 1000 && has_battles {
            NarrativeKind::Memoir
        } else if first_person || length > 300 {
            NarrativeKind::Mixed
        } else {
            NarrativeKind::Roster
        }
    }

    /// Classify from narrative text alone (search view, where the battles
    /// field is not carried): battle vocabulary stands in for it.
    pub fn classify_story(story: &str) -> NarrativeKind {
        let length = story.chars().count();
        if length < MIN_NARRATIVE_CHARS {
            return NarrativeKind::Roster;
        }
        let lowered = story.to_lowercase();
        let first_person = lexicon::FIRST_PERSON_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker));
        if first_person && length > 500 {
            return NarrativeKind::FamilyStory;
        }
        if length > 1000
            && lexicon::BATTLE_MARKERS
                .iter()
                .any(|marker| lowered.contains(marker))
        {
            return NarrativeKind::Memoir;
        }
        NarrativeKind::Mixed
    }
}

/// Per-card text metrics shown alongside search hits.
#[derive(Clone, Debug)]
pub struct CardMetrics {
    /// Narrative length in chars.
    pub chars: usize,
    /// Token count.
    pub words: usize,
    /// Distinct lowercase token count.
    pub unique_words: usize,
    /// Moving-average type-token ratio.
    pub mattr: f64,
    /// Narrative class derived from the text alone.
    pub kind: NarrativeKind,
}

/// Compute display metrics for one narrative.
pub fn card_metrics(story: &str) -> CardMetrics {
    let words = tokens(story);
    let unique: HashSet<&str> = words.iter().map(String::as_str).collect();
    CardMetrics {
        chars: story.chars().count(),
        words: words.len(),
        unique_words: unique.len(),
        mattr: mattr(story),
        kind: NarrativeKind::classify_story(story),
    }
}
