//! Keyword-lexicon topic assignment.
//!
//! No trained model ships with the dataset, so topics are fixed keyword
//! lexicons and assignment is a token-overlap vote. The procedure is fully
//! deterministic: ties resolve to the lowest topic id, and narratives with no
//! keyword hits stay unassigned (excluded from evolution denominators).

use std::collections::HashSet;

use crate::constants::analysis::TOPIC_COUNT;
use crate::lexicon::{TOPICS, Topic};
use crate::text::tokens;

/// Assign a narrative to the topic with the most keyword-token hits.
pub fn assign_topic(story: &str) -> Option<usize> {
    let words: HashSet<String> = tokens(story).into_iter().collect();
    let mut best: Option<(usize, usize)> = None;
    for topic in &TOPICS {
        let hits = topic
            .words
            .iter()
            .filter(|(word, _)| words.contains(*word))
            .count();
        if hits == 0 {
            continue;
        }
        let better = match best {
            Some((_, best_hits)) => hits > best_hits,
            None => true,
        };
        if better {
            best = Some((topic.id, hits));
        }
    }
    best.map(|(id, _)| id)
}

/// Topic definition by id.
pub fn topic(id: usize) -> &'static Topic {
    &TOPICS[id]
}

/// Column-name slugs for the topic-evolution table, in topic-id order.
pub fn topic_slugs() -> [&'static str; TOPIC_COUNT] {
    let mut slugs = [""; TOPIC_COUNT];
    for topic in &TOPICS {
        slugs[topic.id] = topic.slug;
    }
    slugs
}
