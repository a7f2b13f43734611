use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::lexicon;
use crate::types::{RecordId, Year};

/// Raw memorial-card row as read from the source CSV.
///
/// Every field other than `id` may be absent. Missing-value semantics apply
/// throughout the builder: a record with a missing field is excluded from the
/// denominator of any aggregate that uses that field, never coerced to zero.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemorialRecord {
    /// Stable card identifier (unique across the source).
    pub id: RecordId,
    /// Public card URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Full name.
    #[serde(default)]
    pub fio: Option<String>,
    /// Card title.
    #[serde(default)]
    pub title: Option<String>,
    /// Free-text biographical narrative.
    #[serde(default)]
    pub story: Option<String>,
    /// Region the card is filed under.
    #[serde(default)]
    pub region: Option<String>,
    /// Locality within the region.
    #[serde(default)]
    pub locality: Option<String>,
    /// Birthplace as written on the card.
    #[serde(default)]
    pub birthplace: Option<String>,
    /// Military rank as written on the card.
    #[serde(default)]
    pub rank: Option<String>,
    /// Military specialty.
    #[serde(default)]
    pub speciality: Option<String>,
    /// Service years as written on the card.
    #[serde(default)]
    pub service_years: Option<String>,
    /// Birth date string (free-form; a 4-digit year is extracted when present).
    #[serde(default)]
    pub birthday: Option<String>,
    /// Death date string (free-form; a 4-digit year is extracted when present).
    #[serde(default)]
    pub death: Option<String>,
    /// Draft place.
    #[serde(default)]
    pub draft_place: Option<String>,
    /// Draft date.
    #[serde(default)]
    pub draft_date: Option<String>,
    /// Military subdivision.
    #[serde(default)]
    pub subdivision: Option<String>,
    /// Battles listed on the card.
    #[serde(default)]
    pub battles: Option<String>,
    /// Hospitals listed on the card.
    #[serde(default)]
    pub hospitals: Option<String>,
    /// Number of awards.
    #[serde(default)]
    pub awards_cnt: Option<f64>,
    /// Award text.
    #[serde(default)]
    pub awards_txt: Option<String>,
    /// Number of attached photos.
    #[serde(default)]
    pub photos_cnt: Option<f64>,
    /// Submitting author identifier.
    #[serde(default)]
    pub author_id: Option<String>,
    /// Submitting author name.
    #[serde(default)]
    pub author_name: Option<String>,
    /// Region the card was submitted from.
    #[serde(default)]
    pub added_region: Option<String>,
    /// Publication date string (`YYYY-MM-DD`, with legacy fallbacks).
    #[serde(default)]
    pub pub_date: Option<String>,
}

impl MemorialRecord {
    /// Non-empty trimmed narrative text, if any.
    pub fn story_text(&self) -> Option<&str> {
        self.story
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// `true` when the card carries a non-empty narrative.
    pub fn has_story(&self) -> bool {
        self.story_text().is_some()
    }

    /// `true` when at least one photo is attached.
    pub fn has_photo(&self) -> bool {
        self.photos_cnt.is_some_and(|count| count > 0.0)
    }

    /// `true` when at least one award is recorded.
    pub fn has_awards(&self) -> bool {
        self.awards_cnt.is_some_and(|count| count > 0.0)
    }

    /// Birth year extracted from the free-form birth date.
    pub fn birth_year(&self) -> Option<Year> {
        self.birthday.as_deref().and_then(extract_year)
    }

    /// Death year extracted from the free-form death date.
    pub fn death_year(&self) -> Option<Year> {
        self.death.as_deref().and_then(extract_year)
    }

    /// Age at death, when both years are present.
    pub fn age_at_death(&self) -> Option<i32> {
        Some(self.death_year()? - self.birth_year()?)
    }

    /// Parsed publication date.
    pub fn publication_date(&self) -> Option<NaiveDate> {
        parse_date(self.pub_date.as_deref()?)
    }

    /// Publication year.
    pub fn publication_year(&self) -> Option<Year> {
        self.publication_date().map(|date| {
            use chrono::Datelike;
            date.year()
        })
    }

    /// Region of birth: the leading segment of `birthplace`, falling back to
    /// the card's filing region.
    pub fn birth_region(&self) -> Option<String> {
        leading_region(self.birthplace.as_deref()).or_else(|| leading_region(self.region.as_deref()))
    }

    /// Region the card was submitted from: `added_region`, falling back to
    /// the card's filing region.
    pub fn submit_region(&self) -> Option<String> {
        leading_region(self.added_region.as_deref())
            .or_else(|| leading_region(self.region.as_deref()))
    }

    /// Coarse rank grouping derived from the free-text rank field.
    pub fn rank_group(&self) -> RankGroup {
        RankGroup::from_rank(self.rank.as_deref())
    }
}

/// Coarse rank grouping used by the demographic cross-tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RankGroup {
    /// Commissioned officers.
    Officers,
    /// Sergeants and petty officers.
    Sergeants,
    /// Privates and rank-and-file soldiers.
    Privates,
    /// Recognized rank outside the three main groups.
    Other,
    /// No rank recorded.
    Unknown,
}

impl RankGroup {
    /// Derive the group from a free-text rank field.
    pub fn from_rank(rank: Option<&str>) -> Self {
        let Some(rank) = rank.map(str::trim).filter(|r| !r.is_empty()) else {
            return RankGroup::Unknown;
        };
        let lowered = rank.to_lowercase();
        if lexicon::OFFICER_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            RankGroup::Officers
        } else if lexicon::NCO_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            RankGroup::Sergeants
        } else if lexicon::PRIVATE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            RankGroup::Privates
        } else {
            RankGroup::Other
        }
    }

    /// Display label used in artifacts and views.
    pub fn label(self) -> &'static str {
        match self {
            RankGroup::Officers => "Офицеры",
            RankGroup::Sergeants => "Сержанты/старшины",
            RankGroup::Privates => "Рядовые",
            RankGroup::Other => "Другие",
            RankGroup::Unknown => "Неизвестно",
        }
    }
}

/// Extract the first 4-digit year from a free-form date string.
fn extract_year(value: &str) -> Option<Year> {
    let mut run = 0usize;
    let mut year = 0i32;
    for ch in value.chars() {
        if let Some(digit) = ch.to_digit(10) {
            run += 1;
            year = year * 10 + digit as i32;
            if run == 4 {
                return Some(year);
            }
        } else {
            run = 0;
            year = 0;
        }
    }
    None
}

/// Parse a publication date, accepting the export format plus legacy variants.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let head = trimmed.split_whitespace().next()?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .ok()
}

/// Leading region segment: everything before the first comma, trimmed.
fn leading_region(value: Option<&str>) -> Option<String> {
    let segment = value?.split(',').next()?.trim();
    if segment.is_empty() {
        None
    } else {
        Some(segment.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_year_finds_first_four_digit_run() {
        assert_eq!(extract_year("12.03.1923"), Some(1923));
        assert_eq!(extract_year("1941-1945"), Some(1941));
        assert_eq!(extract_year("примерно 1910 г."), Some(1910));
        assert_eq!(extract_year("неизвестно"), None);
        assert_eq!(extract_year("123"), None);
    }

    #[test]
    fn parse_date_accepts_export_and_legacy_formats() {
        assert_eq!(
            parse_date("2015-05-09"),
            NaiveDate::from_ymd_opt(2015, 5, 9)
        );
        assert_eq!(
            parse_date("2015-05-09 12:30:00"),
            NaiveDate::from_ymd_opt(2015, 5, 9)
        );
        assert_eq!(
            parse_date("09.05.2015"),
            NaiveDate::from_ymd_opt(2015, 5, 9)
        );
        assert_eq!(parse_date("не дата"), None);
    }

    #[test]
    fn rank_grouping_matches_keyword_classes() {
        assert_eq!(
            RankGroup::from_rank(Some("гвардии лейтенант")),
            RankGroup::Officers
        );
        assert_eq!(
            RankGroup::from_rank(Some("старший сержант")),
            RankGroup::Sergeants
        );
        assert_eq!(RankGroup::from_rank(Some("красноармеец")), RankGroup::Privates);
        assert_eq!(RankGroup::from_rank(Some("военврач")), RankGroup::Other);
        assert_eq!(RankGroup::from_rank(None), RankGroup::Unknown);
        assert_eq!(RankGroup::from_rank(Some("  ")), RankGroup::Unknown);
    }

    #[test]
    fn region_fallbacks_take_leading_segment() {
        let record = MemorialRecord {
            id: "1".into(),
            birthplace: Some("Смоленская область, д. Ивановка".into()),
            region: Some("Москва".into()),
            ..MemorialRecord::default()
        };
        assert_eq!(record.birth_region().as_deref(), Some("Смоленская область"));
        assert_eq!(record.submit_region().as_deref(), Some("Москва"));

        let bare = MemorialRecord {
            id: "2".into(),
            ..MemorialRecord::default()
        };
        assert_eq!(bare.birth_region(), None);
        assert_eq!(bare.submit_region(), None);
    }

    #[test]
    fn story_presence_ignores_whitespace_only_text() {
        let record = MemorialRecord {
            id: "1".into(),
            story: Some("   ".into()),
            ..MemorialRecord::default()
        };
        assert!(!record.has_story());
    }
}
