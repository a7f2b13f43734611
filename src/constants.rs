/// Constants describing the persisted artifact layout.
pub mod artifacts {
    /// Namespace directory holding the small aggregate tables.
    pub const AGGREGATED_DIR: &str = "aggregated";
    /// Namespace directory holding the stratified sample.
    pub const SAMPLE_DIR: &str = "sample";
    /// Namespace directory holding the chunked full-text export.
    pub const FULL_DIR: &str = "full";
    /// File name of the stratified sample table.
    pub const SAMPLE_FILE: &str = "veterans_sample_50k.parquet";
    /// File-name prefix for full-text export chunks (`<prefix>000.parquet`, ...).
    pub const FTS_PART_PREFIX: &str = "veterans_fts_part";
    /// Max rows written per full-text export chunk.
    pub const FTS_ROWS_PER_CHUNK: usize = 100_000;
    /// Prefix of the temporary staging directory created inside the output root.
    pub const STAGING_PREFIX: &str = ".staging-";
}

/// Fixed analysis parameters reproduced identically across builds.
pub mod analysis {
    /// Seed controlling deterministic sample selection.
    pub const DEFAULT_SEED: u64 = 42;
    /// Target stratified sample size.
    pub const SAMPLE_SIZE: usize = 50_000;
    /// Number of narrative topics.
    pub const TOPIC_COUNT: usize = 7;
    /// Sliding-window width for moving-average type-token ratio.
    pub const MATTR_WINDOW: usize = 50;
    /// Max narratives scored for the yearly MATTR aggregate.
    pub const MATTR_TEXT_CAP: usize = 5_000;
    /// Minimum narrative length (chars) for text analytics eligibility.
    pub const MIN_NARRATIVE_CHARS: usize = 100;
    /// Minimum narrative length (chars) for full-text export eligibility.
    pub const MIN_FTS_STORY_CHARS: usize = 10;
    /// Migration-matrix pairs below this count are dropped.
    pub const MIGRATION_MIN_COUNT: i64 = 10;
    /// Max off-diagonal flows kept in the network edge list.
    pub const NETWORK_EDGE_LIMIT: usize = 100;
    /// Top entities kept per entity type in the NER summary.
    pub const NER_TOP_PER_TYPE: usize = 30;
    /// Digital-memory index component weight for narrative share.
    pub const DMI_STORY_WEIGHT: f64 = 0.4;
    /// Digital-memory index component weight for photo share.
    pub const DMI_PHOTO_WEIGHT: f64 = 0.3;
    /// Digital-memory index component weight for awards share.
    pub const DMI_AWARDS_WEIGHT: f64 = 0.3;
    /// Lower inclusive bound for plausible age at death.
    pub const AGE_MIN: i32 = 11;
    /// Upper inclusive bound for plausible age at death.
    pub const AGE_MAX: i32 = 79;
    /// Minimum post-peak daily points required for a half-life fit.
    pub const HALFLIFE_MIN_POINTS: usize = 3;
    /// Calendar month of the publication peak (Victory Day).
    pub const PEAK_MONTH: u32 = 5;
}

/// Constants used by the search view.
pub mod search {
    /// Default number of hits returned.
    pub const DEFAULT_LIMIT: usize = 10;
    /// Chars of context kept on each side of a snippet match.
    pub const SNIPPET_CONTEXT_CHARS: usize = 80;
    /// Score weight for a query token occurrence inside the narrative.
    pub const STORY_WEIGHT: u32 = 2;
    /// Score weight for a query token matching the card name.
    pub const NAME_WEIGHT: u32 = 5;
    /// Score weight for a query token matching a categorical field.
    pub const FIELD_WEIGHT: u32 = 1;
}

/// Display labels shared by aggregates and views.
pub mod labels {
    /// Stratum/display label used when a card has no region.
    pub const REGION_MISSING: &str = "(регион не указан)";
    /// Short Russian month names, January first.
    pub const MONTHS_RU: [&str; 12] = [
        "Янв", "Фев", "Мар", "Апр", "Май", "Июн", "Июл", "Авг", "Сен", "Окт", "Ноя", "Дек",
    ];
    /// Entity-type tag for locations in the NER summary.
    pub const ENTITY_LOC: &str = "LOC";
    /// Entity-type tag for organizations in the NER summary.
    pub const ENTITY_ORG: &str = "ORG";
}
