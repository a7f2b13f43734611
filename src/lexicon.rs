//! Fixed word lists backing the deterministic text analytics.
//!
//! All lists are part of the artifact contract: changing them changes the
//! published aggregates, so treat edits as a data-format revision.

/// One narrative topic: stable id, display label, and weighted keywords.
#[derive(Clone, Copy, Debug)]
pub struct Topic {
    /// Stable topic id (also the artifact sort order).
    pub id: usize,
    /// Display label.
    pub label: &'static str,
    /// Column-name slug used by the topic-evolution table.
    pub slug: &'static str,
    /// Keywords with display weights, strongest first.
    pub words: &'static [(&'static str, f64)],
}

/// The seven narrative topics.
pub const TOPICS: [Topic; 7] = [
    Topic {
        id: 0,
        label: "Боевой путь",
        slug: "battle_path",
        words: &[
            ("фронт", 0.08),
            ("бой", 0.07),
            ("наступление", 0.06),
            ("дивизия", 0.05),
            ("полк", 0.05),
            ("батальон", 0.04),
            ("командир", 0.04),
            ("позиция", 0.03),
        ],
    },
    Topic {
        id: 1,
        label: "Награды",
        slug: "awards",
        words: &[
            ("орден", 0.09),
            ("медаль", 0.08),
            ("отечественной", 0.06),
            ("красной", 0.05),
            ("звезды", 0.05),
            ("славы", 0.04),
            ("награждён", 0.04),
            ("степени", 0.03),
        ],
    },
    Topic {
        id: 2,
        label: "Семья",
        slug: "family",
        words: &[
            ("семья", 0.08),
            ("дети", 0.06),
            ("жена", 0.05),
            ("сын", 0.05),
            ("дочь", 0.04),
            ("внуки", 0.04),
            ("помним", 0.04),
            ("родные", 0.03),
        ],
    },
    Topic {
        id: 3,
        label: "Плен/гибель",
        slug: "captivity_death",
        words: &[
            ("погиб", 0.09),
            ("пропал", 0.07),
            ("безвести", 0.06),
            ("плен", 0.05),
            ("лагерь", 0.04),
            ("захоронен", 0.04),
            ("братская", 0.03),
            ("могила", 0.03),
        ],
    },
    Topic {
        id: 4,
        label: "Мобилизация",
        slug: "mobilization",
        words: &[
            ("призван", 0.09),
            ("военкомат", 0.07),
            ("район", 0.05),
            ("область", 0.05),
            ("отправлен", 0.04),
            ("обучение", 0.04),
            ("курсы", 0.03),
            ("запас", 0.03),
        ],
    },
    Topic {
        id: 5,
        label: "Ранения",
        slug: "wounds",
        words: &[
            ("ранен", 0.09),
            ("госпиталь", 0.07),
            ("ранение", 0.06),
            ("тяжёлое", 0.05),
            ("контузия", 0.04),
            ("лечение", 0.04),
            ("эвакуирован", 0.03),
            ("инвалид", 0.03),
        ],
    },
    Topic {
        id: 6,
        label: "Труд/тыл",
        slug: "home_front",
        words: &[
            ("работал", 0.08),
            ("завод", 0.06),
            ("труд", 0.05),
            ("тыл", 0.05),
            ("колхоз", 0.04),
            ("производство", 0.04),
            ("строительство", 0.03),
            ("восстановление", 0.03),
        ],
    },
];

/// First-person markers signalling a family-voice narrative.
pub const FIRST_PERSON_MARKERS: [&str; 6] = [
    "я помню",
    "мой дед",
    "моя бабушка",
    "наш",
    "мой отец",
    "мой прадед",
];

/// Battle-vocabulary markers used by the story-only narrative classifier.
pub const BATTLE_MARKERS: [&str; 5] = ["фронт", "бой", "наступление", "дивизия", "полк"];

/// Rank keywords mapped to the officer group.
pub const OFFICER_KEYWORDS: [&str; 7] = [
    "лейтенант",
    "капитан",
    "майор",
    "полковник",
    "генерал",
    "маршал",
    "командир",
];

/// Rank keywords mapped to the sergeant group.
pub const NCO_KEYWORDS: [&str; 3] = ["сержант", "старшина", "ефрейтор"];

/// Rank keywords mapped to the rank-and-file group.
pub const PRIVATE_KEYWORDS: [&str; 3] = ["рядовой", "красноармеец", "солдат"];

/// Positive-tone tokens for lexicon sentiment scoring.
pub const SENTIMENT_POSITIVE: [&str; 20] = [
    "гордимся",
    "помним",
    "любим",
    "герой",
    "отвага",
    "мужество",
    "слава",
    "победа",
    "награждён",
    "благодарны",
    "честь",
    "доблесть",
    "храбрость",
    "вернулся",
    "выжил",
    "счастье",
    "мир",
    "любовь",
    "подвиг",
    "спасибо",
];

/// Negative-tone tokens for lexicon sentiment scoring.
pub const SENTIMENT_NEGATIVE: [&str; 20] = [
    "погиб",
    "убит",
    "ранен",
    "плен",
    "пропал",
    "безвести",
    "тяжело",
    "страшно",
    "голод",
    "холод",
    "боль",
    "смерть",
    "потеря",
    "горе",
    "слёзы",
    "бомбёжка",
    "концлагерь",
    "умер",
    "похоронен",
    "оккупация",
];

/// Location gazetteer for the NER summary.
pub const GAZETTEER_LOCATIONS: [&str; 30] = [
    "Москва",
    "Сталинград",
    "Ленинград",
    "Курск",
    "Берлин",
    "Киев",
    "Минск",
    "Смоленск",
    "Варшава",
    "Прага",
    "Будапешт",
    "Вена",
    "Харьков",
    "Одесса",
    "Севастополь",
    "Брест",
    "Ржев",
    "Орёл",
    "Кёнигсберг",
    "Днепропетровск",
    "Воронеж",
    "Тула",
    "Новгород",
    "Псков",
    "Витебск",
    "Ростов-на-Дону",
    "Новороссийск",
    "Керчь",
    "Мурманск",
    "Вязьма",
];

/// Organization gazetteer for the NER summary.
pub const GAZETTEER_ORGS: [&str; 30] = [
    "Красная Армия",
    "РККА",
    "ВМФ",
    "НКВД",
    "ВВС",
    "Партизанский отряд",
    "Гвардейская дивизия",
    "Стрелковая дивизия",
    "Танковая бригада",
    "Артиллерийский полк",
    "Пехотный полк",
    "Кавалерийский корпус",
    "Военный госпиталь",
    "Сапёрный батальон",
    "Зенитная батарея",
    "Морская пехота",
    "Штурмовой полк",
    "Разведрота",
    "Инженерная бригада",
    "Связной батальон",
    "Военкомат",
    "Запасной полк",
    "Учебный полк",
    "Эвакогоспиталь",
    "Медсанбат",
    "Транспортная рота",
    "Штаб фронта",
    "Особый отдел",
    "Автобат",
    "Понтонная рота",
];
