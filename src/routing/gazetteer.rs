//! Static Ontario keyword gazetteer used by the query detector.
//!
//! Categories and phrases are fixed configuration data: the table is built
//! once on first access and never mutated afterwards. Keywords of two
//! characters or fewer carry a precompiled word-boundary pattern so that
//! "on" matches "parks on the lake" but never "deforestation".

use regex::Regex;
use std::sync::OnceLock;

/// Longest keyword length that still requires whole-word matching.
const WORD_BOUNDARY_MAX_LEN: usize = 2;

const PROVINCES: &[&str] = &["ontario", "on"];

const CITIES: &[&str] = &[
    "toronto",
    "ottawa",
    "peterborough",
    "kawartha",
    "orillia",
    "barrie",
    "kingston",
    "belleville",
    "cobourg",
];

const REGIONS: &[&str] = &[
    "kawarthas",
    "georgian bay",
    "lake simcoe",
    "rice lake",
    "lake ontario",
    "cottage country",
    "muskoka",
];

const PARKS: &[&str] = &[
    "algonquin",
    "killarney",
    "quetico",
    "pinery",
    "bon echo",
    "arrowhead",
    "silent lake",
];

const FIRST_NATIONS: &[&str] = &[
    "alderville",
    "curve lake",
    "hiawatha",
    "scugog island",
    "beausoleil",
    "georgina island",
    "rama",
    "williams treaty",
    "first nation",
    "indigenous",
];

const CONSERVATION: &[&str] = &[
    "conservation area",
    "conservation authority",
    "kawartha conservation",
    "otonabee conservation",
    "trca",
];

/// A single keyword plus its precompiled matcher.
pub struct KeywordMatcher {
    keyword: &'static str,
    /// Present only for short keywords that need whole-word matching.
    word_pattern: Option<Regex>,
}

impl KeywordMatcher {
    fn new(keyword: &'static str) -> Self {
        let word_pattern = if keyword.len() <= WORD_BOUNDARY_MAX_LEN {
            let pattern = format!(r"\b{}\b", regex::escape(keyword));
            Some(Regex::new(&pattern).expect("escaped keyword is a valid pattern"))
        } else {
            None
        };
        Self {
            keyword,
            word_pattern,
        }
    }

    pub fn keyword(&self) -> &'static str {
        self.keyword
    }

    /// Check a query against this keyword. The query must already be lower-cased.
    fn matches(&self, query_lower: &str) -> bool {
        match &self.word_pattern {
            Some(pattern) => pattern.is_match(query_lower),
            None => query_lower.contains(self.keyword),
        }
    }
}

/// A named group of keywords (provinces, cities, parks, ...).
pub struct KeywordCategory {
    name: &'static str,
    matchers: Vec<KeywordMatcher>,
}

impl KeywordCategory {
    fn new(name: &'static str, keywords: &'static [&'static str]) -> Self {
        Self {
            name,
            matchers: keywords.iter().map(|&k| KeywordMatcher::new(k)).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn keywords(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.matchers.iter().map(KeywordMatcher::keyword)
    }
}

/// The full keyword table, immutable for the lifetime of the process.
pub struct Gazetteer {
    categories: Vec<KeywordCategory>,
}

impl Gazetteer {
    fn new() -> Self {
        Self {
            categories: vec![
                KeywordCategory::new("provinces", PROVINCES),
                KeywordCategory::new("cities", CITIES),
                KeywordCategory::new("regions", REGIONS),
                KeywordCategory::new("parks", PARKS),
                KeywordCategory::new("first_nations", FIRST_NATIONS),
                KeywordCategory::new("conservation", CONSERVATION),
            ],
        }
    }

    /// The shared instance, built on first use and shared by all callers.
    pub fn shared() -> &'static Gazetteer {
        static GAZETTEER: OnceLock<Gazetteer> = OnceLock::new();
        GAZETTEER.get_or_init(Gazetteer::new)
    }

    /// Find the first `(category, keyword)` pair matching a lower-cased query.
    ///
    /// Categories are scanned in declaration order with first-match
    /// short-circuit; since the overall result is a pure OR over every
    /// keyword, order only affects which pair is reported, not whether one is.
    pub fn find_match(&self, query_lower: &str) -> Option<(&'static str, &'static str)> {
        self.categories.iter().find_map(|category| {
            category
                .matchers
                .iter()
                .find(|m| m.matches(query_lower))
                .map(|m| (category.name, m.keyword()))
        })
    }

    pub fn categories(&self) -> &[KeywordCategory] {
        &self.categories
    }
}
