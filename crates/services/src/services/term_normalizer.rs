//! Rewrites a raw search term into the canonical phrasing used by the prompt and the
//! mock corpus.
//!
//! Pure and deterministic. The rule order matters: later rules see earlier output,
//! and the final phrasing has to line up with corpus keys.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::rewrite::{RewriteRule, apply_all};

/// A search term after normalization. Always lower-case and trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NormalizedTerm(String);

impl NormalizedTerm {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for NormalizedTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedTerm {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

const TRAVIS_FRAGMENT_JORDAN_1: &str = "air jordan 1 low fragment x travis scott";
const TRAVIS_JORDAN_1_HIGH: &str = "air jordan 1 retro high og x travis scott";
const TRAVIS_JORDAN_1_LOW: &str = "air jordan 1 retro low og sp x travis scott";

static JORDAN_1_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:jordan 1|aj1|j1)\b").unwrap());
static BARE_JORDAN_1: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bjordan 1\b").unwrap());
static CUT_QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:high|mid|low)\b").unwrap());
static DUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdunk\b").unwrap());
static SKATE_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bsb\b").unwrap());
static SKATE_SILHOUETTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:dunk|blazer|janoski)\b").unwrap());
static JORDAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bjordan\b").unwrap());
static AIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bair\b").unwrap());
static PRIMARY_BRAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:nike|adidas|jordan|puma|converse|vans|reebok|new balance|asics)\b").unwrap()
});

/// Model lines that imply a brand, first match wins.
static BRAND_FOR_LINE: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bdunk\b", "nike"),
        (r"\bair force\b", "nike"),
        (r"\bair max\b", "nike"),
        (r"\bvomero\b", "nike"),
        (r"\bblazer\b", "nike"),
        (r"\byeezy\b", "adidas"),
        (r"\bforum\b", "adidas"),
        (r"\bsamba\b", "adidas"),
        (r"\bgazelle\b", "adidas"),
        (r"\bsuperstar\b", "adidas"),
        (r"\bchuck taylor\b", "converse"),
        (r"\bold skool\b", "vans"),
        (r"\brs-x\b", "puma"),
    ]
    .into_iter()
    .map(|(pattern, brand)| (Regex::new(pattern).unwrap(), brand))
    .collect()
});

/// Whole-phrase overrides for inputs too vague for the rules. Values are corpus keys.
const PHRASE_OVERRIDES: &[(&str, &str)] = &[
    ("jordan", "nike air jordan 1 high chicago"),
    ("air jordan", "nike air jordan 1 high chicago"),
    ("chicago", "nike air jordan 1 high chicago"),
    ("panda", "nike dunk low panda"),
    ("unc", "air jordan 4 university blue"),
    ("university blue", "air jordan 4 university blue"),
    ("yeezy", "adidas yeezy boost 350 v2 zebra"),
    ("adidas yeezy", "adidas yeezy boost 350 v2 zebra"),
    ("dunks", "nike dunk low"),
    ("forces", "nike air force 1"),
    ("airmax", "nike air max 90"),
    ("starfish", "nike air jordan 1 low starfish"),
    ("bad bunny", "adidas forum low bad bunny"),
];

static RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::replace("collapse_whitespace", r"\s+", " "),
        RewriteRule::custom("travis_fragment_collab", travis_fragment_collab),
        RewriteRule::custom("travis_collab", travis_collab),
        RewriteRule::replace("aj1_abbreviation", r"\baj1\b", "air jordan 1"),
        RewriteRule::replace("aj4_abbreviation", r"\baj4\b", "air jordan 4"),
        RewriteRule::replace("af1_abbreviation", r"\baf1\b", "air force 1"),
        RewriteRule::custom("skate_line_category", skate_line_category),
        RewriteRule::custom("jordan_1_cut", jordan_1_cut),
        RewriteRule::custom("dunk_cut", dunk_cut),
        RewriteRule::custom("brand_prefix", brand_prefix),
        RewriteRule::custom("jordan_surname", jordan_surname),
    ]
});

fn mentions_travis(term: &str) -> bool {
    term.contains("travis") || term.contains("cactus jack")
}

fn travis_fragment_collab(term: &str) -> String {
    if mentions_travis(term) && term.contains("fragment") && JORDAN_1_REF.is_match(term) {
        TRAVIS_FRAGMENT_JORDAN_1.to_string()
    } else {
        term.to_string()
    }
}

fn travis_collab(term: &str) -> String {
    if !mentions_travis(term) || term.contains("fragment") || !JORDAN_1_REF.is_match(term) {
        return term.to_string();
    }
    if term.contains("low") {
        TRAVIS_JORDAN_1_LOW.to_string()
    } else {
        TRAVIS_JORDAN_1_HIGH.to_string()
    }
}

/// "nike sb" means the SB Dunk.
fn skate_line_category(term: &str) -> String {
    if SKATE_LINE.is_match(term) && !SKATE_SILHOUETTE.is_match(term) {
        SKATE_LINE.replacen(term, 1, "sb dunk").into_owned()
    } else {
        term.to_string()
    }
}

fn jordan_1_cut(term: &str) -> String {
    if BARE_JORDAN_1.is_match(term) && !CUT_QUALIFIER.is_match(term) {
        BARE_JORDAN_1.replacen(term, 1, "jordan 1 high").into_owned()
    } else {
        term.to_string()
    }
}

fn dunk_cut(term: &str) -> String {
    if DUNK.is_match(term) && !CUT_QUALIFIER.is_match(term) {
        DUNK.replacen(term, 1, "dunk low").into_owned()
    } else {
        term.to_string()
    }
}

fn brand_prefix(term: &str) -> String {
    if PRIMARY_BRAND.is_match(term) {
        return term.to_string();
    }
    match BRAND_FOR_LINE.iter().find(|(line, _)| line.is_match(term)) {
        Some((_, brand)) => format!("{brand} {term}"),
        None => term.to_string(),
    }
}

fn jordan_surname(term: &str) -> String {
    if JORDAN.is_match(term) && !AIR.is_match(term) {
        JORDAN.replacen(term, 1, "air jordan").into_owned()
    } else {
        term.to_string()
    }
}

fn phrase_override(phrase: &str) -> Option<&'static str> {
    PHRASE_OVERRIDES
        .iter()
        .find(|(key, _)| *key == phrase)
        .map(|(_, canonical)| *canonical)
}

pub fn normalize(term: &str) -> NormalizedTerm {
    let base = term.trim().to_lowercase();
    let rewritten = apply_all(&RULES, &base);

    let normalized = phrase_override(&base)
        .or_else(|| phrase_override(&rewritten))
        .map(str::to_string)
        .unwrap_or(rewritten);

    NormalizedTerm(normalized)
}
