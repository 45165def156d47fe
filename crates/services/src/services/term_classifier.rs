//! Cheap pre-flight check that a search term could name a sneaker.
//!
//! Runs before any network access; a rejected term short-circuits the search with
//! [`SearchErrorKind::Nonsensical`](super::sneaker_sections::SearchErrorKind).

use strum_macros::Display;

/// Known junk inputs, matched as case-insensitive substrings.
const DENY_LIST: &[&str] = &[
    "bulbul",
    "asdf",
    "qwerty",
    "zxcv",
    "hjkl",
    "lorem",
    "ipsum",
    "gibberish",
    "blahblah",
    "nonsense",
];

const MIN_TERM_CHARS: usize = 3;
const MAX_SYMBOL_RATIO: f64 = 0.3;

const BRAND_KEYWORDS: &[&str] = &[
    "nike",
    "adidas",
    "jordan",
    "yeezy",
    "puma",
    "reebok",
    "new balance",
    "asics",
    "converse",
    "vans",
    "under armour",
    "skechers",
    "hoka",
    "brooks",
    "saucony",
    "mizuno",
    "fila",
    "k-swiss",
    "balenciaga",
    "mcqueen",
    "margiela",
    "off-white",
    "salomon",
];

const MODEL_KEYWORDS: &[&str] = &[
    "dunk",
    "air force",
    "af1",
    "air max",
    "aj1",
    "aj4",
    "boost",
    "350",
    "700",
    "450",
    "slide",
    "foam runner",
    "forum",
    "samba",
    "gazelle",
    "superstar",
    "stan smith",
    "campus",
    "vomero",
    "zoom",
    "pegasus",
    "blazer",
    "cortez",
    "chuck taylor",
    "all star",
    "old skool",
    "sk8",
    "rs-x",
    "suede",
    "550",
    "990",
    "2002r",
    "gel-",
    "club c",
    "retro",
    "travis scott",
    "fragment",
    "bad bunny",
];

const COLORWAY_KEYWORDS: &[&str] = &[
    "panda",
    "chicago",
    "bred",
    "unc",
    "university blue",
    "zebra",
    "beluga",
    "oreo",
    "starfish",
    "wolf grey",
    "michigan",
    "mocha",
    "lost and found",
    "shattered backboard",
    "royal",
    "cement",
    "infrared",
    "black toe",
    "triple white",
    "triple black",
    "white",
    "black",
    "red",
    "blue",
    "grey",
    "green",
    "pink",
];

/// Why a term was rejected before keyword matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Rejection {
    TooShort,
    DenyListed,
    AllDigits,
    NoLetters,
    TooManySymbols,
}

/// Which keyword families a term mentions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordFlags {
    pub has_brand: bool,
    pub has_model: bool,
    pub has_colorway: bool,
}

impl KeywordFlags {
    pub fn detect(term: &str) -> Self {
        let lower = term.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
        Self {
            has_brand: mentions(BRAND_KEYWORDS),
            has_model: mentions(MODEL_KEYWORDS),
            has_colorway: mentions(COLORWAY_KEYWORDS),
        }
    }

    /// Any single family is enough; the paired clauses are subsumed by the
    /// single-flag ones.
    #[allow(clippy::nonminimal_bool, clippy::overly_complex_bool_expr)]
    pub fn is_plausible(&self) -> bool {
        let Self {
            has_brand,
            has_model,
            has_colorway,
        } = *self;
        (has_brand && (has_model || has_colorway))
            || (has_model && has_colorway)
            || has_brand
            || has_model
            || has_colorway
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Rejected(Rejection),
    Checked(KeywordFlags),
}

impl Verdict {
    pub fn is_plausible(&self) -> bool {
        match self {
            Verdict::Rejected(_) => false,
            Verdict::Checked(flags) => flags.is_plausible(),
        }
    }
}

pub fn classify(term: &str) -> Verdict {
    let term = term.trim();
    let total = term.chars().count();

    if total < MIN_TERM_CHARS {
        return Verdict::Rejected(Rejection::TooShort);
    }

    let lower = term.to_lowercase();
    if DENY_LIST.iter().any(|junk| lower.contains(junk)) {
        return Verdict::Rejected(Rejection::DenyListed);
    }

    if term.chars().all(|c| c.is_ascii_digit()) {
        return Verdict::Rejected(Rejection::AllDigits);
    }
    if !term.chars().any(char::is_alphabetic) {
        return Verdict::Rejected(Rejection::NoLetters);
    }

    let symbols = term
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    if symbols as f64 / total as f64 > MAX_SYMBOL_RATIO {
        return Verdict::Rejected(Rejection::TooManySymbols);
    }

    Verdict::Checked(KeywordFlags::detect(&lower))
}

pub fn is_plausible_sneaker_term(term: &str) -> bool {
    classify(term).is_plausible()
}
