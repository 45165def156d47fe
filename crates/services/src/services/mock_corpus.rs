//! Canned answers served when the model can't be reached.

use tracing::debug;

/// One pre-written answer and the normalized terms that select it.
#[derive(Debug)]
pub struct MockEntry {
    pub name: &'static str,
    keys: &'static [&'static str],
    pub text: &'static str,
}

macro_rules! corpus_text {
    ($file:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/mock_corpus/", $file))
    };
}

pub static ENTRIES: &[MockEntry] = &[
    MockEntry {
        name: "Nike Air Force 1",
        keys: &["nike air force 1", "nike air force 1 low", "nike air force one"],
        text: corpus_text!("nike_air_force_1.txt"),
    },
    MockEntry {
        name: "Nike Dunk Low Panda",
        keys: &["nike dunk low panda", "nike dunk low black white"],
        text: corpus_text!("nike_dunk_low_panda.txt"),
    },
    MockEntry {
        name: "Air Jordan 4 University Blue",
        keys: &["air jordan 4 university blue", "air jordan 4 unc", "nike air jordan 4 university blue"],
        text: corpus_text!("air_jordan_4_university_blue.txt"),
    },
    MockEntry {
        name: "Nike Air Jordan 1 High Chicago",
        keys: &["nike air jordan 1 high chicago", "air jordan 1 high chicago", "air jordan 1 high og chicago"],
        text: corpus_text!("nike_air_jordan_1_high_chicago.txt"),
    },
    MockEntry {
        name: "Adidas Yeezy Boost 350 V2 Zebra",
        keys: &[
            "adidas yeezy boost 350 v2 zebra",
            "adidas yeezy 350 zebra",
            "adidas yeezy 350 v2 zebra",
            "adidas yeezy zebra",
        ],
        text: corpus_text!("adidas_yeezy_boost_350_v2_zebra.txt"),
    },
    MockEntry {
        name: "Nike Air Jordan 1 Low",
        keys: &["nike air jordan 1 low", "air jordan 1 low"],
        text: corpus_text!("nike_air_jordan_1_low.txt"),
    },
    MockEntry {
        name: "Nike Air Jordan 1 Low Starfish",
        keys: &["nike air jordan 1 low starfish", "air jordan 1 low starfish"],
        text: corpus_text!("nike_air_jordan_1_low_starfish.txt"),
    },
    MockEntry {
        name: "Adidas Forum Low Bad Bunny",
        keys: &["adidas forum low bad bunny", "adidas forum bad bunny"],
        text: corpus_text!("adidas_forum_low_bad_bunny.txt"),
    },
    MockEntry {
        name: "Nike Zoom Vomero 5",
        keys: &["nike zoom vomero 5", "nike vomero 5", "nike zoom vomero", "nike vomero"],
        text: corpus_text!("nike_zoom_vomero_5.txt"),
    },
    MockEntry {
        name: "Nike SB Dunk Low",
        keys: &["nike sb dunk low", "nike sb dunk"],
        text: corpus_text!("nike_sb_dunk_low.txt"),
    },
];

/// Keyword combination that picks a substitute entry. Every `all_of` token must
/// appear, plus at least one `any_of` token when that list is non-empty.
struct Substitution {
    all_of: &'static [&'static str],
    any_of: &'static [&'static str],
    entry: &'static str,
}

impl Substitution {
    fn matches(&self, term: &str) -> bool {
        self.all_of.iter().all(|token| term.contains(token))
            && (self.any_of.is_empty() || self.any_of.iter().any(|token| term.contains(token)))
    }
}

/// Tried in order after the exact lookup misses.
const SUBSTITUTIONS: &[Substitution] = &[
    Substitution { all_of: &["panda"], any_of: &["dunk", "nike"], entry: "Nike Dunk Low Panda" },
    Substitution { all_of: &[], any_of: &["air force", "force 1"], entry: "Nike Air Force 1" },
    Substitution { all_of: &["jordan", "chicago"], any_of: &[], entry: "Nike Air Jordan 1 High Chicago" },
    Substitution { all_of: &["sb", "dunk"], any_of: &[], entry: "Nike SB Dunk Low" },
    Substitution { all_of: &["yeezy", "zebra"], any_of: &[], entry: "Adidas Yeezy Boost 350 V2 Zebra" },
    Substitution { all_of: &["starfish"], any_of: &[], entry: "Nike Air Jordan 1 Low Starfish" },
    Substitution { all_of: &["vomero"], any_of: &[], entry: "Nike Zoom Vomero 5" },
    Substitution { all_of: &["bad bunny"], any_of: &[], entry: "Adidas Forum Low Bad Bunny" },
    Substitution {
        all_of: &["jordan 4"],
        any_of: &["unc", "university blue"],
        entry: "Air Jordan 4 University Blue",
    },
];

/// Searches suggested by the service-limited notice.
const SUGGESTED_SEARCHES: &[&str] = &[
    "Nike Air Force 1",
    "Nike Dunk Low Panda",
    "Air Jordan 1 High Chicago",
    "Adidas Yeezy Boost 350 V2 Zebra",
    "Nike SB Dunk Low",
];

#[derive(Debug)]
pub enum MockLookup {
    /// The term is one of the entry's keys.
    Exact(&'static MockEntry),
    /// A keyword heuristic picked a close entry.
    Substitute(&'static MockEntry),
    /// Nothing matched. Carries the service-limited notice.
    Unavailable(String),
}

impl MockLookup {
    pub fn text(&self) -> &str {
        match self {
            MockLookup::Exact(entry) | MockLookup::Substitute(entry) => entry.text,
            MockLookup::Unavailable(notice) => notice,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            MockLookup::Exact(entry) | MockLookup::Substitute(entry) => entry.text.to_string(),
            MockLookup::Unavailable(notice) => notice,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, MockLookup::Unavailable(_))
    }
}

fn entry_named(name: &str) -> Option<&'static MockEntry> {
    ENTRIES.iter().find(|entry| entry.name == name)
}

/// Resolve a normalized term to canned text. Never empty.
pub fn lookup(term: &str) -> MockLookup {
    let key = term.trim().to_lowercase();

    if let Some(entry) = ENTRIES.iter().find(|entry| entry.keys.contains(&key.as_str())) {
        debug!(term = %key, entry = entry.name, "mock corpus exact match");
        return MockLookup::Exact(entry);
    }

    if let Some(entry) = SUBSTITUTIONS
        .iter()
        .find(|rule| rule.matches(&key))
        .and_then(|rule| entry_named(rule.entry))
    {
        debug!(term = %key, entry = entry.name, "mock corpus substitute");
        return MockLookup::Substitute(entry);
    }

    debug!(term = %key, "no mock corpus entry");
    MockLookup::Unavailable(service_limited_notice(term.trim()))
}

pub fn service_limited_notice(term: &str) -> String {
    let suggestions = SUGGESTED_SEARCHES
        .iter()
        .map(|name| format!("- {name}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "👟 Shoe Name & Brand\n\
         Shoe Name: {term}\n\
         Brand: Unable to determine\n\n\
         ⚠️ Service Temporarily Limited\n\
         We're sorry, but our AI search service is temporarily experiencing technical difficulties.\n\n\
         Please try your search again later, or try searching for one of these popular models:\n\
         {suggestions}\n\n\
         We're constantly improving our service to provide information on more sneaker models. \
         Thank you for your patience!"
    )
}
