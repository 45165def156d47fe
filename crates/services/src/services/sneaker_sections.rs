//! Typed representation of a parsed sneaker answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Text-channel token meaning the term was rejected before any model call.
pub const NONSENSICAL_SENTINEL: &str = "ERROR_NONSENSICAL_TERM";
/// Text-channel token meaning the model had nothing to say about the term.
pub const NO_INFORMATION_SENTINEL: &str = "ERROR_NO_INFORMATION";
/// Text-channel token emitted by older clients when the model call failed outright.
pub const API_FAILURE_SENTINEL: &str = "ERROR_API_FAILURE";

/// One of the nine fixed sections of an answer, in canonical order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SectionKey {
    NameAndBrand,
    History,
    Launch,
    Price,
    Trends,
    Prediction,
    Features,
    Investment,
    Recommendation,
}

impl SectionKey {
    pub const ALL: [SectionKey; 9] = [
        SectionKey::NameAndBrand,
        SectionKey::History,
        SectionKey::Launch,
        SectionKey::Price,
        SectionKey::Trends,
        SectionKey::Prediction,
        SectionKey::Features,
        SectionKey::Investment,
        SectionKey::Recommendation,
    ];

    /// Emoji that opens this section in model output.
    pub fn marker(self) -> &'static str {
        match self {
            SectionKey::NameAndBrand => "👟",
            SectionKey::History => "🕒",
            SectionKey::Launch => "🚀",
            SectionKey::Price => "💰",
            SectionKey::Trends => "📉",
            SectionKey::Prediction => "🔮",
            SectionKey::Features => "✨",
            SectionKey::Investment => "📊",
            SectionKey::Recommendation => "🛒",
        }
    }

    /// Title printed after the marker.
    pub fn heading(self) -> &'static str {
        match self {
            SectionKey::NameAndBrand => "Shoe Name & Brand",
            SectionKey::History => "Sneaker History",
            SectionKey::Launch => "Launch Information",
            SectionKey::Price => "Current Market Price",
            SectionKey::Trends => "Price History & Trends",
            SectionKey::Prediction => "Future Price Prediction",
            SectionKey::Features => "Features & Benefits",
            SectionKey::Investment => "Investment Potential",
            SectionKey::Recommendation => "Buying Recommendations",
        }
    }

    /// `"<marker> <heading>"`, the exact header line the model is asked to emit.
    pub fn header_line(self) -> String {
        format!("{} {}", self.marker(), self.heading())
    }
}

/// A unit of content inside a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContentItem {
    Labeled { label: String, value: String },
    Paragraph { text: String },
}

/// Cleaned text of one section together with the items split out of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub text: String,
    pub items: Vec<ContentItem>,
}

impl Section {
    /// Value of the first item whose label matches `label`, ignoring case.
    pub fn labeled(&self, label: &str) -> Option<&str> {
        self.items.iter().find_map(|item| match item {
            ContentItem::Labeled { label: l, value } if l.eq_ignore_ascii_case(label) => {
                Some(value.as_str())
            }
            _ => None,
        })
    }
}

/// Sections keyed by [`SectionKey`]. Absent sections have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap(BTreeMap<SectionKey, Section>);

impl SectionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: SectionKey, section: Section) {
        self.0.insert(key, section);
    }

    pub fn get(&self, key: SectionKey) -> Option<&Section> {
        self.0.get(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &Section)> {
        self.0.iter().map(|(key, section)| (*key, section))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Designed, user-facing failure states of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SearchErrorKind {
    /// The term does not look like a sneaker at all.
    Nonsensical,
    /// The model answered but had no information.
    NoInformation,
}

impl SearchErrorKind {
    /// Token used for this outcome on plain-text transports.
    pub fn sentinel(self) -> &'static str {
        match self {
            SearchErrorKind::Nonsensical => NONSENSICAL_SENTINEL,
            SearchErrorKind::NoInformation => NO_INFORMATION_SENTINEL,
        }
    }
}
