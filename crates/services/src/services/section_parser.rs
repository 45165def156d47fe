//! Splits cleaned model text into the nine marker-delimited sections.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::{
    response_cleaner::{clean, collapse_brand_value, collapse_duplicate_brands},
    sneaker_sections::{
        API_FAILURE_SENTINEL, ContentItem, NO_INFORMATION_SENTINEL, NONSENSICAL_SENTINEL,
        SearchErrorKind, Section, SectionKey, SectionMap,
    },
};

const NO_INFORMATION_PHRASES: &[&str] = &[
    "couldn't generate information",
    "could not generate information",
];

/// U+FE0F, which some models emit after a section emoji.
const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Unlabeled lines longer than this are prose, not a name.
const MAX_NAME_LINE_CHARS: usize = 60;

const NAME_LABELS: &[&str] = &["Shoe Name", "Name", "Model"];

/// Placeholder brand used by the service-limited template.
const UNKNOWN_BRAND: &str = "Unable to determine";

/// Keyword to display brand, first match wins.
const BRAND_KEYWORDS: &[(&str, &str)] = &[
    ("nike", "Nike"),
    ("jordan", "Nike"),
    ("adidas", "Adidas"),
    ("yeezy", "Adidas"),
    ("new balance", "New Balance"),
    ("puma", "Puma"),
    ("reebok", "Reebok"),
    ("converse", "Converse"),
    ("vans", "Vans"),
    ("asics", "ASICS"),
    ("under armour", "Under Armour"),
    ("hoka", "HOKA"),
    ("saucony", "Saucony"),
    ("brooks", "Brooks"),
    ("mizuno", "Mizuno"),
    ("balenciaga", "Balenciaga"),
    ("skechers", "Skechers"),
    ("fila", "Fila"),
];

static BRAND_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mi)^[ \t]*brand:[ \t]*(.*)$").unwrap());
static SHOE_NAME_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*shoe name:[ \t]*(.*)$").unwrap());
static BRAND_KEYWORD_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    BRAND_KEYWORDS
        .iter()
        .map(|(keyword, brand)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(keyword));
            (Regex::new(&pattern).unwrap(), *brand)
        })
        .collect()
});

/// Parse cleaned text into sections, or the designed error the text signals.
pub fn parse(cleaned: &str) -> Result<SectionMap, SearchErrorKind> {
    if let Some(kind) = sentinel_error(cleaned) {
        return Err(kind);
    }

    let text = collapse_duplicate_brands(cleaned);
    let mut sections = SectionMap::new();

    for span in marker_spans(&text) {
        let key = span.key;
        let mut body = clean(strip_heading(key, &text[span.body.clone()]));
        if key == SectionKey::NameAndBrand {
            body = reconcile_brand(&body);
        }
        let items = split_items(&body);
        sections.insert(key, Section { text: body, items });
    }

    Ok(sections)
}

fn sentinel_error(text: &str) -> Option<SearchErrorKind> {
    if text.trim().is_empty() {
        return Some(SearchErrorKind::NoInformation);
    }
    if text.contains(NONSENSICAL_SENTINEL) {
        return Some(SearchErrorKind::Nonsensical);
    }
    if text.contains(NO_INFORMATION_SENTINEL) || text.contains(API_FAILURE_SENTINEL) {
        return Some(SearchErrorKind::NoInformation);
    }
    let lower = text.to_lowercase();
    NO_INFORMATION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
        .then_some(SearchErrorKind::NoInformation)
}

/// Cleaned answer text with the name-and-brand block reduced to its `Shoe Name:` line and
/// one corrected `Brand:` line, when the shoe name already carries the brand. Everything
/// outside that block is left as is.
pub fn repair_name_section(cleaned: &str) -> String {
    let text = collapse_duplicate_brands(cleaned);
    let Some(span) = marker_spans(&text)
        .into_iter()
        .find(|span| span.key == SectionKey::NameAndBrand)
    else {
        return text;
    };

    let key = span.key;
    let body = clean(strip_heading(key, &text[span.body.clone()]));
    let Some(block) = corrected_brand(&body).and_then(|brand| branded_name_block(&body, &brand))
    else {
        return text;
    };

    let before = &text[..span.marker_start];
    let after = &text[span.body.end..];
    let mut repaired = format!("{before}{}\n{block}", key.header_line());
    if !after.is_empty() {
        repaired.push_str("\n\n");
        repaired.push_str(after);
    }
    repaired
}

struct MarkerSpan {
    key: SectionKey,
    marker_start: usize,
    body: Range<usize>,
}

/// Every section whose marker appears, in text order. Each body runs to the nearest
/// following marker of any section.
fn marker_spans(text: &str) -> Vec<MarkerSpan> {
    let mut starts: Vec<(usize, SectionKey)> = SectionKey::ALL
        .iter()
        .filter_map(|key| text.find(key.marker()).map(|pos| (pos, *key)))
        .collect();
    starts.sort_unstable();

    starts
        .iter()
        .enumerate()
        .map(|(i, (pos, key))| {
            let body_start = pos + key.marker().len();
            let body_end = starts.get(i + 1).map_or(text.len(), |(next, _)| *next);
            MarkerSpan {
                key: *key,
                marker_start: *pos,
                body: body_start..body_end,
            }
        })
        .collect()
}

fn is_heading_trim(c: char) -> bool {
    c.is_whitespace() || c == VARIATION_SELECTOR
}

/// Drop the section title after the marker, ignoring case, along with a trailing colon.
fn strip_heading(key: SectionKey, body: &str) -> &str {
    let body = body.trim_start_matches(is_heading_trim);
    let heading = key.heading();
    match body.get(..heading.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(heading) => body[heading.len()..]
            .trim_start_matches(|c: char| c == ':' || c == VARIATION_SELECTOR),
        _ => body,
    }
}

/// Exact fixes for the two most common artifacts, then the generic collapse.
fn dedupe_brand(raw: &str) -> String {
    let value = raw.trim();
    match value {
        "NikeNike" => "Nike".to_string(),
        "AdidasAdidas" => "Adidas".to_string(),
        _ => collapse_duplicate_brands(&collapse_brand_value(value)),
    }
}

fn corrected_brand(body: &str) -> Option<String> {
    BRAND_LINE.captures(body).map(|caps| dedupe_brand(&caps[1]))
}

/// `Shoe Name:` and `Brand:` lines alone, when the shoe name contains the brand.
fn branded_name_block(body: &str, brand: &str) -> Option<String> {
    let name = SHOE_NAME_LINE.captures(body)?[1].trim().to_string();
    (!name.is_empty() && !brand.is_empty() && name.to_lowercase().contains(&brand.to_lowercase()))
        .then(|| format!("Shoe Name: {name}\nBrand: {brand}"))
}

/// Rewrite the name-and-brand body so it ends with exactly one corrected `Brand:` line.
/// When the shoe name already carries the brand, only the name line is kept above it.
fn reconcile_brand(body: &str) -> String {
    let Some(brand) = corrected_brand(body) else {
        return body.to_string();
    };
    if let Some(block) = branded_name_block(body, &brand) {
        return block;
    }

    let rest = BRAND_LINE
        .replace_all(body, "")
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if rest.is_empty() {
        format!("Brand: {brand}")
    } else {
        format!("{rest}\nBrand: {brand}")
    }
}

/// Split a section body into items on hyphens and line breaks. Hyphenated words
/// inside a value get split too.
fn split_items(body: &str) -> Vec<ContentItem> {
    body.split('-')
        .flat_map(str::lines)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once(':') {
            Some((label, value)) if !label.trim().is_empty() => ContentItem::Labeled {
                label: label.trim().to_string(),
                value: value.trim().to_string(),
            },
            _ => ContentItem::Paragraph {
                text: item.to_string(),
            },
        })
        .collect()
}

fn title_case(term: &str) -> String {
    term.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn labeled_name(sections: &SectionMap) -> Option<String> {
    let section = sections.get(SectionKey::NameAndBrand)?;
    NAME_LABELS
        .iter()
        .filter_map(|label| section.labeled(label))
        .map(str::trim)
        .find(|name| !name.is_empty())
        .map(str::to_string)
}

/// Display name: a name or model label, else the first short unlabeled line, else the
/// search term in title case.
pub fn display_shoe_name(sections: &SectionMap, term: &str) -> String {
    if let Some(name) = labeled_name(sections) {
        return name;
    }

    sections
        .get(SectionKey::NameAndBrand)
        .and_then(|section| {
            section.items.iter().find_map(|item| match item {
                ContentItem::Paragraph { text } if text.chars().count() <= MAX_NAME_LINE_CHARS => {
                    Some(text.clone())
                }
                _ => None,
            })
        })
        .unwrap_or_else(|| title_case(term))
}

pub fn brand_from_keywords(text: &str) -> Option<&'static str> {
    BRAND_KEYWORD_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, brand)| *brand)
}

/// Display brand: the brand line, then keywords in the shoe name, the history section
/// and finally the search term.
pub fn display_brand(sections: &SectionMap, term: &str) -> Option<String> {
    let from_line = sections
        .get(SectionKey::NameAndBrand)
        .and_then(|section| section.labeled("Brand"))
        .map(str::trim)
        .filter(|brand| !brand.is_empty() && !brand.eq_ignore_ascii_case(UNKNOWN_BRAND))
        .map(str::to_string);

    from_line
        .or_else(|| labeled_name(sections).and_then(|name| brand_from_keywords(&name).map(String::from)))
        .or_else(|| {
            sections
                .get(SectionKey::History)
                .and_then(|section| brand_from_keywords(&section.text))
                .map(String::from)
        })
        .or_else(|| brand_from_keywords(term).map(String::from))
}
