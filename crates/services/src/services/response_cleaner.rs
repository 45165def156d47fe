//! Scrubs raw model output into plain text the section parser can split.
//!
//! Everything here is total: any input, including the empty string, yields a string.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::rewrite::{RewriteRule, apply_all};

/// Brands with a fixed collapse rule for "NikeNike" / "Nike Nike" style repeats.
const REPEATED_BRANDS: &[(&str, &str)] = &[
    ("nike", "Nike"),
    ("adidas", "Adidas"),
    ("jordan", "Jordan"),
    ("yeezy", "Yeezy"),
    ("puma", "Puma"),
    ("reebok", "Reebok"),
    ("new balance", "New Balance"),
];

/// Halving a fused token only applies when each half is at least this long.
const MIN_FUSED_HALF: usize = 3;

static BRAND_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^([ \t]*brand:[ \t]*)(.*)$").unwrap());
static COLOR_ON_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([a-z]+)[\s\-]+(on)[\s\-]+([a-z]+)\b").unwrap());
static LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9 &/'().]{0,40}:").unwrap());

static BRAND_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    REPEATED_BRANDS
        .iter()
        .map(|(brand, canonical)| {
            let word = regex::escape(brand);
            let pattern = Regex::new(&format!(r"(?i)\b{word}[ \t]*{word}\b")).unwrap();
            (pattern, *canonical)
        })
        .collect()
});

static RULES: Lazy<Vec<RewriteRule>> = Lazy::new(|| {
    vec![
        RewriteRule::replace("crlf", r"\r\n?", "\n"),
        RewriteRule::replace("html_breaks", r"(?i)<br\s*/?>", "\n"),
        RewriteRule::replace("html_tags", r"<[^<>]*>", ""),
        RewriteRule::replace("stray_angle_brackets", r"[<>]", ""),
        RewriteRule::replace("markdown_bold", r"\*\*|__", ""),
        RewriteRule::replace("markdown_italic", r"\*", ""),
        RewriteRule::replace("brand_section_labels", r"\b\w+[ \t]+Section:", ""),
        RewriteRule::custom("duplicate_brand_tokens", collapse_brand_lines),
        RewriteRule::custom("repeated_brand_names", collapse_repeated_brands),
        RewriteRule::replace("price_dash_gap", r"\$\s*-\s*\$", "$$-$$"),
        RewriteRule::replace(
            "price_range_dash_spacing",
            r"\$(\d[\d,.]*)[ \t]*-[ \t]*\$(\d[\d,.]*)",
            "$$${1}-$$${2}",
        ),
        RewriteRule::replace(
            "price_range_join",
            r"\$(\d[\d,.]*)[ \t]+\$(\d[\d,.]*)",
            "$$${1}-$$${2}",
        ),
        RewriteRule::replace("trailing_dollar", r"(?m)[ \t]*\$[ \t]*$", ""),
        RewriteRule::replace("collapse_spaces", r"[ \t]+", " "),
        RewriteRule::replace("trim_lines", r"(?m)^ | $", ""),
        RewriteRule::replace("collapse_blank_lines", r"\n{3,}", "\n\n"),
        RewriteRule::replace("hyphen_line_break", r"(\w)-[ \t]*\n[ \t]*(\w)", "${1}-${2}"),
        RewriteRule::custom("word_line_break", join_broken_lines),
        RewriteRule::custom("color_on_color", join_color_on_color),
        RewriteRule::join_words("long_term", &["long", "term"]),
        RewriteRule::join_words("ready_to_wear", &["ready", "to", "wear"]),
        RewriteRule::join_words("one_of_a_kind", &["one", "of", "a", "kind"]),
        RewriteRule::join_words("limited_edition", &["limited", "edition"]),
        RewriteRule::join_words("high_end", &["high", "end"]),
        RewriteRule::join_words("mid_range", &["mid", "range"]),
    ]
});

pub fn clean(raw: &str) -> String {
    if raw.trim().is_empty() {
        return String::new();
    }
    apply_all(&RULES, raw).trim().to_string()
}

/// Collapse a brand value such as `NikeNike`, `Nike Nike` or
/// `New Balance New Balance` to a single occurrence.
pub fn collapse_brand_value(value: &str) -> String {
    let mut tokens: Vec<String> = value
        .split_whitespace()
        .map(|token| unfuse_token(token).to_string())
        .collect();

    tokens.dedup_by(|a, b| a.eq_ignore_ascii_case(b));

    let half = tokens.len() / 2;
    if tokens.len() >= 2
        && tokens.len() % 2 == 0
        && tokens[..half]
            .iter()
            .zip(&tokens[half..])
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
    {
        tokens.truncate(half);
    }

    tokens.join(" ")
}

/// Generic and per-brand duplicate collapses, usable on any text.
pub fn collapse_duplicate_brands(text: &str) -> String {
    collapse_repeated_brands(&collapse_brand_lines(text))
}

fn unfuse_token(token: &str) -> &str {
    let chars = token.chars().count();
    if chars % 2 != 0 || chars / 2 < MIN_FUSED_HALF {
        return token;
    }
    let mid = token
        .char_indices()
        .nth(chars / 2)
        .map_or(token.len(), |(idx, _)| idx);
    let (head, tail) = token.split_at(mid);
    if head.eq_ignore_ascii_case(tail) { head } else { token }
}

fn collapse_brand_lines(text: &str) -> String {
    BRAND_LINE
        .replace_all(text, |caps: &Captures| {
            format!("{}{}", &caps[1], collapse_brand_value(&caps[2]))
        })
        .into_owned()
}

fn collapse_repeated_brands(text: &str) -> String {
    BRAND_RULES
        .iter()
        .fold(text.to_string(), |acc, (pattern, canonical)| {
            pattern.replace_all(&acc, *canonical).into_owned()
        })
}

/// Lines opening with an emoji or other symbol are headings.
fn is_header_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| !c.is_ascii() && !c.is_alphanumeric())
}

fn ends_with_word_char(line: &str) -> bool {
    line.chars().last().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn starts_with_word_char(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Re-join a sentence the model wrapped mid-line. Blank lines, section headers and
/// `Label: value` lines always stay on their own line, and nothing is appended to them.
fn join_broken_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut lines = text.split('\n').peekable();

    while let Some(line) = lines.next() {
        out.push_str(line);
        let Some(next) = lines.peek() else { break };

        let joins = ends_with_word_char(line)
            && starts_with_word_char(next)
            && !is_header_line(line)
            && !LABEL_LINE.is_match(line)
            && !LABEL_LINE.is_match(next);
        out.push(if joins { ' ' } else { '\n' });
    }

    out
}

/// `white on white` -> `white-on-white`, only when both colors match.
fn join_color_on_color(text: &str) -> String {
    COLOR_ON_COLOR
        .replace_all(text, |caps: &Captures| {
            if caps[1].eq_ignore_ascii_case(&caps[3]) {
                format!("{}-{}-{}", &caps[1], &caps[2], &caps[3])
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}
