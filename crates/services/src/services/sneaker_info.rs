//! End-to-end sneaker lookup: classify, normalize, ask the model (or the mock corpus),
//! then clean and parse the answer.

use std::sync::Arc;

use serde::Serialize;
use strum_macros::Display;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use super::{
    config::GeminiConfig,
    gemini_api::{GeminiApiClient, SneakerModel},
    mock_corpus::{self, MockLookup},
    response_cleaner::clean,
    section_parser::{display_brand, display_shoe_name, parse, repair_name_section},
    sneaker_prompt::build_prompt,
    sneaker_sections::{SearchErrorKind, SectionMap},
    term_classifier::classify,
    term_normalizer::{NormalizedTerm, normalize},
};

#[derive(Debug, Error)]
pub enum SneakerInfoError {
    #[error("search term is required")]
    EmptyTerm,
}

/// Where the answer text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResponseSource {
    Model,
    Mock,
    /// No model answer and no corpus entry; the text is the service-limited notice.
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SneakerReport {
    pub search_term: String,
    pub normalized_term: NormalizedTerm,
    pub source: ResponseSource,
    pub shoe_name: String,
    pub brand: Option<String>,
    pub sections: SectionMap,
}

/// Exactly one of a parsed report or a designed error state.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SearchResult {
    Report(SneakerReport),
    Error { error: SearchErrorKind },
}

impl SearchResult {
    fn error(kind: SearchErrorKind) -> Self {
        Self::Error { error: kind }
    }

    pub fn report(&self) -> Option<&SneakerReport> {
        match self {
            Self::Report(report) => Some(report),
            Self::Error { .. } => None,
        }
    }

    pub fn error_kind(&self) -> Option<SearchErrorKind> {
        match self {
            Self::Report(_) => None,
            Self::Error { error } => Some(*error),
        }
    }
}

enum Outcome {
    Nonsensical,
    Answered {
        normalized: NormalizedTerm,
        text: String,
        source: ResponseSource,
    },
}

pub struct SneakerInfoService {
    model: Option<Arc<dyn SneakerModel>>,
}

impl SneakerInfoService {
    pub fn new(model: Arc<dyn SneakerModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Every lookup is answered from the mock corpus.
    pub fn mock_only() -> Self {
        Self { model: None }
    }

    /// Gemini-backed service, or mock-only when no usable key is configured.
    pub fn from_config(config: GeminiConfig) -> Self {
        match GeminiApiClient::from_config(config) {
            Ok(client) => {
                info!(model = client.model(), "Gemini client ready");
                Self::new(Arc::new(client))
            }
            Err(e) => {
                warn!(error = %e, "Gemini client unavailable, serving mock corpus only");
                Self::mock_only()
            }
        }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Structured lookup.
    pub async fn search(&self, term: &str) -> Result<SearchResult, SneakerInfoError> {
        let span = info_span!("sneaker_search", search_id = %Uuid::new_v4());
        self.search_report(term).instrument(span).await
    }

    /// Plain-text lookup: the cleaned and brand-corrected answer, or a sentinel token for
    /// the error states. Agrees with [`Self::search`] on which answers are errors.
    pub async fn search_text(&self, term: &str) -> Result<String, SneakerInfoError> {
        let span = info_span!("sneaker_search", search_id = %Uuid::new_v4());
        self.search_plain(term).instrument(span).await
    }

    async fn search_report(&self, term: &str) -> Result<SearchResult, SneakerInfoError> {
        let Outcome::Answered {
            normalized,
            text,
            source,
        } = self.lookup(term).await?
        else {
            return Ok(SearchResult::error(SearchErrorKind::Nonsensical));
        };

        let sections = match parse_answer(&clean(&text)) {
            Ok(sections) => sections,
            Err(kind) => return Ok(SearchResult::error(kind)),
        };

        let term = term.trim();
        let report = SneakerReport {
            search_term: term.to_string(),
            shoe_name: display_shoe_name(&sections, term),
            brand: display_brand(&sections, term),
            normalized_term: normalized,
            source,
            sections,
        };
        info!(
            source = %report.source,
            sections = report.sections.len(),
            "sneaker search complete"
        );
        Ok(SearchResult::Report(report))
    }

    async fn search_plain(&self, term: &str) -> Result<String, SneakerInfoError> {
        let text = match self.lookup(term).await? {
            Outcome::Nonsensical => return Ok(SearchErrorKind::Nonsensical.sentinel().to_string()),
            Outcome::Answered { text, .. } => clean(&text),
        };
        match parse_answer(&text) {
            Ok(_) => Ok(repair_name_section(&text)),
            Err(kind) => Ok(kind.sentinel().to_string()),
        }
    }

    async fn lookup(&self, term: &str) -> Result<Outcome, SneakerInfoError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(SneakerInfoError::EmptyTerm);
        }

        let verdict = classify(term);
        if !verdict.is_plausible() {
            info!(term, ?verdict, "rejected implausible search term");
            return Ok(Outcome::Nonsensical);
        }

        let normalized = normalize(term);
        debug!(term, normalized = %normalized, "normalized search term");

        let (text, source) = match &self.model {
            Some(model) => match model.generate(&build_prompt(&normalized)).await {
                Ok(text) => (text, ResponseSource::Model),
                Err(e) => {
                    warn!(error = %e, "model call failed, falling back to mock corpus");
                    mock_answer(&normalized)
                }
            },
            None => mock_answer(&normalized),
        };

        Ok(Outcome::Answered {
            normalized,
            text,
            source,
        })
    }
}

/// Sections of a cleaned answer. An answer without any section marker has no information.
fn parse_answer(cleaned: &str) -> Result<SectionMap, SearchErrorKind> {
    match parse(cleaned) {
        Ok(sections) if sections.is_empty() => {
            debug!("answer has no section markers");
            Err(SearchErrorKind::NoInformation)
        }
        Ok(sections) => Ok(sections),
        Err(kind) => {
            info!(error = %kind, "answer signals an error state");
            Err(kind)
        }
    }
}

fn mock_answer(term: &NormalizedTerm) -> (String, ResponseSource) {
    let found = mock_corpus::lookup(term.as_str());
    let source = if found.is_unavailable() {
        ResponseSource::Unavailable
    } else {
        ResponseSource::Mock
    };
    (found.into_text(), source)
}
