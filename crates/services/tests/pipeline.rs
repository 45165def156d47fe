use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use services::services::{
    gemini_api::{GeminiApiClient, GeminiApiError, SneakerModel},
    mock_corpus::{self, ENTRIES},
    response_cleaner::clean,
    section_parser::parse,
    sneaker_info::{ResponseSource, SearchResult, SneakerInfoService},
    sneaker_sections::{SearchErrorKind, SectionKey},
};
use wiremock::{Mock, MockServer, ResponseTemplate, matchers::method};

/// Scripted model that records every prompt it receives.
struct FakeModel {
    reply: Result<String, GeminiApiError>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeModel {
    fn answering(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing(error: GeminiApiError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SneakerModel for FakeModel {
    async fn generate(&self, prompt: &str) -> Result<String, GeminiApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.reply.clone()
    }
}

fn report(result: &SearchResult) -> &services::services::sneaker_info::SneakerReport {
    result.report().expect("expected a report")
}

#[tokio::test]
async fn implausible_terms_never_reach_the_model() {
    let model = FakeModel::answering("unused");
    let service = SneakerInfoService::new(model.clone());

    for term in ["bulbul", "ab", "12345", "$$$nike$$$", "asdf shoes", "hello world"] {
        let result = service.search(term).await.unwrap();
        assert_eq!(result.error_kind(), Some(SearchErrorKind::Nonsensical), "{term}");
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn panda_falls_back_to_corpus_when_model_fails() {
    let model = FakeModel::failing(GeminiApiError::Timeout);
    let service = SneakerInfoService::new(model.clone());

    let result = service.search("nike dunk panda").await.unwrap();
    let report = report(&result);

    assert_eq!(model.calls(), 1);
    assert_eq!(report.normalized_term.as_str(), "nike dunk low panda");
    assert_eq!(report.source, ResponseSource::Mock);
    assert_eq!(report.sections.len(), 9);

    let name_and_brand = report.sections.get(SectionKey::NameAndBrand).unwrap();
    assert_eq!(name_and_brand.text.matches("Brand: Nike").count(), 1);
    assert!(!name_and_brand.text.contains("NikeNike"));
    assert_eq!(report.shoe_name, "Nike Dunk Low Panda");
    assert_eq!(report.brand.as_deref(), Some("Nike"));
}

#[tokio::test]
async fn prompt_carries_normalized_term() {
    let model = FakeModel::answering("👟 Shoe Name & Brand\nShoe Name: Air Jordan 4 University Blue\nBrand: Jordan");
    let service = SneakerInfoService::new(model.clone());

    let result = service.search("aj4 unc").await.unwrap();
    assert_eq!(report(&result).source, ResponseSource::Model);

    let prompts = model.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("\"air jordan 4 unc\""));
}

#[tokio::test]
async fn model_answer_is_cleaned_and_parsed() {
    let raw = "👟 Shoe Name & Brand\n**Shoe Name:** New Balance 550<br>Brand: NikeNike\n\n\
               💰 Current Market Price\nStockX: $100 $200\n\
               🔮 Future Price Prediction\nPredicted price increase: steady long\nterm growth";
    let service = SneakerInfoService::new(FakeModel::answering(raw));

    let result = service.search("new balance 550").await.unwrap();
    let report = report(&result);

    let keys: Vec<_> = report.sections.keys().collect();
    assert_eq!(keys, vec![SectionKey::NameAndBrand, SectionKey::Price, SectionKey::Prediction]);

    let price = report.sections.get(SectionKey::Price).unwrap();
    assert_eq!(price.text, "StockX: $100-$200");

    let prediction = report.sections.get(SectionKey::Prediction).unwrap();
    assert_eq!(prediction.text, "Predicted price increase: steady long-term growth");

    let name_and_brand = report.sections.get(SectionKey::NameAndBrand).unwrap();
    assert_eq!(name_and_brand.text, "Shoe Name: New Balance 550\nBrand: Nike");
}

#[tokio::test]
async fn sentinel_answers_map_to_error_states() {
    let service = SneakerInfoService::new(FakeModel::answering("ERROR_NO_INFORMATION"));
    let result = service.search("nike air max 1").await.unwrap();
    assert_eq!(result.error_kind(), Some(SearchErrorKind::NoInformation));

    let service = SneakerInfoService::new(FakeModel::answering(""));
    let result = service.search("nike air max 1").await.unwrap();
    assert_eq!(result.error_kind(), Some(SearchErrorKind::NoInformation));
    assert_eq!(service.search_text("nike air max 1").await.unwrap(), "ERROR_NO_INFORMATION");
}

const CHATTY_ANSWER: &str = "👟 Shoe Name & Brand\n\
    Shoe Name: Nike Dunk Low Panda\n\
    Brand: Nike\n\
    Here is what I found about this shoe.\n\n\
    🕒 Sneaker History\n\
    The Dunk began as a college basketball shoe in 1985.";

#[tokio::test]
async fn chatter_after_brand_line_is_dropped_on_both_channels() {
    let service = SneakerInfoService::new(FakeModel::answering(CHATTY_ANSWER));

    let result = service.search("nike dunk panda").await.unwrap();
    let report = report(&result);
    assert_eq!(report.brand.as_deref(), Some("Nike"));
    assert_eq!(
        report.sections.get(SectionKey::NameAndBrand).unwrap().text,
        "Shoe Name: Nike Dunk Low Panda\nBrand: Nike"
    );

    let text = service.search_text("nike dunk panda").await.unwrap();
    assert_eq!(
        text,
        "👟 Shoe Name & Brand\nShoe Name: Nike Dunk Low Panda\nBrand: Nike\n\n\
         🕒 Sneaker History\nThe Dunk began as a college basketball shoe in 1985."
    );
}

#[tokio::test]
async fn both_channels_agree_on_no_information() {
    for answer in [
        "Sorry, I couldn't generate information for that.",
        "Plain prose with no section headings at all.",
    ] {
        let service = SneakerInfoService::new(FakeModel::answering(answer));
        let result = service.search("nike air max 1").await.unwrap();
        assert_eq!(result.error_kind(), Some(SearchErrorKind::NoInformation), "{answer}");
        assert_eq!(
            service.search_text("nike air max 1").await.unwrap(),
            "ERROR_NO_INFORMATION",
            "{answer}"
        );
    }
}

#[tokio::test]
async fn unmatched_term_gets_service_limited_notice() {
    let service = SneakerInfoService::new(FakeModel::failing(GeminiApiError::RateLimited));

    let result = service.search("hoka clifton 9").await.unwrap();
    let report = report(&result);
    assert_eq!(report.source, ResponseSource::Unavailable);
    assert_eq!(report.shoe_name, "hoka clifton 9");
    assert_eq!(report.brand.as_deref(), Some("HOKA"));

    let text = service.search_text("hoka clifton 9").await.unwrap();
    assert!(text.contains("Service Temporarily Limited"));
    assert!(text.contains("Shoe Name: hoka clifton 9"));
}

#[test]
fn every_corpus_entry_parses_into_nine_clean_sections() {
    for entry in ENTRIES {
        let sections = parse(&clean(entry.text)).unwrap_or_else(|e| panic!("{}: {e}", entry.name));
        assert_eq!(sections.len(), 9, "{}", entry.name);
        for (key, section) in sections.iter() {
            for marker in SectionKey::ALL.map(SectionKey::marker) {
                assert!(
                    !section.text.contains(marker),
                    "{} / {key} still contains {marker}",
                    entry.name
                );
            }
        }
    }
}

#[test]
fn unmatched_lookup_is_never_empty() {
    let found = mock_corpus::lookup("completely unknown runner");
    assert!(found.is_unavailable());
    assert!(!found.text().trim().is_empty());
}

#[tokio::test]
async fn upstream_timeout_falls_back_to_corpus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "candidates": [{ "content": { "parts": [{ "text": "late" }] } }] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = GeminiApiClient::new(SecretString::from("key".to_string()), None)
        .unwrap()
        .with_base_url(server.uri())
        .with_timeout(Duration::from_millis(200));
    let service = SneakerInfoService::new(Arc::new(client));

    let result = service.search("nike dunk panda").await.unwrap();
    assert_eq!(report(&result).source, ResponseSource::Mock);
    assert_eq!(report(&result).sections.len(), 9);
}
