pub mod config;
pub mod gemini_api;
pub mod image_search;
pub mod mock_corpus;
pub mod response_cleaner;
pub mod rewrite;
pub mod section_parser;
pub mod sneaker_info;
pub mod sneaker_prompt;
pub mod sneaker_sections;
pub mod term_classifier;
pub mod term_normalizer;
