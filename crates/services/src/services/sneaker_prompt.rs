//! Instruction text sent to the model for a normalized sneaker term.

use super::{sneaker_sections::SectionKey, term_normalizer::NormalizedTerm};

const SUPPORTED_BRANDS: &str = "Nike, Adidas, Puma, Reebok, Under Armour, New Balance, ASICS, \
Converse, Jordan, Vans, Yeezy, Skechers, HOKA, Brooks, Saucony, Mizuno, Fila, K-Swiss, \
Balenciaga, Alexander McQueen, Margiela";

const RULES: &[&str] = &[
    "Keep all section emojis exactly as shown",
    "Do not include extra headers or information",
    "Keep responses concise but informative",
    "Do not use markdown formatting in your response",
    "For less popular sneakers, provide the best estimates and information available",
    "If you're uncertain about specific details, provide general information about the model line or brand",
    "Do NOT default to popular models if you don't know the specific model requested",
    "Be honest about limitations in your knowledge but provide the best information you can",
];

/// Field template lines under each heading.
fn section_body(key: SectionKey) -> &'static str {
    match key {
        SectionKey::NameAndBrand => {
            "Shoe Name: [full name of the sneaker, be very specific about the model]\n\
             Brand: [brand name]"
        }
        SectionKey::History => {
            "[brief history of the sneaker, brand history if specific model history is unavailable, \
             and any cultural impact]"
        }
        SectionKey::Launch => {
            "Launch Date: [original release date or estimate]\n\
             Launch Price: [retail price at launch or estimate]"
        }
        SectionKey::Price => {
            "StockX: [current price range on StockX, or \"Not commonly found on StockX\" if unavailable]\n\
             GOAT: [current price range on GOAT, or \"Not commonly found on GOAT\" if unavailable]\n\
             Stadium Goods: [current price range on Stadium Goods, or \"Not commonly found on Stadium Goods\" if unavailable]\n\
             eBay: [approximate price range on eBay or \"Prices vary by seller\" if uncertain]"
        }
        SectionKey::Trends => {
            "[describe how the price has changed over time or general market trends for this type of shoe]"
        }
        SectionKey::Prediction => {
            "Predicted price increase: [estimate of potential appreciation or \"Likely to follow retail \
             pricing trends\" for non-collectible models]\n\
             Price expected to reach in: [timeframe and price prediction or general assessment]"
        }
        SectionKey::Features => {
            "Main features: [describe key features of the sneaker or similar models in the line]"
        }
        SectionKey::Investment => {
            "Potential for future value appreciation: [investment analysis - be honest if it's not \
             likely to be an investment piece]"
        }
        SectionKey::Recommendation => {
            "Buy for personal use or investment: [recommendation for buyers]"
        }
    }
}

/// Build the full prompt for one lookup. The nine headers appear in canonical order.
pub fn build_prompt(term: &NormalizedTerm) -> String {
    let mut prompt = format!(
        "Please provide detailed information about the sneaker \"{term}\" in the following format.\n\
         This system needs to support ALL major sneaker brands including {SUPPORTED_BRANDS}, and many others.\n\n\
         If this is a lesser-known model, please still provide as much accurate information as possible \
         based on your knowledge.\n\
         Use these exact emoji section headers and structure:\n"
    );

    for key in SectionKey::ALL {
        prompt.push('\n');
        prompt.push_str(&key.header_line());
        prompt.push('\n');
        prompt.push_str(section_body(key));
        prompt.push('\n');
    }

    prompt.push_str("\nIMPORTANT:\n");
    for rule in RULES {
        prompt.push_str("- ");
        prompt.push_str(rule);
        prompt.push('\n');
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::term_normalizer::normalize;

    #[test]
    fn test_prompt_names_the_term() {
        let prompt = build_prompt(&normalize("nike dunk panda"));
        assert!(prompt.contains("\"nike dunk low panda\""));
    }

    #[test]
    fn test_prompt_lists_headers_in_order() {
        let prompt = build_prompt(&normalize("adidas samba"));
        let positions: Vec<usize> = SectionKey::ALL
            .iter()
            .map(|key| {
                prompt
                    .find(&key.header_line())
                    .unwrap_or_else(|| panic!("missing header for {key}"))
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_prompt_carries_output_rules() {
        let prompt = build_prompt(&normalize("adidas samba"));
        assert!(prompt.contains("Brand: [brand name]"));
        assert!(prompt.contains("- Do not use markdown formatting in your response"));
        assert!(prompt.contains("- Do NOT default to popular models"));
        assert!(prompt.contains("New Balance"));
    }
}
