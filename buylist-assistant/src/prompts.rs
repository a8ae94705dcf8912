//! Prompt text for each assistant task.

use buylist_catalog::{CatalogEntry, SubmissionCard};

pub const CLASSIFY_INSTRUCTION: &str = "Return only the index number or -1.";
pub const RAW_JSON_INSTRUCTION: &str = "Return only raw JSON. No markdown.";

/// Longest card list (in characters) included in a collection summary.
pub const VIBE_LIST_LIMIT: usize = 2000;

/// Enumerate candidates as `idx: name | set | $price`, one per line.
pub fn candidate_lines(candidates: &[&CatalogEntry]) -> String {
    candidates
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}: {} | {} | ${}", i, c.name, c.set, c.price))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Ask whether any candidate is the same card as the customer's.
pub fn classify_prompt(card: &SubmissionCard, candidates: &[&CatalogEntry]) -> String {
    format!(
        "I am matching Pokemon cards. Customer Card: \"{name}\" from set \"{set}\".\n\
         Candidates:\n{list}\n\
         Task: Identify if any candidate is the SAME card.\n\
         - Focus primarily on NAME and SET.\n\
         - IGNORE the Card Number unless it helps confirm a match.\n\
         - Allow for differences like \"Base Set 2\" vs \"Base Set II\".\n\
         If you find a match with >50% confidence, return ONLY the index number. \
         If no match is found, return \"-1\".",
        name = card.name,
        set = card.set,
        list = candidate_lines(candidates),
    )
}

/// One line of an offer: `- 2x Charizard (Base Set): $30.00/ea`.
pub fn offer_line(card: &SubmissionCard, unit_price: &str) -> String {
    format!(
        "- {}x {} ({}): ${}/ea",
        card.quantity.max(1),
        card.name,
        card.set,
        unit_price
    )
}

/// Ask for an offer email listing the selected cards and the total.
pub fn offer_email_prompt(shop_name: &str, first_name: &str, lines: &[String], total: &str) -> String {
    format!(
        "Write a friendly but professional email from \"{shop_name}\" to a customer named {first_name}.\n\
         Context: We reviewed their list and want to buy specific cards.\n\
         Here is the list of cards we are offering to buy, including our buy prices:\n\
         {list}\n\
         Total Offer Amount: ${total}\n\
         Instructions:\n\
         - Thank them for the submission.\n\
         - Present the list clearly.\n\
         - Mention the total offer price prominently.\n\
         - Ask them to reply to confirm so we can send shipping instructions.\n\
         - Keep it concise.\n\
         - Do not include a subject line.",
        list = lines.join("\n"),
    )
}

/// Ask for a two-sentence character sketch of a customer's list.
pub fn collection_vibe_prompt(cards: &[SubmissionCard]) -> String {
    let list = cards
        .iter()
        .map(|c| format!("{}x {} ({})", c.quantity, c.name, c.set))
        .collect::<Vec<_>>()
        .join(", ");
    let clipped: String = list.chars().take(VIBE_LIST_LIMIT).collect();
    format!(
        "Analyze this list of Pokemon cards and provide a 2-sentence summary of the \
         collection's \"vibe\" for a store owner. Mention if it's mostly vintage, modern, \
         high-value, or bulk. List: {clipped}..."
    )
}

/// Ask for structured cards out of free-form pasted text.
pub fn extract_cards_prompt(text: &str) -> String {
    format!(
        "You are a data parser. Extract Pokemon cards from this text. Return strictly a JSON \
         array of objects with keys: \"name\", \"set\", \"number\", \"condition\", \"quantity\". \
         If condition is missing, use \"NM\". If quantity is missing, use 1. If info is missing, \
         use empty string. Text: \"{text}\""
    )
}

/// Ask for the identity and condition of the card in a photo.
pub const SCAN_CARD_PROMPT: &str = "Look at this Pokemon card. Identify the Name, Set Name, \
     Card Number, and estimate Condition (NM, LP, MP, HP, DMG). Return strictly JSON object \
     with keys: name, set, number, condition.";

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, set: &str, price: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.into(),
            set: set.into(),
            number: String::new(),
            condition: "NM".into(),
            price: price.into(),
        }
    }

    #[test]
    fn candidates_are_numbered_from_zero() {
        let a = entry("Charizard", "Base Set", "30.00");
        let b = entry("Charizard", "Base Set 2", "12.00");
        assert_eq!(
            candidate_lines(&[&a, &b]),
            "0: Charizard | Base Set | $30.00\n1: Charizard | Base Set 2 | $12.00"
        );
    }

    #[test]
    fn classify_prompt_mentions_card_and_sentinel() {
        let a = entry("Charizard", "Base Set", "30.00");
        let card = SubmissionCard::new("Charizard", "Base Set II");
        let p = classify_prompt(&card, &[&a]);
        assert!(p.contains("Customer Card: \"Charizard\" from set \"Base Set II\""));
        assert!(p.contains("0: Charizard | Base Set | $30.00"));
        assert!(p.contains(">50% confidence"));
        assert!(p.contains("\"-1\""));
    }

    #[test]
    fn offer_line_format() {
        let card = SubmissionCard::new("Blastoise", "Base Set").with_quantity(2);
        assert_eq!(offer_line(&card, "22.50"), "- 2x Blastoise (Base Set): $22.50/ea");
    }

    #[test]
    fn email_prompt_has_total_and_lines() {
        let lines = vec!["- 1x Mew (Promo): $5.00/ea".to_string()];
        let p = offer_email_prompt("Broken TCG", "Ash", &lines, "5.00");
        assert!(p.contains("from \"Broken TCG\" to a customer named Ash"));
        assert!(p.contains("- 1x Mew (Promo): $5.00/ea"));
        assert!(p.contains("Total Offer Amount: $5.00"));
        assert!(p.contains("Do not include a subject line."));
    }

    #[test]
    fn vibe_list_is_clipped() {
        let cards: Vec<SubmissionCard> = (0..500)
            .map(|i| SubmissionCard::new(format!("Card {i}"), "Jungle"))
            .collect();
        let p = collection_vibe_prompt(&cards);
        let list = p.split("List: ").nth(1).unwrap();
        assert_eq!(list.chars().count(), VIBE_LIST_LIMIT + 3);
        assert!(list.ends_with("..."));
    }

    #[test]
    fn extract_prompt_quotes_text() {
        let p = extract_cards_prompt("2 charizards");
        assert!(p.ends_with("Text: \"2 charizards\""));
    }
}
