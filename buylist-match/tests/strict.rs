use buylist_catalog::{CatalogEntry, SubmissionCard};
use buylist_match::*;

fn entry(name: &str, set: &str, price: &str) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        set: set.to_string(),
        number: String::new(),
        condition: "NM".to_string(),
        price: price.to_string(),
    }
}

#[test]
fn case_and_whitespace_insensitive() {
    let catalog = vec![entry("Charizard", "Base Set", "30.00")];
    let index = StrictIndex::build(&catalog);
    let card = SubmissionCard::new("  charizard", "BASE SET");
    assert_eq!(index.lookup(&card), Some(0));
}

#[test]
fn punctuation_insensitive() {
    let catalog = vec![entry("Mr. Mime", "Jungle", "2.00")];
    let index = StrictIndex::build(&catalog);
    assert_eq!(index.lookup(&SubmissionCard::new("mr mime", "jungle")), Some(0));
}

#[test]
fn first_duplicate_wins() {
    let catalog = vec![
        entry("Pikachu", "Jungle", "1.00"),
        entry("PIKACHU", "jungle", "9.00"),
    ];
    let index = StrictIndex::build(&catalog);
    assert_eq!(index.len(), 1);
    let hit = index.lookup(&SubmissionCard::new("pikachu", "Jungle")).unwrap();
    assert_eq!(catalog[hit].price, "1.00");
}

#[test]
fn set_must_match() {
    let catalog = vec![entry("Charizard", "Base Set", "30.00")];
    let index = StrictIndex::build(&catalog);
    assert!(index.lookup(&SubmissionCard::new("Charizard", "Base Set 2")).is_none());
    assert!(index.lookup(&SubmissionCard::new("Charizard", "")).is_none());
}

#[test]
fn match_cards_keys_by_row() {
    let catalog = vec![
        entry("Charizard", "Base Set", "30.00"),
        entry("Blastoise", "Base Set", "22.50"),
    ];
    let cards = vec![
        SubmissionCard::new("Blastoise", "Base Set"),
        SubmissionCard::new("Lugia", "Neo Genesis"),
        SubmissionCard::new("charizard", "base set"),
    ];
    let matches = StrictIndex::build(&catalog).match_cards(&cards);
    assert_eq!(matches.len(), 2);
    assert_eq!(matches.get(&0), Some(&1));
    assert_eq!(matches.get(&2), Some(&0));
    assert!(!matches.contains_key(&1));
}

#[test]
fn match_is_deterministic() {
    let catalog = vec![
        entry("Eevee", "Jungle", "1.00"),
        entry("Eevee", "Jungle", "2.00"),
        entry("Eevee", "Jungle", "3.00"),
    ];
    let cards = vec![SubmissionCard::new("eevee", "jungle")];
    for _ in 0..5 {
        let matches = StrictIndex::build(&catalog).match_cards(&cards);
        assert_eq!(matches.get(&0), Some(&0));
    }
}

#[test]
fn source_tags() {
    assert_eq!(MatchSource::Strict.tag(), "STRICT");
    assert_eq!(MatchSource::Fuzzy.tag(), "AI");
    assert_eq!(MatchSource::None.tag(), "NONE");
    assert!(!MatchResult::none().is_match());
}
