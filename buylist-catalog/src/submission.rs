//! Customer list intake: CSV import and validation before storage.

use std::path::Path;

use crate::error::{IngestError, SubmissionError};
use crate::ingest::{NUMBER_HEADERS, resolve_name_and_set};
use crate::price::parse_quantity;
use crate::table::parse_rows;
use crate::types::{Condition, Customer, SubmissionCard};

pub const QUANTITY_HEADERS: &[&str] = &["quantity", "qty", "count"];

/// Parse a customer's card list from CSV text.
///
/// Uses the same column aliases and set inference as catalog ingestion.
/// Rows without a card name are dropped.
pub fn parse_submission_csv(text: &str) -> Vec<SubmissionCard> {
    parse_rows(text)
        .iter()
        .filter_map(|row| {
            let (name, set) = resolve_name_and_set(row);
            if name.trim().is_empty() {
                return None;
            }
            Some(SubmissionCard {
                name,
                set,
                number: row.first_of(NUMBER_HEADERS).to_string(),
                condition: Condition::from_code(row.get("condition")),
                quantity: parse_quantity(row.first_of(QUANTITY_HEADERS)),
            })
        })
        .collect()
}

/// Read and parse a customer list CSV file.
pub fn parse_submission_file(path: &Path) -> Result<Vec<SubmissionCard>, IngestError> {
    let text = String::from_utf8(std::fs::read(path)?)?;
    Ok(parse_submission_csv(&text))
}

/// A submission as entered by the customer, before it is stored.
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
    pub customer: Customer,
    pub cards: Vec<SubmissionCard>,
}

impl NewSubmission {
    pub fn new(customer: Customer) -> Self {
        Self {
            customer,
            cards: Vec::new(),
        }
    }

    pub fn with_cards(mut self, cards: impl IntoIterator<Item = SubmissionCard>) -> Self {
        self.cards.extend(cards);
        self
    }

    /// Check contact details and clean the card list.
    ///
    /// Blank cards are dropped and quantities are raised to at least 1.
    pub fn validate(self) -> Result<(Customer, Vec<SubmissionCard>), SubmissionError> {
        let customer = Customer {
            first_name: self.customer.first_name.trim().to_string(),
            email: self.customer.email.trim().to_string(),
            phone: self.customer.phone.trim().to_string(),
        };
        if customer.first_name.is_empty() || customer.email.is_empty() {
            return Err(SubmissionError::MissingContact);
        }

        let cards: Vec<SubmissionCard> = self
            .cards
            .into_iter()
            .filter(|c| !c.name.trim().is_empty())
            .map(|mut c| {
                c.quantity = c.quantity.max(1);
                c
            })
            .collect();
        if cards.is_empty() {
            return Err(SubmissionError::NoCards);
        }

        Ok((customer, cards))
    }
}
