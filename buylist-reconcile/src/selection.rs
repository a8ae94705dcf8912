//! Operator selection of submission rows and the running offer total.

use std::collections::BTreeSet;

use buylist_catalog::price::{format_cents, price_cents};
use buylist_catalog::{CatalogEntry, SubmissionCard};

/// Set of selected submission-row indices, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeSet<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `row`. Returns whether it is now selected.
    pub fn toggle(&mut self, row: usize) -> bool {
        if self.rows.remove(&row) {
            false
        } else {
            self.rows.insert(row);
            true
        }
    }

    /// Replace the selection with exactly `rows`.
    pub fn replace(&mut self, rows: impl IntoIterator<Item = usize>) {
        self.rows = rows.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Sum of `price × quantity` over the selected rows, in cents.
///
/// `match_for` resolves a row to its matched catalog entry; rows without a
/// match (or outside `cards`) contribute nothing. The total saturates at
/// `u128::MAX` instead of overflowing.
pub fn offer_total_cents<'a>(
    cards: &[SubmissionCard],
    selection: &Selection,
    match_for: impl Fn(usize) -> Option<&'a CatalogEntry>,
) -> u128 {
    selection
        .iter()
        .filter_map(|row| {
            let card = cards.get(row)?;
            let entry = match_for(row)?;
            Some(price_cents(&entry.price).saturating_mul(u128::from(card.quantity.max(1))))
        })
        .fold(0, u128::saturating_add)
}

/// [`offer_total_cents`] formatted with two decimals.
pub fn offer_total<'a>(
    cards: &[SubmissionCard],
    selection: &Selection,
    match_for: impl Fn(usize) -> Option<&'a CatalogEntry>,
) -> String {
    format_cents(offer_total_cents(cards, selection, match_for))
}
