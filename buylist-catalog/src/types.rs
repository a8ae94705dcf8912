//! Data model types for the buy-list catalog and customer submissions.
//!
//! These types are persisted as JSON documents, so field names follow the
//! camelCase layout of the stored records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Catalog ─────────────────────────────────────────────────────────────────

/// One row of the merchant's buy list.
///
/// `price` is the store's offer price (already multiplied by the buy price
/// multiplier), always formatted with two fractional digits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub number: String,
    /// Condition code exactly as it appeared in the source file.
    #[serde(default = "default_condition_code")]
    pub condition: String,
    pub price: String,
}

fn default_condition_code() -> String {
    Condition::NearMint.code().to_string()
}

// ── Condition ───────────────────────────────────────────────────────────────

/// Card condition grade, from best to worst.
///
/// Unknown or missing codes resolve to [`Condition::NearMint`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Condition {
    #[default]
    NearMint,
    LightlyPlayed,
    ModeratelyPlayed,
    HeavilyPlayed,
    Damaged,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::NearMint,
        Condition::LightlyPlayed,
        Condition::ModeratelyPlayed,
        Condition::HeavilyPlayed,
        Condition::Damaged,
    ];

    /// Short code used in submissions and catalog files (e.g., "LP").
    pub fn code(self) -> &'static str {
        match self {
            Self::NearMint => "NM",
            Self::LightlyPlayed => "LP",
            Self::ModeratelyPlayed => "MP",
            Self::HeavilyPlayed => "HP",
            Self::Damaged => "DMG",
        }
    }

    /// Full label used by the partner export (e.g., "Lightly Played").
    pub fn label(self) -> &'static str {
        match self {
            Self::NearMint => "Near Mint",
            Self::LightlyPlayed => "Lightly Played",
            Self::ModeratelyPlayed => "Moderately Played",
            Self::HeavilyPlayed => "Heavily Played",
            Self::Damaged => "Damaged",
        }
    }

    /// Resolve a condition code, falling back to Near Mint for anything unknown.
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .unwrap_or_default()
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl From<String> for Condition {
    fn from(s: String) -> Self {
        Self::from_code(&s)
    }
}

impl From<Condition> for String {
    fn from(c: Condition) -> Self {
        c.code().to_string()
    }
}

// ── Submissions ─────────────────────────────────────────────────────────────

/// One card on a customer's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionCard {
    pub name: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub condition: Condition,
    /// Always at least 1.
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl SubmissionCard {
    /// A near-mint single copy of a card.
    pub fn new(name: impl Into<String>, set: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            set: set.into(),
            number: String::new(),
            condition: Condition::NearMint,
            quantity: 1,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity.max(1);
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = number.into();
        self
    }
}

/// Contact details of the customer who sent a list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Workflow state of a submission. Any state may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Pending,
    Contacted,
    Finalized,
}

impl SubmissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Contacted => "contacted",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "contacted" => Ok(Self::Contacted),
            "finalized" => Ok(Self::Finalized),
            other => Err(format!(
                "Unknown status '{other}' (expected pending, contacted or finalized)"
            )),
        }
    }
}

/// A stored customer submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Document id; older records may not carry it in the body.
    #[serde(default)]
    pub id: String,
    pub customer: Customer,
    pub cards: Vec<SubmissionCard>,
    #[serde(default)]
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
}
