use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::AmountSelection;

pub(crate) const DEFAULT_HEADER_TOKENS: [&str; 5] =
    ["BALANCE", "DATE", "DESCRIPTION", "WITHDRAWAL", "DEPOSIT"];

/// Declarative, uncompiled form of a layout profile.
///
/// This is what gets registered (in code or from YAML); it is compiled into a
/// [`LayoutProfile`](super::profile::LayoutProfile) once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSpec {
    pub name: String,
    /// Issuer registration number, attached to transactions as `bank_id`
    #[serde(default)]
    pub issuer_id: Option<String>,
    /// Case-insensitive substring expected in the statement header
    #[serde(default)]
    pub detection_token: Option<String>,
    /// Tried in order; the first pattern with a hit wins for a line
    pub date_patterns: Vec<String>,
    /// May declare `amount` and `tag` named groups
    pub amount_pattern: String,
    #[serde(default)]
    pub noise_pattern: Option<String>,
    /// chrono format strings, tried in order
    pub date_formats: Vec<String>,
    pub currency: String,
    #[serde(default)]
    pub amount_selection: AmountSelection,
    /// Bank-specific profiles take part in strict detection and stamp statement metadata
    #[serde(default)]
    pub bank_specific: bool,
    /// Filename pattern with month-name and year capture groups
    #[serde(default)]
    pub statement_name_pattern: Option<String>,
    /// Header pattern with month-name and year capture groups
    #[serde(default)]
    pub period_pattern: Option<String>,
    #[serde(default = "default_header_tokens")]
    pub header_tokens: Vec<String>,
    /// Amounts above this are kept but flagged for manual review
    #[serde(default)]
    pub review_threshold: Option<Decimal>,
}

fn default_header_tokens() -> Vec<String> {
    DEFAULT_HEADER_TOKENS.iter().map(|t| t.to_string()).collect()
}

impl ProfileSpec {
    /// A spec with generic-profile defaults for everything but the required fields.
    pub fn new(
        name: &str,
        date_patterns: &[&str],
        amount_pattern: &str,
        date_formats: &[&str],
        currency: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            issuer_id: None,
            detection_token: None,
            date_patterns: date_patterns.iter().map(|p| p.to_string()).collect(),
            amount_pattern: amount_pattern.to_string(),
            noise_pattern: None,
            date_formats: date_formats.iter().map(|f| f.to_string()).collect(),
            currency: currency.to_string(),
            amount_selection: AmountSelection::default(),
            bank_specific: false,
            statement_name_pattern: None,
            period_pattern: None,
            header_tokens: default_header_tokens(),
            review_threshold: None,
        }
    }

    pub fn detection_token(mut self, token: &str) -> Self {
        self.detection_token = Some(token.to_string());
        self
    }

    pub fn noise_pattern(mut self, pattern: &str) -> Self {
        self.noise_pattern = Some(pattern.to_string());
        self
    }

    pub fn amount_selection(mut self, selection: AmountSelection) -> Self {
        self.amount_selection = selection;
        self
    }

    pub fn review_threshold(mut self, threshold: Decimal) -> Self {
        self.review_threshold = Some(threshold);
        self
    }

    /// Marks the spec as a bank-specific profile for the given issuer.
    pub fn bank(mut self, issuer_id: &str, statement_name_pattern: &str, period_pattern: &str) -> Self {
        self.bank_specific = true;
        self.issuer_id = Some(issuer_id.to_string());
        self.detection_token = Some(issuer_id.to_string());
        self.statement_name_pattern = Some(statement_name_pattern.to_string());
        self.period_pattern = Some(period_pattern.to_string());
        self
    }
}
