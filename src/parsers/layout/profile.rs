use std::path::Path;
use std::str::FromStr;

use chrono::Month;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::dto::ProfileSpec;
use crate::errors::{StatementParseError, StatementResult};
use crate::parsers::tokenizer::{self, AmountToken};
use crate::types::StatementMetadata;

/// Which amount on a multi-amount line is the transaction amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountSelection {
    /// Leftmost amounts are running balances; the last one is the transaction
    #[default]
    Rightmost,
    Leftmost,
    /// Zero-based column among the amount hits; lines with fewer hits are skipped
    Nth(usize),
}

impl AmountSelection {
    pub fn pick<'a>(&self, tokens: &[AmountToken<'a>]) -> Option<AmountToken<'a>> {
        match self {
            AmountSelection::Rightmost => tokens.last().copied(),
            AmountSelection::Leftmost => tokens.first().copied(),
            AmountSelection::Nth(index) => tokens.get(*index).copied(),
        }
    }
}

/// Compiled, immutable layout profile.
#[derive(Debug, Clone)]
pub struct LayoutProfile {
    pub name: String,
    pub issuer_id: Option<String>,
    pub detection_token: Option<String>,
    pub date_patterns: Vec<Regex>,
    pub amount_pattern: Regex,
    pub noise_pattern: Option<Regex>,
    pub date_formats: Vec<String>,
    pub currency: String,
    pub amount_selection: AmountSelection,
    pub bank_specific: bool,
    pub statement_name_pattern: Option<Regex>,
    pub period_pattern: Option<Regex>,
    /// Upper-cased
    pub header_tokens: Vec<String>,
    pub review_threshold: Option<Decimal>,
}

impl LayoutProfile {
    /// `lowered_text` must already be lower-cased.
    pub fn matches_token(&self, lowered_text: &str) -> bool {
        self.detection_token
            .as_deref()
            .map(|token| lowered_text.contains(&token.to_lowercase()))
            .unwrap_or(false)
    }

    /// The line with every date, amount and noise match removed.
    pub fn clean_description(&self, line: &str) -> String {
        let patterns = self
            .date_patterns
            .iter()
            .chain(std::iter::once(&self.amount_pattern))
            .chain(self.noise_pattern.iter());
        tokenizer::strip_all(line, patterns)
    }

    pub fn is_header(&self, description: &str) -> bool {
        let upper = description.to_uppercase();
        self.header_tokens.iter().any(|token| upper.contains(token.as_str()))
    }

    pub fn exceeds_review_threshold(&self, amount: Decimal) -> bool {
        self.review_threshold
            .map(|threshold| amount > threshold)
            .unwrap_or(false)
    }

    /// Statement-level metadata: issuer from the profile, period from the
    /// filename or, failing that, from the header text.
    ///
    /// Generic profiles carry no issuer or period patterns and yield empty metadata.
    pub fn statement_metadata(&self, filename: Option<&str>, header: &str) -> StatementMetadata {
        if !self.bank_specific {
            return StatementMetadata::default();
        }

        let from_filename = filename
            .map(|name| {
                Path::new(name)
                    .file_name()
                    .and_then(|f| f.to_str())
                    .unwrap_or(name)
            })
            .and_then(|name| period_from(self.statement_name_pattern.as_ref(), name));
        let period = from_filename.or_else(|| period_from(self.period_pattern.as_ref(), header));

        StatementMetadata {
            bank_id: self.issuer_id.clone(),
            bank_name: Some(self.name.clone()),
            month: period.map(|(month, _)| month),
            year: period.map(|(_, year)| year),
        }
    }
}

fn period_from(pattern: Option<&Regex>, text: &str) -> Option<(u32, i32)> {
    let caps = pattern?.captures(text)?;
    let month = Month::from_str(caps.get(1)?.as_str()).ok()?;
    let year = caps.get(2)?.as_str().parse().ok()?;
    Some((month.number_from_month(), year))
}

fn compile(profile: &str, pattern: &str) -> StatementResult<Regex> {
    Regex::new(pattern).map_err(|source| StatementParseError::InvalidPattern {
        profile: profile.to_string(),
        source,
    })
}

impl TryFrom<ProfileSpec> for LayoutProfile {
    type Error = StatementParseError;

    fn try_from(spec: ProfileSpec) -> Result<Self, Self::Error> {
        let name = spec.name.trim().to_string();
        if name.is_empty() {
            return Err(StatementParseError::ConfigInvalid(
                "layout profile name is empty".to_string(),
            ));
        }
        if spec.date_patterns.is_empty() || spec.date_formats.is_empty() {
            return Err(StatementParseError::ConfigInvalid(format!(
                "layout profile '{name}' needs at least one date pattern and one date format"
            )));
        }

        let date_patterns = spec
            .date_patterns
            .iter()
            .map(|p| compile(&name, p))
            .collect::<StatementResult<Vec<_>>>()?;
        let compile_opt = |pattern: &Option<String>| {
            pattern.as_deref().map(|p| compile(&name, p)).transpose()
        };

        Ok(LayoutProfile {
            amount_pattern: compile(&name, &spec.amount_pattern)?,
            noise_pattern: compile_opt(&spec.noise_pattern)?,
            statement_name_pattern: compile_opt(&spec.statement_name_pattern)?,
            period_pattern: compile_opt(&spec.period_pattern)?,
            date_patterns,
            issuer_id: spec.issuer_id,
            detection_token: spec.detection_token.filter(|t| !t.trim().is_empty()),
            date_formats: spec.date_formats,
            currency: spec.currency,
            amount_selection: spec.amount_selection,
            bank_specific: spec.bank_specific,
            header_tokens: spec.header_tokens.iter().map(|t| t.to_uppercase()).collect(),
            review_threshold: spec.review_threshold,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::layout::builtin;
    use rstest::rstest;

    fn token(value: &'static str) -> AmountToken<'static> {
        AmountToken {
            matched: value,
            value,
            tag: None,
        }
    }

    #[rstest]
    #[case(AmountSelection::Rightmost, Some("3.00"))]
    #[case(AmountSelection::Leftmost, Some("1.00"))]
    #[case(AmountSelection::Nth(1), Some("2.00"))]
    #[case(AmountSelection::Nth(5), None)]
    fn test_amount_selection_pick(#[case] selection: AmountSelection, #[case] expected: Option<&str>) {
        let tokens = [token("1.00"), token("2.00"), token("3.00")];
        assert_eq!(selection.pick(&tokens).map(|t| t.value), expected);
    }

    #[test]
    fn test_try_from_rejects_invalid_pattern() {
        let spec = ProfileSpec::new("Broken", &["(unclosed"], r"\d+\.\d{2}", &["%d/%m/%Y"], "SGD");
        let result = LayoutProfile::try_from(spec);
        assert!(matches!(
            result,
            Err(StatementParseError::InvalidPattern { ref profile, .. }) if profile == "Broken"
        ));
    }

    #[rstest]
    #[case(ProfileSpec::new("No dates", &[], r"\d", &["%d"], "SGD"))]
    #[case(ProfileSpec::new("No formats", &[r"\d"], r"\d", &[], "SGD"))]
    #[case(ProfileSpec::new("  ", &[r"\d"], r"\d", &["%d"], "SGD"))]
    fn test_try_from_rejects_incomplete_spec(#[case] spec: ProfileSpec) {
        assert!(matches!(
            LayoutProfile::try_from(spec),
            Err(StatementParseError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_clean_description_strips_noise() {
        let profile = LayoutProfile::try_from(builtin::dbs()).unwrap();
        let cleaned = profile.clean_description("05 Mar GRAB SINGAPORE SG 12.30 DB");
        assert_eq!(cleaned, "GRAB");
    }

    #[rstest]
    #[case("Opening Balance", true)]
    #[case("date description", true)]
    #[case("CASH DEPOSIT", true)]
    #[case("STARBUCKS COFFEE", false)]
    fn test_is_header(#[case] description: &str, #[case] expected: bool) {
        let profile = LayoutProfile::try_from(builtin::default_profile()).unwrap();
        assert_eq!(profile.is_header(description), expected);
    }

    #[test]
    fn test_matches_token_is_case_insensitive() {
        let profile = LayoutProfile::try_from(builtin::dbs()).unwrap();
        assert!(profile.matches_token("co. reg. no. 196800306e"));
        assert!(!profile.matches_token("nothing to see"));
    }

    #[rstest]
    #[case(Some("DBS_Statement_March2024.pdf"), "", Some(3), Some(2024))]
    #[case(Some("/tmp/uploads/Feb2025.pdf"), "", Some(2), Some(2025))]
    #[case(None, "Statement Date 31 Jan 2024", Some(1), Some(2024))]
    #[case(Some("statement.pdf"), "Period ending Dec 2023", Some(12), Some(2023))]
    #[case(None, "no period here", None, None)]
    fn test_statement_metadata_for_bank_profile(
        #[case] filename: Option<&str>,
        #[case] header: &str,
        #[case] month: Option<u32>,
        #[case] year: Option<i32>,
    ) {
        let profile = LayoutProfile::try_from(builtin::dbs()).unwrap();
        let metadata = profile.statement_metadata(filename, header);

        assert_eq!(metadata.bank_id.as_deref(), Some("196800306E"));
        assert_eq!(metadata.month, month);
        assert_eq!(metadata.year, year);
    }

    #[test]
    fn test_statement_metadata_for_citi_filename() {
        let profile = LayoutProfile::try_from(builtin::citi()).unwrap();
        let metadata = profile.statement_metadata(Some("eStatement_Apr2024_1234.pdf"), "");
        assert_eq!(metadata.month, Some(4));
        assert_eq!(metadata.year, Some(2024));
    }

    #[test]
    fn test_statement_metadata_empty_for_generic_profile() {
        let profile = LayoutProfile::try_from(builtin::default_profile()).unwrap();
        let metadata = profile.statement_metadata(Some("March2024.pdf"), "Mar 2024");
        assert_eq!(metadata, StatementMetadata::default());
    }

    #[test]
    fn test_review_threshold() {
        let profile = LayoutProfile::try_from(builtin::default_profile()).unwrap();
        let threshold = profile.review_threshold.unwrap();
        assert!(!profile.exceeds_review_threshold(threshold));
        assert!(profile.exceeds_review_threshold(threshold + Decimal::ONE));
    }
}
