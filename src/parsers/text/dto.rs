use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::StatementDate;
use crate::errors::LineParseError;
use crate::parsers::layout::profile::LayoutProfile;
use crate::types::{StatementMetadata, Transaction};

/// One line of extracted text and its position in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub index: usize,
    pub text: &'a str,
}

impl<'a> RawLine<'a> {
    /// Splits on newlines (form feeds and `\r` are trimmed away with the rest of
    /// the surrounding whitespace). Indices count every line, blank ones included.
    pub fn split(content: &'a str) -> impl Iterator<Item = RawLine<'a>> {
        content.lines().enumerate().map(|(index, line)| RawLine {
            index,
            text: line.trim(),
        })
    }
}

/// A transaction as scanned from a line, before its date is resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: StatementDate,
    pub description: String,
    /// Already normalized to a positive magnitude
    pub amount: Decimal,
    pub entry_type: Option<String>,
    pub source_line_index: usize,
}

impl RawTransaction {
    /// Resolves the date and stamps profile currency, statement metadata (bank
    /// profiles only) and the review flag.
    pub fn resolve(
        self,
        profile: &LayoutProfile,
        metadata: &StatementMetadata,
    ) -> Result<Transaction, LineParseError> {
        let date = self.date.resolve(&profile.date_formats, metadata)?;
        let needs_review = profile.exceeds_review_threshold(self.amount);

        Ok(Transaction {
            date,
            description: self.description,
            amount: self.amount,
            currency: Some(profile.currency.clone()),
            entry_type: self.entry_type,
            bank_id: metadata.bank_id.clone(),
            statement_month: metadata.month,
            statement_year: metadata.year,
            source_line_index: self.source_line_index,
            needs_review,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::layout::builtin;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn raw(date: &str, amount: &str) -> RawTransaction {
        RawTransaction {
            date: date.into(),
            description: "GRAB".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
            entry_type: Some("DB".to_string()),
            source_line_index: 7,
        }
    }

    #[test]
    fn test_split_keeps_line_indices() {
        let lines: Vec<_> = RawLine::split("first\n\n  third  \r\n\x0cfourth").collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].text, "");
        assert_eq!(lines[2], RawLine { index: 2, text: "third" });
        assert_eq!(lines[3].text, "fourth");
    }

    #[test]
    fn test_resolve_stamps_bank_metadata() {
        let profile = LayoutProfile::try_from(builtin::dbs()).unwrap();
        let metadata = StatementMetadata {
            bank_id: Some("196800306E".to_string()),
            bank_name: Some("DBS".to_string()),
            month: Some(3),
            year: Some(2024),
        };

        let txn = raw("05 Mar", "12.30").resolve(&profile, &metadata).unwrap();

        assert_eq!(txn.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(txn.currency.as_deref(), Some("SGD"));
        assert_eq!(txn.bank_id.as_deref(), Some("196800306E"));
        assert_eq!(txn.statement_month, Some(3));
        assert_eq!(txn.statement_year, Some(2024));
        assert_eq!(txn.entry_type.as_deref(), Some("DB"));
        assert_eq!(txn.source_line_index, 7);
        assert!(!txn.needs_review);
    }

    #[test]
    fn test_resolve_flags_large_amounts() {
        let profile = LayoutProfile::try_from(builtin::default_profile()).unwrap();
        let txn = raw("01/03/2024", "987654.00")
            .resolve(&profile, &StatementMetadata::default())
            .unwrap();
        assert!(txn.needs_review);
    }

    #[test]
    fn test_resolve_propagates_date_error() {
        let profile = LayoutProfile::try_from(builtin::dbs()).unwrap();
        let result = raw("05 Mar", "1.00").resolve(&profile, &StatementMetadata::default());
        assert!(matches!(result, Err(LineParseError::MissingYear(_))));
    }
}
