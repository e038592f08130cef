use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LineParseError;
use crate::parsers::tokenizer::collapse_whitespace;
use crate::types::StatementMetadata;

/// A `%Y` parse of `01/03/24` yields year 24; reject it so `%y` gets a chance.
const PLAUSIBLE_YEARS: RangeInclusive<i32> = 1900..=2100;

/// Tried on the relaxed string (commas and dots turned into spaces) once every
/// declared format has failed.
const FALLBACK_FORMATS: &[&str] = &[
    "%d %b %Y", "%b %d %Y", "%d-%b-%Y", "%Y %b %d", "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y",
    "%d/%m/%Y", "%m/%d/%Y", "%d/%m/%y",
];

/// A date substring as found on a statement line, resolved to a calendar date later.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementDate(String);

impl StatementDate {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Tries each declared format in order, then a permissive fallback.
    ///
    /// Year-less formats (e.g. `%d %b`) borrow the statement year; a resolved
    /// month later than the statement month belongs to the previous year.
    pub fn resolve(
        &self,
        formats: &[String],
        metadata: &StatementMetadata,
    ) -> Result<NaiveDate, LineParseError> {
        let s = collapse_whitespace(&self.0);
        if s.is_empty() {
            return Err(LineParseError::DateInvalidFormat(s));
        }

        let mut needs_year = false;
        for format in formats {
            if has_year(format) {
                if let Some(date) = parse_plausible(&s, format) {
                    return Ok(date);
                }
                continue;
            }

            needs_year = true;
            let Some(year) = metadata.year else { continue };
            let dated = format!("{s} {year}");
            let format = format!("{format} %Y");
            if let Some(date) = parse_plausible(&dated, &format) {
                return Ok(roll_back(date, metadata.month));
            }
        }

        let relaxed = collapse_whitespace(&s.replace([',', '.'], " "));
        if let Some(date) = FALLBACK_FORMATS
            .iter()
            .find_map(|format| parse_plausible(&relaxed, format))
        {
            return Ok(date);
        }

        if needs_year && metadata.year.is_none() {
            Err(LineParseError::MissingYear(s))
        } else {
            Err(LineParseError::DateInvalidFormat(s))
        }
    }
}

fn has_year(format: &str) -> bool {
    format.contains("%Y") || format.contains("%y")
}

fn parse_plausible(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, format)
        .ok()
        .filter(|date| PLAUSIBLE_YEARS.contains(&date.year()))
}

fn roll_back(date: NaiveDate, statement_month: Option<u32>) -> NaiveDate {
    match statement_month {
        Some(month) if date.month() > month => date.with_year(date.year() - 1).unwrap_or(date),
        _ => date,
    }
}

impl From<String> for StatementDate {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for StatementDate {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// An amount substring as found on a statement line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementAmount(String);

impl StatementAmount {
    /// Magnitude of the amount: currency symbols, group separators, signs and
    /// parentheses are dropped, so the result is never negative.
    pub fn parse(&self) -> Result<Decimal, LineParseError> {
        let digits: String = self
            .0
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        if !digits.chars().any(|c| c.is_ascii_digit()) {
            return Err(LineParseError::AmountInvalid(self.0.clone()));
        }

        Decimal::from_str(&digits)
            .map(|amount| amount.abs())
            .map_err(|_| LineParseError::AmountInvalid(self.0.clone()))
    }
}

impl From<&str> for StatementAmount {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl TryFrom<StatementAmount> for Decimal {
    type Error = LineParseError;

    fn try_from(amount: StatementAmount) -> Result<Self, Self::Error> {
        amount.parse()
    }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
