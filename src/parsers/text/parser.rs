use tracing::{debug, warn};

use super::dto::{RawLine, RawTransaction};
use super::types::StatementAmount;
use crate::errors::LineParseError;
use crate::parsers::layout::profile::LayoutProfile;
use crate::parsers::tokenizer;
use crate::parsers::traits::{ExtractionPass, Parser};
use crate::types::Diagnostic;

/// Scanner state carried from line to line within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState<'a> {
    NoDate,
    /// The most recent date seen; applies to every following line until replaced
    HasDate(&'a str),
}

impl<'a> ScanState<'a> {
    fn advance(self, dates: &[&'a str]) -> Self {
        match dates.first() {
            Some(&date) => ScanState::HasDate(date),
            None => self,
        }
    }
}

/// Line-by-line scanner driven entirely by a [`LayoutProfile`].
pub struct TextStatementParser<'p> {
    profile: &'p LayoutProfile,
}

impl<'p> TextStatementParser<'p> {
    pub fn new(profile: &'p LayoutProfile) -> Self {
        Self { profile }
    }

    pub fn parse(&self, content: &str) -> ExtractionPass<RawTransaction> {
        let mut pass = ExtractionPass::default();
        let mut state = ScanState::NoDate;

        for line in RawLine::split(content) {
            if line.text.is_empty() {
                continue;
            }

            let dates = tokenizer::find_dates(line.text, &self.profile.date_patterns);
            state = state.advance(&dates);
            let ScanState::HasDate(current_date) = state else {
                continue;
            };

            match self.scan_line(line, current_date) {
                Ok(Some(transaction)) => pass.transactions.push(transaction),
                Ok(None) => {}
                Err(error) => {
                    warn!(line = line.index, text = line.text, %error, "skipping statement line");
                    pass.diagnostics.push(Diagnostic {
                        line_index: line.index,
                        error,
                    });
                }
            }
        }

        pass
    }

    fn scan_line(
        &self,
        line: RawLine<'_>,
        current_date: &str,
    ) -> Result<Option<RawTransaction>, LineParseError> {
        let amounts = tokenizer::find_amounts(line.text, &self.profile.amount_pattern);
        let Some(token) = self.profile.amount_selection.pick(&amounts) else {
            return Ok(None);
        };

        let amount = StatementAmount::from(token.value).parse()?;
        let description = self.profile.clean_description(line.text);

        if description.is_empty() {
            debug!(line = line.index, "rejected line without description");
            return Ok(None);
        }
        if self.profile.is_header(&description) {
            debug!(line = line.index, %description, "rejected header line");
            return Ok(None);
        }
        if amount.is_zero() {
            debug!(line = line.index, "rejected zero amount");
            return Ok(None);
        }

        Ok(Some(RawTransaction {
            date: current_date.into(),
            description,
            amount,
            entry_type: token.tag.map(str::to_string),
            source_line_index: line.index,
        }))
    }
}

impl Parser for LayoutProfile {
    type Output = RawTransaction;

    fn parse(&self, content: &str) -> ExtractionPass<Self::Output> {
        TextStatementParser::new(self).parse(content)
    }

    fn is_supported(&self, _filename: Option<&str>, content: &str) -> bool {
        self.matches_token(&content.to_lowercase())
    }
}
