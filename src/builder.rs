use std::fs;

use tracing::info;

use crate::errors::{StatementParseError, StatementResult};
use crate::normalize::normalize;
use crate::parsers::prelude::*;
use crate::types::{ExtractionReport, Transaction};

/// Page separator emitted by PDF text extraction.
const PAGE_BREAK: char = '\x0c';

/// Detection sample: the first page, or the whole text when it has no page break.
fn first_page(content: &str) -> &str {
    content
        .find(PAGE_BREAK)
        .map_or(content, |end| &content[..end])
}

/// Entry point for extracting transactions from statement text.
///
/// ```rust,ignore
/// let report = ExtractorBuilder::new()
///     .content(&text)
///     .filename("DBS_March2024.pdf")
///     .extract()?;
/// ```
#[derive(Default)]
pub struct ExtractorBuilder<'r> {
    content: Option<String>,
    filepath: Option<String>,
    profile: Option<String>,
    strict: bool,
    registry: Option<&'r FormatRegistry>,
}

impl<'r> ExtractorBuilder<'r> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    /// Used for statement period inference, and read from disk when no content is set.
    pub fn filename(mut self, filename: &str) -> Self {
        self.filepath = Some(filename.to_string());
        self
    }

    /// Skip detection and use the named profile.
    pub fn profile(mut self, name: &str) -> Self {
        self.profile = Some(name.to_string());
        self
    }

    /// Only accept bank-specific profiles, with no fallback to the default.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Defaults to [`FormatRegistry::builtin`].
    pub fn registry(mut self, registry: &'r FormatRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    #[tracing::instrument(name = "Extract statement", skip_all)]
    pub fn extract(self) -> StatementResult<ExtractionReport> {
        let builtin;
        let registry = match self.registry {
            Some(registry) => registry,
            None => {
                builtin = FormatRegistry::builtin()?;
                &builtin
            }
        };

        let content = self.content.map(Ok).unwrap_or_else(|| {
            self.filepath
                .as_deref()
                .ok_or(StatementParseError::MissingContentAndFilepath)
                .and_then(|path| fs::read_to_string(path).map_err(Into::into))
        })?;

        let header = first_page(&content);
        let profile = match self.profile.as_deref() {
            Some(name) => registry.get(name).ok_or_else(|| {
                StatementParseError::UnsupportedStatement(format!("unknown layout profile '{name}'"))
            })?,
            None if self.strict => registry.detect_strict(header)?,
            None => registry.detect(header)?,
        };

        let metadata = profile.statement_metadata(self.filepath.as_deref(), header);
        let pass = profile.parse(&content);
        let mut diagnostics = pass.diagnostics;
        let transactions = normalize(pass.transactions, profile, &metadata, &mut diagnostics);

        info!(
            profile = %profile.name,
            transactions = transactions.len(),
            skipped = diagnostics.len(),
            "extracted statement"
        );

        Ok(ExtractionReport {
            profile: profile.name.clone(),
            metadata,
            transactions,
            diagnostics,
        })
    }

    /// Extracts and converts every transaction into a caller-defined type.
    pub fn extract_into<T>(self) -> StatementResult<Vec<T>>
    where
        T: TryFrom<Transaction, Error = StatementParseError>,
    {
        self.extract()?
            .transactions
            .into_iter()
            .map(T::try_from)
            .collect()
    }
}
