use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{EmptyResultWarning, LineParseError};

/// A normalized statement transaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub description: String,
    /// Always strictly positive; direction lives in `entry_type` when the layout has one
    pub amount: Decimal,
    pub currency: Option<String>,
    /// Debit/credit tag captured by bank layouts (e.g. `DB`, `CR`)
    pub entry_type: Option<String>,
    pub bank_id: Option<String>,
    pub statement_month: Option<u32>,
    pub statement_year: Option<i32>,
    pub source_line_index: usize,
    #[serde(default)]
    pub needs_review: bool,
}

impl Transaction {
    /// Identity used for de-duplication.
    pub fn key(&self) -> (NaiveDate, &str, Decimal) {
        (self.date, self.description.as_str(), self.amount)
    }
}

/// Chronologically ordered transactions, unique by [`Transaction::key`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Transaction>", into = "Vec<Transaction>")]
pub struct TransactionCollection(Vec<Transaction>);

impl TransactionCollection {
    /// Stable sort by date, then drop later occurrences of an already seen key.
    pub fn new(mut transactions: Vec<Transaction>) -> Self {
        transactions.sort_by_key(|t| t.date);

        let mut seen = HashSet::new();
        let first: Vec<bool> = transactions.iter().map(|t| seen.insert(t.key())).collect();
        let mut first = first.into_iter();
        transactions.retain(|_| first.next().unwrap_or(false));
        Self(transactions)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transaction> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Transaction> {
        self.0
    }
}

impl From<Vec<Transaction>> for TransactionCollection {
    fn from(transactions: Vec<Transaction>) -> Self {
        Self::new(transactions)
    }
}

impl From<TransactionCollection> for Vec<Transaction> {
    fn from(collection: TransactionCollection) -> Self {
        collection.0
    }
}

impl IntoIterator for TransactionCollection {
    type Item = Transaction;
    type IntoIter = std::vec::IntoIter<Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a TransactionCollection {
    type Item = &'a Transaction;
    type IntoIter = std::slice::Iter<'a, Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Statement-level facts shared by every transaction of a bank-specific statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementMetadata {
    pub bank_id: Option<String>,
    pub bank_name: Option<String>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// A skipped line and the reason it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line_index: usize,
    pub error: LineParseError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line_index + 1, self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: String,
}

/// Everything one extraction call produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    /// Name of the layout profile that was used
    pub profile: String,
    pub metadata: StatementMetadata,
    pub transactions: TransactionCollection,
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractionReport {
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// `Some` when the document parsed but yielded no transactions.
    pub fn empty_warning(&self) -> Option<EmptyResultWarning> {
        self.is_empty().then(|| EmptyResultWarning {
            profile: self.profile.clone(),
        })
    }

    /// Transactions whose amount looked implausible for the layout.
    pub fn flagged(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(|t| t.needs_review)
    }
}
