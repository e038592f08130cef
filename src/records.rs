//! Flat record log: CSV export and idempotent merge of extracted transactions.

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::StatementResult;
use crate::types::{CategorizedTransaction, Transaction};

/// One row of the record log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub entry_type: Option<String>,
    pub bank_id: Option<String>,
    pub statement_month: Option<u32>,
    pub statement_year: Option<i32>,
    #[serde(rename = "transaction_idx")]
    pub source_line_index: usize,
    pub category: Option<String>,
    #[serde(default)]
    pub needs_review: bool,
}

impl StatementRecord {
    /// Upsert key of the record log.
    pub fn key(&self) -> (Option<&str>, usize) {
        (self.bank_id.as_deref(), self.source_line_index)
    }
}

impl From<&Transaction> for StatementRecord {
    fn from(txn: &Transaction) -> Self {
        Self {
            date: txn.date,
            description: txn.description.clone(),
            amount: txn.amount,
            currency: txn.currency.clone(),
            entry_type: txn.entry_type.clone(),
            bank_id: txn.bank_id.clone(),
            statement_month: txn.statement_month,
            statement_year: txn.statement_year,
            source_line_index: txn.source_line_index,
            category: None,
            needs_review: txn.needs_review,
        }
    }
}

impl From<&CategorizedTransaction> for StatementRecord {
    fn from(item: &CategorizedTransaction) -> Self {
        Self {
            category: Some(item.category.clone()),
            ..Self::from(&item.transaction)
        }
    }
}

pub fn write_csv<W: io::Write>(records: &[StatementRecord], writer: W) -> StatementResult<()> {
    let mut writer = Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn read_csv<R: io::Read>(reader: R) -> StatementResult<Vec<StatementRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
    let records = reader
        .deserialize::<StatementRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// `existing` followed by `incoming`, keeping only the last row for each
/// `(bank_id, transaction_idx)` key, at the position of that last row.
pub fn merge_records(
    existing: Vec<StatementRecord>,
    incoming: Vec<StatementRecord>,
) -> Vec<StatementRecord> {
    let combined: Vec<StatementRecord> = existing.into_iter().chain(incoming).collect();

    let mut seen = HashSet::new();
    let mut kept: Vec<&StatementRecord> = combined
        .iter()
        .rev()
        .filter(|record| seen.insert(record.key()))
        .collect();
    kept.reverse();
    kept.into_iter().cloned().collect()
}

/// Merges `incoming` into the log at `path`, creating it when missing.
/// Returns the number of rows in the log afterwards.
pub fn save_records(path: impl AsRef<Path>, incoming: Vec<StatementRecord>) -> StatementResult<usize> {
    let path = path.as_ref();
    let existing = if path.exists() {
        read_csv(File::open(path)?)?
    } else {
        Vec::new()
    };

    let merged = merge_records(existing, incoming);
    write_csv(&merged, File::create(path)?)?;
    info!(path = %path.display(), rows = merged.len(), "saved record log");
    Ok(merged.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::txn;
    use temp_dir::TempDir;

    fn record(bank_id: Option<&str>, index: usize, description: &str) -> StatementRecord {
        let mut transaction = txn("2024-03-05", description, "12.30", index);
        transaction.bank_id = bank_id.map(str::to_string);
        StatementRecord::from(&transaction)
    }

    #[test]
    fn test_csv_write_then_read() {
        let categorized = CategorizedTransaction {
            transaction: txn("2024-03-01", "STARBUCKS, ORCHARD", "5.50", 3),
            category: "Coffee Shops".to_string(),
        };
        let records = vec![StatementRecord::from(&categorized), record(Some("196800306E"), 4, "GRAB")];

        let mut buffer = Vec::new();
        write_csv(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("date,description,amount,currency,entry_type,bank_id"));
        assert!(text.contains("transaction_idx"));

        let read = read_csv(buffer.as_slice()).unwrap();
        assert_eq!(read, records);
        assert_eq!(read[0].category.as_deref(), Some("Coffee Shops"));
        assert_eq!(read[1].category, None);
    }

    #[test]
    fn test_read_csv_rejects_bad_amount() {
        let text = "date,description,amount,currency,entry_type,bank_id,statement_month,statement_year,transaction_idx,category,needs_review\n\
                    2024-03-01,X,abc,,,,,,0,,false\n";
        assert!(read_csv(text.as_bytes()).is_err());
    }

    #[test]
    fn test_merge_keeps_newest_per_key() {
        let existing = vec![
            record(Some("A"), 0, "OLD ZERO"),
            record(Some("A"), 1, "ONE"),
            record(Some("B"), 0, "OTHER BANK"),
        ];
        let incoming = vec![record(Some("A"), 0, "NEW ZERO"), record(Some("A"), 2, "TWO")];

        let merged = merge_records(existing, incoming);
        let descriptions: Vec<_> = merged.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descriptions, vec!["ONE", "OTHER BANK", "NEW ZERO", "TWO"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let rows = vec![record(Some("A"), 0, "X"), record(None, 1, "Y")];
        let once = merge_records(Vec::new(), rows.clone());
        let twice = merge_records(once.clone(), rows);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_save_records_upserts_file() {
        let dir = TempDir::with_prefix("statement-records").unwrap();
        let path = dir.child("transactions.csv");

        assert_eq!(save_records(&path, vec![record(Some("A"), 0, "X")]).unwrap(), 1);
        assert_eq!(
            save_records(&path, vec![record(Some("A"), 0, "X2"), record(Some("A"), 1, "Y")]).unwrap(),
            2
        );

        let stored = read_csv(File::open(&path).unwrap()).unwrap();
        assert_eq!(stored[0].description, "X2");
    }
}
