//! Extract, de-duplicate and classify transactions from bank statement text
//! (a PDF text layer or OCR output).
//!
//! ```rust,ignore
//! use bank_statement_text::{Classifier, ClassifierConfig, ClassifierMode, ExtractorBuilder};
//!
//! let report = ExtractorBuilder::new()
//!     .content(&statement_text)
//!     .filename("DBS_March2024.pdf")
//!     .extract()?;
//!
//! let classifier = Classifier::new(ClassifierConfig::food());
//! let food = classifier.apply(&report.transactions, ClassifierMode::Filter);
//! ```

mod builder;
mod types;

pub mod classifier;
pub mod errors;
pub mod normalize;
pub mod parsers;
pub mod records;

pub use builder::ExtractorBuilder;
pub use classifier::{Classifier, ClassifierConfig, ClassifierMode};
pub use parsers::prelude::*;
pub use types::{
    CategorizedTransaction, Diagnostic, ExtractionReport, StatementMetadata, Transaction,
    TransactionCollection,
};
