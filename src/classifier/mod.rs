//! Keyword classification of extracted transactions.

pub mod config;

use std::path::{Path, PathBuf};

use num_traits::Zero;
use rust_decimal::Decimal;
use tracing::info;

pub use config::{CategoryRule, ClassifierConfig};

use crate::errors::{StatementParseError, StatementResult};
use crate::types::{CategorizedTransaction, TransactionCollection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierMode {
    /// Keep only transactions that pass the inclusion filter
    #[default]
    Filter,
    /// Keep everything; excluded transactions get the unclassified label
    Tag,
}

/// Case-insensitive keyword classifier over an injected [`ClassifierConfig`].
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
    source: Option<PathBuf>,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// Loads the configuration from a YAML file and remembers the path for [`reload`](Self::reload).
    pub fn from_path(path: impl AsRef<Path>) -> StatementResult<Self> {
        let path = path.as_ref();
        Ok(Self {
            config: ClassifierConfig::from_path(path)?,
            source: Some(path.to_path_buf()),
        })
    }

    /// Re-reads the file this classifier was loaded from. The current tables are
    /// kept when the file cannot be read or parsed.
    pub fn reload(&mut self) -> StatementResult<()> {
        let path = self
            .source
            .as_ref()
            .ok_or(StatementParseError::ConfigSourceMissing)?;
        self.config = ClassifierConfig::from_path(path)?;
        info!(path = %path.display(), "reloaded classifier configuration");
        Ok(())
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn is_included(&self, description: &str) -> bool {
        if self.config.inclusion.is_empty() {
            return true;
        }
        let lowered = description.to_lowercase();
        self.config.inclusion.iter().any(|k| lowered.contains(k.as_str()))
    }

    /// First category (in declaration order) with a keyword contained in `description`.
    pub fn category_for(&self, description: &str) -> Option<&str> {
        let lowered = description.to_lowercase();
        self.config
            .categories
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
            .map(|rule| rule.name.as_str())
    }

    /// `None` only in [`ClassifierMode::Filter`] for descriptions outside the inclusion filter.
    pub fn classify(&self, description: &str, mode: ClassifierMode) -> Option<&str> {
        if !self.is_included(description) {
            return match mode {
                ClassifierMode::Filter => None,
                ClassifierMode::Tag => Some(self.config.unclassified.as_str()),
            };
        }
        Some(
            self.category_for(description)
                .unwrap_or(self.config.fallback.as_str()),
        )
    }

    pub fn apply(
        &self,
        transactions: &TransactionCollection,
        mode: ClassifierMode,
    ) -> Vec<CategorizedTransaction> {
        transactions
            .iter()
            .filter_map(|transaction| {
                self.classify(&transaction.description, mode)
                    .map(|category| CategorizedTransaction {
                        transaction: transaction.clone(),
                        category: category.to_string(),
                    })
            })
            .collect()
    }

    pub fn color_for(&self, category: &str) -> Option<&str> {
        self.config
            .categories
            .iter()
            .find(|rule| rule.name == category)
            .and_then(|rule| rule.color.as_deref())
    }

    /// Declared categories, then the fallback, then the unclassified label.
    pub fn known_categories(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.config.categories.iter().map(|c| c.name.as_str()).collect();
        for extra in [self.config.fallback.as_str(), self.config.unclassified.as_str()] {
            if !names.contains(&extra) {
                names.push(extra);
            }
        }
        names
    }

    /// Sum of amounts per category, in [`known_categories`](Self::known_categories)
    /// order. Categories without transactions are left out; labels this
    /// classifier does not know come last, in encounter order.
    pub fn category_totals(&self, transactions: &[CategorizedTransaction]) -> Vec<(String, Decimal)> {
        let mut totals: Vec<(String, Decimal)> = self
            .known_categories()
            .into_iter()
            .map(|name| (name.to_string(), Decimal::zero()))
            .collect();
        let mut used = vec![false; totals.len()];

        for item in transactions {
            match totals.iter().position(|(name, _)| *name == item.category) {
                Some(index) => {
                    totals[index].1 += item.transaction.amount;
                    used[index] = true;
                }
                None => {
                    totals.push((item.category.clone(), item.transaction.amount));
                    used.push(true);
                }
            }
        }

        totals
            .into_iter()
            .zip(used)
            .filter_map(|(total, used)| used.then_some(total))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::tests::txn;
    use rstest::rstest;
    use std::fs;
    use std::str::FromStr;
    use temp_dir::TempDir;

    fn food() -> Classifier {
        Classifier::new(ClassifierConfig::food())
    }

    #[rstest]
    #[case("STARBUCKS COFFEE", Some("Coffee Shops"))]
    #[case("WHOLE FOODS MARKET", Some("Groceries"))]
    #[case("UBER EATS *ORDER", Some("Food Delivery"))]
    #[case("Chipotle Mexican Grill", Some("Restaurants/Other"))]
    #[case("SHELL PETROL", None)]
    fn test_classify_filter_mode(#[case] description: &str, #[case] expected: Option<&str>) {
        assert_eq!(food().classify(description, ClassifierMode::Filter), expected);
    }

    #[test]
    fn test_tag_mode_labels_excluded() {
        assert_eq!(
            food().classify("SHELL PETROL", ClassifierMode::Tag),
            Some("Unclassified")
        );
    }

    #[rstest]
    #[case("MARKET STREET COFFEE", "Groceries")] // groceries before coffee
    #[case("DOORDASH STARBUCKS", "Food Delivery")] // delivery before coffee
    fn test_earlier_category_wins(#[case] description: &str, #[case] expected: &str) {
        let classifier = food();
        for _ in 0..3 {
            assert_eq!(classifier.category_for(description), Some(expected));
        }
    }

    #[test]
    fn test_apply_filter_keeps_only_included() {
        let collection = TransactionCollection::new(vec![
            txn("2024-03-01", "STARBUCKS COFFEE", "5.50", 0),
            txn("2024-03-01", "SHELL PETROL", "60.00", 1),
            txn("2024-03-02", "KFC", "9.90", 2),
        ]);

        let categorized = food().apply(&collection, ClassifierMode::Filter);
        let labels: Vec<_> = categorized
            .iter()
            .map(|c| (c.transaction.description.as_str(), c.category.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![("STARBUCKS COFFEE", "Coffee Shops"), ("KFC", "Restaurants/Other")]
        );
    }

    #[test]
    fn test_apply_tag_keeps_everything() {
        let collection = TransactionCollection::new(vec![
            txn("2024-03-01", "STARBUCKS COFFEE", "5.50", 0),
            txn("2024-03-01", "SHELL PETROL", "60.00", 1),
        ]);
        assert_eq!(food().apply(&collection, ClassifierMode::Tag).len(), 2);
    }

    #[test]
    fn test_category_totals_in_declared_order() {
        let classifier = food();
        let collection = TransactionCollection::new(vec![
            txn("2024-03-01", "STARBUCKS", "5.50", 0),
            txn("2024-03-01", "SHELL PETROL", "60.00", 1),
            txn("2024-03-02", "FAIRPRICE SUPERMARKET", "40.00", 2),
            txn("2024-03-03", "COFFEE BEAN", "4.50", 3),
        ]);
        let categorized = classifier.apply(&collection, ClassifierMode::Tag);

        let totals = classifier.category_totals(&categorized);
        let dec = |v: &str| Decimal::from_str(v).unwrap();
        assert_eq!(
            totals,
            vec![
                ("Groceries".to_string(), dec("40.00")),
                ("Coffee Shops".to_string(), dec("10.00")),
                ("Unclassified".to_string(), dec("60.00")),
            ]
        );
    }

    #[test]
    fn test_category_totals_appends_unknown_labels() {
        let mut item = CategorizedTransaction {
            transaction: txn("2024-03-01", "X", "1.00", 0),
            category: "transport".to_string(),
        };
        let totals = food().category_totals(std::slice::from_ref(&item));
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].0, "transport");

        item.category = "Groceries".to_string();
        assert_eq!(food().category_totals(&[item])[0].0, "Groceries");
    }

    #[test]
    fn test_known_categories_and_colors() {
        let config = ClassifierConfig::from_yaml(
            "categories:\n  transport:\n    items: [grab]\n    colorcode: '#FFDDC1'\n",
        )
        .unwrap();
        let classifier = Classifier::new(config);

        assert_eq!(classifier.known_categories(), vec!["transport", "Unclassified"]);
        assert_eq!(classifier.color_for("transport"), Some("#FFDDC1"));
        assert_eq!(classifier.color_for("Unclassified"), None);
        assert_eq!(classifier.classify("GRAB RIDE", ClassifierMode::Filter), Some("transport"));
        assert_eq!(classifier.classify("NTUC", ClassifierMode::Filter), Some("Unclassified"));
    }

    #[test]
    fn test_reload_without_source() {
        let mut classifier = food();
        assert!(matches!(
            classifier.reload(),
            Err(StatementParseError::ConfigSourceMissing)
        ));
    }

    #[test]
    fn test_reload_picks_up_changes_only_on_request() {
        let dir = TempDir::with_prefix("statement-categories").unwrap();
        let path = dir.child("categories.yaml");
        fs::write(&path, "categories:\n  transport:\n    items: [grab]\n").unwrap();

        let mut classifier = Classifier::from_path(&path).unwrap();
        assert_eq!(classifier.category_for("MRT TOP-UP"), None);

        fs::write(&path, "categories:\n  transport:\n    items: [grab, mrt]\n").unwrap();
        assert_eq!(classifier.category_for("MRT TOP-UP"), None);

        classifier.reload().unwrap();
        assert_eq!(classifier.category_for("MRT TOP-UP"), Some("transport"));

        fs::write(&path, "categories: [not, a, mapping]").unwrap();
        assert!(classifier.reload().is_err());
        assert_eq!(classifier.category_for("MRT TOP-UP"), Some("transport"));
    }
}
