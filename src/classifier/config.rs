use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{StatementParseError, StatementResult};

pub const DEFAULT_UNCLASSIFIED: &str = "Unclassified";

/// One category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRule {
    pub name: String,
    /// Lower-cased
    pub keywords: Vec<String>,
    /// Display colour, e.g. `#C1FFD7`
    pub color: Option<String>,
}

/// Keyword tables for the [`Classifier`](super::Classifier).
///
/// Category order is precedence order: the first category with a keyword hit wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifierConfig {
    /// Coarse filter; an empty list lets every transaction through
    pub inclusion: Vec<String>,
    pub categories: Vec<CategoryRule>,
    /// Category for included transactions that hit no category keyword
    pub fallback: String,
    /// Label for excluded transactions in tagging mode
    pub unclassified: String,
}

/// Top-level keys of the full document form.
const DOCUMENT_KEYS: [&str; 4] = ["inclusion", "categories", "fallback", "unclassified"];

/// On-disk shape. `categories` stays a mapping so that YAML order is kept.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    inclusion: Vec<String>,
    #[serde(default)]
    categories: serde_yaml::Mapping,
    fallback: Option<String>,
    unclassified: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    items: Vec<String>,
    colorcode: Option<String>,
}

impl ClassifierConfig {
    /// Parses a YAML document such as:
    ///
    /// ```yaml
    /// fallback: Other
    /// categories:
    ///   transport:
    ///     items: [grab, comfortdelgro, mrt]
    ///     colorcode: "#FFDDC1"
    ///   dining:
    ///     items: [restaurant, kopitiam]
    /// ```
    ///
    /// A document without any of the top-level keys is read as a bare
    /// `categories` mapping. At least one category must be declared.
    pub fn from_yaml(yaml: &str) -> StatementResult<Self> {
        let root: serde_yaml::Mapping = serde_yaml::from_str(yaml)?;
        let document = if DOCUMENT_KEYS.iter().any(|key| root.contains_key(*key)) {
            serde_yaml::from_value::<ConfigDocument>(serde_yaml::Value::Mapping(root))?
        } else {
            ConfigDocument {
                categories: root,
                ..ConfigDocument::default()
            }
        };
        if document.categories.is_empty() {
            return Err(StatementParseError::ConfigInvalid(
                "no categories declared".to_string(),
            ));
        }

        let mut categories: Vec<CategoryRule> = Vec::with_capacity(document.categories.len());
        for (key, value) in document.categories {
            let name = key
                .as_str()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or_else(|| {
                    StatementParseError::ConfigInvalid(format!("category name {key:?} is not a string"))
                })?;
            if categories.iter().any(|c| c.name == name) {
                return Err(StatementParseError::ConfigInvalid(format!(
                    "category '{name}' is declared twice"
                )));
            }

            let entry: CategoryEntry = serde_yaml::from_value(value)?;
            let keywords = normalize_keywords(entry.items);
            if keywords.is_empty() {
                return Err(StatementParseError::ConfigInvalid(format!(
                    "category '{name}' has no keywords"
                )));
            }

            categories.push(CategoryRule {
                name,
                keywords,
                color: entry.colorcode,
            });
        }

        let unclassified = document
            .unclassified
            .unwrap_or_else(|| DEFAULT_UNCLASSIFIED.to_string());
        let config = Self {
            inclusion: normalize_keywords(document.inclusion),
            categories,
            fallback: document.fallback.unwrap_or_else(|| unclassified.clone()),
            unclassified,
        };
        debug!(categories = config.categories.len(), "loaded classifier configuration");
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> StatementResult<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Food-spending tables: restaurants, groceries, delivery and coffee vocabulary.
    pub fn food() -> Self {
        let rule = |name: &str, keywords: &[&str]| CategoryRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            color: None,
        };

        Self {
            inclusion: FOOD_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            categories: vec![
                rule("Groceries", &["grocery", "market", "supermarket", "trader", "whole foods"]),
                rule("Food Delivery", &["doordash", "uber eats", "grubhub", "postmates"]),
                rule("Coffee Shops", &["coffee", "starbucks", "dunkin"]),
            ],
            fallback: "Restaurants/Other".to_string(),
            unclassified: DEFAULT_UNCLASSIFIED.to_string(),
        }
    }
}

const FOOD_KEYWORDS: &[&str] = &[
    // restaurants and fast food
    "restaurant", "cafe", "coffee", "pizza", "burger", "mcdonald", "subway", "wendy", "taco",
    "kfc", "chipotle", "starbucks", "dunkin", "donut", "deli", "grill", "kitchen", "bistro",
    // grocery
    "grocery", "market", "food", "trader joe", "whole foods", "safeway", "kroger", "albertsons",
    "aldi", "costco", "walmart", "target", "supermarket",
    // delivery
    "uber eats", "doordash", "grubhub", "postmates", "seamless", "deliveroo", "instacart",
    // generic
    "bakery", "butcher", "seafood", "sushi", "bbq", "steakhouse", "pizzeria", "dining", "eatery",
];

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}
