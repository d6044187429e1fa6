//! Category normalization
//!
//! Collapses the model's free-text labels into a small taxonomy using an
//! ordered rule table. The first rule whose needle occurs in the label wins;
//! labels matching no rule pass through unchanged.

use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{CategoryMappingRow, CategoryMappingTable};

/// Rewrite any category containing one of `contains` to `category`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryRule {
    pub contains: Vec<String>,
    pub category: String,
}

impl CategoryRule {
    pub fn new(contains: &[&str], category: &str) -> Self {
        Self {
            contains: contains.iter().map(|s| s.to_string()).collect(),
            category: category.to_string(),
        }
    }

    /// Case-sensitive substring match
    pub fn matches(&self, label: &str) -> bool {
        self.contains.iter().any(|needle| label.contains(needle.as_str()))
    }
}

/// Built-in taxonomy, in priority order
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(&["Food"], "Food and Drinks"),
        CategoryRule::new(&["Clothing"], "Clothing"),
        CategoryRule::new(&["Services"], "Services"),
        CategoryRule::new(&["Health", "Wellness"], "Health and Wellness"),
        CategoryRule::new(&["Sport"], "Sport and Fitness"),
        CategoryRule::new(&["Travel"], "Travel"),
    ]
}

/// Applies the rule table to a mapping table
pub struct CategoryNormalizer {
    rules: Vec<CategoryRule>,
    ordinal_prefix: Regex,
}

impl CategoryNormalizer {
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self> {
        Ok(Self {
            rules,
            ordinal_prefix: Regex::new(r"^\s*\d+\.\s+")?,
        })
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    /// Canonical label for a raw category
    pub fn normalize_category<'a>(&'a self, label: &'a str) -> &'a str {
        self.rules
            .iter()
            .find(|rule| rule.matches(label))
            .map(|rule| rule.category.as_str())
            .unwrap_or(label)
    }

    /// Drop a leading "1. " style list marker from a transaction name
    pub fn strip_ordinal<'a>(&self, transaction: &'a str) -> std::borrow::Cow<'a, str> {
        self.ordinal_prefix.replace(transaction, "")
    }

    /// Drop rows without a category, canonicalize the rest
    pub fn normalize(&self, table: CategoryMappingTable) -> CategoryMappingTable {
        let before = table.len();

        let rows: Vec<CategoryMappingRow> = table
            .rows
            .into_iter()
            .filter_map(|row| {
                let category = row.category.as_deref()?;
                Some(CategoryMappingRow {
                    transaction: self.strip_ordinal(&row.transaction).into_owned(),
                    category: Some(self.normalize_category(category).to_string()),
                    raw: row.raw,
                })
            })
            .collect();

        debug!(
            kept = rows.len(),
            dropped = before - rows.len(),
            "Normalized category mapping"
        );

        CategoryMappingTable { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> CategoryNormalizer {
        CategoryNormalizer::new(default_rules()).unwrap()
    }

    fn row(transaction: &str, category: Option<&str>) -> CategoryMappingRow {
        CategoryMappingRow {
            raw: String::new(),
            transaction: transaction.to_string(),
            category: category.map(str::to_string),
        }
    }

    #[test]
    fn test_rule_table() {
        let n = normalizer();
        assert_eq!(n.normalize_category("Fast Food"), "Food and Drinks");
        assert_eq!(n.normalize_category("Clothing Store"), "Clothing");
        assert_eq!(n.normalize_category("Financial Services"), "Services");
        assert_eq!(n.normalize_category("Wellness"), "Health and Wellness");
        assert_eq!(n.normalize_category("Healthcare"), "Health and Wellness");
        assert_eq!(n.normalize_category("Sport"), "Sport and Fitness");
        assert_eq!(n.normalize_category("Travel"), "Travel");
        assert_eq!(n.normalize_category("Entertainment"), "Entertainment");
    }

    #[test]
    fn test_first_rule_wins() {
        let n = normalizer();
        assert_eq!(n.normalize_category("Sport Food"), "Food and Drinks");
        assert_eq!(n.normalize_category("Travel Services"), "Services");
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(normalizer().normalize_category("food"), "food");
    }

    #[test]
    fn test_strip_ordinal() {
        let n = normalizer();
        assert_eq!(n.strip_ordinal("1. Albert Heijn"), "Albert Heijn");
        assert_eq!(n.strip_ordinal("12.  Albert Heijn"), "Albert Heijn");
        assert_eq!(n.strip_ordinal("Albert Heijn 1. Amsterdam"), "Albert Heijn 1. Amsterdam");
        assert_eq!(n.strip_ordinal("7-Eleven"), "7-Eleven");
    }

    #[test]
    fn test_normalize_drops_rows_without_category() {
        let table = CategoryMappingTable {
            rows: vec![
                row("1. Spotify AB by Adyen", Some("Entertainment")),
                row("Kiosk", None),
                row("Beta Boulders Ams Amsterdam Nld", Some("Sport")),
            ],
        };

        let out = normalizer().normalize(table);
        assert_eq!(out.len(), 2);
        assert_eq!(out.rows[0].transaction, "Spotify AB by Adyen");
        assert_eq!(out.rows[0].category.as_deref(), Some("Entertainment"));
        assert_eq!(out.rows[1].category.as_deref(), Some("Sport and Fitness"));
    }

    #[test]
    fn test_custom_rules() {
        let n = CategoryNormalizer::new(vec![CategoryRule::new(&["Groceries"], "Food and Drinks")])
            .unwrap();
        assert_eq!(n.normalize_category("Groceries"), "Food and Drinks");
        assert_eq!(n.normalize_category("Sport"), "Sport");
    }
}
