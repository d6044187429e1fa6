//! Left join of normalized categories onto the transaction table

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use crate::models::{
    CategoryMappingRow, CategoryMappingTable, MergedRecord, MergedTable, TransactionTable,
};

/// Rewrite any description containing `contains` to `name`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CanonicalName {
    pub contains: String,
    pub name: String,
}

impl CanonicalName {
    pub fn new(contains: &str, name: &str) -> Self {
        Self {
            contains: contains.to_string(),
            name: name.to_string(),
        }
    }
}

/// Built-in description canonicalization table
pub fn default_canonical_names() -> Vec<CanonicalName> {
    vec![CanonicalName::new("Spotify", "Spotify Ab By Adyen")]
}

/// Apply the first matching canonicalization rule, if any
pub fn canonicalize<'a>(description: &'a str, names: &'a [CanonicalName]) -> &'a str {
    names
        .iter()
        .find(|n| description.contains(n.contains.as_str()))
        .map(|n| n.name.as_str())
        .unwrap_or(description)
}

/// Join `mapping` onto every transaction by (canonicalized) description.
///
/// Every input record appears exactly once in the output, in input order.
/// When several mapping rows share a key the first one wins. The attached
/// row carries the canonical key as its transaction; `raw` keeps the model's
/// own line.
pub fn merge(
    transactions: TransactionTable,
    mapping: &CategoryMappingTable,
    names: &[CanonicalName],
) -> MergedTable {
    let mut lookup: HashMap<String, &CategoryMappingRow> = HashMap::new();
    for row in &mapping.rows {
        let key = canonicalize(&row.transaction, names).to_string();
        lookup.entry(key).or_insert(row);
    }

    let records: Vec<MergedRecord> = transactions
        .records
        .into_iter()
        .map(|mut record| {
            record.description = canonicalize(&record.description, names).to_string();
            let mapping = lookup.get(&record.description).map(|row| CategoryMappingRow {
                transaction: record.description.clone(),
                ..(*row).clone()
            });
            MergedRecord { record, mapping }
        })
        .collect();

    let merged = MergedTable {
        headers: transactions.headers,
        description_column: transactions.description_column,
        records,
    };

    debug!(
        rows = merged.len(),
        categorized = merged.categorized_count(),
        "Merged categories onto transactions"
    );

    merged
}
