//! Domain models for spendsort

use serde::{Deserialize, Serialize};

/// Column names in the bank export
pub const DATE_COLUMN: &str = "Date";
pub const DESCRIPTION_COLUMN: &str = "Name / Description";
pub const AMOUNT_COLUMN: &str = "Amount (EUR)";
pub const DIRECTION_COLUMN: &str = "Expense/Income";

/// Columns appended to the categorized output
pub const RAW_REPLY_COLUMN: &str = "Transaction vs category";
pub const TRANSACTION_COLUMN: &str = "Transaction";
pub const CATEGORY_COLUMN: &str = "Category";

/// Whether money left or entered the account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Expense,
    Income,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "Expense",
            Self::Income => "Income",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            _ => Err(format!("Unknown Expense/Income value: {}", s)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single row of the bank export
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub date: String,
    /// Join key against the category mapping table
    pub description: String,
    /// None when the cell is empty or unreadable; only the summary needs it
    pub amount: Option<f64>,
    pub direction: Option<Direction>,
    /// Raw cells of the source row, in header order
    pub columns: Vec<String>,
}

/// The full bank export: header row plus records
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    pub headers: Vec<String>,
    /// Index of the description column within `headers`
    pub description_column: usize,
    pub records: Vec<TransactionRecord>,
}

impl TransactionTable {
    /// Distinct descriptions in first-seen order
    pub fn unique_descriptions(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.description.as_str()))
            .map(|r| r.description.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One "transaction - category" line from a model reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMappingRow {
    /// The line as the model wrote it
    pub raw: String,
    pub transaction: String,
    /// None when the line had no " - " separator
    pub category: Option<String>,
}

impl CategoryMappingRow {
    /// Split a reply line on the first `" - "`
    pub fn from_line(line: &str) -> Self {
        let raw = line.to_string();
        match line.split_once(" - ") {
            Some((transaction, category)) => Self {
                raw,
                transaction: transaction.trim().to_string(),
                category: Some(category.trim().to_string()),
            },
            None => Self {
                raw,
                transaction: line.trim().to_string(),
                category: None,
            },
        }
    }
}

/// Rows accumulated across all chunks of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMappingTable {
    pub rows: Vec<CategoryMappingRow>,
}

impl CategoryMappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk's rows
    pub fn extend(&mut self, rows: Vec<CategoryMappingRow>) {
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A transaction with its (possibly absent) category attached
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRecord {
    pub record: TransactionRecord,
    pub mapping: Option<CategoryMappingRow>,
}

impl MergedRecord {
    pub fn category(&self) -> Option<&str> {
        self.mapping.as_ref().and_then(|m| m.category.as_deref())
    }
}

/// Output of the merge step, written back out as the categorized CSV
#[derive(Debug, Clone, Default)]
pub struct MergedTable {
    pub headers: Vec<String>,
    pub description_column: usize,
    pub records: Vec<MergedRecord>,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn categorized_count(&self) -> usize {
        self.records.iter().filter(|r| r.category().is_some()).count()
    }
}
