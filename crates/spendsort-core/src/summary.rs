//! Yearly spending summary over a categorized export
//!
//! Income rows are reported under their own description rather than a model
//! category; expenses the model never categorized fall under
//! [`UNCATEGORIZED`].

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use chrono::Datelike;
use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::import::{parse_date, read_transactions_file};
use crate::models::{Direction, TransactionTable, CATEGORY_COLUMN};

pub const UNCATEGORIZED: &str = "Uncategorized";

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A transaction reduced to what the summary groups on
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub year: i32,
    pub month: u32,
    pub category: String,
    pub amount: f64,
    pub direction: Direction,
}

/// Total for one category within a year and direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
    pub percentage: f64,
    pub transaction_count: usize,
}

/// Total for one month and direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub month_name: &'static str,
    pub direction: Direction,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: i32,
    /// Sorted by amount, largest first
    pub expense_categories: Vec<CategoryTotal>,
    pub income_categories: Vec<CategoryTotal>,
    /// Sorted by month, expense before income within a month
    pub monthly: Vec<MonthlyTotal>,
    pub total_income: f64,
    pub total_expense: f64,
    /// Whole percent of income not spent; None without income
    pub saving_rate: Option<i64>,
}

/// Three-letter English month name for 1..=12
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTH_NAMES.get(i as usize))
        .copied()
        .unwrap_or("???")
}

/// `round((income - expense) / income * 100)`, undefined without income
pub fn saving_rate(income: f64, expense: f64) -> Option<i64> {
    if income == 0.0 {
        return None;
    }
    Some(((income - expense) / income * 100.0).round() as i64)
}

/// Prepare rows from a categorized table.
///
/// Rows without a readable amount or direction cannot be totalled and are
/// left out; an unreadable date is an error.
pub fn summary_rows(table: &TransactionTable) -> Result<Vec<SummaryRow>> {
    let category_col = table.headers.iter().position(|h| h == CATEGORY_COLUMN);
    let mut rows = Vec::with_capacity(table.len());

    for record in &table.records {
        let (Some(amount), Some(direction)) = (record.amount, record.direction) else {
            warn!(description = %record.description, "Skipping row without amount or direction");
            continue;
        };

        let date = parse_date(&record.date)?;
        let category = match direction {
            Direction::Income => record.description.clone(),
            Direction::Expense => category_col
                .and_then(|i| record.columns.get(i))
                .map(|c| c.trim())
                .filter(|c| !c.is_empty())
                .unwrap_or(UNCATEGORIZED)
                .to_string(),
        };

        rows.push(SummaryRow {
            year: date.year(),
            month: date.month(),
            category,
            amount,
            direction,
        });
    }

    Ok(rows)
}

fn category_totals(rows: &[&SummaryRow], direction: Direction) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, (f64, usize)> = HashMap::new();
    for row in rows.iter().filter(|r| r.direction == direction) {
        let entry = totals.entry(row.category.as_str()).or_insert((0.0, 0));
        entry.0 += row.amount;
        entry.1 += 1;
    }

    let grand_total: f64 = totals.values().map(|(amount, _)| amount).sum();

    let mut result: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, (amount, count))| CategoryTotal {
            category: category.to_string(),
            amount,
            percentage: if grand_total != 0.0 {
                amount / grand_total * 100.0
            } else {
                0.0
            },
            transaction_count: count,
        })
        .collect();

    result.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    result
}

fn monthly_totals(rows: &[&SummaryRow]) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<(u32, bool), f64> = BTreeMap::new();
    for row in rows {
        let key = (row.month, row.direction == Direction::Income);
        *totals.entry(key).or_insert(0.0) += row.amount;
    }

    totals
        .into_iter()
        .map(|((month, income), amount)| MonthlyTotal {
            month,
            month_name: month_name(month),
            direction: if income {
                Direction::Income
            } else {
                Direction::Expense
            },
            amount,
        })
        .collect()
}

/// Group rows by year (ascending), optionally keeping a single year
pub fn summarize(rows: &[SummaryRow], year: Option<i32>) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, Vec<&SummaryRow>> = BTreeMap::new();
    for row in rows.iter().filter(|r| year.map_or(true, |y| r.year == y)) {
        by_year.entry(row.year).or_default().push(row);
    }

    by_year
        .into_iter()
        .map(|(year, rows)| {
            let total = |direction: Direction| -> f64 {
                rows.iter()
                    .filter(|r| r.direction == direction)
                    .map(|r| r.amount)
                    .sum()
            };
            let total_income = total(Direction::Income);
            let total_expense = total(Direction::Expense);

            YearSummary {
                year,
                expense_categories: category_totals(&rows, Direction::Expense),
                income_categories: category_totals(&rows, Direction::Income),
                monthly: monthly_totals(&rows),
                total_income,
                total_expense,
                saving_rate: saving_rate(total_income, total_expense),
            }
        })
        .collect()
}

/// Summarize a categorized CSV on disk
pub fn summarize_file(path: &Path, year: Option<i32>) -> Result<Vec<YearSummary>> {
    let table = read_transactions_file(path)?;
    let rows = summary_rows(&table)?;
    Ok(summarize(&rows, year))
}
