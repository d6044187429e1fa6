//! Summary command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendsort_core::models::Direction;
use spendsort_core::summary::summarize_file;

/// Print per-year category, monthly and saving-rate figures
pub fn cmd_summary(file: &Path, year: Option<i32>, json: bool) -> Result<()> {
    let summaries = summarize_file(file, year)
        .with_context(|| format!("Failed to summarize {}", file.display()))?;

    if json {
        let out =
            serde_json::to_string_pretty(&summaries).context("Failed to serialize summary")?;
        println!("{}", out);
        return Ok(());
    }

    if summaries.is_empty() {
        match year {
            Some(y) => println!("No transactions found for {}.", y),
            None => println!("No transactions found."),
        }
        return Ok(());
    }

    for summary in &summaries {
        println!("📅 {}", summary.year);
        println!("{}", "=".repeat(50));

        println!("\n💸 Expenses by category\n");
        for c in &summary.expense_categories {
            println!(
                "  {:<30} {:>10.2}  {:>5.1}%  ({} tx)",
                c.category, c.amount, c.percentage, c.transaction_count
            );
        }

        println!("\n💰 Income\n");
        for c in &summary.income_categories {
            println!("  {:<30} {:>10.2}", c.category, c.amount);
        }

        println!("\n📈 Monthly\n");
        println!("  {:<5} {:>12} {:>12}", "MONTH", "EXPENSE", "INCOME");
        let mut months: Vec<u32> = summary.monthly.iter().map(|m| m.month).collect();
        months.dedup();
        for month in months {
            let amount = |direction: Direction| {
                summary
                    .monthly
                    .iter()
                    .find(|m| m.month == month && m.direction == direction)
                    .map(|m| m.amount)
                    .unwrap_or(0.0)
            };
            println!(
                "  {:<5} {:>12.2} {:>12.2}",
                spendsort_core::summary::month_name(month),
                amount(Direction::Expense),
                amount(Direction::Income)
            );
        }

        println!();
        println!("  Total income:  {:>12.2}", summary.total_income);
        println!("  Total expense: {:>12.2}", summary.total_expense);
        match summary.saving_rate {
            Some(rate) => println!("  Saving rate:   {:>11}%", rate),
            None => println!("  Saving rate:   n/a (no income)"),
        }
        println!();
    }

    Ok(())
}
