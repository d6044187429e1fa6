//! CSV reader for the bank transaction export
//!
//! Only the description is required to be readable. Amount and direction
//! are interpreted when possible and left empty otherwise; every cell is
//! carried through untouched so it reappears in the output.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    Direction, TransactionRecord, TransactionTable, AMOUNT_COLUMN, DATE_COLUMN,
    DESCRIPTION_COLUMN, DIRECTION_COLUMN,
};

/// Read a bank export from disk
pub fn read_transactions_file(path: &Path) -> Result<TransactionTable> {
    let file = File::open(path)
        .map_err(|e| Error::Import(format!("Failed to open {}: {}", path.display(), e)))?;
    read_transactions(file)
}

/// Parse a bank export with `Date`, `Name / Description`, `Amount (EUR)` and
/// `Expense/Income` columns (in any order)
pub fn read_transactions<R: Read>(reader: R) -> Result<TransactionTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let date_col = column_index(&headers, DATE_COLUMN)?;
    let description_col = column_index(&headers, DESCRIPTION_COLUMN)?;
    let amount_col = column_index(&headers, AMOUNT_COLUMN)?;
    let direction_col = column_index(&headers, DIRECTION_COLUMN)?;

    let mut records = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = line + 2;

        if record.iter().all(|cell| cell.trim().is_empty()) {
            debug!(line, "Skipping blank row");
            continue;
        }

        let date = record.get(date_col).unwrap_or_default().to_string();
        let description = field(&record, description_col, DESCRIPTION_COLUMN, line)?.to_string();
        let amount = match parse_amount(record.get(amount_col).unwrap_or_default()) {
            Ok(amount) => Some(amount),
            Err(e) => {
                warn!(line, error = %e, "Leaving amount empty");
                None
            }
        };
        let direction = match record
            .get(direction_col)
            .unwrap_or_default()
            .parse::<Direction>()
        {
            Ok(direction) => Some(direction),
            Err(e) => {
                warn!(line, error = %e, "Leaving direction empty");
                None
            }
        };

        let mut columns: Vec<String> = record.iter().map(|c| c.to_string()).collect();
        columns.resize(headers.len(), String::new());

        records.push(TransactionRecord {
            date,
            description,
            amount,
            direction,
            columns,
        });
    }

    debug!(rows = records.len(), "Read transaction export");

    Ok(TransactionTable {
        headers,
        description_column: description_col,
        records,
    })
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| Error::Import(format!("Missing column: {}", name)))
}

fn field<'a>(record: &'a StringRecord, idx: usize, name: &str, line: usize) -> Result<&'a str> {
    record
        .get(idx)
        .ok_or_else(|| Error::Import(format!("Line {}: missing {}", line, name)))
}

/// Parse a date in any of the formats seen in bank exports
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2023-01-15
        "%d-%m-%Y", // 15-01-2023
        "%m/%d/%Y", // 01/15/2023
        "%d/%m/%Y", // 15/01/2023 (European)
        "%Y/%m/%d", // 2023/01/15
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and both decimal
/// conventions.
///
/// With both `,` and `.` present the later one is the decimal mark. A lone
/// separator that occurs once is decimal (`10,99`, `10.99`); one that repeats
/// groups thousands (`1.234.567`).
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['€', '$', ' ', '\u{a0}'], "")
        .replace('(', "-")
        .replace(')', "");

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) if cleaned.matches(',').count() == 1 => cleaned.replace(',', "."),
        (Some(_), None) => cleaned.replace(',', ""),
        (None, Some(_)) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
        _ => cleaned,
    };

    normalized
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}
