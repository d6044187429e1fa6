//! Writer for the categorized dataset
//!
//! Output = every source column (description replaced by its canonical
//! spelling) followed by `Transaction vs category`, `Transaction`, `Category`.

use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{MergedTable, CATEGORY_COLUMN, RAW_REPLY_COLUMN, TRANSACTION_COLUMN};

/// Write the merged table as CSV
pub fn write_categorized<W: Write>(writer: W, table: &MergedTable) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let mut header: Vec<&str> = table.headers.iter().map(String::as_str).collect();
    header.extend([RAW_REPLY_COLUMN, TRANSACTION_COLUMN, CATEGORY_COLUMN]);
    wtr.write_record(&header)?;

    for merged in &table.records {
        let mut row: Vec<&str> = merged.record.columns.iter().map(String::as_str).collect();
        if let Some(cell) = row.get_mut(table.description_column) {
            *cell = merged.record.description.as_str();
        }

        match &merged.mapping {
            Some(mapping) => {
                row.push(mapping.raw.as_str());
                row.push(mapping.transaction.as_str());
                row.push(mapping.category.as_deref().unwrap_or(""));
            }
            None => row.extend(["", "", ""]),
        }

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the merged table to `path`, replacing it atomically.
///
/// The data goes to a temporary file next to the destination first, so a
/// failed write never leaves a truncated output behind.
pub fn write_categorized_file(path: &Path, table: &MergedTable) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write_categorized(tmp.as_file_mut(), table)?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    info!(path = %path.display(), rows = table.len(), "Wrote categorized transactions");
    Ok(())
}
