//! Parsing helpers for model replies
//!
//! Models wrap the useful lines in chatter ("Sure! Here are...", "Hope this
//! helps!"). Blank lines separate those sections; the data block is the
//! section the categorized lines live in.

use crate::error::{Error, Result};
use crate::models::CategoryMappingRow;

/// Longest slice of raw reply kept in error messages
const RAW_PREVIEW_LEN: usize = 200;

fn preview(raw: &str) -> String {
    let raw = raw.trim();
    if raw.chars().count() > RAW_PREVIEW_LEN {
        let cut: String = raw.chars().take(RAW_PREVIEW_LEN).collect();
        format!("{}...", cut)
    } else {
        raw.to_string()
    }
}

/// Only an empty line delimits a section; whitespace is content
fn is_blank(line: &str) -> bool {
    line.is_empty()
}

/// Locate the data block of a reply.
///
/// - one blank line: everything after it
/// - two or more: the lines strictly between the first and the second
/// - none: `Error::Parse`
pub fn extract_data_block(raw: &str) -> Result<Vec<&str>> {
    let lines: Vec<&str> = raw
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    let mut blanks = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| is_blank(line))
        .map(|(i, _)| i);

    let first = blanks.next().ok_or_else(|| Error::Parse(preview(raw)))?;
    let end = blanks.next().unwrap_or(lines.len());

    Ok(lines[first + 1..end].to_vec())
}

/// Every non-blank data line must contain a hyphen
pub fn validate_lines(lines: &[&str]) -> Result<()> {
    match lines.iter().find(|line| !is_blank(line) && !line.contains('-')) {
        Some(line) => Err(Error::Validation(line.to_string())),
        None => Ok(()),
    }
}

/// Turn a raw reply into mapping rows.
///
/// Lines whose hyphen is not the `" - "` separator still become rows, with no
/// category; they are dropped during normalization rather than failing here.
pub fn parse_category_reply(raw: &str) -> Result<Vec<CategoryMappingRow>> {
    let block = extract_data_block(raw)?;
    validate_lines(&block)?;

    Ok(block
        .into_iter()
        .filter(|line| !is_blank(line))
        .map(CategoryMappingRow::from_line)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_well_formed_reply() {
        let reply = "Sure!\n\nSpotify AB by Adyen - Entertainment\nBeta Boulders Ams Amsterdam Nld - Sport\n\nHope this helps!";
        let rows = parse_category_reply(reply).unwrap();

        let pairs: Vec<(&str, Option<&str>)> = rows
            .iter()
            .map(|r| (r.transaction.as_str(), r.category.as_deref()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Spotify AB by Adyen", Some("Entertainment")),
                ("Beta Boulders Ams Amsterdam Nld", Some("Sport")),
            ]
        );
        assert_eq!(rows[0].raw, "Spotify AB by Adyen - Entertainment");
    }

    #[test]
    fn test_single_blank_line_takes_rest() {
        let reply = "Here you go:\n\nKiosk - Food\nAlbert Heijn - Groceries";
        let block = extract_data_block(reply).unwrap();
        assert_eq!(block, vec!["Kiosk - Food", "Albert Heijn - Groceries"]);
    }

    #[test]
    fn test_multiple_blank_lines_take_first_section() {
        let reply = "Intro\n\nA - Food\nB - Travel\n\nOutro\n\nMore chatter - ignored";
        let block = extract_data_block(reply).unwrap();
        assert_eq!(block, vec!["A - Food", "B - Travel"]);
    }

    #[test]
    fn test_crlf_empty_line_counts_as_blank() {
        let reply = "Intro\r\n\r\nA - Food\r\nB - Travel\r\n";
        let block = extract_data_block(reply).unwrap();
        assert_eq!(block, vec!["A - Food", "B - Travel"]);
    }

    #[test]
    fn test_whitespace_line_is_not_a_delimiter() {
        let block = extract_data_block("Intro\n   \nA - Food\n\nOutro").unwrap();
        assert_eq!(block, vec!["Outro"]);

        match parse_category_reply("Intro\n   \nA - Food\n\nOutro").unwrap_err() {
            Error::Validation(line) => assert_eq!(line, "Outro"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_whitespace_line_in_data_block_fails_validation() {
        match parse_category_reply("Intro\n\nA - Food\n   \nB - Travel").unwrap_err() {
            Error::Validation(line) => assert_eq!(line, "   "),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_no_blank_line_is_parse_failure() {
        let err = parse_category_reply("A - Food\nB - Travel").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_empty_data_block_is_not_failure() {
        let rows = parse_category_reply("Intro\n\n\nOutro").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_line_without_hyphen_is_validation_failure() {
        let err = parse_category_reply("Intro\n\nA - Food\nB Travel\n\nOutro").unwrap_err();
        match err {
            Error::Validation(line) => assert_eq!(line, "B Travel"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_hyphen_without_separator_keeps_row_without_category() {
        let rows = parse_category_reply("Intro\n\n7-Eleven\nKiosk - Food\n\nOutro").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].transaction, "7-Eleven");
        assert!(rows[0].category.is_none());
        assert_eq!(rows[1].category.as_deref(), Some("Food"));
    }

    #[test]
    fn test_parse_error_preview_is_truncated() {
        let long = "x".repeat(500);
        match extract_data_block(&long).unwrap_err() {
            Error::Parse(raw) => assert!(raw.len() <= RAW_PREVIEW_LEN + 3),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
