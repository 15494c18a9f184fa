//! Pipe-delimited markdown table extraction.
//!
//! A table is a header row, a separator row made of dashes and optional
//! colons, and at least one data row. Only the line under the header is
//! checked for the separator shape; rows end at the first line without a `|`.

use docsight_models::Table;
use once_cell::sync::Lazy;
use regex::Regex;

static RE_SEPARATOR_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\|?\s*:?-+:?\s*(\|\s*:?-+:?\s*)*\|?$").unwrap());

/// Every well-formed table in `text`, in document order.
pub fn extract_tables(text: &str) -> Vec<Table> {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut tables = Vec::new();
    let mut i = 0;

    while i + 2 < lines.len() {
        if !(is_header_row(lines[i]) && is_separator_row(lines[i + 1]) && is_pipe_row(lines[i + 2])) {
            i += 1;
            continue;
        }

        let headers = split_row(lines[i]);
        let mut rows = Vec::new();
        let mut end = i + 2;
        // Dash-only rows below the separator are data, e.g. `| - | - |`.
        while end < lines.len() && is_pipe_row(lines[end]) {
            rows.push(split_row(lines[end]));
            end += 1;
        }

        let mut table = Table::new(headers, rows);
        table.title = heading_before(&lines, i).unwrap_or_default();
        tables.push(table);
        i = end;
    }

    tables
}

/// Split on `|`, trim cells, and drop the empty cell produced by a leading
/// or trailing pipe.
pub fn split_row(line: &str) -> Vec<String> {
    let mut cells: Vec<&str> = line.trim().split('|').map(str::trim).collect();
    if cells.first().is_some_and(|c| c.is_empty()) {
        cells.remove(0);
    }
    if cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells.into_iter().map(str::to_string).collect()
}

fn is_pipe_row(line: &str) -> bool {
    line.contains('|') && !split_row(line).is_empty()
}

fn is_separator_row(line: &str) -> bool {
    RE_SEPARATOR_ROW.is_match(line)
}

fn is_header_row(line: &str) -> bool {
    is_pipe_row(line) && !is_separator_row(line)
}

/// A markdown heading or bold line directly above the table, if any.
fn heading_before(lines: &[&str], table_start: usize) -> Option<String> {
    let previous = lines[..table_start]
        .iter()
        .rev()
        .find(|line| !line.is_empty())?;

    if previous.starts_with('#') {
        Some(previous.trim_start_matches('#').trim().to_string())
    } else if previous.starts_with("**") && previous.ends_with("**") && previous.len() > 4 {
        Some(previous.trim_matches('*').trim().to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_row() {
        assert_eq!(split_row("| a | b |"), vec!["a", "b"]);
        assert_eq!(split_row("a | b"), vec!["a", "b"]);
        assert_eq!(split_row("| a | |"), vec!["a", ""]);
        assert_eq!(split_row("|  | b |"), vec!["", "b"]);
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_separator_row("|---|---|"));
        assert!(is_separator_row("| :--- | ---: | :-: |"));
        assert!(is_separator_row("---|---"));
        assert!(!is_separator_row("| a | b |"));
        assert!(!is_separator_row("no pipes here"));
    }

    #[test]
    fn test_extract_single_table() {
        let text = "Here is what I found:\n\n\
                    | Artist | Title | Price |\n\
                    |--------|-------|------:|\n\
                    | Monet | Water Lilies | $1,200 |\n\
                    | Degas | Dancers | $900 |\n\n\
                    Let me know if you need more.";
        let tables = extract_tables(text);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].headers, vec!["Artist", "Title", "Price"]);
        assert_eq!(tables[0].rows.len(), 2);
        assert_eq!(tables[0].rows[1], vec!["Degas", "Dancers", "$900"]);
        assert_eq!(tables[0].title, "");
    }

    #[test]
    fn test_heading_becomes_title() {
        let text = "## Lot list\n| Lot | Estimate |\n|---|---|\n| 1 | 100 |";
        let tables = extract_tables(text);
        assert_eq!(tables[0].title, "Lot list");
    }

    #[test]
    fn test_multiple_tables() {
        let text = "| a |\n|---|\n| 1 |\n\nprose\n\n| b | c |\n| --- | --- |\n| 2 | 3 |\n| 4 | 5 |";
        let tables = extract_tables(text);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows, vec![vec!["1".to_string()]]);
        assert_eq!(tables[1].rows.len(), 2);
    }

    #[test]
    fn test_dash_only_data_row_is_kept() {
        let text = "| Lot | Price |\n|---|---|\n| 1 | $100 |\n| - | - |\n| 3 | $300 |";
        let tables = extract_tables(text);

        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0].rows,
            vec![
                vec!["1".to_string(), "$100".into()],
                vec!["-".to_string(), "-".into()],
                vec!["3".to_string(), "$300".into()],
            ]
        );
    }

    #[test]
    fn test_header_without_data_rows_is_ignored() {
        assert!(extract_tables("| a | b |\n|---|---|\n").is_empty());
        assert!(extract_tables("| a | b |\n| 1 | 2 |").is_empty());
        assert!(extract_tables("I cannot process this file.").is_empty());
    }
}
