//! The transaction table and its search filter.

use crate::model::TransactionRecord;
use std::fmt::Write;

const HEADERS: [&str; 6] = ["ID", "Date", "Category", "Type", "Amount", "Note"];

/// One rendered table row.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Row {
    cells: [String; 6],
}

impl Row {
    pub(crate) fn new(record: &TransactionRecord) -> Self {
        let t = record.transaction_type();
        Self {
            cells: [
                record.id().to_string(),
                record.date().to_string(),
                record.category().to_string(),
                t.to_string(),
                format!("{}{}", t.sign(), record.amount()),
                record.note().unwrap_or_default().to_string(),
            ],
        }
    }

    /// Case-insensitive substring match against the row's text. An empty needle matches every
    /// row.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty() || self.cells.join("\t").to_lowercase().contains(&needle)
    }
}

/// Builds the rows for `records`, keeping only those that match `search`.
pub(crate) fn rows(records: &[TransactionRecord], search: Option<&str>) -> Vec<Row> {
    records
        .iter()
        .map(Row::new)
        .filter(|row| search.map_or(true, |s| row.matches(s)))
        .collect()
}

/// Lays the rows out in aligned columns. Amounts are right-aligned.
pub(crate) fn render(rows: &[Row]) -> String {
    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(&row.cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_line(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("  "));
    for row in rows {
        write_line(&mut out, &row.cells, &widths);
    }
    if rows.is_empty() {
        let _ = writeln!(out, "(no transactions)");
    }
    out
}

fn write_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(ix, (cell, &w))| {
            if ix == 4 {
                format!("{cell:>w$}")
            } else {
                format!("{cell:<w$}")
            }
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionType};
    use std::str::FromStr;

    fn records() -> Vec<TransactionRecord> {
        vec![
            TransactionRecord::new(
                "1",
                Amount::from_str("4200").unwrap(),
                TransactionType::Income,
                "Salary",
                "2025-08-01",
            ),
            TransactionRecord::new(
                "2",
                Amount::from_str("87.43").unwrap(),
                TransactionType::Expense,
                "Groceries",
                "2025-08-09",
            )
            .with_note("Whole Foods"),
        ]
    }

    #[test]
    fn test_signed_amounts() {
        let rows = rows(&records(), None);
        assert_eq!(rows[0].cells[4], "+4,200.00");
        assert_eq!(rows[1].cells[4], "-87.43");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let found = rows(&records(), Some("whole"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].cells[0], "2");
        assert_eq!(rows(&records(), Some("INCOME")).len(), 1);
        assert_eq!(rows(&records(), Some("2025-08")).len(), 2);
        assert!(rows(&records(), Some("rent")).is_empty());
    }

    #[test]
    fn test_blank_search_matches_all() {
        assert_eq!(rows(&records(), Some("  ")).len(), 2);
    }

    #[test]
    fn test_render_has_header_and_rows() {
        let text = render(&rows(&records(), None));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[3].contains("Whole Foods"));
    }

    #[test]
    fn test_render_empty() {
        let text = render(&[]);
        assert!(text.contains("(no transactions)"));
    }
}
