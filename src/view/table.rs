//! Top-10 table of the largest loan requests.

use std::fmt;

use crate::format;
use crate::stats::RecordSummary;

use super::Screen;

/// Column headers, in display order.
pub const COLUMNS: [&str; 6] = ["ID", "Amount", "Sex", "Education", "Approval", "Outcome"];

/// Maximum number of record rows.
pub const MAX_ROWS: usize = 10;

const NO_DATA: &str = "No data available.";
const UNAVAILABLE: &str = "Data not available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    Rejected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableRow {
    Record {
        id: String,
        amount: String,
        sex: String,
        education: String,
        probability: String,
        outcome: Outcome,
    },
    /// A single row spanning all [`COLUMNS`].
    Placeholder { text: &'static str, is_error: bool },
}

impl TableRow {
    fn from_record(record: &RecordSummary) -> Self {
        let outcome = if record.is_approved() {
            Outcome::Approved
        } else {
            Outcome::Rejected
        };
        Self::Record {
            id: record.id.to_string(),
            amount: record
                .requested_amount
                .map_or_else(|| "-".to_string(), format::currency),
            sex: record.sex.clone().unwrap_or_else(|| "-".to_string()),
            education: record.education.clone().unwrap_or_else(|| "-".to_string()),
            probability: format::probability(record.approval_probability.unwrap_or(0.0)),
            outcome,
        }
    }
}

/// Rows for the given records; an empty list yields one placeholder row.
pub fn rows(records: &[RecordSummary]) -> Vec<TableRow> {
    if records.is_empty() {
        return vec![TableRow::Placeholder {
            text: NO_DATA,
            is_error: false,
        }];
    }
    records
        .iter()
        .take(MAX_ROWS)
        .map(TableRow::from_record)
        .collect()
}

pub fn render(screen: &mut Screen, records: &[RecordSummary]) {
    if let Some(body) = screen.table_mut() {
        *body = rows(records);
    }
}

/// Error state of the table after a failed cycle.
pub fn render_unavailable(screen: &mut Screen) {
    if let Some(body) = screen.table_mut() {
        *body = vec![TableRow::Placeholder {
            text: UNAVAILABLE,
            is_error: true,
        }];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, p: f64) -> RecordSummary {
        RecordSummary {
            id,
            requested_amount: Some(50_000.0),
            sex: Some("M".to_string()),
            education: None,
            age: None,
            property: None,
            purpose: None,
            approval_probability: Some(p),
        }
    }

    fn outcome_of(row: &TableRow) -> Outcome {
        match row {
            TableRow::Record { outcome, .. } => *outcome,
            TableRow::Placeholder { .. } => panic!("expected a record row"),
        }
    }

    #[test]
    fn half_probability_is_rejected() {
        assert_eq!(outcome_of(&rows(&[record(1, 0.5)])[0]), Outcome::Rejected);
        assert_eq!(outcome_of(&rows(&[record(1, 0.500_000_1)])[0]), Outcome::Approved);
    }

    #[test]
    fn empty_list_renders_one_placeholder() {
        let rows = rows(&[]);
        assert_eq!(rows.len(), 1);
        assert!(matches!(rows[0], TableRow::Placeholder { is_error: false, .. }));
    }

    #[test]
    fn at_most_ten_rows() {
        let records: Vec<_> = (0..12).map(|i| record(i, 0.9)).collect();
        assert_eq!(rows(&records).len(), MAX_ROWS);
    }

    #[test]
    fn record_cells_are_formatted() {
        let row = &rows(&[record(42, 0.734)])[0];
        assert_eq!(
            row,
            &TableRow::Record {
                id: "42".to_string(),
                amount: "€ 50.000".to_string(),
                sex: "M".to_string(),
                education: "-".to_string(),
                probability: "73.4%".to_string(),
                outcome: Outcome::Approved,
            }
        );
    }

    #[test]
    fn unscored_record_without_amount() {
        let mut unscored = record(3, 0.0);
        unscored.requested_amount = None;
        unscored.approval_probability = None;
        let TableRow::Record {
            amount,
            probability,
            outcome,
            ..
        } = &rows(&[unscored])[0]
        else {
            panic!("expected a record row");
        };
        assert_eq!(amount, "-");
        assert_eq!(probability, "0.0%");
        assert_eq!(*outcome, Outcome::Rejected);
    }

    #[test]
    fn unavailable_replaces_rows() {
        let mut screen = Screen::full();
        render(&mut screen, &[record(1, 0.9)]);
        render_unavailable(&mut screen);
        assert_eq!(
            screen.table().unwrap(),
            &[TableRow::Placeholder {
                text: UNAVAILABLE,
                is_error: true
            }]
        );
    }
}
