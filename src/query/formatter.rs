//! Turns result rows into a prose answer.
//!
//! Aggregate questions (count/average/max/min) get a one-line sentence built
//! from the first row; anything else is rendered as a listing.

use crate::db::Row;

/// Answer returned when a query matched nothing.
pub const NO_RECORDS_MESSAGE: &str = "No matching records found in the database.";

/// One aggregate family: the query words that select it, the column-name
/// markers used to find its value, and how to phrase the answer.
struct AggregateGroup {
    triggers: &'static [&'static str],
    markers: &'static [&'static str],
    kind: AggregateKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AggregateKind {
    Count,
    Average,
    Max,
    Min,
}

/// Checked in order; the first group whose trigger appears wins.
const AGGREGATE_GROUPS: &[AggregateGroup] = &[
    AggregateGroup {
        triggers: &["count", "how many", "number of"],
        markers: &["count"],
        kind: AggregateKind::Count,
    },
    AggregateGroup {
        triggers: &["average", "avg"],
        markers: &["avg", "average"],
        kind: AggregateKind::Average,
    },
    AggregateGroup {
        triggers: &["max"],
        markers: &["max"],
        kind: AggregateKind::Max,
    },
    AggregateGroup {
        triggers: &["minimum", "min"],
        markers: &["min", "minimum"],
        kind: AggregateKind::Min,
    },
];

/// Formats the rows returned for `query` into a human-readable answer.
pub fn format_results(query: &str, rows: &[Row]) -> String {
    let Some(first) = rows.first() else {
        return NO_RECORDS_MESSAGE.to_string();
    };

    let query_lower = query.to_lowercase();

    let group = AGGREGATE_GROUPS
        .iter()
        .find(|g| g.triggers.iter().any(|t| query_lower.contains(t)));

    if let Some(group) = group {
        return format_aggregate(group, first, rows.len());
    }

    if rows.len() == 1 {
        let details: Vec<String> = first
            .iter()
            .map(|(col, val)| format!("{col}: {val}"))
            .collect();
        return format!("Student Details:\n• {}", details.join("\n• "));
    }

    let lines: Vec<String> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|(col, val)| format!("{col}: {val}"))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();

    format!(
        "Found {} students matching your query:\n{}",
        rows.len(),
        lines.join("\n")
    )
}

fn format_aggregate(group: &AggregateGroup, row: &Row, row_count: usize) -> String {
    let value = find_aggregate_column(row, group.markers)
        .and_then(|col| row.get(col))
        .map(|v| v.to_display_string());

    match group.kind {
        AggregateKind::Count => {
            let count = value.unwrap_or_else(|| row_count.to_string());
            format!("There are {count} students matching your query.")
        }
        AggregateKind::Average => {
            format!("The average value is {}.", value.as_deref().unwrap_or("N/A"))
        }
        AggregateKind::Max => {
            format!("The maximum value is {}.", value.as_deref().unwrap_or("N/A"))
        }
        AggregateKind::Min => {
            format!("The minimum value is {}.", value.as_deref().unwrap_or("N/A"))
        }
    }
}

/// Returns the first column whose normalized name contains one of `markers`.
///
/// Normalization lower-cases the name and keeps only `[a-z0-9]`, so
/// `COUNT(*)` becomes `count` and `AVG(marks)` becomes `avgmarks`.
fn find_aggregate_column<'a>(row: &'a Row, markers: &[&str]) -> Option<&'a str> {
    row.columns().find(|name| {
        let normalized: String = name
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect();
        markers.iter().any(|m| normalized.contains(m))
    })
}
