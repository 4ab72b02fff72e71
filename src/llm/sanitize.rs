//! Reduces raw completion text to a single executable SQL statement.
//!
//! Models wrap SQL in prose and markdown fences. The sanitizer keeps the text
//! from the first statement keyword up to the first semicolon, normalizes
//! whitespace, and guarantees exactly one trailing `;`. Text with no
//! statement keyword is rejected rather than passed to the database.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{AskError, Result};

/// Statement keywords a sanitized statement may start with.
pub const STATEMENT_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "SHOW", "DESCRIBE"];

fn keyword_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(SELECT|INSERT|UPDATE|DELETE|SHOW|DESCRIBE)")
            .expect("statement keyword pattern is valid")
    })
}

/// A SQL statement that starts with a statement keyword and ends with one `;`.
///
/// Only [`sanitize_sql`] constructs one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlStatement(String);

impl SqlStatement {
    /// Returns the statement text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the statement, returning the text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SqlStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SqlStatement {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Sanitizes raw completion text into a single statement.
///
/// 1. If the text holds a fenced code block containing a statement keyword,
///    only that block is considered.
/// 2. Everything before the first (case-insensitive) statement keyword is
///    dropped. The match is not word-bounded, so "show" inside prose counts.
/// 3. Everything after the first `;` is dropped; a missing `;` is appended.
/// 4. Whitespace runs collapse to single spaces and the ends are trimmed.
///
/// Fails with a generation error when no statement keyword is present.
pub fn sanitize_sql(raw: &str) -> Result<SqlStatement> {
    let source = fenced_block(raw)
        .filter(|block| keyword_regex().is_match(block))
        .unwrap_or(raw);

    let start = keyword_regex()
        .find(source)
        .map(|m| m.start())
        .ok_or_else(|| {
            AskError::generation(format!(
                "Response did not contain a SQL statement: {}",
                preview(raw)
            ))
        })?;

    let statement = &source[start..];
    let (body, terminated) = match statement.find(';') {
        Some(end) => (&statement[..=end], true),
        None => (statement, false),
    };

    let mut sql = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if !terminated {
        sql.push(';');
    }

    Ok(SqlStatement(sql))
}

/// Returns the body of the first fenced code block, if any.
///
/// The fence's info string (e.g. `sql`) is skipped. An unclosed fence runs to
/// the end of the text.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let end = body.find("```").unwrap_or(body.len());
    Some(&body[..end])
}

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() {
        return "<empty response>".to_string();
    }
    if flat.chars().count() > 80 {
        let cut: String = flat.chars().take(80).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sanitize(raw: &str) -> String {
        sanitize_sql(raw).unwrap().into_string()
    }

    #[test]
    fn test_clean_statement_unchanged() {
        assert_eq!(
            sanitize("SELECT * FROM student_data;"),
            "SELECT * FROM student_data;"
        );
    }

    #[test]
    fn test_strips_leading_prose_and_trailing_notes() {
        let raw = "Sure! Here is the query:\nSELECT name FROM student_data WHERE age > 20;\nThis returns all names.";
        assert_eq!(
            sanitize(raw),
            "SELECT name FROM student_data WHERE age > 20;"
        );
    }

    #[test]
    fn test_collapses_whitespace() {
        let raw = "  SELECT d.name,\n\tm.marks\n  FROM student_data d\n  JOIN student_marks m ON d.roll_no = m.roll_no;  ";
        assert_eq!(
            sanitize(raw),
            "SELECT d.name, m.marks FROM student_data d JOIN student_marks m ON d.roll_no = m.roll_no;"
        );
    }

    #[test]
    fn test_appends_missing_semicolon() {
        assert_eq!(
            sanitize("select count(*) from student_data"),
            "select count(*) from student_data;"
        );
    }

    #[test]
    fn test_keeps_only_first_statement() {
        assert_eq!(
            sanitize("DELETE FROM student_marks WHERE marks < 0;; DROP TABLE student_data;"),
            "DELETE FROM student_marks WHERE marks < 0;"
        );
    }

    #[test]
    fn test_fenced_block() {
        let raw = "```sql\nSELECT city, COUNT(*)\nFROM student_address\nGROUP BY city\n```\nGrouped by city.";
        assert_eq!(
            sanitize(raw),
            "SELECT city, COUNT(*) FROM student_address GROUP BY city;"
        );
    }

    #[test]
    fn test_fence_without_sql_falls_back_to_whole_text() {
        let raw = "```\nnote: tables are joined on roll_no\n```\nSELECT 1;";
        assert_eq!(sanitize(raw), "SELECT 1;");
    }

    #[test]
    fn test_keyword_match_is_not_word_bounded() {
        // The first keyword-like substring wins, even inside prose.
        assert_eq!(
            sanitize("I will show you: SELECT 1;"),
            "show you: SELECT 1;"
        );
    }

    #[test]
    fn test_other_statement_kinds() {
        assert_eq!(sanitize("SHOW TABLES"), "SHOW TABLES;");
        assert_eq!(sanitize("describe student_data;"), "describe student_data;");
        assert_eq!(
            sanitize("UPDATE student_marks SET marks = 90 WHERE roll_no = 3;"),
            "UPDATE student_marks SET marks = 90 WHERE roll_no = 3;"
        );
    }

    #[test]
    fn test_rejects_text_without_statement() {
        let err = sanitize_sql("I cannot answer that with the given tables.").unwrap_err();
        assert!(matches!(err, AskError::Generation(_)));
        assert!(err.message().contains("did not contain a SQL statement"));

        let err = sanitize_sql("   ").unwrap_err();
        assert!(err.message().contains("<empty response>"));
    }

    #[test]
    fn test_output_invariants() {
        let inputs = [
            "SELECT * FROM student_data;",
            "Answer:\n\nselect *\nfrom student_marks\nwhere marks > 80",
            "```sql\nINSERT INTO student_data VALUES (9, 'Z', 20, 'F');\n```",
            "explanation first; then SELECT 2;",
        ];

        for raw in inputs {
            let sql = sanitize(raw);
            let upper = sql.to_uppercase();
            assert!(
                STATEMENT_KEYWORDS.iter().any(|k| upper.starts_with(k)),
                "{sql:?} should start with a statement keyword"
            );
            assert!(sql.ends_with(';') && !sql.ends_with(";;"), "{sql:?}");
            assert_eq!(sql.matches(';').count(), 1, "{sql:?}");
            assert!(!sql.contains('\n'), "{sql:?}");
        }
    }
}
