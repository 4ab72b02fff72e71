//! Prompt construction for SQL generation.
//!
//! The schema is fixed: three student tables joined on `roll_no`.

/// Tables described to the model, with their columns in declaration order.
pub const STUDENT_TABLES: &[(&str, &[&str])] = &[
    ("student_data", &["roll_no", "name", "age", "gender"]),
    ("student_marks", &["roll_no", "department", "subject", "marks"]),
    ("student_address", &["roll_no", "address", "city", "state"]),
];

const PREAMBLE: &str = "You are an expert SQL developer. Return ONLY the SQL statement for this query.\n\
                        Do NOT add explanations or notes.";

/// Formats the table listing, one `- table (col, col, ...)` line per table.
pub fn schema_description() -> String {
    STUDENT_TABLES
        .iter()
        .map(|(table, columns)| format!("- {} ({})", table, columns.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the SQL-generation prompt for a user query.
///
/// The query is embedded verbatim between single quotes.
pub fn build_sql_prompt(query: &str) -> String {
    format!(
        "{PREAMBLE}\nTables:\n{}\nQuery: '{query}'",
        schema_description()
    )
}
