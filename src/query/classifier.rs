//! Keyword-based intent classification.
//!
//! Decides whether a question is about the student database or is a
//! general-knowledge question for the completion service.

use std::fmt;

use crate::config::ClassifierConfig;

/// Built-in student-domain keywords.
///
/// Entity and attribute names, comparison and aggregate words, and the
/// place names that appear in the sample data.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "student",
    "roll_no",
    "roll number",
    "marks",
    "subject",
    "name",
    "age",
    "gender",
    "address",
    "enrolled",
    "computer science",
    "ds",
    "cs",
    "database",
    "show",
    "list",
    "count",
    "how many",
    "number of",
    "department",
    "grade",
    "score",
    "course",
    "class",
    "program",
    "faculty",
    "details of",
    "information about",
    "got more than",
    "above",
    "below",
    "less than",
    "greater than",
    "state",
    "city",
    "maharashtra",
];

/// Category assigned to a user query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Answered by generating and running SQL against the student tables.
    Student,
    /// Forwarded verbatim to the completion service.
    General,
}

impl Classification {
    /// Returns the classification as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::General => "general",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Strategy for routing a query to the student or general path.
pub trait QueryClassifier: Send + Sync {
    /// Classifies a query. Must be pure and total.
    fn classify(&self, query: &str) -> Classification;
}

/// Classifies by substring membership against a keyword set.
///
/// Matching is plain substring containment on the lower-cased query, so a
/// keyword embedded in an unrelated word still matches ("cs" in "physics").
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    /// Creates a classifier from any keyword list.
    ///
    /// Keywords are lower-cased and trimmed; blank entries are dropped since
    /// an empty string would match every query.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if !keyword.is_empty() && !list.contains(&keyword) {
                list.push(keyword);
            }
        }
        Self { keywords: list }
    }

    /// Adds more keywords to the set.
    pub fn with_extra<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = Self::new(extra);
        for keyword in extra.keywords {
            if !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    /// Builds the classifier described by the `[classifier]` config section.
    ///
    /// `keywords` replaces the built-in list; `extra_keywords` extends
    /// whichever list is active.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let base = match &config.keywords {
            Some(keywords) => Self::new(keywords),
            None => Self::default(),
        };
        base.with_extra(&config.extra_keywords)
    }

    /// Returns the configured keywords.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Returns the first keyword contained in the query, if any.
    pub fn matched_keyword(&self, query: &str) -> Option<&str> {
        let query = query.to_lowercase();
        self.keywords
            .iter()
            .find(|k| query.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}

impl QueryClassifier for KeywordClassifier {
    fn classify(&self, query: &str) -> Classification {
        if self.matched_keyword(query).is_some() {
            Classification::Student
        } else {
            Classification::General
        }
    }
}

/// Classifies a query with the built-in keyword set.
pub fn classify(query: &str) -> Classification {
    KeywordClassifier::default().classify(query)
}
