//! Core orchestrator for askdb.
//!
//! Routes each question through the classifier, then either generates and
//! runs SQL against the student tables or forwards the question to the
//! completion service. Owns the query → SQL and query → answer caches.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::LruCache;
use crate::config::CacheConfig;
use crate::db::DatabaseClient;
use crate::error::Result;
use crate::llm::{LlmClient, LlmService, SqlStatement};
use crate::query::{format_results, Classification, QueryClassifier};

/// Warning shown for blank submissions.
pub const EMPTY_QUERY_WARNING: &str = "Please enter a query.";

/// What the user sees for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The answer text.
    Success(String),
    /// Nothing was run; the text explains why.
    Warning(String),
    /// The pipeline failed; the text is the flattened error.
    Error(String),
}

impl Outcome {
    /// Returns the text without the status prefix.
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Warning(text) | Self::Error(text) => text,
        }
    }

    /// Returns true for `Error` outcomes.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(text) => f.write_str(text),
            Self::Warning(text) => write!(f, "Warning: {text}"),
            Self::Error(text) => write!(f, "Error: {text}"),
        }
    }
}

/// An outcome plus the time spent producing it.
#[derive(Debug, Clone)]
pub struct Answer {
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl Answer {
    /// Returns the `Processed in X.XXs` line shown after each answer.
    pub fn timing_line(&self) -> String {
        format!("Processed in {:.2}s", self.elapsed.as_secs_f64())
    }
}

/// The question-answering pipeline.
pub struct Assistant {
    classifier: Box<dyn QueryClassifier>,
    llm: LlmService,
    db: Box<dyn DatabaseClient>,
    sql_cache: LruCache<String, SqlStatement>,
    answer_cache: LruCache<String, String>,
}

impl Assistant {
    /// Creates an assistant with the given collaborators and cache sizes.
    pub fn new(
        classifier: Box<dyn QueryClassifier>,
        llm: Box<dyn LlmClient>,
        db: Box<dyn DatabaseClient>,
        caches: CacheConfig,
    ) -> Self {
        Self {
            classifier,
            llm: LlmService::new(llm),
            db,
            sql_cache: LruCache::new(caches.sql_capacity),
            answer_cache: LruCache::new(caches.answer_capacity),
        }
    }

    /// Answers a question, serving repeats from the answer cache.
    pub async fn ask(&mut self, query: &str) -> Answer {
        self.timed(query, true).await
    }

    /// Answers a question without consulting the answer cache.
    ///
    /// Generated SQL is still reused, so the statement runs again against
    /// current data. A successful answer replaces the cached one.
    pub async fn ask_uncached(&mut self, query: &str) -> Answer {
        self.timed(query, false).await
    }

    /// Drops every cached statement and answer.
    pub fn clear_caches(&mut self) {
        self.sql_cache.clear();
        self.answer_cache.clear();
        info!("Cleared SQL and answer caches");
    }

    /// Returns the number of cached (statements, answers).
    pub fn cache_sizes(&self) -> (usize, usize) {
        (self.sql_cache.len(), self.answer_cache.len())
    }

    /// Returns the database the assistant queries.
    pub fn database(&self) -> &dyn DatabaseClient {
        self.db.as_ref()
    }

    /// Closes the database connection.
    pub async fn close(&self) -> Result<()> {
        self.db.close().await
    }

    async fn timed(&mut self, query: &str, use_answer_cache: bool) -> Answer {
        let start = Instant::now();
        let outcome = self.resolve(query, use_answer_cache).await;
        let elapsed = start.elapsed();

        debug!(elapsed_ms = elapsed.as_millis(), "Submission processed");
        Answer { outcome, elapsed }
    }

    async fn resolve(&mut self, query: &str, use_answer_cache: bool) -> Outcome {
        if query.trim().is_empty() {
            return Outcome::Warning(EMPTY_QUERY_WARNING.to_string());
        }

        let key = query.to_string();
        if use_answer_cache {
            if let Some(answer) = self.answer_cache.get(&key) {
                debug!("Answer cache hit");
                return Outcome::Success(answer);
            }
        }

        let classification = self.classifier.classify(query);
        info!(%classification, "Classified query");

        let result = match classification {
            Classification::Student => self.answer_from_database(query).await,
            Classification::General => self.llm.answer_general(query).await,
        };

        match result {
            Ok(answer) => {
                self.answer_cache.insert(key, answer.clone());
                Outcome::Success(answer)
            }
            Err(e) => {
                warn!(category = e.category(), error = e.message(), "Query failed");
                Outcome::Error(format!("Database error: {}", e.message()))
            }
        }
    }

    async fn answer_from_database(&mut self, query: &str) -> Result<String> {
        let key = query.to_string();
        let sql = match self.sql_cache.get(&key) {
            Some(sql) => {
                debug!("SQL cache hit");
                sql
            }
            None => self.llm.extract_sql(query).await?,
        };

        debug!(sql = sql.as_str(), "Executing generated SQL");
        let result = self.db.execute_query(sql.as_str()).await?;
        info!(
            row_count = result.row_count(),
            total_rows = result.total_rows,
            execution_ms = result.execution_time.as_millis(),
            "Query executed"
        );
        if result.was_truncated {
            warn!(
                total_rows = result.total_rows,
                kept = result.row_count(),
                "Result truncated; answering from the first rows only"
            );
        }

        let answer = format_results(query, &result.rows);
        self.sql_cache.insert(key, sql);
        Ok(answer)
    }
}
