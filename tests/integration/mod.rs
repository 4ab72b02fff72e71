//! Integration tests for askdb.

pub mod common;
pub mod config_test;
pub mod pipeline_test;
pub mod postgres_test;
pub mod repl_test;
