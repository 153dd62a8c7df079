#![deny(unsafe_code)]

//! Persistence contract.
//!
//! The pipeline depends only on this narrow CRUD surface; any relational
//! backend can sit behind it. [`memory::MemoryStore`] is the reference
//! implementation used by tests and the CLI.

pub mod filter;
pub mod memory;
pub mod relations;

use async_trait::async_trait;
use thiserror::Error;

use propsift_model::Record;

pub use filter::{Filter, FilterOp};
pub use memory::MemoryStore;

/// Table holding imported property records.
pub const TABLE_PROPERTIES: &str = "properties";
/// Tag definitions (display + canonical name).
pub const TABLE_TAGS: &str = "tags";
/// List definitions (display + canonical name).
pub const TABLE_LISTS: &str = "lists";
/// Property-to-tag relation rows.
pub const TABLE_PROPERTY_TAGS: &str = "property_tags";
/// Property-to-list relation rows.
pub const TABLE_PROPERTY_LISTS: &str = "property_lists";
/// Scoring rules, grouped by configuration.
pub const TABLE_SCORING_RULES: &str = "scoring_rules";
/// Score results, one row per entity and configuration.
pub const TABLE_PROPERTY_SCORES: &str = "property_scores";

/// Errors from the persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend error on {table}: {message}")]
    Backend { table: String, message: String },
    #[error("no such table: {0}")]
    UnknownTable(String),
}

/// Narrow CRUD contract over a relational-style backend.
///
/// Every call is a suspension point; no call carries a timeout, and no
/// transaction spans more than one call.
#[async_trait]
pub trait Store: Send + Sync {
    /// Inserts records, returning them as stored.
    async fn insert(&self, table: &str, records: Vec<Record>) -> Result<Vec<Record>, StoreError>;

    /// Returns all records matching every filter.
    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Record>, StoreError>;

    /// Inserts or replaces the record whose `key_fields` values match.
    async fn upsert(
        &self,
        table: &str,
        record: Record,
        key_fields: &[&str],
    ) -> Result<(), StoreError>;

    /// Deletes all records matching every filter.
    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError>;
}
