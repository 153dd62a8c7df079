//! In-memory reference backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use propsift_model::Record;

use crate::filter::Filter;
use crate::{Store, StoreError};

/// Snapshot of all tables, used for save/load.
pub type Tables = BTreeMap<String, Vec<Record>>;

/// In-memory table store. Tables are created on first write; selecting a
/// table that was never written returns no rows, mirroring how an empty
/// relational table behaves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a previously captured snapshot.
    pub fn from_snapshot(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Clones the full table contents.
    pub async fn snapshot(&self) -> Tables {
        self.tables.read().await.clone()
    }

    /// Row count for one table.
    pub async fn count(&self, table: &str) -> usize {
        self.tables
            .read()
            .await
            .get(table)
            .map_or(0, Vec::len)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: &str, records: Vec<Record>) -> Result<Vec<Record>, StoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        rows.extend(records.iter().cloned());
        Ok(records)
    }

    async fn select(&self, table: &str, filters: &[Filter]) -> Result<Vec<Record>, StoreError> {
        let tables = self.tables.read().await;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or_default();
        Ok(rows
            .iter()
            .filter(|row| filters.iter().all(|filter| filter.matches(row)))
            .cloned()
            .collect())
    }

    async fn upsert(
        &self,
        table: &str,
        record: Record,
        key_fields: &[&str],
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let rows = tables.entry(table.to_string()).or_default();
        let existing = rows.iter_mut().find(|row| {
            key_fields
                .iter()
                .all(|key| row.get(key).is_some() && row.get(key) == record.get(key))
        });
        match existing {
            Some(row) => *row = record,
            None => rows.push(record),
        }
        Ok(())
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|row| !filters.iter().all(|filter| filter.matches(row)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use propsift_model::FieldValue;

    use super::*;

    fn row(id: &str, status: &str) -> Record {
        let mut record = Record::new();
        record.set("id", FieldValue::Text(id.to_string()));
        record.set("status", FieldValue::Text(status.to_string()));
        record
    }

    #[tokio::test]
    async fn insert_then_select_with_filters() {
        let store = MemoryStore::new();
        store
            .insert("properties", vec![row("1", "active"), row("2", "sold")])
            .await
            .expect("insert");
        let active = store
            .select("properties", &[Filter::eq("status", "active")])
            .await
            .expect("select");
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id(), Some("1"));
        assert_eq!(store.count("properties").await, 2);
    }

    #[tokio::test]
    async fn select_on_missing_table_is_empty() {
        let store = MemoryStore::new();
        let rows = store.select("nope", &[]).await.expect("select");
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn upsert_replaces_matching_key() {
        let store = MemoryStore::new();
        store
            .insert("properties", vec![row("1", "active")])
            .await
            .expect("insert");
        store
            .upsert("properties", row("1", "sold"), &["id"])
            .await
            .expect("upsert");
        store
            .upsert("properties", row("2", "active"), &["id"])
            .await
            .expect("upsert");
        let rows = store.select("properties", &[]).await.expect("select");
        assert_eq!(rows.len(), 2);
        let one = rows.iter().find(|r| r.id() == Some("1")).expect("row 1");
        assert_eq!(one.text("status"), Some("sold"));
    }

    #[tokio::test]
    async fn delete_removes_matching_rows() {
        let store = MemoryStore::new();
        store
            .insert("properties", vec![row("1", "active"), row("2", "sold")])
            .await
            .expect("insert");
        store
            .delete("properties", &[Filter::eq("status", "sold")])
            .await
            .expect("delete");
        assert_eq!(store.count("properties").await, 1);
    }

    #[tokio::test]
    async fn snapshot_round_trips() {
        let store = MemoryStore::new();
        store
            .insert("properties", vec![row("1", "active")])
            .await
            .expect("insert");
        let copy = MemoryStore::from_snapshot(store.snapshot().await);
        assert_eq!(copy.count("properties").await, 1);
    }
}
