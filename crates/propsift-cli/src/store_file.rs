//! JSON file persistence for the in-memory store.
//!
//! The store file is a plain JSON object mapping table names to row arrays.
//! A missing file starts an empty dataset; saves rewrite the whole file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use propsift_store::MemoryStore;
use propsift_store::memory::Tables;

pub fn load_store(path: &Path) -> Result<MemoryStore> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "store file absent, starting empty");
        return Ok(MemoryStore::new());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("read store file {}", path.display()))?;
    let tables: Tables = serde_json::from_str(&text)
        .with_context(|| format!("parse store file {}", path.display()))?;
    Ok(MemoryStore::from_snapshot(tables))
}

pub async fn save_store(store: &MemoryStore, path: &Path) -> Result<()> {
    let tables = store.snapshot().await;
    let text = serde_json::to_string_pretty(&tables).context("serialize store")?;
    fs::write(path, text).with_context(|| format!("write store file {}", path.display()))?;
    tracing::debug!(path = %path.display(), tables = tables.len(), "store saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use propsift_model::{FieldValue, Record};
    use propsift_store::{Store, TABLE_PROPERTIES};

    use super::*;

    #[tokio::test]
    async fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");

        let store = MemoryStore::new();
        let mut row = Record::new();
        row.set("id", FieldValue::Text("p1".to_string()));
        row.set("status", FieldValue::Text("active".to_string()));
        store
            .insert(TABLE_PROPERTIES, vec![row])
            .await
            .expect("insert");
        save_store(&store, &path).await.expect("save");

        let reloaded = load_store(&path).expect("load");
        let rows = reloaded
            .select(TABLE_PROPERTIES, &[])
            .await
            .expect("select");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("status"), Some("active"));
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = load_store(&dir.path().join("absent.json")).expect("load");
        drop(store);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").expect("write");
        assert!(load_store(&path).is_err());
    }
}
