//! End-to-end CSV import.
//!
//! Normalizes the raw text, parses it, transforms the column table into
//! destination records, inserts them in chunks, and materializes tag and
//! list relations for every inserted row.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use propsift_ingest::normalize::normalize_csv_text;
use propsift_ingest::parse::parse_csv_text;
use propsift_model::Record;
use propsift_store::{Store, TABLE_PROPERTIES};
use propsift_store::relations::{link_lists, link_tags};
use propsift_transform::json::string_items;
use propsift_transform::transform::transform_records;

use crate::ImportError;
use crate::chunk::{IMPORT_CHUNK_SIZE, process_in_chunks};

/// A non-fatal problem noted during the relation phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportIssue {
    pub message: String,
    /// Zero-based record index the issue belongs to, when known.
    pub row: Option<usize>,
}

/// Outcome of one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,
    pub total_rows: usize,
    pub inserted: usize,
    pub tag_links: usize,
    pub list_links: usize,
    pub issues: Vec<ImportIssue>,
    pub imported_at: DateTime<Utc>,
}

/// Runs the full import pipeline over raw CSV text.
///
/// Records are inserted into `properties` in chunks of
/// [`IMPORT_CHUNK_SIZE`]; an insert failure aborts the run with rows from
/// earlier chunks already committed. Relation creation failures do not
/// abort: they are collected as issues and the remaining rows continue.
/// `progress` is called after each chunk with (inserted so far, total).
pub async fn run_import(
    store: &dyn Store,
    csv_text: &str,
    mappings: &BTreeMap<String, String>,
    progress: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
) -> Result<ImportSummary, ImportError> {
    let normalized = normalize_csv_text(csv_text);
    let parsed = parse_csv_text(&normalized);

    let batch_id = Uuid::new_v4().to_string();
    let records = transform_records(&parsed.headers, &parsed.data, mappings, &batch_id)?;
    let total = records.len();
    tracing::info!(batch_id, rows = total, "starting import");

    let mut done = 0;
    let inserted = process_in_chunks(records, IMPORT_CHUNK_SIZE, |chunk| {
        done += chunk.len();
        let inserted_so_far = done;
        async move {
            let rows = store.insert(TABLE_PROPERTIES, chunk).await?;
            if let Some(report) = progress {
                report(inserted_so_far, total);
            }
            Ok::<_, ImportError>(rows)
        }
    })
    .await?;

    let mut summary = ImportSummary {
        batch_id,
        total_rows: total,
        inserted: inserted.len(),
        tag_links: 0,
        list_links: 0,
        issues: Vec::new(),
        imported_at: Utc::now(),
    };

    for (index, record) in inserted.iter().enumerate() {
        link_relations(store, record, index, &mut summary).await;
    }

    tracing::info!(
        batch_id = summary.batch_id,
        inserted = summary.inserted,
        tag_links = summary.tag_links,
        list_links = summary.list_links,
        issues = summary.issues.len(),
        "import finished"
    );
    Ok(summary)
}

async fn link_relations(
    store: &dyn Store,
    record: &Record,
    index: usize,
    summary: &mut ImportSummary,
) {
    let Some(property_id) = record.id().map(str::to_string) else {
        summary.issues.push(ImportIssue {
            message: "record has no id; relations skipped".to_string(),
            row: Some(index),
        });
        return;
    };

    let tags = decoded_names(record, "tags");
    match link_tags(store, &property_id, &tags).await {
        Ok(created) => summary.tag_links += created,
        Err(error) => summary.issues.push(ImportIssue {
            message: format!("tag linking failed: {error}"),
            row: Some(index),
        }),
    }

    let lists = decoded_names(record, "lists");
    match link_lists(store, &property_id, &lists).await {
        Ok(created) => summary.list_links += created,
        Err(error) => summary.issues.push(ImportIssue {
            message: format!("list linking failed: {error}"),
            row: Some(index),
        }),
    }
}

fn decoded_names(record: &Record, field: &str) -> Vec<String> {
    record.text(field).map(string_items).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use propsift_store::{MemoryStore, TABLE_PROPERTY_LISTS, TABLE_PROPERTY_TAGS, TABLE_TAGS};

    use super::*;

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(c, f)| ((*c).to_string(), (*f).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn imports_rows_with_relations() {
        let store = MemoryStore::new();
        let csv = "Name,Tags,Lists\nAda,\"vacant, probate\",Buyers\nBo,vacant,\n";
        let mappings = mapping(&[("Name", "first_name"), ("Tags", "tags"), ("Lists", "lists")]);
        let summary = run_import(&store, csv, &mappings, None)
            .await
            .expect("import");

        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.tag_links, 3);
        assert_eq!(summary.list_links, 1);
        assert!(summary.issues.is_empty());
        assert_eq!(store.count(TABLE_PROPERTIES).await, 2);
        // "vacant" appears on both rows but exists once.
        assert_eq!(store.count(TABLE_TAGS).await, 2);
        assert_eq!(store.count(TABLE_PROPERTY_TAGS).await, 3);
        assert_eq!(store.count(TABLE_PROPERTY_LISTS).await, 1);
    }

    #[tokio::test]
    async fn every_row_carries_the_batch_id() {
        let store = MemoryStore::new();
        let csv = "Name\nAda\nBo\n";
        let summary = run_import(&store, csv, &mapping(&[("Name", "first_name")]), None)
            .await
            .expect("import");
        let rows = store.select(TABLE_PROPERTIES, &[]).await.expect("select");
        assert!(
            rows.iter()
                .all(|row| row.text("import_batch_id") == Some(summary.batch_id.as_str()))
        );
        assert!(rows.iter().all(|row| row.text("source") == Some("csv_import")));
    }

    #[tokio::test]
    async fn reimport_creates_no_duplicate_relations() {
        let store = MemoryStore::new();
        let csv = "Name,Tags\nAda,vacant\n";
        let mappings = mapping(&[("Name", "first_name"), ("Tags", "tags")]);
        let first = run_import(&store, csv, &mappings, None).await.expect("first");
        let second = run_import(&store, csv, &mappings, None).await.expect("second");
        assert_eq!(first.tag_links, 1);
        // The second run inserts a new property row, so its relation is new,
        // but the tag itself is reused.
        assert_eq!(second.tag_links, 1);
        assert_eq!(store.count(TABLE_TAGS).await, 1);
    }

    #[tokio::test]
    async fn progress_reports_inserted_counts() {
        let store = MemoryStore::new();
        let mut csv = String::from("Name\n");
        for i in 0..260 {
            csv.push_str(&format!("P{i}\n"));
        }
        let seen = std::sync::Mutex::new(Vec::new());
        let report = |done: usize, total: usize| {
            seen.lock().expect("lock").push((done, total));
        };
        run_import(&store, &csv, &mapping(&[("Name", "first_name")]), Some(&report))
            .await
            .expect("import");
        assert_eq!(
            seen.into_inner().expect("into inner"),
            vec![(250, 260), (260, 260)]
        );
    }

    #[tokio::test]
    async fn empty_csv_yields_empty_summary() {
        let store = MemoryStore::new();
        let summary = run_import(&store, "", &BTreeMap::new(), None)
            .await
            .expect("import");
        assert_eq!(summary.total_rows, 0);
        assert_eq!(summary.inserted, 0);
        assert_eq!(store.count(TABLE_PROPERTIES).await, 0);
    }
}
