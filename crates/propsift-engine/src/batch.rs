//! Batch scoring across all entities.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;

use propsift_model::ScoringStatus;
use propsift_store::{Store, TABLE_PROPERTIES};

use crate::EngineError;
use crate::engine::score_entity;

/// Entities scored concurrently per chunk.
pub const SCORING_CHUNK_SIZE: usize = 50;

/// Outcome of one batch scoring run.
#[derive(Debug, Clone, Copy)]
pub struct ScoringRun {
    /// Entities processed, including failed ones.
    pub processed: usize,
    /// Entities whose scoring failed and was skipped.
    pub failed: usize,
    pub status: ScoringStatus,
}

/// Scores every stored entity under one configuration.
///
/// Entities are processed in chunks of [`SCORING_CHUNK_SIZE`]: within a
/// chunk scoring runs concurrently, chunks themselves strictly in sequence.
/// A failed entity is logged and skipped; its processed count still
/// advances. The progress callback fires once per completed entity with
/// `(processed, total)`; counts are non-decreasing but completion order
/// within a chunk is unspecified.
pub async fn score_all<F>(
    store: &dyn Store,
    configuration_id: &str,
    progress: Option<F>,
) -> Result<ScoringRun, EngineError>
where
    F: Fn(usize, usize) + Send + Sync,
{
    let properties = store.select(TABLE_PROPERTIES, &[]).await?;
    let ids: Vec<String> = properties
        .iter()
        .filter_map(|record| record.id().map(str::to_string))
        .collect();
    let total = ids.len();
    let processed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    tracing::info!(configuration_id, total, "scoring run started");

    for chunk in ids.chunks(SCORING_CHUNK_SIZE) {
        let tasks = chunk.iter().map(|property_id| {
            let processed = &processed;
            let failed = &failed;
            let progress = progress.as_ref();
            async move {
                if let Err(error) = score_entity(store, property_id, configuration_id).await {
                    tracing::warn!(property_id = %property_id, %error, "scoring failed for entity");
                    failed.fetch_add(1, Ordering::SeqCst);
                }
                let done = processed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(callback) = progress {
                    callback(done, total);
                }
            }
        });
        join_all(tasks).await;
    }

    let run = ScoringRun {
        processed: processed.load(Ordering::SeqCst),
        failed: failed.load(Ordering::SeqCst),
        status: if failed.load(Ordering::SeqCst) == 0 {
            ScoringStatus::Completed
        } else {
            ScoringStatus::Error
        },
    };
    tracing::info!(
        configuration_id,
        processed = run.processed,
        failed = run.failed,
        "scoring run finished"
    );
    Ok(run)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use propsift_model::{FIELD_ID, FieldValue, RULE_TYPE_TAG, Record, ScoringRule};
    use propsift_store::{Filter, MemoryStore, TABLE_PROPERTY_SCORES, TABLE_SCORING_RULES};

    use super::*;

    async fn seed(store: &MemoryStore, count: usize) {
        let mut records = Vec::new();
        for index in 0..count {
            let mut record = Record::new();
            record.set(FIELD_ID, FieldValue::Text(format!("p{index}")));
            records.push(record);
        }
        store
            .insert(TABLE_PROPERTIES, records)
            .await
            .expect("seed properties");

        let rule = ScoringRule {
            id: "1".to_string(),
            configuration_id: "c1".to_string(),
            rule_name: "always off".to_string(),
            rule_type: RULE_TYPE_TAG.to_string(),
            field_name: None,
            operator: None,
            value: Some("never".to_string()),
            score: 1,
        };
        store
            .insert(TABLE_SCORING_RULES, vec![rule.to_record()])
            .await
            .expect("seed rule");
    }

    #[tokio::test]
    async fn progress_fires_once_per_entity_and_is_monotonic() {
        let store = MemoryStore::new();
        seed(&store, 120).await;

        let seen: Mutex<Vec<(usize, usize)>> = Mutex::new(Vec::new());
        let run = score_all(&store, "c1", Some(|done, total| {
            seen.lock().expect("lock").push((done, total));
        }))
        .await
        .expect("score all");

        assert_eq!(run.processed, 120);
        assert_eq!(run.failed, 0);
        assert_eq!(run.status, ScoringStatus::Completed);
        let seen = seen.into_inner().expect("into inner");
        assert_eq!(seen.len(), 120);
        assert!(seen.iter().all(|(_, total)| *total == 120));
        let counts: Vec<usize> = seen.iter().map(|(done, _)| *done).collect();
        assert!(counts.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(counts.last(), Some(&120));
    }

    #[tokio::test]
    async fn every_entity_receives_a_score_row() {
        let store = MemoryStore::new();
        seed(&store, 7).await;
        let run = score_all(&store, "c1", None::<fn(usize, usize)>)
            .await
            .expect("score all");
        assert_eq!(run.processed, 7);
        let rows = store
            .select(TABLE_PROPERTY_SCORES, &[Filter::eq("configuration_id", "c1")])
            .await
            .expect("select scores");
        assert_eq!(rows.len(), 7);
    }

    #[tokio::test]
    async fn empty_store_completes_with_zero() {
        let store = MemoryStore::new();
        let run = score_all(&store, "c1", None::<fn(usize, usize)>)
            .await
            .expect("score all");
        assert_eq!(run.processed, 0);
        assert_eq!(run.status, ScoringStatus::Completed);
    }
}
