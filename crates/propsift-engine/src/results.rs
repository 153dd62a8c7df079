//! Scored-result retrieval with filtering.

use std::collections::BTreeMap;

use propsift_model::{FieldValue, Record, ResultFilter, RuleOutcome, ScoreResult};
use propsift_store::{
    Filter, Store, TABLE_LISTS, TABLE_PROPERTIES, TABLE_PROPERTY_LISTS, TABLE_PROPERTY_SCORES,
    TABLE_PROPERTY_TAGS, TABLE_SCORING_RULES, TABLE_TAGS,
};

use crate::EngineError;

/// A property joined with its score under one configuration.
#[derive(Debug, Clone)]
pub struct ScoredProperty {
    pub property: Record,
    pub score: i64,
    pub details: Vec<RuleOutcome>,
}

/// Fetches scored properties for a configuration, applying the filter.
///
/// Score bounds push down into the select; tag and list filters use the
/// count approximation of "has all": an entity passes when it has at least
/// as many matching relations as the filter has entries. A filter naming
/// only unknown tags or lists yields no results.
pub async fn scored_results(
    store: &dyn Store,
    configuration_id: &str,
    filter: &ResultFilter,
) -> Result<Vec<ScoredProperty>, EngineError> {
    let mut filters = vec![Filter::eq("configuration_id", configuration_id)];
    if let Some(min) = filter.min_score {
        filters.push(Filter::gte("score", min as f64));
    }
    if let Some(max) = filter.max_score {
        filters.push(Filter::lte("score", max as f64));
    }
    let mut score_rows = store.select(TABLE_PROPERTY_SCORES, &filters).await?;

    if !filter.tags.is_empty() {
        let passing =
            relation_counts(store, TABLE_TAGS, TABLE_PROPERTY_TAGS, "tag_id", &filter.tags)
                .await?;
        retain_with_enough_relations(&mut score_rows, &passing, filter.tags.len());
    }
    if !filter.lists.is_empty() {
        let passing = relation_counts(
            store,
            TABLE_LISTS,
            TABLE_PROPERTY_LISTS,
            "list_id",
            &filter.lists,
        )
        .await?;
        retain_with_enough_relations(&mut score_rows, &passing, filter.lists.len());
    }

    let properties = store.select(TABLE_PROPERTIES, &[]).await?;
    let by_id: BTreeMap<&str, &Record> = properties
        .iter()
        .filter_map(|record| record.id().map(|id| (id, record)))
        .collect();

    let mut results = Vec::with_capacity(score_rows.len());
    for row in &score_rows {
        let Some(score) = ScoreResult::from_record(row) else {
            continue;
        };
        let Some(property) = by_id.get(score.property_id.as_str()) else {
            continue;
        };
        results.push(ScoredProperty {
            property: (*property).clone(),
            score: score.score,
            details: score.details,
        });
    }
    Ok(results)
}

/// Per-property count of relations to any of the named labels.
async fn relation_counts(
    store: &dyn Store,
    label_table: &str,
    link_table: &str,
    label_key: &str,
    names: &[String],
) -> Result<BTreeMap<String, usize>, EngineError> {
    let canonical: Vec<FieldValue> = names
        .iter()
        .map(|name| FieldValue::Text(name.to_lowercase()))
        .collect();
    let labels = store
        .select(label_table, &[Filter::is_in("name_canonical", canonical)])
        .await?;
    let label_ids: Vec<FieldValue> = labels
        .iter()
        .filter_map(|row| row.text("id"))
        .map(FieldValue::from)
        .collect();
    if label_ids.is_empty() {
        return Ok(BTreeMap::new());
    }

    let links = store
        .select(link_table, &[Filter::is_in(label_key, label_ids)])
        .await?;
    let mut counts = BTreeMap::new();
    for link in &links {
        if let Some(property_id) = link.text("property_id") {
            *counts.entry(property_id.to_string()).or_insert(0) += 1;
        }
    }
    Ok(counts)
}

fn retain_with_enough_relations(
    score_rows: &mut Vec<Record>,
    counts: &BTreeMap<String, usize>,
    required: usize,
) {
    score_rows.retain(|row| {
        row.text("property_id")
            .and_then(|id| counts.get(id))
            .is_some_and(|count| *count >= required)
    });
}
