//! Scoring of a single entity against a configuration.

use propsift_model::{Record, ScoreResult, ScoringRule};
use propsift_store::relations::{entity_lists, entity_tags};
use propsift_store::{Filter, Store, TABLE_PROPERTIES, TABLE_PROPERTY_SCORES, TABLE_SCORING_RULES};

use crate::EngineError;
use crate::rules::evaluate_rule;

/// Loads the rules of a configuration, in stored order. Rows missing
/// mandatory columns are skipped.
pub async fn load_rules(
    store: &dyn Store,
    configuration_id: &str,
) -> Result<Vec<ScoringRule>, EngineError> {
    let rows = store
        .select(
            TABLE_SCORING_RULES,
            &[Filter::eq("configuration_id", configuration_id)],
        )
        .await?;
    Ok(rows.iter().filter_map(ScoringRule::from_record).collect())
}

/// Scores one entity under one configuration and upserts the result.
///
/// The total is the sum of matched rule scores; it is unbounded and may be
/// negative. The full per-rule trace is stored alongside the total, and a
/// prior result for the same entity and configuration is replaced.
pub async fn score_entity(
    store: &dyn Store,
    property_id: &str,
    configuration_id: &str,
) -> Result<ScoreResult, EngineError> {
    let properties = store
        .select(TABLE_PROPERTIES, &[Filter::eq("id", property_id)])
        .await?;
    let Some(property) = properties.into_iter().next() else {
        return Err(EngineError::PropertyNotFound(property_id.to_string()));
    };

    let tags = entity_tags(store, property_id).await?;
    let lists = entity_lists(store, property_id).await?;
    let rules = load_rules(store, configuration_id).await?;

    let result = score_record(&property, &tags, &lists, &rules, property_id, configuration_id);

    store
        .upsert(
            TABLE_PROPERTY_SCORES,
            result.to_record(),
            &["property_id", "configuration_id"],
        )
        .await?;
    tracing::debug!(property_id, configuration_id, score = result.score, "scored entity");
    Ok(result)
}

/// Pure scoring over already-loaded data.
pub fn score_record(
    property: &Record,
    tags: &[String],
    lists: &[String],
    rules: &[ScoringRule],
    property_id: &str,
    configuration_id: &str,
) -> ScoreResult {
    let mut total = 0;
    let mut details = Vec::with_capacity(rules.len());
    for rule in rules {
        let outcome = evaluate_rule(rule, property, tags, lists);
        if outcome.matched {
            total += outcome.score;
        }
        details.push(outcome);
    }
    ScoreResult {
        property_id: property_id.to_string(),
        configuration_id: configuration_id.to_string(),
        score: total,
        details,
    }
}
