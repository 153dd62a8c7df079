//! Tag and list relations.
//!
//! Tags and lists are unique by canonical (lowercased) name while keeping
//! the display casing of first use. Relationship creation is an idempotent
//! ensure-exists operation: linking an already-linked pair is a no-op, so
//! re-imports never trip duplicate-key failures.

use propsift_model::{FieldValue, Label, Record};
use uuid::Uuid;

use crate::filter::Filter;
use crate::{
    Store, StoreError, TABLE_LISTS, TABLE_PROPERTY_LISTS, TABLE_PROPERTY_TAGS, TABLE_TAGS,
};

/// Returns the id of the tag with this name, creating it on first use.
pub async fn ensure_tag(store: &dyn Store, name: &str) -> Result<String, StoreError> {
    ensure_label(store, TABLE_TAGS, name).await
}

/// Returns the id of the list with this name, creating it on first use.
pub async fn ensure_list(store: &dyn Store, name: &str) -> Result<String, StoreError> {
    ensure_label(store, TABLE_LISTS, name).await
}

/// Ensures the property-tag relation exists. Returns true when it was
/// created by this call.
pub async fn ensure_tag_link(
    store: &dyn Store,
    property_id: &str,
    tag_id: &str,
) -> Result<bool, StoreError> {
    ensure_link(store, TABLE_PROPERTY_TAGS, "tag_id", property_id, tag_id).await
}

/// Ensures the property-list relation exists. Returns true when it was
/// created by this call.
pub async fn ensure_list_link(
    store: &dyn Store,
    property_id: &str,
    list_id: &str,
) -> Result<bool, StoreError> {
    ensure_link(store, TABLE_PROPERTY_LISTS, "list_id", property_id, list_id).await
}

/// Ensures tags exist and are linked to the property. Returns the number of
/// relations created (existing relations do not count).
pub async fn link_tags(
    store: &dyn Store,
    property_id: &str,
    names: &[String],
) -> Result<usize, StoreError> {
    let mut created = 0;
    for name in trimmed(names) {
        let tag_id = ensure_tag(store, name).await?;
        if ensure_tag_link(store, property_id, &tag_id).await? {
            created += 1;
        }
    }
    Ok(created)
}

/// Ensures lists exist and are linked to the property. Returns the number of
/// relations created.
pub async fn link_lists(
    store: &dyn Store,
    property_id: &str,
    names: &[String],
) -> Result<usize, StoreError> {
    let mut created = 0;
    for name in trimmed(names) {
        let list_id = ensure_list(store, name).await?;
        if ensure_list_link(store, property_id, &list_id).await? {
            created += 1;
        }
    }
    Ok(created)
}

/// Display names of all tags linked to a property.
pub async fn entity_tags(store: &dyn Store, property_id: &str) -> Result<Vec<String>, StoreError> {
    linked_names(store, TABLE_PROPERTY_TAGS, TABLE_TAGS, "tag_id", property_id).await
}

/// Display names of all lists a property belongs to.
pub async fn entity_lists(store: &dyn Store, property_id: &str) -> Result<Vec<String>, StoreError> {
    linked_names(store, TABLE_PROPERTY_LISTS, TABLE_LISTS, "list_id", property_id).await
}

fn trimmed(names: &[String]) -> impl Iterator<Item = &str> {
    names
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
}

async fn ensure_label(store: &dyn Store, table: &str, name: &str) -> Result<String, StoreError> {
    let label = Label::new(name.trim());
    let existing = store
        .select(
            table,
            &[Filter::eq("name_canonical", label.canonical.as_str())],
        )
        .await?;
    if let Some(id) = existing.first().and_then(|row| row.text("id")) {
        return Ok(id.to_string());
    }

    let id = Uuid::new_v4().to_string();
    let mut row = Record::new();
    row.set("id", FieldValue::Text(id.clone()));
    row.set("name", FieldValue::Text(label.name));
    row.set("name_canonical", FieldValue::Text(label.canonical));
    store.insert(table, vec![row]).await?;
    tracing::debug!(table, name, "created label");
    Ok(id)
}

async fn ensure_link(
    store: &dyn Store,
    table: &str,
    label_key: &str,
    property_id: &str,
    label_id: &str,
) -> Result<bool, StoreError> {
    let filters = [
        Filter::eq("property_id", property_id),
        Filter::eq(label_key, label_id),
    ];
    if !store.select(table, &filters).await?.is_empty() {
        return Ok(false);
    }
    let mut row = Record::new();
    row.set("property_id", FieldValue::Text(property_id.to_string()));
    row.set(label_key, FieldValue::Text(label_id.to_string()));
    store.insert(table, vec![row]).await?;
    Ok(true)
}

async fn linked_names(
    store: &dyn Store,
    link_table: &str,
    label_table: &str,
    label_key: &str,
    property_id: &str,
) -> Result<Vec<String>, StoreError> {
    let links = store
        .select(link_table, &[Filter::eq("property_id", property_id)])
        .await?;
    let mut names = Vec::with_capacity(links.len());
    for link in links {
        let Some(label_id) = link.text(label_key) else {
            continue;
        };
        let labels = store
            .select(label_table, &[Filter::eq("id", label_id)])
            .await?;
        if let Some(name) = labels.first().and_then(|row| row.text("name")) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}
