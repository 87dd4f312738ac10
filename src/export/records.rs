//! Flat annotation records for JSON persistence and re-import.
//!
//! The record array is the raw tree, flattened in insertion order and field
//! complete, so a consumer can persist it and feed it back through
//! `AnnotationStore::from_annotations` without loss.

use crate::model::Annotation;
use crate::store::AnnotationStore;

/// Snapshot of every annotation in insertion order.
pub fn flatten(store: &AnnotationStore) -> Vec<Annotation> {
    store.iter().cloned().collect()
}

/// Serialize the store's annotations as a pretty-printed JSON array.
pub fn to_json(store: &AnnotationStore) -> Result<String, serde_json::Error> {
    log::info!("Exporting {} annotation records", store.len());
    serde_json::to_string_pretty(&flatten(store))
}

/// Parse a previously exported record array.
pub fn from_json(json: &str) -> Result<Vec<Annotation>, serde_json::Error> {
    serde_json::from_str(json)
}
