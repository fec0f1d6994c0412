use std::collections::HashSet;

use facetbridge_core::types::{Meta, NormalizedDocument, RawHit, TYPE_ID_FIELD};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid source json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source is not a json object")]
    NotAnObject,
}

/// Documents that survived mapping, plus the number of unparsable hits.
#[derive(Debug, Clone, Default)]
pub struct MappedHits {
    pub documents: Vec<NormalizedDocument>,
    pub malformed: usize,
}

/// Maps raw hits to documents whose type id is in `allowed_types`, keeping hit order.
///
/// An unparsable hit is logged, counted and dropped; the rest of the batch is
/// still mapped. Hits without a type id or with a disallowed one are dropped
/// without being counted.
pub fn map_hits(hits: &[RawHit], allowed_types: &HashSet<String>) -> MappedHits {
    if hits.is_empty() {
        tracing::debug!("No search results found");
        return MappedHits::default();
    }

    let mut documents = Vec::new();
    let mut malformed = 0;
    for (position, hit) in hits.iter().enumerate() {
        match parse_document(&hit.source) {
            Ok(document) => {
                let allowed = document.type_id.as_ref().is_some_and(|t| allowed_types.contains(t));
                if allowed {
                    documents.push(document);
                } else {
                    tracing::trace!(position, type_id = ?document.type_id, "Dropping hit of a type not requested");
                }
            }
            Err(e) => {
                malformed += 1;
                tracing::error!(position, error = %e, "Error while processing the search result json");
            }
        }
    }

    tracing::debug!(documents = documents.len(), malformed, "Total size of the search results");
    MappedHits { documents, malformed }
}

/// Flattens a source payload into string fields and extracts its type id.
pub fn parse_document(source: &str) -> Result<NormalizedDocument, DocumentError> {
    let Value::Object(object) = serde_json::from_str::<Value>(source)? else {
        return Err(DocumentError::NotAnObject);
    };

    let mut fields = Meta::with_capacity(object.len());
    let mut type_id = None;
    for (key, value) in object {
        let value = field_value(value);
        tracing::trace!(field = %key, value = %value, "Document field");
        if key.eq_ignore_ascii_case(TYPE_ID_FIELD) {
            type_id = Some(value.clone());
        }
        fields.insert(key, value);
    }
    Ok(NormalizedDocument { fields, type_id })
}

fn field_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
