use std::collections::{BTreeSet, HashMap};

use facetbridge_core::types::{FacetDefinition, FacetName, FacetResult, RangeBucket, RawAggregation, TermsBucket};

use crate::range;

/// Collects aggregation buckets into per-facet counts.
///
/// Static facets and facets the engine returned nothing for are left out.
/// Bucket order is irrelevant.
pub fn collect_facets(
    facets: &HashMap<FacetName, FacetDefinition>,
    aggregations: &HashMap<FacetName, RawAggregation>,
) -> HashMap<FacetName, FacetResult> {
    let mut results = HashMap::new();
    for (name, facet) in facets {
        if facet.is_static() {
            continue;
        }
        let Some(aggregation) = aggregations.get(name) else {
            tracing::debug!(facet = %name, "No aggregation returned for facet");
            continue;
        };
        match collect_facet(facet, aggregation) {
            Some(counts) => {
                tracing::debug!(facet = %name, terms = counts.len(), "Facet counts collected");
                results.insert(name.clone(), FacetResult::new(name.clone(), counts));
            }
            None => {
                tracing::warn!(facet = %name, "Aggregation shape does not match the facet type, skipping");
            }
        }
    }
    results
}

fn collect_facet(facet: &FacetDefinition, aggregation: &RawAggregation) -> Option<HashMap<String, u64>> {
    match (facet, aggregation) {
        (FacetDefinition::Term { .. }, RawAggregation::Terms(buckets)) => Some(term_counts(buckets)),
        (FacetDefinition::TypeName { values, .. }, RawAggregation::Terms(buckets)) => {
            Some(type_name_counts(values, buckets))
        }
        (FacetDefinition::Range { .. }, RawAggregation::Range(buckets)) => Some(range_counts(buckets)),
        (FacetDefinition::Term { .. } | FacetDefinition::TypeName { .. }, RawAggregation::Range(_))
        | (FacetDefinition::Range { .. }, RawAggregation::Terms(_))
        | (FacetDefinition::Static, _) => None,
    }
}

pub fn term_counts(buckets: &[TermsBucket]) -> HashMap<String, u64> {
    buckets.iter().map(|b| (b.key.clone(), b.doc_count)).collect()
}

/// Projects the declared type ids through a lower-cased index of the buckets.
///
/// The engine returns type names lower-cased
/// (`com.liferay.portlet.messageboards.model.mbmessage`), while callers expect
/// the declared spelling back. Every declared id is reported, zero if absent.
pub fn type_name_counts(declared: &BTreeSet<String>, buckets: &[TermsBucket]) -> HashMap<String, u64> {
    let mut lowered: HashMap<String, u64> = HashMap::with_capacity(buckets.len());
    for bucket in buckets {
        *lowered.entry(bucket.key.to_lowercase()).or_insert(0) += bucket.doc_count;
    }

    declared
        .iter()
        .map(|type_id| {
            let count = lowered.get(&type_id.to_lowercase()).copied().unwrap_or(0);
            tracing::trace!(term = %type_id, count, "Type name facet term");
            (type_id.clone(), count)
        })
        .collect()
}

pub fn range_counts(buckets: &[RangeBucket]) -> HashMap<String, u64> {
    buckets.iter().map(|b| (range_label(b), b.doc_count)).collect()
}

/// Integer label when both boundaries are whole numbers, textual label otherwise.
pub fn range_label(bucket: &RangeBucket) -> String {
    range::render_numeric_range(bucket.from, bucket.to).unwrap_or_else(|| {
        range::render_range(
            &textual_bound(bucket.from_as_string.as_deref(), bucket.from),
            &textual_bound(bucket.to_as_string.as_deref(), bucket.to),
        )
    })
}

fn textual_bound(text: Option<&str>, value: Option<f64>) -> String {
    match (text, value) {
        (Some(text), _) => text.to_string(),
        (None, Some(value)) => value.to_string(),
        (None, None) => range::OPEN_BOUND.to_string(),
    }
}
