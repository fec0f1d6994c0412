use std::collections::HashMap;

use facetbridge_core::config::BridgeSettings;
use facetbridge_core::types::{AggregationKind, AggregationRequest, FacetDefinition, FacetName, RangeBoundary, RangeSpec};

use crate::range;

/// Builds one aggregation per non-static facet, ordered by facet name.
pub fn build_aggregations(
    facets: &HashMap<FacetName, FacetDefinition>,
    settings: &BridgeSettings,
) -> Vec<AggregationRequest> {
    let mut names: Vec<&FacetName> = facets.keys().collect();
    names.sort();
    names
        .into_iter()
        .filter_map(|name| build_aggregation(name, &facets[name], settings))
        .collect()
}

pub fn build_aggregation(
    name: &str,
    facet: &FacetDefinition,
    settings: &BridgeSettings,
) -> Option<AggregationRequest> {
    let (field, kind) = match facet {
        FacetDefinition::Term { field, max_terms } => {
            (field.clone(), AggregationKind::Terms { size: max_terms.or(settings.default_max_terms) })
        }
        FacetDefinition::TypeName { field, .. } => {
            (field.clone(), AggregationKind::Terms { size: settings.default_max_terms })
        }
        FacetDefinition::Range { ranges } => {
            (settings.range_field.clone(), AggregationKind::Range { buckets: range_buckets(name, ranges) })
        }
        FacetDefinition::Static => return None,
    };
    tracing::debug!(facet = %name, field = %field, "Adding aggregation for facet");
    Some(AggregationRequest { name: name.to_string(), field, kind })
}

fn range_buckets(facet: &str, ranges: &[RangeSpec]) -> Vec<RangeBoundary> {
    ranges
        .iter()
        .filter_map(|spec| match range::decode_boundary(&spec.range) {
            Ok(boundary) => Some(boundary),
            Err(e) => {
                tracing::warn!(facet = %facet, label = %spec.label, error = %e, "Skipping malformed range");
                None
            }
        })
        .collect()
}
