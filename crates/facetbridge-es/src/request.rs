use facetbridge_core::types::{AggregationKind, AggregationRequest, EngineQuery, RangeBoundary, SortSpec};

pub struct ElasticsearchQueryBuilder {}

impl ElasticsearchQueryBuilder {
    /// Renders the `_search` body for a query.
    pub fn build_search_body(query: &EngineQuery) -> serde_json::Value {
        let mut body = serde_json::json!({
            "query": Self::query_argument(&query.query_text),
            "from": query.from,
            "size": query.size,
        });

        let sort = Self::sort_argument(&query.sorts, &query.unmapped_sort_type);
        if !sort.is_empty() {
            body["sort"] = serde_json::Value::Array(sort);
        }

        if !query.aggregations.is_empty() {
            body["aggs"] = Self::aggregations_argument(&query.aggregations);
        }

        body
    }

    fn query_argument(query_text: &str) -> serde_json::Value {
        serde_json::json!({
            "query_string": {
                "query": query_text,
            }
        })
    }

    fn sort_argument(sorts: &[SortSpec], unmapped_type: &str) -> Vec<serde_json::Value> {
        sorts
            .iter()
            .filter(|sort| !sort.field_name.is_empty())
            .map(|sort| {
                serde_json::json!({
                    sort.field_name.as_str(): {
                        "order": if sort.descending { "desc" } else { "asc" },
                        "unmapped_type": unmapped_type,
                    }
                })
            })
            .collect()
    }

    fn aggregations_argument(aggregations: &[AggregationRequest]) -> serde_json::Value {
        let aggs = aggregations
            .iter()
            .map(|agg| (agg.name.clone(), Self::aggregation(agg)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(aggs)
    }

    fn aggregation(agg: &AggregationRequest) -> serde_json::Value {
        match &agg.kind {
            AggregationKind::Terms { size } => {
                let mut terms = serde_json::json!({ "field": agg.field });
                if let Some(size) = size {
                    terms["size"] = serde_json::json!(size);
                }
                serde_json::json!({ "terms": terms })
            }
            AggregationKind::Range { buckets } => {
                let ranges = buckets.iter().map(Self::range_bucket).collect::<Vec<_>>();
                serde_json::json!({
                    "range": {
                        "field": agg.field,
                        "ranges": ranges,
                    }
                })
            }
        }
    }

    fn range_bucket(boundary: &RangeBoundary) -> serde_json::Value {
        let mut bucket = serde_json::Map::new();
        if let Some(from) = boundary.from {
            bucket.insert("from".to_string(), serde_json::json!(from));
        }
        if let Some(to) = boundary.to {
            bucket.insert("to".to_string(), serde_json::json!(to));
        }
        serde_json::Value::Object(bucket)
    }
}
