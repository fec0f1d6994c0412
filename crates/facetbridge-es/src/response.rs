use std::collections::HashMap;

use facetbridge_core::error::{Error, Result};
use facetbridge_core::types::{
    AggregationKind, AggregationRequest, RangeBucket, RawAggregation, RawHit, RawResponse, TermsBucket,
};

#[derive(Debug, serde::Deserialize)]
struct SearchResponse {
    hits: SearchHitsResponse,
    #[serde(default)]
    aggregations: HashMap<String, AggregationResponse>,
}

#[derive(Debug, serde::Deserialize)]
struct SearchHitsResponse {
    total: Option<SearchHitsTotal>,
    #[serde(default)]
    hits: Vec<SearchHitResponse>,
}

/// Engines before 7.0 report a bare number, later ones an object.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum SearchHitsTotal {
    Count(u64),
    Object { value: u64 },
}

#[derive(Debug, serde::Deserialize)]
struct SearchHitResponse {
    #[serde(rename = "_score")]
    score: Option<f64>,

    #[serde(rename = "_source")]
    source: Option<serde_json::Value>,
}

#[derive(Debug, serde::Deserialize)]
struct AggregationResponse {
    #[serde(default)]
    buckets: Option<BucketsResponse>,
}

/// Range aggregations requested with `keyed: true` return an object.
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum BucketsResponse {
    List(Vec<serde_json::Value>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

impl BucketsResponse {
    fn into_values(self) -> Vec<serde_json::Value> {
        match self {
            Self::List(values) => values,
            Self::Keyed(map) => map.into_iter().map(|(_, value)| value).collect(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct TermsBucketResponse {
    key: serde_json::Value,
    key_as_string: Option<String>,
    doc_count: u64,
}

#[derive(Debug, serde::Deserialize)]
struct RangeBucketResponse {
    from: Option<f64>,
    to: Option<f64>,
    from_as_string: Option<String>,
    to_as_string: Option<String>,
    doc_count: u64,
}

/// Decodes a `_search` reply, reading only the aggregations that were requested.
///
/// The reply does not say which kind an aggregation is, so the request is
/// used to pick the bucket shape. Buckets that do not fit are skipped.
pub fn decode_search_response(
    body: serde_json::Value,
    requested: &[AggregationRequest],
) -> Result<RawResponse> {
    let response: SearchResponse =
        serde_json::from_value(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

    let total_hits = match response.hits.total {
        Some(SearchHitsTotal::Count(value) | SearchHitsTotal::Object { value }) => value,
        None => response.hits.hits.len() as u64,
    };

    let hits = response
        .hits
        .hits
        .into_iter()
        .map(|hit| RawHit {
            source: hit.source.map(|s| s.to_string()).unwrap_or_default(),
            score: hit.score.unwrap_or(0.0) as f32,
        })
        .collect();

    let mut returned = response.aggregations;
    let mut aggregations = HashMap::new();
    for request in requested {
        let Some(buckets) = returned.remove(&request.name).and_then(|agg| agg.buckets) else {
            continue;
        };
        let aggregation = match request.kind {
            AggregationKind::Terms { .. } => RawAggregation::Terms(decode_buckets(&request.name, buckets, terms_bucket)),
            AggregationKind::Range { .. } => RawAggregation::Range(decode_buckets(&request.name, buckets, range_bucket)),
        };
        aggregations.insert(request.name.clone(), aggregation);
    }

    Ok(RawResponse { hits, total_hits, aggregations })
}

fn decode_buckets<B, T>(name: &str, buckets: BucketsResponse, convert: fn(B) -> T) -> Vec<T>
where
    B: serde::de::DeserializeOwned,
{
    buckets
        .into_values()
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<B>(value) {
            Ok(bucket) => Some(convert(bucket)),
            Err(e) => {
                tracing::warn!(aggregation = %name, error = %e, "Skipping unreadable bucket");
                None
            }
        })
        .collect()
}

fn terms_bucket(bucket: TermsBucketResponse) -> TermsBucket {
    let key = match (bucket.key_as_string, bucket.key) {
        (Some(key), _) => key,
        (None, serde_json::Value::String(key)) => key,
        (None, other) => other.to_string(),
    };
    TermsBucket { key, doc_count: bucket.doc_count }
}

fn range_bucket(bucket: RangeBucketResponse) -> RangeBucket {
    RangeBucket {
        from: bucket.from,
        to: bucket.to,
        from_as_string: bucket.from_as_string,
        to_as_string: bucket.to_as_string,
        doc_count: bucket.doc_count,
    }
}
