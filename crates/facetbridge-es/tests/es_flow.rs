use std::collections::HashSet;
use std::sync::Mutex;

use facetbridge_core::config::BridgeSettings;
use facetbridge_core::error::Error;
use facetbridge_core::traits::SearchTransport;
use facetbridge_core::types::{
    AggregationKind, AggregationRequest, FacetDefinition, RangeSpec, RawAggregation, SearchRequest, SortSpec,
};
use facetbridge_es::{decode_search_response, ElasticsearchExecutor};
use facetbridge_search::SearchService;
use serde_json::json;

/// Replies with a canned body and records what it was sent.
struct FakeTransport {
    reply: serde_json::Value,
    sent: Mutex<Vec<(String, serde_json::Value)>>,
}

impl FakeTransport {
    fn new(reply: serde_json::Value) -> Self {
        Self { reply, sent: Mutex::new(Vec::new()) }
    }
}

impl SearchTransport for FakeTransport {
    fn search(&self, index: &str, body: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
        self.sent.lock().unwrap().push((index.to_string(), body.clone()));
        Ok(self.reply.clone())
    }
}

impl SearchTransport for &FakeTransport {
    fn search(&self, index: &str, body: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
        (**self).search(index, body)
    }
}

struct DownTransport;

impl SearchTransport for DownTransport {
    fn search(&self, _index: &str, _body: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
        anyhow::bail!("connection refused")
    }
}

fn terms(name: &str) -> AggregationRequest {
    AggregationRequest { name: name.to_string(), field: name.to_string(), kind: AggregationKind::Terms { size: None } }
}

fn range(name: &str) -> AggregationRequest {
    AggregationRequest { name: name.to_string(), field: "modified-date".to_string(), kind: AggregationKind::Range { buckets: vec![] } }
}

#[test]
fn decodes_hits_totals_and_buckets() {
    let body = json!({
        "took": 3,
        "timed_out": false,
        "hits": {
            "total": {"value": 57, "relation": "eq"},
            "hits": [
                {"_index": "liferay", "_id": "1", "_score": 1.25, "_source": {"entryClassName": "A", "title": "x"}},
                {"_index": "liferay", "_id": "2", "_score": null}
            ]
        },
        "aggregations": {
            "groupId": {"buckets": [{"key": 20143, "doc_count": 4}, {"key": 10, "key_as_string": "ten", "doc_count": 1}]},
            "modified": {"buckets": [
                {"key": "a", "from": 2.01406032e13, "from_as_string": "2.01406032E13", "to": 2.01406034e13, "doc_count": 9},
                {"key": "b", "to": 5.0, "doc_count": "broken"}
            ]},
            "unrequested": {"buckets": []}
        }
    });

    let response = decode_search_response(body, &[terms("groupId"), range("modified"), terms("absent")]).expect("decode");
    assert_eq!(response.total_hits, 57);
    assert_eq!(response.hits.len(), 2);
    assert_eq!(response.hits[0].score, 1.25);
    let source: serde_json::Value = serde_json::from_str(&response.hits[0].source).unwrap();
    assert_eq!(source["title"], "x");
    assert_eq!(response.hits[1].source, "", "missing source stays empty");
    assert_eq!(response.hits[1].score, 0.0);

    match &response.aggregations["groupId"] {
        RawAggregation::Terms(buckets) => {
            let keys: HashSet<&str> = buckets.iter().map(|b| b.key.as_str()).collect();
            assert_eq!(keys, ["20143", "ten"].into_iter().collect::<HashSet<_>>());
        }
        other => panic!("unexpected aggregation {:?}", other),
    }
    match &response.aggregations["modified"] {
        RawAggregation::Range(buckets) => {
            assert_eq!(buckets.len(), 1, "unreadable bucket is skipped");
            assert_eq!(buckets[0].from, Some(2.01406032e13));
            assert_eq!(buckets[0].doc_count, 9);
        }
        other => panic!("unexpected aggregation {:?}", other),
    }
    assert_eq!(response.aggregations.len(), 2);
}

#[test]
fn accepts_legacy_totals_and_keyed_ranges() {
    let body = json!({
        "hits": {"total": 12, "hits": []},
        "aggregations": {
            "modified": {"buckets": {"0.0-10.0": {"from": 0.0, "to": 10.0, "doc_count": 2}}}
        }
    });
    let response = decode_search_response(body, &[range("modified")]).expect("decode");
    assert_eq!(response.total_hits, 12);
    match &response.aggregations["modified"] {
        RawAggregation::Range(buckets) => assert_eq!(buckets[0].to, Some(10.0)),
        other => panic!("unexpected aggregation {:?}", other),
    }
}

#[test]
fn reply_without_hits_is_malformed() {
    let err = decode_search_response(json!({"error": "boom"}), &[]).unwrap_err();
    assert!(matches!(err, Error::MalformedResponse(_)));
}

#[test]
fn search_round_trip_through_elasticsearch_executor() {
    let reply = json!({
        "hits": {
            "total": {"value": 3, "relation": "eq"},
            "hits": [
                {"_score": 3.0, "_source": {"entryClassName": "com.liferay.portlet.blogs.model.BlogsEntry", "title": "Hello"}},
                {"_score": 2.0, "_source": {"entryClassName": "com.liferay.portlet.messageboards.model.MBMessage"}},
                {"_score": 1.0, "_source": "not an object"}
            ]
        },
        "aggregations": {
            "entryClassName": {"buckets": [
                {"key": "com.liferay.portlet.blogs.model.blogsentry", "doc_count": 1},
                {"key": "com.liferay.portlet.messageboards.model.mbmessage", "doc_count": 1}
            ]},
            "modified": {"buckets": [{"from": 20140603200000.0, "to": 20140603220000.0, "doc_count": 1}]}
        }
    });
    let transport = FakeTransport::new(reply);
    let settings = BridgeSettings { index_name: "liferay-20116".to_string(), ..BridgeSettings::default() };
    let service = SearchService::new(ElasticsearchExecutor::new(&transport), settings);

    let mut request = SearchRequest {
        query_text: "content:hello/world".to_string(),
        sorts: vec![SortSpec::desc("modified_sortable")],
        end: 20,
        allowed_result_types: ["com.liferay.portlet.blogs.model.BlogsEntry".to_string()].into_iter().collect(),
        keywords: Some("hello world".to_string()),
        ..SearchRequest::default()
    };
    request.facets.insert(
        "entryClassName".to_string(),
        FacetDefinition::TypeName {
            field: "entryClassName".to_string(),
            values: [
                "com.liferay.portlet.blogs.model.BlogsEntry",
                "com.liferay.portlet.messageboards.model.MBMessage",
                "com.liferay.portlet.journal.model.JournalArticle",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        },
    );
    request.facets.insert(
        "modified".to_string(),
        FacetDefinition::Range { ranges: vec![RangeSpec::new("[20140603200000 TO 20140603220000]", "past-hour")] },
    );

    let result = service.search(&request).expect("search");

    let sent = transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1, "one round trip, no retries");
    let (index, body) = &sent[0];
    assert_eq!(index, "liferay-20116");
    assert_eq!(body["query"]["query_string"]["query"], r"content:hello\/world");
    assert_eq!(body["size"], 20);
    assert_eq!(body["sort"][0]["modified_sortable"]["order"], "desc");
    assert_eq!(body["aggs"]["modified"]["range"]["ranges"][0]["from"], 20140603200000.0);
    assert_eq!(body["aggs"]["entryClassName"]["terms"]["field"], "entryClassName");

    assert_eq!(result.total_hits, 3);
    assert_eq!(result.scores, vec![3.0, 2.0, 1.0]);
    assert_eq!(result.documents.len(), 1);
    assert_eq!(result.documents[0].get("title"), Some("Hello"));
    assert_eq!(result.malformed_hits, 1);
    assert_eq!(result.query_terms, vec!["hello", "world"]);

    let types = &result.facets["entryClassName"];
    assert_eq!(types.count("com.liferay.portlet.blogs.model.BlogsEntry"), Some(1));
    assert_eq!(types.count("com.liferay.portlet.messageboards.model.MBMessage"), Some(1));
    assert_eq!(types.count("com.liferay.portlet.journal.model.JournalArticle"), Some(0));
    assert_eq!(result.facets["modified"].count("[20140603200000 TO 20140603220000]"), Some(1));
}

#[test]
fn transport_failure_surfaces_as_executor_error() {
    let service = SearchService::new(ElasticsearchExecutor::new(DownTransport), BridgeSettings::default());
    let err = service.search(&SearchRequest::default()).unwrap_err();
    assert!(matches!(err, Error::Executor(_)));
    assert!(err.to_string().contains("connection refused"));
}
