//! Domain types exchanged between the host, the translation layer and the engine.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};

pub type FacetName = String;
pub type Meta = HashMap<String, String>;

/// Field carrying the fully-qualified entity type of an indexed document.
pub const TYPE_ID_FIELD: &str = "entryClassName";

fn default_type_id_field() -> String {
    TYPE_ID_FIELD.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field_name: String,
    #[serde(default)]
    pub descending: bool,
}

impl SortSpec {
    pub fn asc(field_name: impl Into<String>) -> Self {
        Self { field_name: field_name.into(), descending: false }
    }

    pub fn desc(field_name: impl Into<String>) -> Self {
        Self { field_name: field_name.into(), descending: true }
    }
}

/// A search as the host application describes it.
///
/// - `query_text`: raw query string, escaped before it reaches the engine
/// - `start`/`end`: pagination bounds; `end` is sent as the page size
/// - `facets`: facet name to definition, order irrelevant
/// - `allowed_result_types`: type ids a hit must carry to be returned
/// - `keywords`: optional space-delimited keywords echoed back as query terms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query_text: String,
    #[serde(default)]
    pub sorts: Vec<SortSpec>,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default)]
    pub facets: HashMap<FacetName, FacetDefinition>,
    #[serde(default)]
    pub allowed_result_types: HashSet<String>,
    #[serde(default)]
    pub keywords: Option<String>,
}

/// One declared range of a range facet, e.g. `{"range": "[0 TO 10]", "label": "low"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub range: String,
    #[serde(default)]
    pub label: String,
}

impl RangeSpec {
    pub fn new(range: impl Into<String>, label: impl Into<String>) -> Self {
        Self { range: range.into(), label: label.into() }
    }
}

/// Facet configuration as stored by the host, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FacetDefinition {
    /// Categorical facet over a field.
    Term {
        field: String,
        #[serde(default, rename = "maxTerms", skip_serializing_if = "Option::is_none")]
        max_terms: Option<u32>,
    },
    /// Bucketed facet over the modified-date field.
    Range {
        #[serde(default)]
        ranges: Vec<RangeSpec>,
    },
    /// Term facet over fully-qualified type names. The engine lower-cases the
    /// keys it returns, so results are reconciled against `values`.
    TypeName {
        #[serde(default = "default_type_id_field")]
        field: String,
        #[serde(default)]
        values: BTreeSet<String>,
    },
    /// Never aggregated, never reported.
    Static,
}

impl FacetDefinition {
    pub fn is_static(&self) -> bool {
        matches!(self, Self::Static)
    }
}

/// Lower/upper boundary pair of a range bucket; `None` is an open side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeBoundary {
    pub from: Option<f64>,
    pub to: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AggregationKind {
    Terms { size: Option<u32> },
    Range { buckets: Vec<RangeBoundary> },
}

/// One server-side aggregation, named after the facet that asked for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationRequest {
    pub name: FacetName,
    pub field: String,
    pub kind: AggregationKind,
}

/// Everything the executor needs to run one search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineQuery {
    pub index: String,
    pub query_text: String,
    pub sorts: Vec<SortSpec>,
    pub from: usize,
    pub size: usize,
    pub aggregations: Vec<AggregationRequest>,
    pub unmapped_sort_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHit {
    /// Source payload exactly as the engine stored it.
    pub source: String,
    pub score: f32,
}

impl RawHit {
    pub fn new(source: impl Into<String>, score: f32) -> Self {
        Self { source: source.into(), score }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermsBucket {
    pub key: String,
    pub doc_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeBucket {
    pub from: Option<f64>,
    pub to: Option<f64>,
    pub from_as_string: Option<String>,
    pub to_as_string: Option<String>,
    pub doc_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawAggregation {
    Terms(Vec<TermsBucket>),
    Range(Vec<RangeBucket>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResponse {
    pub hits: Vec<RawHit>,
    pub total_hits: u64,
    pub aggregations: HashMap<FacetName, RawAggregation>,
}

/// A hit flattened to string fields, with its type id pulled out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub fields: Meta,
    pub type_id: Option<String>,
}

impl NormalizedDocument {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Counts collected for one facet: a term, or a rendered range label, to its count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetResult {
    pub name: FacetName,
    pub counts: HashMap<String, u64>,
}

impl FacetResult {
    pub fn new(name: impl Into<FacetName>, counts: HashMap<String, u64>) -> Self {
        Self { name: name.into(), counts }
    }

    pub fn count(&self, term: &str) -> Option<u64> {
        self.counts.get(term).copied()
    }

    /// Entries by descending count, ties broken by term.
    pub fn term_counts(&self) -> Vec<TermCount> {
        let mut entries: Vec<TermCount> = self
            .counts
            .iter()
            .map(|(term, count)| TermCount { term: term.clone(), count: *count })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        entries
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Surviving documents in hit order.
    pub documents: Vec<NormalizedDocument>,
    /// One score per raw hit, before any document was dropped.
    pub scores: Vec<f32>,
    pub total_hits: u64,
    pub elapsed_seconds: f64,
    pub query_terms: Vec<String>,
    /// Query text as sent to the engine.
    pub query_text: String,
    pub facets: HashMap<FacetName, FacetResult>,
    pub malformed_hits: usize,
}
