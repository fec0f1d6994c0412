//! facetbridge-es
//!
//! Elasticsearch wire format for `EngineQuery`/`RawResponse`, and a
//! `QueryExecutor` that speaks it over an injected `SearchTransport`.

pub mod executor;
pub mod request;
pub mod response;

pub use executor::ElasticsearchExecutor;
pub use request::ElasticsearchQueryBuilder;
pub use response::decode_search_response;
