//! facetbridge-search
//!
//! Translation between host search requests and the engine's query and
//! aggregation model: query escaping, range literals, aggregation building,
//! hit mapping, facet collection, and the `SearchService` tying them together.

pub mod aggregations;
pub mod documents;
pub mod facets;
pub mod query_text;
pub mod range;
pub mod search;

pub use search::SearchService;
