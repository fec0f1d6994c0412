use std::time::Instant;

use facetbridge_core::config::BridgeSettings;
use facetbridge_core::error::{Error, Result};
use facetbridge_core::traits::QueryExecutor;
use facetbridge_core::types::{EngineQuery, SearchRequest, SearchResult};

use crate::aggregations::build_aggregations;
use crate::documents::map_hits;
use crate::facets::collect_facets;
use crate::query_text::normalize;

/// Runs host search requests through an injected executor.
///
/// Holds no per-request state, so one instance can serve concurrent callers.
pub struct SearchService<E> {
    executor: E,
    settings: BridgeSettings,
}

impl<E> SearchService<E>
where
    E: QueryExecutor,
{
    pub fn new(executor: E, settings: BridgeSettings) -> Self {
        Self { executor, settings }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    /// Translates a request into the query handed to the executor.
    pub fn build_query(&self, request: &SearchRequest) -> EngineQuery {
        EngineQuery {
            index: self.settings.index_name.clone(),
            query_text: normalize(&request.query_text),
            sorts: request.sorts.iter().filter(|s| !s.field_name.is_empty()).cloned().collect(),
            from: request.start,
            size: request.end,
            aggregations: build_aggregations(&request.facets, &self.settings),
            unmapped_sort_type: self.settings.unmapped_sort_type.clone(),
        }
    }

    /// One request/response cycle. Fails only when the executor fails.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(index = %self.settings.index_name, facets = request.facets.len())
    )]
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let started = Instant::now();

        let query = self.build_query(request);
        tracing::debug!(query = %query.query_text, aggregations = query.aggregations.len(), "Executing search");
        let response = self.executor.execute(&query).map_err(Error::Executor)?;

        let facets = collect_facets(&request.facets, &response.aggregations);
        let mapped = map_hits(&response.hits, &request.allowed_result_types);
        let scores = response.hits.iter().map(|hit| hit.score).collect();
        let query_terms = request
            .keywords
            .as_deref()
            .map(|keywords| keywords.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();

        Ok(SearchResult {
            documents: mapped.documents,
            scores,
            total_hits: response.total_hits,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            query_terms,
            query_text: query.query_text,
            facets,
            malformed_hits: mapped.malformed,
        })
    }
}
