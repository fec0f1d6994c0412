use facetbridge_core::traits::{QueryExecutor, SearchTransport};
use facetbridge_core::types::{EngineQuery, RawResponse};

use crate::request::ElasticsearchQueryBuilder;
use crate::response::decode_search_response;

/// Executes queries against Elasticsearch through whatever transport the host owns.
pub struct ElasticsearchExecutor<T> {
    transport: T,
}

impl<T> ElasticsearchExecutor<T>
where
    T: SearchTransport,
{
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T> QueryExecutor for ElasticsearchExecutor<T>
where
    T: SearchTransport,
{
    #[tracing::instrument(
        level = "debug",
        name = "ElasticsearchExecutor::execute",
        skip_all,
        fields(index = %query.index, aggregations = query.aggregations.len())
    )]
    fn execute(&self, query: &EngineQuery) -> anyhow::Result<RawResponse> {
        let body = ElasticsearchQueryBuilder::build_search_body(query);
        tracing::trace!(%body, "Search request body");

        let reply = self.transport.search(&query.index, &body)?;
        let response = decode_search_response(reply, &query.aggregations)?;

        tracing::debug!(
            hits = response.hits.len(),
            total_hits = response.total_hits,
            aggregations = response.aggregations.len(),
            "Search response decoded"
        );
        Ok(response)
    }
}
