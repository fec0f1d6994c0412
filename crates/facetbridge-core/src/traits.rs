use crate::types::{EngineQuery, RawResponse};

/// Runs one fully-built query against the engine.
///
/// Implementations own the connection; retries, timeouts and cancellation are
/// their business. Any error is fatal for the request that issued it.
pub trait QueryExecutor: Send + Sync {
    fn execute(&self, query: &EngineQuery) -> anyhow::Result<RawResponse>;
}

/// Moves a JSON search body to the engine and returns the JSON reply.
pub trait SearchTransport: Send + Sync {
    fn search(&self, index: &str, body: &serde_json::Value) -> anyhow::Result<serde_json::Value>;
}

impl<T> QueryExecutor for std::sync::Arc<T>
where
    T: QueryExecutor + ?Sized,
{
    fn execute(&self, query: &EngineQuery) -> anyhow::Result<RawResponse> {
        (**self).execute(query)
    }
}
