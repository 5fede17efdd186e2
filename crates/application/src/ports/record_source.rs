use async_trait::async_trait;
use ferrous_resolver_domain::{Query, Resolution, ResolveError};

/// Capability to answer a single question.
///
/// Implementations either speak DNS on the wire or delegate to the host
/// resolver. An empty answer is reported as `ResolveError::NotFound`, never
/// as an empty `Resolution`.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError>;

    fn name(&self) -> &'static str;
}
