use ferrous_resolver_domain::{DomainName, Query, RData, RecordType, ResolveError};
use std::sync::Arc;

use super::resolve_non_empty;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct NsLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl NsLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub async fn execute(
        &self,
        ctx: &LookupContext,
        name: &str,
    ) -> Result<Vec<DomainName>, ResolveError> {
        let query = Query::new(DomainName::parse(name)?, RecordType::NS);
        let resolution = ctx
            .run(name, resolve_non_empty(self.source.as_ref(), &query))
            .await?;

        Ok(resolution
            .records
            .into_iter()
            .filter_map(|record| match record.data {
                RData::Ns(host) => Some(host),
                _ => None,
            })
            .collect())
    }
}
