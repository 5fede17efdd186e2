use ferrous_resolver_domain::{DomainName, MxRecord, Query, RData, RecordType, ResolveError};
use std::sync::Arc;

use super::resolve_non_empty;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct MxLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl MxLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Mail exchangers by ascending preference. Equal preferences keep the
    /// order the server sent them in.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        name: &str,
    ) -> Result<Vec<MxRecord>, ResolveError> {
        let query = Query::new(DomainName::parse(name)?, RecordType::MX);
        let resolution = ctx
            .run(name, resolve_non_empty(self.source.as_ref(), &query))
            .await?;

        let mut records: Vec<MxRecord> = resolution
            .records
            .into_iter()
            .filter_map(|record| match record.data {
                RData::Mx(mx) => Some(mx),
                _ => None,
            })
            .collect();
        records.sort_by_key(|mx| mx.preference);
        Ok(records)
    }
}
