use ferrous_resolver_domain::{DomainName, Query, RData, RecordType, ResolveError};
use std::sync::Arc;

use super::resolve_non_empty;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct TxtLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl TxtLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Every character-string of every TXT record, in response order.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        name: &str,
    ) -> Result<Vec<String>, ResolveError> {
        let query = Query::new(DomainName::parse(name)?, RecordType::TXT);
        let resolution = ctx
            .run(name, resolve_non_empty(self.source.as_ref(), &query))
            .await?;

        Ok(resolution
            .records
            .iter()
            .filter_map(|record| match &record.data {
                RData::Txt(txt) => Some(txt.texts()),
                _ => None,
            })
            .flatten()
            .collect())
    }
}
