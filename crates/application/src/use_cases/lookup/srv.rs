use ferrous_resolver_domain::{
    DomainName, Query, RData, RecordType, ResolveError, SrvLookup, SrvRecord,
};
use std::cmp::Reverse;
use std::sync::Arc;

use super::resolve_non_empty;
use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct SrvLookupUseCase {
    source: Arc<dyn RecordSource>,
}

impl SrvLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Queries `_service._proto.name`, or `name` itself when both service and
    /// proto are empty. Records come back by ascending priority, heavier
    /// weights first within a priority.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        service: &str,
        proto: &str,
        name: &str,
    ) -> Result<SrvLookup, ResolveError> {
        let target = service_name(service, proto, name);
        let query = Query::new(DomainName::parse(&target)?, RecordType::SRV);
        let resolution = ctx
            .run(&target, resolve_non_empty(self.source.as_ref(), &query))
            .await?;

        let mut records: Vec<SrvRecord> = resolution
            .records
            .into_iter()
            .filter_map(|record| match record.data {
                RData::Srv(srv) => Some(srv),
                _ => None,
            })
            .collect();
        records.sort_by_key(|srv| (srv.priority, Reverse(srv.weight)));

        Ok(SrvLookup {
            canonical_name: resolution.canonical_name,
            records,
        })
    }
}

fn service_name(service: &str, proto: &str, name: &str) -> String {
    if service.is_empty() && proto.is_empty() {
        name.to_string()
    } else {
        format!("_{}._{}.{}", service, proto, name)
    }
}
