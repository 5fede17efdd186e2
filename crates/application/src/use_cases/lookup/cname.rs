use ferrous_resolver_domain::{DomainName, Query, RData, RecordType, ResolveError};
use std::sync::Arc;
use tracing::debug;

use crate::context::LookupContext;
use crate::ports::RecordSource;

pub struct CnameLookupUseCase {
    source: Arc<dyn RecordSource>,
    max_depth: usize,
}

impl CnameLookupUseCase {
    pub fn new(source: Arc<dyn RecordSource>, max_depth: usize) -> Self {
        Self { source, max_depth }
    }

    /// Canonical name of `host` after following every alias. A name without
    /// a CNAME is its own canonical name.
    pub async fn execute(
        &self,
        ctx: &LookupContext,
        host: &str,
    ) -> Result<DomainName, ResolveError> {
        let name = DomainName::parse(host)?;
        ctx.run(host, self.follow(name)).await
    }

    async fn follow(&self, mut name: DomainName) -> Result<DomainName, ResolveError> {
        let origin = name.clone();

        // max_depth hops, plus one final query confirming the last name has
        // no further alias.
        for _ in 0..=self.max_depth {
            let query = Query::new(name.clone(), RecordType::CNAME);
            let target = match self.source.resolve(&query).await {
                Ok(resolution) => resolution.records.into_iter().find_map(|record| {
                    match record.data {
                        RData::Cname(target) => Some(target),
                        _ => None,
                    }
                }),
                Err(ResolveError::NotFound {
                    nxdomain: false, ..
                }) => None,
                Err(e) => return Err(e),
            };

            match target {
                Some(target) => {
                    debug!(alias = %name, target = %target, "Following CNAME");
                    name = target;
                }
                None => return Ok(name),
            }
        }

        Err(ResolveError::ResolutionLoop {
            name: origin.to_fqdn(),
            depth: self.max_depth,
        })
    }
}
