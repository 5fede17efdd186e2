use ferrous_resolver_domain::{AddressRecord, DomainName, MxRecord, ResolveError, SrvLookup};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::context::LookupContext;
use crate::ports::RecordSource;
use crate::use_cases::{
    CnameLookupUseCase, HostLookupUseCase, IpAddrLookupUseCase, MxLookupUseCase, NsLookupUseCase,
    PortLookupUseCase, ReverseLookupUseCase, SrvLookupUseCase, TxtLookupUseCase,
};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_CNAME_DEPTH: usize = 10;

/// The nine lookup operations over one [`RecordSource`].
///
/// Every network operation takes a [`LookupContext`]; [`Resolver::context`]
/// hands out one bounded by the configured lookup timeout.
pub struct Resolver {
    source: Arc<dyn RecordSource>,
    lookup_timeout: Duration,
    reverse: ReverseLookupUseCase,
    cname: CnameLookupUseCase,
    host: HostLookupUseCase,
    ip_addr: IpAddrLookupUseCase,
    mx: MxLookupUseCase,
    ns: NsLookupUseCase,
    port: PortLookupUseCase,
    srv: SrvLookupUseCase,
    txt: TxtLookupUseCase,
}

impl Resolver {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self::with_options(source, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_MAX_CNAME_DEPTH)
    }

    pub fn with_options(
        source: Arc<dyn RecordSource>,
        lookup_timeout: Duration,
        max_cname_depth: usize,
    ) -> Self {
        Self {
            reverse: ReverseLookupUseCase::new(Arc::clone(&source)),
            cname: CnameLookupUseCase::new(Arc::clone(&source), max_cname_depth),
            host: HostLookupUseCase::new(Arc::clone(&source)),
            ip_addr: IpAddrLookupUseCase::new(Arc::clone(&source)),
            mx: MxLookupUseCase::new(Arc::clone(&source)),
            ns: NsLookupUseCase::new(Arc::clone(&source)),
            port: PortLookupUseCase::new(),
            srv: SrvLookupUseCase::new(Arc::clone(&source)),
            txt: TxtLookupUseCase::new(Arc::clone(&source)),
            source,
            lookup_timeout,
        }
    }

    pub fn context(&self) -> LookupContext {
        LookupContext::with_timeout(self.lookup_timeout)
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub async fn lookup_addr(
        &self,
        ctx: &LookupContext,
        addr: &str,
    ) -> Result<Vec<DomainName>, ResolveError> {
        self.reverse.execute(ctx, addr).await
    }

    pub async fn lookup_cname(
        &self,
        ctx: &LookupContext,
        host: &str,
    ) -> Result<DomainName, ResolveError> {
        self.cname.execute(ctx, host).await
    }

    pub async fn lookup_host(
        &self,
        ctx: &LookupContext,
        host: &str,
    ) -> Result<Vec<IpAddr>, ResolveError> {
        self.host.execute(ctx, host).await
    }

    pub async fn lookup_ip_addr(
        &self,
        ctx: &LookupContext,
        host: &str,
    ) -> Result<Vec<AddressRecord>, ResolveError> {
        self.ip_addr.execute(ctx, host).await
    }

    pub async fn lookup_mx(
        &self,
        ctx: &LookupContext,
        name: &str,
    ) -> Result<Vec<MxRecord>, ResolveError> {
        self.mx.execute(ctx, name).await
    }

    pub async fn lookup_ns(
        &self,
        ctx: &LookupContext,
        name: &str,
    ) -> Result<Vec<DomainName>, ResolveError> {
        self.ns.execute(ctx, name).await
    }

    pub fn lookup_port(&self, network: &str, service: &str) -> Result<u16, ResolveError> {
        self.port.execute(network, service)
    }

    pub async fn lookup_srv(
        &self,
        ctx: &LookupContext,
        service: &str,
        proto: &str,
        name: &str,
    ) -> Result<SrvLookup, ResolveError> {
        self.srv.execute(ctx, service, proto, name).await
    }

    pub async fn lookup_txt(
        &self,
        ctx: &LookupContext,
        name: &str,
    ) -> Result<Vec<String>, ResolveError> {
        self.txt.execute(ctx, name).await
    }
}
