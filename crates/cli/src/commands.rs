use clap::Subcommand;
use ferrous_resolver_application::{LookupContext, Resolver};
use ferrous_resolver_domain::ResolveError;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reverse lookup: host names for an address
    Addr { address: String },
    /// Canonical name of a host
    Cname { host: String },
    /// Addresses of a host
    Host { host: String },
    /// Addresses of a host with their TTLs
    Ip { host: String },
    /// Mail exchangers, by preference
    Mx { name: String },
    /// Name servers of a zone
    Ns { name: String },
    /// Well-known port of a service
    Port { network: String, service: String },
    /// Service records of _SERVICE._PROTO.NAME
    Srv {
        service: String,
        proto: String,
        name: String,
    },
    /// Text records
    Txt { name: String },
}

/// Runs one lookup and renders the result, one entry per line.
pub async fn run(
    resolver: &Resolver,
    ctx: &LookupContext,
    command: &Command,
) -> Result<Vec<String>, ResolveError> {
    let lines = match command {
        Command::Addr { address } => display_all(resolver.lookup_addr(ctx, address).await?),
        Command::Cname { host } => vec![resolver.lookup_cname(ctx, host).await?.to_string()],
        Command::Host { host } => display_all(resolver.lookup_host(ctx, host).await?),
        Command::Ip { host } => display_all(resolver.lookup_ip_addr(ctx, host).await?),
        Command::Mx { name } => resolver
            .lookup_mx(ctx, name)
            .await?
            .into_iter()
            .map(|mx| format!("{} {}", mx.preference, mx.exchange))
            .collect(),
        Command::Ns { name } => display_all(resolver.lookup_ns(ctx, name).await?),
        Command::Port { network, service } => {
            vec![resolver.lookup_port(network, service)?.to_string()]
        }
        Command::Srv {
            service,
            proto,
            name,
        } => {
            let lookup = resolver.lookup_srv(ctx, service, proto, name).await?;
            std::iter::once(format!("; canonical name {}", lookup.canonical_name))
                .chain(lookup.records.into_iter().map(|srv| {
                    format!("{} {} {} {}", srv.priority, srv.weight, srv.port, srv.target)
                }))
                .collect()
        }
        Command::Txt { name } => resolver
            .lookup_txt(ctx, name)
            .await?
            .into_iter()
            .map(|text| format!("\"{}\"", text))
            .collect(),
    };
    Ok(lines)
}

fn display_all<T: std::fmt::Display>(items: Vec<T>) -> Vec<String> {
    items.into_iter().map(|item| item.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ferrous_resolver_application::ports::RecordSource;
    use ferrous_resolver_domain::{
        DomainName, MxRecord, Query, RData, Record, RecordType, Resolution,
    };
    use std::sync::Arc;

    struct MxOnly;

    #[async_trait]
    impl RecordSource for MxOnly {
        async fn resolve(&self, query: &Query) -> Result<Resolution, ResolveError> {
            if query.record_type != RecordType::MX {
                return Err(ResolveError::not_found(query.name.to_fqdn(), query.record_type, true));
            }
            let mx = |preference, exchange: &str| {
                Record::new(
                    query.name.clone(),
                    300,
                    RData::Mx(MxRecord {
                        preference,
                        exchange: DomainName::parse(exchange).unwrap(),
                    }),
                )
            };
            Ok(Resolution::new(
                query.name.clone(),
                vec![mx(20, "mx2.example.com"), mx(10, "mx1.example.com")],
            ))
        }

        fn name(&self) -> &'static str {
            "mx-only"
        }
    }

    #[tokio::test]
    async fn test_mx_lines_are_ordered() {
        let resolver = Resolver::new(Arc::new(MxOnly));
        let ctx = resolver.context();
        let command = Command::Mx {
            name: "example.com".into(),
        };

        let lines = run(&resolver, &ctx, &command).await.unwrap();
        assert_eq!(lines, vec!["10 mx1.example.com.", "20 mx2.example.com."]);
    }

    #[tokio::test]
    async fn test_port_needs_no_network() {
        let resolver = Resolver::new(Arc::new(MxOnly));
        let ctx = resolver.context();
        let command = Command::Port {
            network: "tcp".into(),
            service: "https".into(),
        };

        assert_eq!(run(&resolver, &ctx, &command).await.unwrap(), vec!["443"]);
    }

    #[tokio::test]
    async fn test_errors_pass_through() {
        let resolver = Resolver::new(Arc::new(MxOnly));
        let ctx = resolver.context();
        let command = Command::Ns {
            name: "example.com".into(),
        };

        let err = run(&resolver, &ctx, &command).await.unwrap_err();
        assert!(err.is_nxdomain());
    }
}
