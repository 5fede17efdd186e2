use crate::RecordType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Query timeout resolving {name}")]
    Timeout { name: String },

    #[error("Lookup of {name} cancelled")]
    Cancelled { name: String },

    #[error("Server {server} failed: {reason}")]
    ServerFailure { server: String, reason: String },

    #[error("No {record_type} records found for {name}{}", nxdomain_suffix(.nxdomain))]
    NotFound {
        name: String,
        record_type: RecordType,
        nxdomain: bool,
    },

    #[error("Malformed response from {server}: {reason}")]
    MalformedResponse { server: String, reason: String },

    #[error("CNAME chain for {name} exceeded {depth} redirections")]
    ResolutionLoop { name: String, depth: usize },

    #[error("Unknown service {network}/{service}")]
    UnknownService { network: String, service: String },

    #[error("{record_type} lookups are not supported by the {source_name} resolver")]
    Unsupported {
        record_type: RecordType,
        source_name: &'static str,
    },

    #[error("No name servers configured")]
    NoServers,
}

fn nxdomain_suffix(nxdomain: &bool) -> &'static str {
    if *nxdomain {
        " (NXDOMAIN)"
    } else {
        ""
    }
}

impl ResolveError {
    pub fn not_found(name: impl Into<String>, record_type: RecordType, nxdomain: bool) -> Self {
        Self::NotFound {
            name: name.into(),
            record_type,
            nxdomain,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_nxdomain(&self) -> bool {
        matches!(self, Self::NotFound { nxdomain: true, .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Conditions a caller may retry: the same query can succeed later.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::ServerFailure { .. })
    }
}
