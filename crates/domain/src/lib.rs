//! Ferrous Resolver Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod domain_name;
pub mod errors;
pub mod lookup;
pub mod name_server;
pub mod service_ports;

pub use config::{CliOverrides, Config, ConfigError, ResolverConfig, ResolverMode};
pub use dns_query::{Query, CLASS_IN};
pub use dns_record::{MxRecord, RData, Record, RecordType, SoaRecord, SrvRecord, TxtRecord};
pub use domain_name::DomainName;
pub use errors::ResolveError;
pub use lookup::{AddressRecord, Resolution, SrvLookup};
pub use name_server::NameServer;
