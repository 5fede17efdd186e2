pub mod builder;
pub mod engine;
pub mod transport;
pub mod txid;
pub mod wire;

pub use builder::{BuildError, SourceBuilder};
pub use engine::QueryEngine;
pub use transport::{DnsTransport, Transport, TransportError, TransportResponse};
pub use txid::{TxidGuard, TxidRegistry};
