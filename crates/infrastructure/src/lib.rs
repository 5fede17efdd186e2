//! Ferrous Resolver Infrastructure Layer
pub mod dns;
pub mod system;

pub use dns::{QueryEngine, SourceBuilder};
pub use system::HostRecordSource;
