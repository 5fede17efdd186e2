//! Ferrous Resolver Application Layer
pub mod context;
pub mod parity;
pub mod ports;
pub mod resolver;
pub mod use_cases;

pub use context::LookupContext;
pub use resolver::Resolver;
