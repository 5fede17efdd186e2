//! Reference resolver for differential testing.
//!
//! [`HickoryOracle`] builds and parses messages with `hickory-proto` so that
//! none of the crate's own codec is on the reference path.

mod oracle;

pub use oracle::HickoryOracle;
