//! DNS wire format (RFC 1035 §4).
//!
//! Hand-written codec for the subset of record types the resolver deals in.
//! Decoding never panics on hostile input: every read is bounds-checked and
//! compression pointers must point strictly backward.

mod decoder;
mod encoder;
mod error;
mod header;
mod message;

pub use decoder::decode;
pub use encoder::{encode, encode_query};
pub use error::WireError;
pub use header::{Header, Rcode, HEADER_LEN};
pub use message::Message;

/// Largest message that fits the two-octet TCP length prefix.
pub const MAX_MESSAGE_LEN: usize = 65535;
