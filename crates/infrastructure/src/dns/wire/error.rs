use ferrous_resolver_domain::RecordType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    #[error("message truncated at offset {offset}")]
    Truncated { offset: usize },

    #[error("invalid label type 0x{label:02x} at offset {offset}")]
    InvalidLabel { offset: usize, label: u8 },

    #[error("compression pointer at offset {offset} does not point backward (target {target})")]
    BadPointer { offset: usize, target: usize },

    #[error("name at offset {offset} exceeds 255 octets")]
    NameTooLong { offset: usize },

    #[error("{count} declared entries cannot fit in the remaining {remaining} bytes")]
    CountOverflow { count: usize, remaining: usize },

    #[error("invalid {record_type} rdata: {reason}")]
    InvalidRdata {
        record_type: RecordType,
        reason: String,
    },

    #[error("character-string of {0} bytes exceeds 255")]
    StringTooLong(usize),

    #[error("message of {0} bytes exceeds 65535")]
    MessageTooLarge(usize),
}
