use crate::{DomainName, RecordType, ResolveError};
use std::fmt;

pub const CLASS_IN: u16 = 1;

/// A single question. The class is always IN.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Query {
    pub name: DomainName,
    pub record_type: RecordType,
}

impl Query {
    pub fn new(name: DomainName, record_type: RecordType) -> Self {
        Self { name, record_type }
    }

    /// Validates `name` before anything touches the wire.
    pub fn parse(name: &str, record_type: RecordType) -> Result<Self, ResolveError> {
        Ok(Self::new(DomainName::parse(name)?, record_type))
    }

    pub fn class(&self) -> u16 {
        CLASS_IN
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} IN {}", self.name, self.record_type)
    }
}
