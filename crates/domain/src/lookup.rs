use crate::{DomainName, RData, Record, SrvRecord};
use std::fmt;
use std::net::IpAddr;

/// An address answer together with the TTL it was served with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRecord {
    pub ip: IpAddr,
    pub ttl: u32,
}

impl AddressRecord {
    pub fn new(ip: IpAddr, ttl: u32) -> Self {
        Self { ip, ttl }
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (ttl {})", self.ip, self.ttl)
    }
}

/// Result of a service lookup: the owner name the SRV set was found at and
/// the records in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvLookup {
    pub canonical_name: DomainName,
    pub records: Vec<SrvRecord>,
}

/// Answer records for one question, after any CNAME chain was followed.
///
/// `canonical_name` is the owner of `records`; it equals the queried name when
/// no alias was involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub canonical_name: DomainName,
    pub records: Vec<Record>,
}

impl Resolution {
    pub fn new(canonical_name: DomainName, records: Vec<Record>) -> Self {
        Self {
            canonical_name,
            records,
        }
    }

    pub fn rdata(&self) -> impl Iterator<Item = &RData> {
        self.records.iter().map(|r| &r.data)
    }
}
