use super::RecordType;
use crate::DomainName;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MxRecord {
    pub preference: u16,
    pub exchange: DomainName,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: DomainName,
}

/// TXT payload: one or more character-strings, kept as raw octets in wire
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxtRecord {
    pub segments: Vec<Vec<u8>>,
}

impl TxtRecord {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn texts(&self) -> impl Iterator<Item = String> + '_ {
        self.segments
            .iter()
            .map(|s| String::from_utf8_lossy(s).into_owned())
    }

    /// All segments concatenated, the way SPF and DKIM consumers read them.
    pub fn joined(&self) -> String {
        self.texts().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SoaRecord {
    pub mname: DomainName,
    pub rname: DomainName,
    pub serial: u32,
    pub refresh: u32,
    pub retry: u32,
    pub expire: u32,
    pub minimum: u32,
}

/// Type-specific payload of a resource record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    Ptr(DomainName),
    Cname(DomainName),
    Ns(DomainName),
    Mx(MxRecord),
    Srv(SrvRecord),
    Txt(TxtRecord),
    Soa(SoaRecord),
    /// EDNS(0) pseudo-record; options are carried opaquely.
    Opt(Vec<u8>),
    Unknown { code: u16, data: Vec<u8> },
}

impl RData {
    pub fn record_type(&self) -> RecordType {
        match self {
            RData::A(_) => RecordType::A,
            RData::AAAA(_) => RecordType::AAAA,
            RData::Ptr(_) => RecordType::PTR,
            RData::Cname(_) => RecordType::CNAME,
            RData::Ns(_) => RecordType::NS,
            RData::Mx(_) => RecordType::MX,
            RData::Srv(_) => RecordType::SRV,
            RData::Txt(_) => RecordType::TXT,
            RData::Soa(_) => RecordType::SOA,
            RData::Opt(_) => RecordType::OPT,
            RData::Unknown { code, .. } => RecordType::Unknown(*code),
        }
    }

    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self {
            RData::A(v4) => Some(IpAddr::V4(*v4)),
            RData::AAAA(v6) => Some(IpAddr::V6(*v6)),
            _ => None,
        }
    }

    /// Target of a name-valued record (PTR, CNAME, NS).
    pub fn target_name(&self) -> Option<&DomainName> {
        match self {
            RData::Ptr(name) | RData::Cname(name) | RData::Ns(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub name: DomainName,
    /// Usually IN; OPT records reuse the field as the UDP payload size.
    pub class: u16,
    pub ttl: u32,
    pub data: RData,
}

impl Record {
    pub fn new(name: DomainName, ttl: u32, data: RData) -> Self {
        Self {
            name,
            class: crate::CLASS_IN,
            ttl,
            data,
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.data.record_type()
    }
}
