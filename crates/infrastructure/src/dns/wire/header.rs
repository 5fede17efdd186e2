use std::fmt;

pub const HEADER_LEN: usize = 12;

const FLAG_QR: u16 = 0x8000;
const FLAG_AA: u16 = 0x0400;
const FLAG_TC: u16 = 0x0200;
const FLAG_RD: u16 = 0x0100;
const FLAG_RA: u16 = 0x0080;

/// Response code from the low four bits of the flags word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rcode {
    #[default]
    NoError,
    FormErr,
    ServFail,
    NXDomain,
    NotImp,
    Refused,
    Other(u8),
}

impl Rcode {
    pub fn from_u8(code: u8) -> Self {
        match code & 0x0f {
            0 => Rcode::NoError,
            1 => Rcode::FormErr,
            2 => Rcode::ServFail,
            3 => Rcode::NXDomain,
            4 => Rcode::NotImp,
            5 => Rcode::Refused,
            other => Rcode::Other(other),
        }
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Rcode::NoError => 0,
            Rcode::FormErr => 1,
            Rcode::ServFail => 2,
            Rcode::NXDomain => 3,
            Rcode::NotImp => 4,
            Rcode::Refused => 5,
            Rcode::Other(code) => code & 0x0f,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rcode::NoError => "NOERROR",
            Rcode::FormErr => "FORMERR",
            Rcode::ServFail => "SERVFAIL",
            Rcode::NXDomain => "NXDOMAIN",
            Rcode::NotImp => "NOTIMP",
            Rcode::Refused => "REFUSED",
            Rcode::Other(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for Rcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rcode::Other(code) => write!(f, "RCODE{}", code),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Header fields except the section counts, which the codec derives from
/// the sections themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    pub id: u16,
    pub response: bool,
    pub opcode: u8,
    pub authoritative: bool,
    pub truncated: bool,
    pub recursion_desired: bool,
    pub recursion_available: bool,
    pub rcode: Rcode,
}

impl Header {
    pub fn flags(&self) -> u16 {
        let mut flags = u16::from(self.opcode & 0x0f) << 11;
        if self.response {
            flags |= FLAG_QR;
        }
        if self.authoritative {
            flags |= FLAG_AA;
        }
        if self.truncated {
            flags |= FLAG_TC;
        }
        if self.recursion_desired {
            flags |= FLAG_RD;
        }
        if self.recursion_available {
            flags |= FLAG_RA;
        }
        flags | u16::from(self.rcode.to_u8())
    }

    pub fn from_flags(id: u16, flags: u16) -> Self {
        Self {
            id,
            response: flags & FLAG_QR != 0,
            opcode: ((flags >> 11) & 0x0f) as u8,
            authoritative: flags & FLAG_AA != 0,
            truncated: flags & FLAG_TC != 0,
            recursion_desired: flags & FLAG_RD != 0,
            recursion_available: flags & FLAG_RA != 0,
            rcode: Rcode::from_u8((flags & 0x0f) as u8),
        }
    }

    /// Reads only the id and TC bit, for transports that must decide on a
    /// fallback before the message is decoded.
    pub fn peek(bytes: &[u8]) -> Option<(u16, bool)> {
        if bytes.len() < HEADER_LEN {
            return None;
        }
        let id = u16::from_be_bytes([bytes[0], bytes[1]]);
        let flags = u16::from_be_bytes([bytes[2], bytes[3]]);
        Some((id, flags & FLAG_TC != 0))
    }
}
