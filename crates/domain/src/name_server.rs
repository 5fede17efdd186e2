use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

pub const DEFAULT_DNS_PORT: u16 = 53;

/// A configured name server and the transport policy used to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameServer {
    /// UDP first, re-issued over TCP when the answer is truncated.
    Udp { addr: SocketAddr },
    /// TCP only.
    Tcp { addr: SocketAddr },
}

impl NameServer {
    pub fn udp(addr: SocketAddr) -> Self {
        NameServer::Udp { addr }
    }

    pub fn tcp(addr: SocketAddr) -> Self {
        NameServer::Tcp { addr }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            NameServer::Udp { addr } | NameServer::Tcp { addr } => *addr,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            NameServer::Udp { .. } => "UDP",
            NameServer::Tcp { .. } => "TCP",
        }
    }

    pub fn is_tcp_only(&self) -> bool {
        matches!(self, NameServer::Tcp { .. })
    }
}

fn parse_host_port(s: &str) -> Option<(&str, u16)> {
    if s.starts_with('[') {
        let end = s.find(']')?;
        let host = &s[1..end];
        let rest = &s[end + 1..];
        let port_str = rest.strip_prefix(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    } else {
        let (host, port_str) = s.rsplit_once(':')?;
        let port = port_str.parse::<u16>().ok()?;
        Some((host, port))
    }
}

fn parse_server_addr(addr_str: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = addr_str.parse::<SocketAddr>() {
        return Ok(addr);
    }
    // Bare address, port defaults to 53.
    let bare = addr_str.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, DEFAULT_DNS_PORT));
    }
    if let Some((host, port)) = parse_host_port(addr_str) {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, port));
        }
    }
    Err(format!("Invalid address '{}'", addr_str))
}

impl FromStr for NameServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_server_addr(addr_str)
                .map_err(|_| format!("Invalid UDP address '{}'", addr_str))?;
            return Ok(NameServer::Udp { addr });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_server_addr(addr_str)
                .map_err(|_| format!("Invalid TCP address '{}'", addr_str))?;
            return Ok(NameServer::Tcp { addr });
        }
        if s.contains("://") {
            return Err(format!(
                "Unsupported name server scheme in '{}'. Expected udp:// or tcp://",
                s
            ));
        }
        parse_server_addr(s)
            .map(|addr| NameServer::Udp { addr })
            .map_err(|_| {
                format!(
                    "Invalid name server '{}'. Expected: IP, IP:PORT, [IPv6]:PORT, udp://IP:PORT or tcp://IP:PORT",
                    s
                )
            })
    }
}

impl fmt::Display for NameServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameServer::Udp { addr } => write!(f, "udp://{}", addr),
            NameServer::Tcp { addr } => write!(f, "tcp://{}", addr),
        }
    }
}
