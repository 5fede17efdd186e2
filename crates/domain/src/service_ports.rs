//! Well-known service ports.
//!
//! A static subset of the IANA service name registry. Lookups never touch the
//! network or the filesystem.

use crate::ResolveError;

const SERVICES: &[(&str, &str, u16)] = &[
    ("tcp", "bgp", 179),
    ("tcp", "domain", 53),
    ("tcp", "domain-s", 853),
    ("tcp", "finger", 79),
    ("tcp", "ftp", 21),
    ("tcp", "ftp-data", 20),
    ("tcp", "ftps", 990),
    ("tcp", "gopher", 70),
    ("tcp", "http", 80),
    ("tcp", "http-alt", 8080),
    ("tcp", "https", 443),
    ("tcp", "imap", 143),
    ("tcp", "imap2", 143),
    ("tcp", "imap3", 220),
    ("tcp", "imaps", 993),
    ("tcp", "irc", 194),
    ("tcp", "kerberos", 88),
    ("tcp", "ldap", 389),
    ("tcp", "ldaps", 636),
    ("tcp", "mysql", 3306),
    ("tcp", "nntp", 119),
    ("tcp", "pop3", 110),
    ("tcp", "pop3s", 995),
    ("tcp", "postgresql", 5432),
    ("tcp", "rsync", 873),
    ("tcp", "sip", 5060),
    ("tcp", "sips", 5061),
    ("tcp", "smtp", 25),
    ("tcp", "ssh", 22),
    ("tcp", "submission", 587),
    ("tcp", "submissions", 465),
    ("tcp", "telnet", 23),
    ("tcp", "whois", 43),
    ("tcp", "xmpp-client", 5222),
    ("tcp", "xmpp-server", 5269),
    ("udp", "bootpc", 68),
    ("udp", "bootps", 67),
    ("udp", "domain", 53),
    ("udp", "kerberos", 88),
    ("udp", "mdns", 5353),
    ("udp", "ntp", 123),
    ("udp", "sip", 5060),
    ("udp", "snmp", 161),
    ("udp", "snmp-trap", 162),
    ("udp", "syslog", 514),
    ("udp", "tftp", 69),
];

/// Protocols to search for a network token, in search order.
fn protocols_for(network: &str) -> Option<&'static [&'static str]> {
    match network {
        "tcp" | "tcp4" | "tcp6" => Some(&["tcp"]),
        "udp" | "udp4" | "udp6" => Some(&["udp"]),
        "" | "ip" => Some(&["tcp", "udp"]),
        _ => None,
    }
}

/// Resolves `service` on `network` to a port number.
///
/// Numeric services are returned as-is. Names are matched case-insensitively.
pub fn lookup_port(network: &str, service: &str) -> Result<u16, ResolveError> {
    let unknown = || ResolveError::UnknownService {
        network: network.to_string(),
        service: service.to_string(),
    };

    let protocols = protocols_for(&network.to_ascii_lowercase()).ok_or_else(unknown)?;

    if !service.is_empty() && service.bytes().all(|b| b.is_ascii_digit()) {
        return service.parse::<u16>().map_err(|_| unknown());
    }

    let service = service.to_ascii_lowercase();
    protocols
        .iter()
        .find_map(|proto| {
            SERVICES
                .iter()
                .find(|(p, name, _)| p == proto && *name == service)
                .map(|(_, _, port)| *port)
        })
        .ok_or_else(unknown)
}
