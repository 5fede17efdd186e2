use ferrous_resolver_domain::{ConfigError, NameServer};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::{debug, warn};

pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// The parts of resolv.conf(5) the resolver honours.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvConf {
    pub nameservers: Vec<NameServer>,
    pub timeout: Option<Duration>,
    pub attempts: Option<u32>,
}

impl ResolvConf {
    pub fn parse(content: &str) -> Self {
        let mut conf = ResolvConf::default();

        for (line_num, line) in content.lines().enumerate() {
            let line = line
                .split(['#', ';'])
                .next()
                .unwrap_or_default()
                .trim();
            let mut fields = line.split_whitespace();

            match fields.next() {
                Some("nameserver") => match fields.next().and_then(parse_nameserver) {
                    Some(server) => conf.nameservers.push(server),
                    None => warn!(line = line_num + 1, "Skipping unparsable nameserver entry"),
                },
                Some("options") => {
                    for option in fields {
                        conf.apply_option(option);
                    }
                }
                _ => {}
            }
        }

        conf
    }

    fn apply_option(&mut self, option: &str) {
        let Some((key, value)) = option.split_once(':') else {
            return;
        };
        match (key, value.parse::<u32>()) {
            ("timeout", Ok(secs)) => self.timeout = Some(Duration::from_secs(secs.into())),
            ("attempts", Ok(n)) => self.attempts = Some(n),
            _ => debug!(option = option, "Ignoring resolv.conf option"),
        }
    }
}

/// Nameserver lines carry a bare address; IPv6 may have a `%zone` suffix,
/// which is dropped.
fn parse_nameserver(field: &str) -> Option<NameServer> {
    let address = field.split('%').next()?;
    let ip = address.parse::<IpAddr>().ok()?;
    Some(NameServer::udp(SocketAddr::new(
        ip,
        ferrous_resolver_domain::name_server::DEFAULT_DNS_PORT,
    )))
}

pub struct ResolvConfReader {
    path: PathBuf,
}

impl ResolvConfReader {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_RESOLV_CONF),
        }
    }

    pub fn with_path(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub async fn read(&self) -> Result<ResolvConf, ConfigError> {
        let content = fs::read_to_string(&self.path).await.map_err(|e| {
            ConfigError::FileRead(self.path.display().to_string(), e.to_string())
        })?;

        let conf = ResolvConf::parse(&content);
        debug!(
            path = %self.path.display(),
            nameservers = conf.nameservers.len(),
            "Read resolv.conf"
        );
        Ok(conf)
    }
}

impl Default for ResolvConfReader {
    fn default() -> Self {
        Self::new()
    }
}
