pub mod host_resolver;
pub mod resolv_conf;

pub use host_resolver::HostRecordSource;
pub use resolv_conf::{ResolvConf, ResolvConfReader};
