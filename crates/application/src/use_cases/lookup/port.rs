use ferrous_resolver_domain::service_ports;
use ferrous_resolver_domain::ResolveError;

/// Service name to port, from the built-in table. Never touches the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct PortLookupUseCase;

impl PortLookupUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&self, network: &str, service: &str) -> Result<u16, ResolveError> {
        service_ports::lookup_port(network, service)
    }
}
