use clap::Parser;
use ferrous_resolver_domain::{CliOverrides, ResolverMode};
use ferrous_resolver_infrastructure::SourceBuilder;
use tracing::{debug, info};

mod bootstrap;
mod commands;

use commands::Command;

#[derive(Parser)]
#[command(name = "ferrous-resolve")]
#[command(version)]
#[command(about = "Ferrous Resolver - DNS lookups over the wire or through the host resolver")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Name server to query (repeatable): IP, IP:PORT, udp://… or tcp://…
    #[arg(short = 's', long = "server", value_name = "SERVER")]
    servers: Vec<String>,

    /// Per-attempt timeout in milliseconds
    #[arg(short = 't', long, value_name = "MS")]
    timeout: Option<u64>,

    /// Resolution mode (wire, host)
    #[arg(short = 'm', long)]
    mode: Option<ResolverMode>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        servers: (!cli.servers.is_empty()).then(|| cli.servers.clone()),
        query_timeout_ms: cli.timeout,
        mode: cli.mode,
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mode = %config.resolver.mode,
        "Starting Ferrous Resolver"
    );

    let resolver = SourceBuilder::new(config.resolver.clone())
        .build_resolver()
        .await?;
    let ctx = resolver.context();

    debug!(command = ?cli.command, source = resolver.source_name(), "Running lookup");

    for line in commands::run(&resolver, &ctx, &cli.command).await? {
        println!("{}", line);
    }

    Ok(())
}
