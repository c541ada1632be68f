use chain_info_gateway::api::ApiServer;
use chain_info_gateway::config::AppConfig;
use chain_info_gateway::logging::init_logging;
use clap::Parser;

#[derive(Parser)]
#[command(name = "chain-info-gateway")]
#[command(about = "HTTP gateway for account balances and contract event logs on Avalanche and Ethereum")]
#[command(version)]
struct Args {
    /// Configuration file (overrides CONFIG_FILE)
    #[arg(long)]
    config: Option<String>,

    /// Bind host (overrides config and HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides config and PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Print a configuration file with default values and exit
    #[arg(long, conflicts_with = "print_config")]
    sample_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.sample_config {
        print!("{}", AppConfig::generate_sample_config()?);
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_from_file()?,
    };
    config.apply_env_overrides()?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    init_logging(&config.logging)?;

    let server = ApiServer::from_config(&config)?;
    log::info!(
        "Serving events for contract {} on {}",
        config.contract.address,
        config.contract.network
    );

    if let Err(e) = server.start().await {
        log::error!("Server failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
