use clap::{Parser, Subcommand};
use cookos::config::{Config, ConfigLoader};
use cookos::server::{self, AppState};
use std::path::PathBuf;
use tracing::{debug, error, trace};

/// Multi-agent kitchen assistant over WebSocket
#[derive(Parser)]
#[command(name = "cookos")]
#[command(about = "CookOS - plan, shop and cook with a crew of agents", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the WebSocket server (default command)
    Serve {
        /// Path to configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding config and environment
        #[arg(short = 'p', long)]
        port: Option<u16>,
    },
    /// Print the effective configuration with secrets redacted
    PrintConfig {
        /// Path to configuration file
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let (config_path, port) = match &cli.command {
        Some(Commands::Serve { config, port }) => (config.clone(), *port),
        Some(Commands::PrintConfig { config }) => (config.clone(), None),
        None => (None, None),
    };

    // Config is read before logging so `log_level` can drive the filter
    let config = match ConfigLoader::new(config_path).load().await {
        Ok(mut config) => {
            if let Some(port) = port {
                config.server.port = port;
            }
            config
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let log_level = match cli.verbose {
        0 => config.log_level().to_string(),
        1 => "debug".to_string(),
        2 => "trace".to_string(),
        _ => "trace,hyper=debug,tower=debug".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(log_level))
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .init();

    debug!("CookOS started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match cli.command {
        Some(Commands::PrintConfig { .. }) => print_config(&config),
        Some(Commands::Serve { .. }) | None => run_serve(config).await,
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    server::serve(&config, state).await?;
    Ok(())
}

fn print_config(config: &Config) -> anyhow::Result<()> {
    let rendered = toml::to_string_pretty(&config.redacted())?;
    print!("{rendered}");
    Ok(())
}
