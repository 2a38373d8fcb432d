use std::path::PathBuf;
use std::sync::Arc;

use cepfinder_core::{config::Config, error::CepError, race::RaceCoordinator, server};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about = "Resolve Brazilian postal codes by racing address providers", long_about = None)]
struct Cli {
    /// Config file (JSON or TOML). Built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Debug-level logs
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Race the providers once and print the winning address
    Lookup {
        cep: String,
        /// Print the full address as JSON instead of the descriptive line
        #[arg(long)]
        raw: bool,
    },
    /// Serve GET /ceps/{cep} over HTTP
    Serve {
        /// Overrides `server.bind` from the config
        #[arg(long)]
        bind: Option<String>,
    },
}

fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("cepfinder_core=debug,cepfinder=debug,info")
        } else {
            EnvFilter::new("cepfinder_core=info,cepfinder=info,warn")
        }
    });
    let fmt = tracing_subscriber::fmt::layer().with_target(false);
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt.json()).init();
    } else {
        registry.with(fmt.compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json);

    let cfg = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    let race = Arc::new(RaceCoordinator::from_config(&cfg)?);
    tracing::debug!(providers = ?race.provider_names(), deadline = ?race.deadline(), "race configured");

    match cli.command {
        Commands::Lookup { cep, raw } => match race.resolve(&cep).await {
            Ok(outcome) if raw => println!("{}", serde_json::to_string(&outcome.address)?),
            Ok(outcome) => println!("{}", outcome.address),
            Err(CepError::AllProvidersFailed { failures })
            | Err(CepError::DeadlineExceeded { failures, .. }) => {
                for f in &failures {
                    eprintln!("[{}] {}", f.provider, f.reason);
                }
                anyhow::bail!("no provider could resolve {cep}");
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or(cfg.server.bind);
            server::serve(race, &addr).await?;
        }
    }

    Ok(())
}
