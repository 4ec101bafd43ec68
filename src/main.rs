//! prmend CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prmend::cli::{Cli, Commands};
use prmend::infrastructure::config::ConfigLoader;

fn init_tracing() {
    // RUST_LOG wins; otherwise fall back to the configured level. Commands
    // re-validate the config themselves, a broken file just means defaults.
    let config = ConfigLoader::load().unwrap_or_default();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => prmend::cli::commands::init::execute(args, cli.json).await,
        Commands::Run(args) => prmend::cli::commands::run::execute(args, cli.json).await,
        Commands::Resolve(args) => prmend::cli::commands::resolve::execute(args, cli.json).await,
        Commands::Status(args) => prmend::cli::commands::status::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        prmend::cli::handle_error(err, cli.json);
    }
}
