use clap::Parser;
use tracing_subscriber::EnvFilter;

use reviewlens::cli::{self, Cli, Commands, Context};
use reviewlens::config;
use reviewlens::errors::ReviewError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 if cli.quiet => "warn",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let result = dispatch(cli).await;

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = e.classify().exit_code;
            std::process::exit(exit_code);
        }
    }
}

async fn dispatch(cli: Cli) -> Result<(), ReviewError> {
    if let Commands::Validate = cli.command {
        let path = cli
            .config
            .ok_or_else(|| ReviewError::InvalidInput("validate requires --config FILE".into()))?;
        return handle_validate(&path).await;
    }

    let ctx = Context::load(&cli).await?;
    match cli.command {
        Commands::Stream(args) => cli::stream::handle_stream(args, &ctx).await,
        Commands::Replay(args) => cli::replay::handle_replay(args, &ctx).await,
        Commands::Analyze(args) => cli::analyze::handle_analyze(args, &ctx).await,
        Commands::Queue(args) => cli::queue::handle_queue(args, &ctx).await,
        Commands::Health => cli::health::handle_health(&ctx).await,
        Commands::Validate => Ok(()),
    }
}

async fn handle_validate(path: &str) -> Result<(), ReviewError> {
    let config = config::parse_config(std::path::Path::new(path)).await?;
    println!("Configuration is valid: {}", path);
    println!("  server: {}", config.base_url());
    println!("  output: {}", config.output_dir());
    Ok(())
}
