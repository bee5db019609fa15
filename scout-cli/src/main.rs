use anyhow::Result;
use clap::Parser;
use scout_cli::cli::{CacheAction, Cli, Commands};
use scout_cli::{ScoutConfig, Services, commands, serve};
use scout_telemetry::LogFormat;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = ScoutConfig::load(cli.config.as_deref())?;
    if let Some(format) = cli.log_format {
        config.telemetry.log_format = format;
    }
    init_logging(&config);

    let result = run(cli.command, config).await;
    scout_telemetry::shutdown_telemetry();
    result
}

fn init_logging(config: &ScoutConfig) {
    let format = config.telemetry.log_format.parse().unwrap_or_else(|e| {
        eprintln!("{e}, falling back to text");
        LogFormat::Text
    });
    let initialized = match &config.telemetry.otlp_endpoint {
        Some(endpoint) => scout_telemetry::init_with_otlp("idea-scout", format, endpoint),
        None => scout_telemetry::init_telemetry("idea-scout", format),
    };
    if let Err(e) = initialized {
        eprintln!("Failed to initialize telemetry: {}", e);
    }
}

async fn run(command: Commands, config: ScoutConfig) -> Result<()> {
    match command {
        Commands::Serve { port, cache_path } => serve::run_serve(config, port, cache_path).await,
        Commands::Warmup { queries } => {
            let services = Services::build(&config)?;
            let result = commands::run_warmup(&services.search, queries).await;
            services.shutdown().await;
            result
        }
        Commands::Cache { action } => {
            let services = Services::build(&config)?;
            match action {
                CacheAction::Stats => println!("{}", commands::cache_stats(&services.cache)?),
                CacheAction::Clear => {
                    let cleared = commands::cache_clear(&services.cache);
                    println!("Cleared {cleared} cache entries");
                }
                CacheAction::Export { output } => {
                    commands::cache_export(&services.cache, output.as_deref())?
                }
            }
            Ok(())
        }
        Commands::TestAgi => {
            let services = Services::build(&config)?;
            let result = commands::run_test_agi(&services.search).await;
            services.shutdown().await;
            result
        }
    }
}
