//! image-proxy: HTTP proxy for image search and generation APIs
//!
//! Keeps provider API keys on the server and exposes:
//! - `POST /api/unsplash`, `POST /api/pixabay`, `POST /api/runware`
//! - Per-IP rate limiting on `/api`
//! - The browser client's static files

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use image_proxy::{config::AppConfig, run_server};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Parser)]
#[command(name = "image-proxy")]
#[command(version)]
#[command(about = "HTTP proxy for image search and generation APIs")]
#[command(long_about = "
image-proxy forwards image search and generation requests from the browser
client to Unsplash, Pixabay and Runware, keeping API keys on the server.

Configuration is read from the environment (a .env file is loaded if present):
  UNSPLASH_API, PIXABAY_API, RUNWARE_API, RUNWARE_UUID, RUNWARE_MODEL, PORT

Example usage:
  image-proxy
  image-proxy run --port 8080 --static-dir ./public
  image-proxy --config config.yaml check-config
")]
struct Cli {
    /// Optional YAML config file; environment variables override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Set logging level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the proxy server (default)
    Run {
        /// Override listen port
        #[arg(short, long)]
        port: Option<u16>,
        /// Override listen address
        #[arg(long)]
        host: Option<String>,
        /// Override the static asset directory
        #[arg(long)]
        static_dir: Option<String>,
    },

    /// Validate configuration and print a summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level_filter = if let Some(level) = cli.log_level {
        level.to_string()
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
            .to_string()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&level_filter));
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match cli.command.unwrap_or(Commands::Run {
        port: None,
        host: None,
        static_dir: None,
    }) {
        Commands::Run {
            port,
            host,
            static_dir,
        } => {
            let mut config = load_config(cli.config.as_ref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(dir) = static_dir {
                config.assets.dir = dir;
            }
            config.validate()?;

            run_server(config)
                .await
                .map_err(|e| anyhow::anyhow!("server error: {}", e))?;
        }
        Commands::CheckConfig => check_config(cli.config.as_ref()),
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<AppConfig> {
    if let Some(path) = path {
        tracing::info!("Loading configuration from {:?}", path);
    }
    AppConfig::load(path.map(PathBuf::as_path)).context("Error loading configuration")
}

/// Validate configuration and print a summary
fn check_config(path: Option<&PathBuf>) {
    match AppConfig::load(path.map(PathBuf::as_path)) {
        Ok(config) => {
            let key_status = |key: &Option<String>| if key.is_some() { "configured" } else { "MISSING" };
            let providers = &config.providers;

            println!("✓ Configuration is valid\n");
            println!("Server:");
            println!("  Listen: {}:{}", config.server.host, config.server.port);
            println!("\nUpstream:");
            println!("  Timeout: {}s (connect {}s)", config.upstream.timeout_seconds, config.upstream.connect_timeout_seconds);
            println!("\nProviders:");
            println!("  Unsplash: {} (key {})", providers.unsplash.url, key_status(&providers.unsplash.api_key));
            println!("  Pixabay:  {} (key {})", providers.pixabay.url, key_status(&providers.pixabay.api_key));
            println!("  Runware:  {} (key {})", providers.runware.url, key_status(&providers.runware.api_key));
            println!("    Model: {}", providers.runware.model.as_deref().unwrap_or("MISSING"));
            println!(
                "    Task UUID: {}",
                providers.runware.task_uuid.as_deref().unwrap_or("generated per request")
            );
            println!("\nRate limit:");
            if config.rate_limit.enabled {
                println!(
                    "  {} requests / {}s per IP on /api",
                    config.rate_limit.max_requests, config.rate_limit.window_seconds
                );
            } else {
                println!("  disabled");
            }
            println!("\nAssets:");
            println!("  Directory: {}", config.assets.dir);
            println!("  Max age: {}s", config.assets.max_age_seconds);

            let missing = config.unconfigured_providers();
            if !missing.is_empty() {
                println!("\n⚠ Unconfigured providers: {}", missing.join(", "));
            }
        }
        Err(e) => {
            eprintln!("✗ Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}
