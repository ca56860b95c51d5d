//! tracesrv binary

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use common::logging::{self, LogConfig};
use tracing::{info, warn};

use tracesrv::bootstrap;
use tracesrv::Config;

#[derive(Parser, Debug)]
#[command(author, version, about = "tracesrv - traceability inventory service")]
struct Args {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long, value_name = "FILE", env = "TRACESRV_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Validate configuration and database connectivity
    Check,
    /// Register a user offline, e.g. the first admin
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Defaults to "user"
        #[arg(long)]
        role: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    // Held until exit so the file appender flushes
    let _log_guard = logging::init(&LogConfig {
        service_name: "tracesrv".to_string(),
        level: config.log.level.clone(),
        enable_json: config.log.json,
        log_dir: config.log.dir.as_ref().map(PathBuf::from),
    })?;

    info!("tracesrv v{}", env!("CARGO_PKG_VERSION"));
    if config.uses_dev_secret() {
        warn!("auth.jwt_secret is the built-in development secret; set TRACESRV_AUTH__JWT_SECRET");
    }

    match args.command.unwrap_or(Commands::Serve) {
        Commands::Serve => bootstrap::serve(config).await?,
        Commands::Check => {
            let report = bootstrap::check(&config).await?;
            println!("Configuration OK");
            println!("  listen:     {}", report.bind_addr);
            println!("  database:   {}", report.database);
            println!("  users:      {}", report.users);
            println!("  vegetables: {}", report.vegetables);
            if report.dev_secret {
                println!("  WARNING: development JWT secret in use");
            }
        },
        Commands::CreateUser {
            username,
            password,
            role,
        } => {
            let user = bootstrap::create_user(config, &username, &password, role.as_deref()).await?;
            println!("Created user {} (id {}, role {})", user.username, user.id, user.role);
        },
    }

    Ok(())
}
