//! distlog CLI
//!
//! Thin wrapper around distlog-core for shell scripts and launchers.
//!
//! ## Usage
//!
//! ```bash
//! # Log a line through the "job" logger
//! distlog emit "preprocessing done"
//!
//! # Multi-line payload at warning level, only on rank 0
//! RANK=0 WORLD_SIZE=4 distlog emit --level warning --rank-zero $'a\nb'
//!
//! # Write files under ./logs
//! distlog --log-dir ./logs emit --name stage2 "started"
//!
//! # Show what the environment resolves to
//! distlog config
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use distlog_core::logging::{LogConfig, LogRegistry, Threshold};
use distlog_core::rank::{log_rank_0, DistributedContext, EnvContext};
use distlog_core::Level;
use tracing_subscriber::EnvFilter;

/// distlog - process-wide logging for distributed jobs
#[derive(Parser)]
#[command(name = "distlog")]
#[command(version)]
#[command(about = "Emit aligned, rank-aware log lines")]
struct Cli {
    /// Show internal diagnostics on stderr (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log directory (overrides DISTLOG_LOG_DIR)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Minimum level (overrides DISTLOG_LOG_LEVEL)
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log one message
    Emit {
        /// Logger name
        #[arg(short, long, default_value = "job")]
        name: String,

        /// Level of the message
        #[arg(short, long, default_value = "info", value_parser = parse_level)]
        level: Level,

        /// Only write on rank 0 (RANK / WORLD_SIZE from the environment)
        #[arg(long)]
        rank_zero: bool,

        /// Message text; may contain newlines
        message: String,
    },

    /// Print the resolved configuration
    Config,
}

fn parse_level(s: &str) -> Result<Level, String> {
    s.parse::<Level>().map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("distlog_core=debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut config = LogConfig::from_env();
    if let Some(dir) = cli.log_dir {
        config = config.with_log_dir(dir);
    }
    if let Some(level) = cli.log_level {
        config = config.with_threshold(Threshold::at_least(level));
    }

    match cli.command {
        Commands::Emit {
            name,
            level,
            rank_zero,
            message,
        } => {
            let registry = LogRegistry::new(config).context("Failed to set up logging")?;
            let logger = registry.get_logger(&name)?;

            if rank_zero {
                let ctx = EnvContext::from_env();
                let emitted = log_rank_0(&ctx, &logger, level, message)?;
                tracing::debug!(rank = ctx.rank(), emitted, "rank-gated emit");
            } else {
                logger.log(level, message)?;
            }
            registry.flush()?;
        }

        Commands::Config => {
            let pid = std::process::id();
            println!("threshold:    {}", config.threshold);
            match &config.log_dir {
                Some(dir) => {
                    println!("log dir:      {}", dir.display());
                    if let Some(shared) = config.shared_log_path() {
                        println!("shared file:  {}", shared.display());
                    }
                    if let Some(process) = config.process_log_path(pid) {
                        println!("process file: {}", process.display());
                    }
                }
                None => println!("log dir:      (console only)"),
            }

            let ctx = EnvContext::from_env();
            match ctx.world_size() {
                Some(world_size) => println!("rank:         {} of {}", ctx.rank(), world_size),
                None => println!("rank:         (not distributed)"),
            }
        }
    }

    Ok(())
}
