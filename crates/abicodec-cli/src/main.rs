//! # abicodec-cli
//!
//! Command-line interface for the abicodec Solidity ABI codec.
//!
//! ## Usage
//!
//! ```bash
//! # Parameter blocks
//! abicodec encode --types uint256,string '[1, "hello"]'
//! abicodec decode --types int,bytes 0x...
//! abicodec selector 'transfer(address,uint256)'
//!
//! # Contract calls
//! abicodec call --abi token.json transfer '["0x...", 1000]'
//! abicodec call --abi token.json balanceOf '["0x..."]' --to 0x...
//! abicodec deploy --abi token.json --bytecode 0x6080... '[1000000]'
//!
//! # Event logs
//! abicodec filter --abi token.json Transfer '{"from": "0x..."}'
//! abicodec decode-log --abi token.json '{"topics": [...], "data": "0x..."}'
//! ```

use std::path::PathBuf;

use abicodec::Layout;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use config::Config;
pub use error::CliError;
pub use output::Output;

/// Solidity ABI codec
#[derive(Parser, Debug)]
#[command(name = "abicodec")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: ~/.abicodec/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// CLI commands
#[derive(Debug, Subcommand)]
enum Commands {
    /// Encode values as a parameter block
    Encode(commands::codec::EncodeArgs),
    /// Decode a parameter block
    Decode(commands::codec::DecodeArgs),
    /// Selector and event topic of a signature
    Selector(commands::codec::SelectorArgs),
    /// Encode a function call from a JSON ABI
    Call(commands::contract::CallArgs),
    /// Build contract deployment data
    Deploy(commands::contract::DeployArgs),
    /// Build an event log filter
    Filter(commands::event::FilterArgs),
    /// Decode an event log
    DecodeLog(commands::event::DecodeLogArgs),
    /// Show or edit configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
        /// Set the parameter layout (standard or legacy)
        #[arg(long)]
        set_layout: Option<Layout>,
        /// Fail on unresolved overloads instead of returning empty data
        #[arg(long)]
        set_strict: Option<bool>,
        /// Set the default log filter
        #[arg(long)]
        set_log_level: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = Config::load(cli.config.as_deref()).and_then(|mut config| {
        init_tracing(&config.log_level);
        tracing::debug!(?config, "Loaded configuration");

        match cli.command {
            Commands::Encode(args) => args.execute(&config, cli.json),
            Commands::Decode(args) => args.execute(&config, cli.json),
            Commands::Selector(args) => args.execute(cli.json),
            Commands::Call(args) => args.execute(&config, cli.json),
            Commands::Deploy(args) => args.execute(&config, cli.json),
            Commands::Filter(args) => args.execute(&config, cli.json),
            Commands::DecodeLog(args) => args.execute(&config, cli.json),
            Commands::Config {
                show,
                set_layout,
                set_strict,
                set_log_level,
            } => handle_config(
                &mut config,
                cli.config.as_deref(),
                show,
                ConfigEdits {
                    layout: set_layout,
                    strict: set_strict,
                    log_level: set_log_level,
                },
                cli.json,
            ),
        }
    });

    if let Err(e) = result {
        if cli.json {
            println!(
                "{}",
                serde_json::json!({
                    "error": e.to_string(),
                    "success": false
                })
            );
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays machine readable
fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

struct ConfigEdits {
    layout: Option<Layout>,
    strict: Option<bool>,
    log_level: Option<String>,
}

fn handle_config(
    config: &mut Config,
    path: Option<&std::path::Path>,
    show: bool,
    edits: ConfigEdits,
    json: bool,
) -> Result<(), CliError> {
    let mut modified = false;

    if let Some(layout) = edits.layout {
        config.codec.layout = layout;
        modified = true;
    }

    if let Some(strict) = edits.strict {
        config.codec.strict_overloads = strict;
        modified = true;
    }

    if let Some(level) = edits.log_level {
        EnvFilter::try_new(&level)
            .map_err(|e| CliError::InvalidInput(format!("log level {}: {}", level, e)))?;
        config.log_level = level;
        modified = true;
    }

    if modified {
        let saved = config.save(path)?;
        Output::new(json)
            .field("status", "saved")
            .field("path", &saved.display().to_string())
            .line(format!("Configuration saved to {}", saved.display()))
            .print();
    } else if show {
        Output::new(json)
            .field("log_level", &config.log_level)
            .field("layout", &config.codec.layout.to_string())
            .field_value("strict_overloads", config.codec.strict_overloads.into())
            .line(format!("Log level:        {}", config.log_level))
            .line(format!("Layout:           {}", config.codec.layout))
            .line(format!("Strict overloads: {}", config.codec.strict_overloads))
            .print();
    } else {
        Output::new(json)
            .line("Use --show to display config, or --set-layout/--set-strict/--set-log-level to modify")
            .print();
    }

    Ok(())
}
