//! # Keyward - Gossip Keyring Coordinator
//!
//! Broadcasts one keyring command (install, use, remove, list) to every
//! communication pool in the cluster through the agent API, folds the
//! per-pool responses into a single verdict, and renders a per-pool
//! report.
//!
//! ## Flow
//! ```text
//! flags → encode → validate → dispatch → aggregate → report
//! ```

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod aggregate;
mod client;
mod command;
mod config;
mod dispatch;
mod policy;
mod report;

use client::HttpClusterClient;
use command::{ActionFlags, KeyringCommand};
use config::AppConfig;
use policy::RawOptions;
use report::KeyView;

/// Keyward - manage gossip-layer encryption keys across cluster pools
#[derive(Parser, Debug)]
#[command(name = "keyward")]
#[command(author, version, about, long_about = LONG_ABOUT)]
pub struct Args {
    /// Install a new encryption key, broadcasting it to all members in
    /// the cluster
    #[arg(long, value_name = "KEY")]
    install: Option<String>,

    /// Change the primary encryption key used to encrypt messages; the
    /// key must already be installed before this operation can succeed
    #[arg(long = "use", value_name = "KEY")]
    use_key: Option<String>,

    /// Remove the given key from the cluster; only keys that are not
    /// currently the primary key may be removed
    #[arg(long, value_name = "KEY")]
    remove: Option<String>,

    /// List all keys currently in use within the cluster
    #[arg(long)]
    list: bool,

    /// List all primary keys currently in use within the cluster
    #[arg(long)]
    list_primary: bool,

    /// Relay responses to the operation through this many randomly-chosen
    /// other nodes; the maximum allowed value is 5
    #[arg(long, default_value = "0", value_name = "N", allow_negative_numbers = true)]
    relay_factor: i64,

    /// Restrict the query to pools local to this site, suppressing
    /// wide-area traffic; only valid with the list flags
    #[arg(long)]
    local_only: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "config/keyward.toml")]
    config: String,

    /// Cluster agent HTTP address (overrides config)
    #[arg(long, env = "KEYWARD_HTTP_ADDR")]
    http_addr: Option<String>,

    /// API token (overrides config)
    #[arg(long, env = "KEYWARD_TOKEN")]
    token: Option<String>,

    /// Overall request deadline in seconds (overrides config)
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "LOG_LEVEL")]
    log_level: String,

    /// Enable JSON logging output
    #[arg(long, default_value = "false")]
    json_logs: bool,
}

const LONG_ABOUT: &str = "\
Manages encryption keys used for gossip messages. This command may be used
to examine active encryption keys in the cluster, add new keys, and remove
old ones. Combined, this provides cluster-wide key rotation without
disrupting the cluster.

Mutating operations affect both the LAN and WAN keyrings in lock-step and
therefore cannot be restricted to local pools.

All variations return 0 if every pool replies and no node reports an
error. If any pool fails to reply or any node reports failure, the exit
code is 1.";

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_level, args.json_logs) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    std::process::exit(run(args).await);
}

/// One invocation: encode, validate, dispatch, aggregate, report
async fn run(args: Args) -> i32 {
    let flags = ActionFlags {
        install: args.install.clone(),
        use_key: args.use_key.clone(),
        remove: args.remove.clone(),
        list: args.list,
        list_primary: args.list_primary,
    };

    let cmd = match KeyringCommand::from_flags(&flags) {
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let raw = RawOptions {
        relay_factor: args.relay_factor,
        local_only: args.local_only,
    };
    let opts = match policy::validate(&raw, &cmd) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let config = match AppConfig::load(&args.config, &args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return 1;
        }
    };

    let client = match HttpClusterClient::new(&config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error connecting to cluster agent: {}", e);
            return 1;
        }
    };

    println!("==> {}", cmd.describe());

    let pools = match dispatch::dispatch(&client, &cmd, &opts).await {
        Ok(pools) => pools,
        Err(e) => {
            eprintln!("error: {}", e);
            return 1;
        }
    };

    let result = aggregate::fold(pools);

    let view = match cmd {
        KeyringCommand::List => KeyView::Installed,
        KeyringCommand::ListPrimary => KeyView::Primary,
        _ => KeyView::None,
    };
    let text = report::render(&result, view);
    if !text.is_empty() {
        println!("{}", text);
    }

    if result.is_success() {
        0
    } else {
        eprintln!("error: one or more pools reported failures");
        1
    }
}

/// Initialize structured logging with tracing
///
/// Diagnostics go to stderr; stdout carries only the rendered report.
fn init_logging(level: &str, json: bool) -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
