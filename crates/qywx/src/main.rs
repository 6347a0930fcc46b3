// SPDX-FileCopyrightText: 2026 Qywx Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line client for the enterprise messaging API.

mod call;
mod check;

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use clap::{Parser, Subcommand, ValueEnum};
use qywx_config::QywxConfig;
use qywx_security::RedactingWriter;

/// qywx - enterprise messaging API client.
#[derive(Parser, Debug)]
#[command(name = "qywx", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the standard hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate configuration and list the configured principals.
    Check,
    /// Fetch a fresh token for a principal.
    Token {
        #[command(flatten)]
        principal: PrincipalArgs,
        /// Print the token value instead of a redacted placeholder.
        #[arg(long)]
        show: bool,
    },
    /// Call an API path with the principal's token attached.
    Call {
        /// HTTP method, e.g. GET or POST.
        method: String,
        /// API path, e.g. /cgi-bin/user/get.
        path: String,
        /// Query parameter as key=value. May be repeated.
        #[arg(long = "query", short = 'q')]
        query: Vec<String>,
        /// JSON request body.
        #[arg(long)]
        json: Option<String>,
        #[command(flatten)]
        principal: PrincipalArgs,
    },
    /// Compute a callback signature.
    Sign {
        #[arg(long)]
        token: String,
        #[arg(long)]
        timestamp: String,
        #[arg(long)]
        nonce: String,
        #[arg(long)]
        encrypt: String,
    },
}

/// Which principal's credentials to use.
#[derive(clap::Args, Debug)]
struct PrincipalArgs {
    #[arg(long, value_enum, default_value_t = Principal::Corp)]
    principal: Principal,
    /// Authorizing corp id, for `--principal authorized-corp`.
    #[arg(long)]
    auth_corp_id: Option<String>,
    /// Permanent code issued at authorization, for `--principal authorized-corp`.
    #[arg(long)]
    permanent_code: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Principal {
    Corp,
    Suite,
    AuthorizedCorp,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    let result = match cli.command {
        Some(Commands::Check) => {
            check::run_check(&startup(config_path));
            Ok(())
        }
        Some(Commands::Token { principal, show }) => {
            call::run_token(&startup(config_path), &principal, show).await
        }
        Some(Commands::Call {
            method,
            path,
            query,
            json,
            principal,
        }) => {
            let config = startup(config_path);
            call::run_call(&config, &principal, &method, &path, &query, json).await
        }
        Some(Commands::Sign {
            token,
            timestamp,
            nonce,
            encrypt,
        }) => {
            println!(
                "{}",
                qywx_callback::signature::sign(&token, &timestamp, &nonce, &encrypt)
            );
            Ok(())
        }
        None => {
            println!("qywx: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Loads and validates configuration, exiting with rendered diagnostics on
/// failure, then installs logging and metric descriptions.
fn startup(path: Option<&Path>) -> QywxConfig {
    let loaded = match path {
        Some(path) => qywx_config::load_and_validate_path(path),
        None => qywx_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            qywx_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    qywx_core::recording::register_metrics();
    config
}

/// Initialize the tracing subscriber. Every line passes through a
/// [`RedactingWriter`] loaded with the configured secrets.
fn init_tracing(config: &QywxConfig) {
    use tracing_subscriber::EnvFilter;

    let log_level = &config.log.level;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("qywx={log_level},warn")));

    let secrets = Arc::new(RwLock::new(Vec::new()));
    for secret in qywx::wiring::secrets(config) {
        RedactingWriter::<std::io::Stderr>::add_secret(&secrets, secret);
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(move || RedactingWriter::new(std::io::stderr(), Arc::clone(&secrets)))
        .init();
}
