use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use client::{ApiClient, HttpMethod, RequestOptions};
use configs::ClientConfig;
use dotenvy::dotenv;
use storage::{JsonFileStore, TokenStore};
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "voting-cli", version, about = "Command-line client for the voting system API")]
struct Cli {
    /// Emit logs as JSON instead of compact text
    #[arg(long, global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Call an endpoint and print the JSON payload
    Call {
        /// Path appended to the base URL, e.g. /polls
        endpoint: String,
        #[arg(short = 'X', long, default_value = "GET")]
        method: String,
        /// Extra header as NAME:VALUE; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,
        /// Pre-serialized request body (ignored for GET)
        #[arg(short, long)]
        body: Option<String>,
        /// Send the stored token as a bearer credential
        #[arg(long)]
        auth: bool,
    },
    /// Manage the stored authentication token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Debug, Subcommand)]
enum TokenAction {
    Get,
    Set { token: String },
    Remove,
    Status,
}

fn init_logging(json: bool) {
    // .env may carry RUST_LOG and API_BASE_URL
    dotenv().ok();
    if json {
        common::utils::logging::init_logging_json();
    } else {
        common::utils::logging::init_logging_default();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.json_logs);

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let rendered = render_error(&e);
            error!(service = "voting-cli", event = "command_failed", error = %rendered, "command failed");
            eprintln!("{rendered}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let cfg = ClientConfig::load_and_validate().context("loading client configuration")?;
    info!(service = "voting-cli", event = "config_loaded", base_url = %cfg.api.base_url, "configuration loaded");

    let store = JsonFileStore::open(&cfg.storage.path)
        .await
        .with_context(|| format!("opening token store {}", cfg.storage.path))?;
    let tokens = TokenStore::with_key(store, cfg.storage.token_key.clone());

    match command {
        Command::Call { endpoint, method, headers, body, auth } => {
            let mut opts = request_options(&method, &headers, body)?;
            if auth {
                opts = opts.bearer_auth(&bearer_token(&tokens).await?);
            }

            let api = ApiClient::from_config(&cfg)?;
            let payload = api.call(&endpoint, opts).await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Token { action } => match action {
            TokenAction::Get => match tokens.get_auth_token().await {
                Some(token) => println!("{token}"),
                None => anyhow::bail!("no auth token stored"),
            },
            TokenAction::Set { token } => tokens.set_auth_token(&token).await?,
            TokenAction::Remove => {
                tokens.remove_auth_token().await?;
            }
            TokenAction::Status => {
                let authenticated = tokens.is_authenticated().await;
                println!("{}", if authenticated { "authenticated" } else { "not authenticated" });
            }
        },
    }
    Ok(())
}

// Full context chain, outermost first.
fn render_error(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

/// Stored token for `--auth`; an empty value does not count as a credential.
async fn bearer_token(tokens: &TokenStore) -> anyhow::Result<String> {
    match tokens.get_auth_token().await {
        Some(token) if !token.is_empty() => Ok(token),
        _ => anyhow::bail!("no auth token stored"),
    }
}

/// Build call options from `--method`, repeated `NAME:VALUE` headers and `--body`.
fn request_options(method: &str, headers: &[String], body: Option<String>) -> anyhow::Result<RequestOptions> {
    let mut opts = RequestOptions::new().method(method.parse::<HttpMethod>()?);
    for raw in headers {
        let (name, value) = raw
            .split_once(':')
            .with_context(|| format!("header {raw:?} must look like NAME:VALUE"))?;
        opts = opts.header(name.trim(), value.trim());
    }
    if let Some(body) = body {
        opts = opts.body(body);
    }
    Ok(opts)
}
