//! Single-operator authentication server.
//!
//! Verifies the operator's credential pair against a configured reference
//! hash and issues stateless signed session tokens. No database: the token
//! is the session.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use ctrlc::set_handler;
use operator_auth::auth::{Authenticator, TokenIssuer, TokenVerifier, hash_password};
use pico_args::Arguments;

use oa_server::{api, config::ServerConfig, logging};

const HELP: &str = "\
Run the single-operator authentication server

USAGE:
  oa_server [OPTIONS]

OPTIONS:
  --bind           IP:PORT   Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:4000]
  --base-url       URL       Public origin used for redirects  [default: env BASE_URL or http://<bind>]
  --hash-password  PASSWORD  Print an Argon2 hash for AUTH_PASSWORD_HASH and exit

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  BASE_URL                 Public origin for post-login redirects
  AUTH_PASSWORD_HASH       Operator reference password hash (PHC string)
  AUTH_SECRET              Session token signing secret
  AUTH_MAX_AGE_SECS        Token lifetime in seconds  [default: 2592000]
  AUTH_UPDATE_AGE_SECS     Rolling refresh threshold in seconds  [default: 86400]
  (See .env file for all configuration options)
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    // Provisioning helper; runs without any configuration.
    if let Some(password) = pargs.opt_value_from_str::<_, String>("--hash-password")? {
        let hash =
            hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;
        println!("{hash}");
        return Ok(());
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let base_url_override: Option<String> = pargs.opt_value_from_str("--base-url")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let config = ServerConfig::from_env(bind_override, base_url_override)
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;

    // Unusable authentication material is fatal here, before a socket is
    // bound; there is no safe per-request fallback.
    let authenticator = Arc::new(Authenticator::new(&config.auth)?);
    let issuer = Arc::new(TokenIssuer::new(&config.auth)?);
    let verifier = Arc::new(TokenVerifier::new(&config.auth)?);

    tracing::info!(bind = %config.bind, base_url = %config.base_url, "Starting operator auth server");

    let state = api::AppState {
        authenticator,
        issuer,
        verifier,
        base_url: config.base_url.clone(),
    };

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", config.bind, e))?;

    tracing::info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
