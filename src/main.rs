//! Transcript Relay - a web shell for cleaning transcripts.
//!
//! This binary starts the HTTP server and wires up the external
//! collaborators (processing worker, identity provider) from configuration.

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transcript_relay::{
    config::Config,
    identity::HttpIdentityProvider,
    relay::RelayService,
    server::{create_router, AppState, RouterConfig},
    worker::HttpWorkerClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("transcript-relay v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");

    // Worker status with warning if unconfigured
    let relay = match (&config.worker_url, &config.worker_secret) {
        (Some(url), Some(secret)) => {
            info!("  Worker: {}", url);
            Some(RelayService::new(HttpWorkerClient::new(url, secret)))
        }
        _ => {
            warn!("  Worker: NOT CONFIGURED - /api/process will answer server_misconfigured");
            warn!("          Set --worker-url/--worker-secret or RELAY_WORKER_URL/RELAY_WORKER_SECRET");
            None
        }
    };

    // Identity provider status with warning if unconfigured
    let identity = match (&config.identity_url, &config.identity_api_key) {
        (Some(url), Some(api_key)) => {
            info!("  Identity provider: {}", url);
            Some(HttpIdentityProvider::new(url, api_key))
        }
        _ => {
            warn!("  Identity provider: NOT CONFIGURED - auth routes will answer server_misconfigured");
            warn!("          Set --identity-url/--identity-api-key or RELAY_IDENTITY_URL/RELAY_IDENTITY_API_KEY");
            None
        }
    };

    info!(
        "  Upload cap: {:.1} MB",
        config.max_upload_bytes as f64 / (1024.0 * 1024.0)
    );

    // Build router
    let state = AppState::new(relay, identity);
    let router = create_router(state, build_router_config(&config));

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Try these endpoints:");
    info!("    curl http://{}/health", addr);
    info!("");
    info!("  Open the app in your browser:");
    info!("    open http://{}/", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "transcript_relay=debug,tower_http=debug"
    } else {
        "transcript_relay=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application Config.
fn build_router_config(config: &Config) -> RouterConfig {
    let mut router_config =
        RouterConfig::new().with_max_upload_bytes(config.max_upload_bytes);

    // Apply CORS origins
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Apply tracing setting
    router_config = router_config.with_tracing(!config.no_tracing);

    router_config
}
