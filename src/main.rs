//! ipgate binary entry point.
//!
//! Runs the admission filter in front of a trivial origin handler. The
//! optional first argument is a TOML file with the filter configuration;
//! `IPGATE_LISTEN` overrides the listen address.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use ipgate::admission::{AdmissionConfig, AdmissionFilter};
use ipgate::gateway::{
    HttpResult, HttpServer, MiddlewareChain, Request, RequestHandler, Response,
};

/// Stand-in origin: answers 200 to everything the filter admits.
struct OriginHandler;

impl RequestHandler for OriginHandler {
    fn handle(&self, _request: &Request) -> HttpResult<Response> {
        Ok(Response::ok().text("ipgate: request admitted\n").build())
    }
}

fn load_config() -> AdmissionConfig {
    let Some(path) = std::env::args().nth(1) else {
        return AdmissionConfig::default();
    };

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            error!(path = %path, error = %e, "failed to read configuration file");
            std::process::exit(1);
        },
    };

    match AdmissionConfig::from_toml(&raw) {
        Ok(config) => {
            info!(path = %path, "configuration loaded");
            config
        },
        Err(e) => {
            error!(path = %path, error = %e, "failed to parse configuration");
            std::process::exit(1);
        },
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config();
    let listen =
        std::env::var("IPGATE_LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    let filter = match AdmissionFilter::new(config, "ipgate") {
        Ok(filter) => filter,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        },
    };

    let mut chain = MiddlewareChain::new();
    chain.add(Arc::new(filter));

    let server = HttpServer::new(chain, Arc::new(OriginHandler));
    info!(listen = %listen, "starting ipgate");

    if let Err(e) = server.run(&listen).await {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}
