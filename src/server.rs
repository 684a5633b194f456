use std::{net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::{middleware, Router};
use serde::Deserialize;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    decompression::RequestDecompressionLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use crate::{
    cli_args::CliArgs,
    error::ErrorVerbosity,
    middleware::{
        method_not_allowed::method_not_allowed, not_found::not_found,
        trace_response_body::trace_response_body,
    },
    route,
    state::ApiState,
    store::{in_memory::InMemoryStore, mongo::MongoStore, DocumentStore, StoreConfig},
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] serde_yaml::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    socket_address: SocketAddr,
    #[serde(default)]
    error_verbosity: ErrorVerbosity,
    store: StoreConfig,
}

impl ServerConfig {
    pub fn new(
        socket_address: SocketAddr,
        error_verbosity: ErrorVerbosity,
        store: StoreConfig,
    ) -> Self {
        Self {
            socket_address,
            error_verbosity,
            store,
        }
    }

    pub async fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::Read)?;

        serde_yaml::from_str(&content).map_err(ConfigError::Parse)
    }

    pub fn from_cli_args(args: &CliArgs) -> Self {
        let store = match args.in_memory {
            true => StoreConfig::InMemory,
            false => StoreConfig::Mongodb {
                uri: args.mongodb_uri.clone(),
                database: args.database.clone(),
            },
        };

        Self::new(
            SocketAddr::new(args.host, args.port),
            ErrorVerbosity::default(),
            store,
        )
    }
}

/// Builds the router with every route and middleware, ready to be served.
pub fn app(state: ApiState) -> Router {
    Router::new()
        .merge(route::app())
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            method_not_allowed::<ApiState>,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            trace_response_body,
        ))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
                )
                .layer(RequestDecompressionLayer::new())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
}

async fn connect_store(config: &StoreConfig) -> anyhow::Result<Arc<dyn DocumentStore>> {
    match config {
        StoreConfig::Mongodb { uri, database } => {
            tracing::info!(%database, "Using MongoDB store");

            let store = MongoStore::new(uri, database).await?;

            Ok(Arc::new(store))
        }
        StoreConfig::InMemory => {
            tracing::warn!("Using in-memory store, documents are lost on shutdown");

            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

/// Logs whether the store answers. Requests are served either way.
async fn check_store(store: Arc<dyn DocumentStore>) {
    match store.ping().await {
        Ok(()) => tracing::info!("Connected to store"),
        Err(err) => tracing::error!(%err, "Could not connect to store"),
    }
}

pub struct Server {
    config: ServerConfig,
}

impl Server {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let store = connect_store(&self.config.store).await?;

        tokio::spawn(check_store(store.clone()));

        let state = ApiState::new(self.config.error_verbosity, store);
        let app = app(state);

        tracing::info!(addr = %self.config.socket_address, "Starting server");

        let listener = TcpListener::bind(&self.config.socket_address)
            .await
            .context("Bind failed")?;

        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server failed")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install CTRL+C signal handler");

        tracing::info!("CTRL+C received");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM signal handler")
            .recv()
            .await;

        tracing::info!("SIGTERM received");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
