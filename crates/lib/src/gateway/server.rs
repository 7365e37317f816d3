//! Gateway HTTP server.

use crate::config::{Config, Settings};
use crate::gateway::error::ApiError;
use crate::outreach::{self, InboundOutcome};
use crate::provider::{ElksClient, Telephony};
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Shared state for the gateway handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub settings: Arc<Settings>,
    pub provider: Arc<dyn Telephony>,
    /// Port reported by the health endpoint.
    pub port: u16,
}

#[derive(Debug, Deserialize)]
struct RecipientParams {
    to: String,
}

/// Build the router. Static assets are served from `settings.static_dir` under `/static`.
pub fn router(state: GatewayState) -> Router {
    let static_dir = state.settings.static_dir.clone();
    Router::new()
        .route("/", get(health_http))
        .route("/sms/request", post(sms_request))
        .route("/sms/final", post(sms_final))
        .route("/sms/receive", post(sms_receive))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Resolve settings (fails fast on missing credentials), bind, and serve until SIGINT/SIGTERM.
pub async fn run_gateway(config: Config, config_path: PathBuf) -> Result<()> {
    let settings =
        Settings::resolve(&config, &config_path).context("resolving gateway settings")?;
    if !settings.static_dir.is_dir() {
        log::warn!(
            "static directory {} does not exist; call audio will not be served",
            settings.static_dir.display()
        );
    }
    log::info!(
        "provisioned number {}, public url {}",
        settings.number,
        settings.public_url
    );

    let provider = Arc::new(ElksClient::new(&settings));
    let state = GatewayState {
        settings: Arc::new(settings),
        provider,
        port: config.gateway.port,
    };
    let app = router(state);

    let bind_addr = format!("{}:{}", config.gateway.bind.trim(), config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("gateway listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("gateway server exited")?;
    log::info!("gateway stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<GatewayState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.port,
        "number": state.settings.number,
    }))
}

/// POST /sms/request?to= — ask the recipient for permission to call.
async fn sms_request(
    State(state): State<GatewayState>,
    Query(params): Query<RecipientParams>,
) -> Result<StatusCode, ApiError> {
    let res = outreach::send_permission_request(state.provider.as_ref(), &params.to).await?;
    log::info!("permission request sent to {}: {}", params.to, res.body);
    Ok(res.status)
}

/// POST /sms/final?to= — follow-up SMS. Also the hangup callback registered with each call;
/// the provider's callback body is ignored.
async fn sms_final(
    State(state): State<GatewayState>,
    Query(params): Query<RecipientParams>,
) -> Result<StatusCode, ApiError> {
    let res = outreach::send_final_nudge(state.provider.as_ref(), &params.to).await?;
    log::info!("final nudge sent to {}: {}", params.to, res.body);
    Ok(res.status)
}

/// POST /sms/receive — inbound SMS webhook. Success responses have an empty body, since the
/// provider would deliver any body back to the sender as a new SMS.
async fn sms_receive(State(state): State<GatewayState>, body: Bytes) -> Result<StatusCode, ApiError> {
    let settings = &state.settings;
    let outcome = outreach::receive_inbound(
        state.provider.as_ref(),
        &settings.number,
        &settings.public_url,
        &body,
    )
    .await?;
    if let InboundOutcome::CallFailed { ref to } = outcome {
        log::warn!("consent from {} not acted on: call failed", to);
    }
    Ok(StatusCode::OK)
}
