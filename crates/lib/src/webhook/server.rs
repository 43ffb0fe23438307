//! Webhook HTTP server: signed callback endpoint plus a health probe.

use crate::config::{self, Config};
use crate::line::{LineClient, WebhookPayload};
use crate::llm::OpenAiClient;
use crate::relay::{EventOutcome, Relay};
use crate::webhook::signature;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Shared state for the webhook server (channel secret + relay handler).
#[derive(Clone)]
struct AppState {
    channel_secret: Arc<String>,
    relay: Arc<Relay>,
    port: u16,
}

/// Run the webhook server; binds to config.server.bind:config.server.port.
/// Resolves the three secrets once at startup and fails when any is missing.
/// Blocks until shutdown (e.g. Ctrl+C).
pub async fn run_server(config: Config) -> Result<()> {
    let channel_secret = config::resolve_channel_secret(&config)
        .context("line.channelSecret (or LINE_CHANNEL_SECRET) is required")?;
    let access_token = config::resolve_channel_access_token(&config)
        .context("line.channelAccessToken (or LINE_CHANNEL_ACCESS_TOKEN) is required")?;
    let api_key = config::resolve_api_key(&config)
        .context("completion.apiKey (or OPENAI_API_KEY) is required")?;

    let line = LineClient::new(access_token, Some(config.line.api_base_url.clone()));
    let llm = OpenAiClient::new(api_key, Some(config.completion.base_url.clone()));
    let relay = Relay::new(
        llm,
        line,
        config.completion.model.clone(),
        config.completion.temperature,
        config.completion.persona.clone(),
    );

    let state = AppState {
        channel_secret: Arc::new(channel_secret),
        relay: Arc::new(relay),
        port: config.server.port,
    };

    let app = Router::new()
        .route("/", get(health_http))
        .route("/callback", post(callback))
        .with_state(state);

    let bind_addr = format!("{}:{}", config.server.bind.trim(), config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("webhook server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("webhook server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /callback — verifies X-Line-Signature against the raw body, parses the
/// event batch, and runs the relay for each event inline (the response is held
/// open for the duration of the outbound calls). Always returns 200 once
/// dispatch completes; reply-delivery failures are logged, not propagated,
/// so the platform does not re-deliver the batch.
async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let signature_header = headers
        .get("X-Line-Signature")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !signature::verify(&state.channel_secret, &body, signature_header) {
        log::warn!("webhook signature verification failed");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "invalid signature" })),
        ));
    }

    let payload: WebhookPayload = serde_json::from_slice(&body).map_err(|e| {
        log::warn!("webhook payload did not parse: {}", e);
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "message": "invalid payload" })),
        )
    })?;

    for event in &payload.events {
        match state.relay.handle_event(event).await {
            EventOutcome::Ignored => {}
            EventOutcome::Replied => {}
            EventOutcome::DeliveryFailed(e) => {
                log::warn!("reply delivery failed: {}", e);
            }
        }
    }

    Ok(Json(json!({ "message": "OK" })))
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "runtime": "running",
        "port": state.port,
    }))
}
