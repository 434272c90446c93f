/*
 * Responsibility
 * - Process bootstrap: tracing, panic hook, config, state, router, listener
 */
use std::{panic, process, sync::Arc};

use anyhow::Context;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{cors, http, security_headers};
use crate::services::content::{ContentStore, HttpContentStore};
use crate::services::session::JwtSessionResolver;
use crate::services::webhook::SignatureValidator;
use crate::state::{AppState, GateSettings};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,campus_portal_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched).
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice
        // immediately. In production, prefer the default behavior.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> anyhow::Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting portal API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving")?;

    Ok(())
}

fn build_state(config: &Config) -> anyhow::Result<AppState> {
    let content = HttpContentStore::new(config).context("building content API client")?;
    tracing::info!(backend = content.backend_name(), "content store configured");

    let sessions = JwtSessionResolver::new(
        &config.session_jwt_public_key_pem,
        &config.session_issuer,
        &config.session_audience,
        config.session_leeway_seconds,
    )
    .context("building session resolver")?;

    let gate = GateSettings {
        protected_prefixes: config.protected_prefixes.clone(),
        role_lookup_timeout: config.role_lookup_timeout,
    };

    let webhook_signatures = SignatureValidator::new(config.webhook_secret.clone());

    Ok(AppState::new(
        Arc::new(content),
        Arc::new(sessions),
        gate,
        webhook_signatures,
    ))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone()).with_state(state);

    let router = cors::apply(router, config);
    let router = http::apply(router, config);
    security_headers::apply(router)
}
