//! Clementine API - cart, checkout, and order service.
//!
//! This binary serves the storefront-facing JSON API on port 3000.
//!
//! # Architecture
//!
//! - Axum on tokio
//! - `PostgreSQL` for carts, the order ledger, and the sale log
//! - Bearer tokens minted by the external credential service; this service
//!   only verifies them
//! - The catalog is read-only here; product writes belong to the catalog
//!   service

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::Duration;

use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, Response, header};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clementine_api::config::ApiConfig;
use clementine_api::state::AppState;
use clementine_api::{db, routes};

/// Initialize Sentry and the tracing subscriber.
///
/// The returned guard flushes pending Sentry events on drop, so it must live
/// for the whole process.
fn init_telemetry(config: &ApiConfig) -> Option<sentry::ClientInitGuard> {
    let guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: config.sentry_environment.clone().map(Into::into),
                sample_rate: config.sentry_sample_rate,
                traces_sample_rate: config.sentry_traces_sample_rate,
                attach_stacktrace: true,
                ..Default::default()
            },
        ))
    });

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "clementine_api=info,tower_http=debug".into());
    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    // JSON logs on Fly.io for the log shipper; human-readable locally.
    if std::env::var("FLY_APP_NAME").is_ok() {
        let json = tracing_subscriber::fmt::layer().json().flatten_event(true);
        subscriber.with(json).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer()).init();
    }

    if guard.is_some() {
        tracing::info!("Sentry error tracking enabled");
    }
    guard
}

/// Route tracing events into Sentry: errors and warnings become events,
/// info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    let level = *metadata.level();
    if level == tracing::Level::ERROR || level == tracing::Level::WARN {
        sentry_tracing::EventFilter::Event
    } else if level == tracing::Level::INFO || level == tracing::Level::DEBUG {
        sentry_tracing::EventFilter::Breadcrumb
    } else {
        sentry_tracing::EventFilter::Ignore
    }
}

/// Root span for one HTTP request. Status, latency, and request id start
/// empty and are recorded once known.
fn make_http_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        status = tracing::field::Empty,
        latency_ms = tracing::field::Empty,
        request_id = tracing::field::Empty,
    )
}

fn record_http_response(response: &Response<Body>, latency: Duration, span: &Span) {
    span.record("status", response.status().as_u16());
    span.record("latency_ms", latency.as_millis() as u64);
    DefaultOnResponse::default().on_response(response, latency, span);
}

/// CORS for browser clients: any localhost origin, credentials allowed.
///
/// Deployed frontends sit behind the same origin via the edge proxy, so
/// cross-origin requests only happen in local development.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            |origin: &HeaderValue, _: &axum::http::request::Parts| {
                origin.as_bytes().starts_with(b"http://localhost:")
                    || origin.as_bytes().starts_with(b"http://127.0.0.1:")
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() {
    let config = ApiConfig::from_env().expect("Failed to load configuration");

    // Sentry must come up before the subscriber so its layer can hook events.
    let _telemetry_guard = init_telemetry(&config);

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // Migrations are applied out of band: cargo run -p clementine-cli -- migrate
    let addr = config.socket_addr();
    let app = routes::app(AppState::new(config, pool))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(make_http_span)
                .on_response(record_http_response),
        )
        .layer(cors_layer())
        // Sentry layers go outermost so the hub and transaction cover the
        // whole request.
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!("api listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Resolves when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        signal(SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("Shutdown signal received, draining connections");
}
