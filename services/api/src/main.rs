
use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
use compositor::GlyphSource;
use converters::{ConvertRequest, ConvertResponse, handle_convert};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState { glyphs: Arc<GlyphSource> }

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let glyphs = match std::env::var_os("FRAMECAP_FONT") {
        Some(path) => GlyphSource::from_file(std::path::Path::new(&path)).context("FRAMECAP_FONT")?,
        None => GlyphSource::system(),
    };
    let state = AppState { glyphs: Arc::new(glyphs) };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/convert", post(convert))
        .with_state(state);

    let addr = std::env::var("FRAMECAP_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());
    let listener = tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("bind {addr}"))?;
    tracing::info!("listening on http://{addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn convert(State(state): State<AppState>, Json(req): Json<ConvertRequest>) -> Result<Json<ConvertResponse>, (StatusCode, Json<serde_json::Value>)> {
    // decode/compose/encode are CPU bound
    let glyphs = Arc::clone(&state.glyphs);
    let joined = tokio::task::spawn_blocking(move || handle_convert(req, glyphs)).await;
    match joined {
        Ok(Ok(resp)) => Ok(Json(resp)),
        Ok(Err(e)) => {
            tracing::warn!("convert failed: {e:#}");
            Err((StatusCode::UNPROCESSABLE_ENTITY, Json(serde_json::json!({ "error": format!("{e:#}") }))))
        }
        Err(e) => {
            tracing::error!("convert task panicked: {e}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": "internal error" }))))
        }
    }
}
