use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use lobby_api::auth::AppStateInner;

const FALLBACK_SECRET: &str = "dev-secret-change-me";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "lobby_server=debug,lobby_api=debug,lobby_db=debug,tower_http=debug".into()
            }),
        )
        .init();

    // Config
    let session_secret = std::env::var("LOBBY_SECRET").unwrap_or_else(|_| {
        warn!("LOBBY_SECRET is unset; using the built-in development secret. Not for production.");
        FALLBACK_SECRET.into()
    });
    let db_path = std::env::var("LOBBY_DB_PATH").unwrap_or_else(|_| "contacts.db".into());
    let host = std::env::var("LOBBY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("LOBBY_PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()?;

    // Init database (schema is created idempotently)
    let db = lobby_db::Database::open(&PathBuf::from(&db_path))?;

    let state = Arc::new(AppStateInner { db, session_secret });

    let app = lobby_api::router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Lobby server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
