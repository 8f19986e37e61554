//! The static company-intro site: one endpoint, one fixed fragment.

use std::net::SocketAddr;

use axum::{Router, response::Html, routing::get};
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lobby_intro=debug,tower_http=debug".into()),
        )
        .init();

    let host = std::env::var("INTRO_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("INTRO_PORT")
        .unwrap_or_else(|_| "3001".into())
        .parse()?;

    let app = Router::new()
        .route("/", get(company_intro))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!("Intro site listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn company_intro() -> Html<&'static str> {
    Html(
        "<h1>Welcome to Our Company</h1>\n\
         <p>We are a leading firm in our industry, committed to providing \
         top-notch services and products to our clients.</p>",
    )
}
