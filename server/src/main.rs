mod config;
mod handlers;
mod routes;
mod state;

use axum::http::{header, HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use routes::api::app;
use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    let state = AppState::new(&config).expect("failed to build http clients");

    let cors = match &config.client_url {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<HeaderValue>()
                    .expect("CLIENT_URL must be a valid origin"),
            )
            .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let router = app(state).layer(cors);

    let addr = format!("0.0.0.0:{}", config.port);
    info!(%addr, model = %config.ollama_model, upstream = %config.ollama_url, "listening");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");
    axum::serve(listener, router).await.expect("server error");
}
