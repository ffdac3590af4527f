use std::{net::SocketAddr, sync::Arc};

use api_types::Ack;
use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{categories, links, state, storage::Documents};

const BODY_LIMIT: usize = 1024 * 1024;
const BANNER: &str = "Local API server is running. Try GET /api/health or /api/state";

#[derive(Clone)]
pub struct ServerState {
    pub documents: Arc<Documents>,
}

#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub addr: SocketAddr,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 4000)),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
            ],
        }
    }
}

fn cors(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("ignoring invalid allowed origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn health() -> Json<Ack> {
    Json(Ack::OK)
}

/// The full router, ready to serve or to drive from tests.
pub fn app(documents: Documents, options: &ServerOptions) -> Router {
    let state = ServerState {
        documents: Arc::new(documents),
    };

    Router::new()
        .route("/", get(|| async { BANNER }))
        .route("/api/health", get(health))
        .route("/api/state", get(state::get).put(state::replace))
        .route(
            "/api/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/api/categories/{id}",
            axum::routing::put(categories::update).delete(categories::delete),
        )
        .route("/api/links", get(links::list).post(links::create))
        .route(
            "/api/links/{id}",
            axum::routing::put(links::update).delete(links::delete),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(cors(&options.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(documents: Documents, options: ServerOptions) {
    let listener = match tokio::net::TcpListener::bind(options.addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener on {}: {err}", options.addr);
            return;
        }
    };
    if let Err(err) = run_with_listener(documents, options, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    documents: Documents,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app(documents, &options)).await
}

pub fn spawn_with_listener(
    documents: Documents,
    options: ServerOptions,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(documents, options, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
