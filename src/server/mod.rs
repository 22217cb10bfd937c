//! Server-side rendering server

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::PostSummary;
use crate::helpers::url_for;
use crate::{Folio, Site};

/// Server state
struct ServerState {
    site: Arc<Site>,
    assets_dir: PathBuf,
}

/// Query string of the search endpoint and the blog page
#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Build the application router around a loaded site
pub fn router(site: Arc<Site>, assets_dir: PathBuf) -> Router {
    let root = site.config().root.clone();
    let state = Arc::new(ServerState { site, assets_dir });

    Router::new()
        .route(&url_for(&root, "api/search"), get(search_handler))
        .route(&url_for(&root, "search.json"), get(search_index_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Load the site and serve it until interrupted
pub async fn start(folio: &Folio, ip: &str, port: u16, open: bool) -> Result<()> {
    let site = Arc::new(folio.load_site()?);
    let app = router(site, folio.assets_dir.clone());

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, url_for(&folio.config.root, ""));
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Ranked post summaries for `?q=`
async fn search_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<SearchParams>,
) -> Json<Vec<PostSummary>> {
    let query = params.q.unwrap_or_default();
    Json(state.site.search(&query))
}

/// All post summaries, newest first
async fn search_index_handler(State(state): State<Arc<ServerState>>) -> Json<Vec<PostSummary>> {
    Json(state.site.search_index())
}

/// Render routed pages, then fall back to static assets, then 404
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();
    let query = Query::<SearchParams>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(params)| params.q);

    match state.site.render_path(&path, query.as_deref()) {
        Ok(Some(html)) => return Html(html).into_response(),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("Failed to render {}: {:#}", path, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response();
        }
    }

    // Assets live under the site root
    let root = state.site.config().root.trim_end_matches('/');
    if let Some(stripped) = path.strip_prefix(root).filter(|_| !root.is_empty()) {
        let rest = match request.uri().query() {
            Some(q) => format!("{}?{}", stripped, q),
            None => stripped.to_string(),
        };
        match rest.parse::<Uri>() {
            Ok(uri) => *request.uri_mut() = uri,
            Err(_) => return not_found(&state, &path),
        }
    }

    let mut service = ServeDir::new(&state.assets_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state, &path),
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!("Failed to serve {}: {}", path, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn not_found(state: &ServerState, path: &str) -> Response {
    match state.site.render_not_found(path) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render 404 page: {:#}", e);
            (StatusCode::NOT_FOUND, "Not found").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
