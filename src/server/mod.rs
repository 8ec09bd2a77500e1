//! HTTP server: static files plus the dynamic listing and post routes

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::Page;
use crate::controllers::{DetailController, ListingController};
use crate::error::BlogError;
use crate::generator::{is_valid_slug, Generator};
use crate::helpers::{is_content_api_url, LOAD_MORE_ROUTE};
use crate::prismic::ContentClient;
use crate::Blog;

/// Server state
pub struct ServerState {
    blog: Blog,
    generator: Generator,
    client: Arc<dyn ContentClient>,
}

impl ServerState {
    pub fn new(blog: &Blog, client: Arc<dyn ContentClient>) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            generator: Generator::new(blog)?,
            client,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoadMoreParams {
    next: Option<String>,
}

/// Build the application router
pub fn router(state: Arc<ServerState>) -> Router {
    let post_route = format!(
        "/{}/:slug",
        state.blog.config.post_dir.trim_matches('/')
    );

    Router::new()
        .route("/", get(index_handler))
        .route(LOAD_MORE_ROUTE, get(load_more_handler))
        .route(&post_route, get(post_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let client: Arc<dyn ContentClient> = Arc::new(blog.client()?);
    let state = Arc::new(ServerState::new(blog, client)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve the generated listing, rendering it live when it was never generated
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let index = state.blog.public_dir.join("index.html");
    if let Ok(content) = tokio::fs::read_to_string(&index).await {
        return Html(content).into_response();
    }

    let rendered = match ListingController::load(&*state.client, &state.blog.config).await {
        Ok(listing) => listing.render(state.generator.pages()),
        Err(e) => Err(e),
    };
    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(&state, &e),
    }
}

/// Render the page behind a continuation URL
async fn load_more_handler(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<LoadMoreParams>,
) -> Response {
    let Some(next) = params.next.filter(|next| !next.is_empty()) else {
        return Redirect::to("/").into_response();
    };

    if !is_content_api_url(&state.blog.config, &next) {
        tracing::warn!("Rejected continuation URL outside the content API: {}", next);
        return error_page(&state, StatusCode::BAD_REQUEST, "Página inválida.");
    }

    let mut listing = ListingController::from_page(&*state.client, Page::new(Vec::new(), Some(next)));
    let rendered = match listing.load_more().await {
        Ok(_) => listing.render(state.generator.pages()),
        Err(e) => Err(e),
    };

    match rendered {
        Ok(html) => Html(html).into_response(),
        Err(e) => error_response(&state, &e),
    }
}

/// Serve a generated post, or fetch and generate it on first request
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    if !is_valid_slug(&slug) {
        return error_response(&state, &BlogError::not_found(&state.blog.config.document_type, &slug));
    }

    let output_path = state.generator.post_output_path(&slug);
    if let Ok(content) = tokio::fs::read_to_string(&output_path).await {
        return Html(content).into_response();
    }

    tracing::info!("Generating {} on demand", slug);
    let detail = DetailController::new(&*state.client, &state.blog.config);
    let post = match detail.load(&slug).await {
        Ok(post) => post,
        Err(e) => return error_response(&state, &e),
    };

    match state.generator.write_post(&post) {
        Ok(path) => match tokio::fs::read_to_string(&path).await {
            Ok(content) => Html(content).into_response(),
            Err(e) => error_response(&state, &BlogError::Io(e)),
        },
        Err(e) => {
            tracing::error!("Failed to generate {}: {:#}", slug, e);
            error_page(&state, StatusCode::INTERNAL_SERVER_ERROR, "Erro ao gerar a página.")
        }
    }
}

/// Serve static files from the public directory
async fn fallback_handler(State(state): State<Arc<ServerState>>, request: Request<Body>) -> Response {
    let mut service =
        ServeDir::new(&state.blog.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => {
            error_page(&state, StatusCode::NOT_FOUND, "Esta página não existe.")
        }
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Map a library error onto a status code and error page
fn error_response(state: &ServerState, error: &BlogError) -> Response {
    let (status, message) = match error {
        BlogError::NotFound { .. } => (StatusCode::NOT_FOUND, "Esta página não existe."),
        BlogError::TransientFetch(_) => (
            StatusCode::BAD_GATEWAY,
            "Não foi possível carregar mais posts. Tente novamente.",
        ),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao gerar a página."),
    };

    if status == StatusCode::NOT_FOUND {
        tracing::debug!("{}", error);
    } else {
        tracing::error!("{}", error);
    }
    error_page(state, status, message)
}

fn error_page(state: &ServerState, status: StatusCode, message: &str) -> Response {
    match state.generator.pages().render_error(status.as_u16(), message) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Failed to render error page: {}", e);
            (status, message.to_string()).into_response()
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
