//! HTTP server.
//!
//! One axum [`Router`] serves the whole site:
//!
//! | Request | Handler |
//! |---------|---------|
//! | `GET <content_prefix>/*path` | [`content_handler`]: resolve inside the content root and stream the file |
//! | `GET /assets/style.css` | embedded stylesheet, prefixed with the configured palette |
//! | `GET /assets/progress.js` | embedded tracker script |
//! | `/` | page router |
//! | anything else | a file from the static root if one exists, otherwise the page router |
//!
//! A content request that doesn't resolve to a file, including one rejected
//! for traversal, falls through to the page router, which answers with the
//! 404 page. Traversal attempts are indistinguishable from missing files.
//!
//! Development and production share every handler. Mode only picks the
//! static root.

use crate::config::{ColorConfig, ServerConfig, generate_color_css};
use crate::course::{Course, CourseError};
use crate::pages::{self, CSS, PROGRESS_JS, PageContext, PageStatus};
use crate::resolve::{self, ResolveError};
use axum::{
    Router,
    body::Body,
    extract::State,
    handler::Handler,
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{Html, IntoResponse, Response},
    routing::{any, get},
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::io::ReaderStream;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Course error: {0}")]
    Course(#[from] CourseError),
    #[error("content root {path}: {source}")]
    ContentRoot {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

/// Immutable state shared by every handler.
#[derive(Debug)]
pub struct AppState {
    pub course: Course,
    /// Absolute directory the content prefix maps onto.
    pub content_root: PathBuf,
    pub content_prefix: String,
    pub static_root: PathBuf,
    /// Palette custom properties followed by the embedded stylesheet.
    pub stylesheet: String,
}

impl AppState {
    pub fn new(course: Course, content_root: PathBuf, static_root: PathBuf) -> Self {
        let defaults = ServerConfig::default();
        Self {
            course,
            content_root,
            content_prefix: defaults.content_prefix,
            static_root,
            stylesheet: stylesheet(&defaults.colors),
        }
    }

    pub fn with_content_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_prefix = prefix.into();
        self
    }

    pub fn with_colors(mut self, colors: &ColorConfig) -> Self {
        self.stylesheet = stylesheet(colors);
        self
    }

    /// Load the course and canonicalize the content root.
    pub fn from_config(config: &ServerConfig) -> Result<Self, ServerError> {
        let course = Course::load(config.course_file.as_deref().map(Path::new))?;
        let root = config.content_root_path();
        let content_root = std::fs::canonicalize(&root)
            .map_err(|source| ServerError::ContentRoot { path: root, source })?;
        Ok(Self::new(course, content_root, PathBuf::from(config.static_root()))
            .with_content_prefix(config.content_prefix.clone())
            .with_colors(&config.colors))
    }

    fn page_context(&self) -> PageContext<'_> {
        PageContext {
            course: &self.course,
            content_prefix: &self.content_prefix,
        }
    }
}

fn stylesheet(colors: &ColorConfig) -> String {
    format!("{}\n{}", generate_color_css(colors), CSS)
}

/// Build the site router.
pub fn app(state: Arc<AppState>) -> Router {
    let pages = page_handler.with_state(state.clone());
    let static_files = ServeDir::new(&state.static_root)
        .call_fallback_on_method_not_allowed(true)
        .fallback(pages);

    Router::new()
        .route(
            &format!("{}/{{*path}}", state.content_prefix),
            any(content_handler),
        )
        .route("/assets/style.css", get(style_handler))
        .route("/assets/progress.js", get(script_handler))
        .route("/", any(page_handler))
        .fallback_service(static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState::from_config(config)?);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!(
        mode = config.mode.as_str(),
        content_root = %state.content_root.display(),
        static_root = %state.static_root.display(),
        "Server running on http://localhost:{}/",
        config.port
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Serve a file from the content root, or fall through to the page router.
async fn content_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
) -> Response {
    let fall_through = || page_response(&state, uri.path());

    if method != Method::GET {
        return fall_through();
    }
    let Some(rest) = resolve::strip_prefix(&state.content_prefix, uri.path()) else {
        return fall_through();
    };

    match resolve::open(&state.content_root, rest).await {
        Ok((file, handle)) => {
            tracing::debug!(path = %file.path.display(), len = file.len, "serving content file");
            let headers = [
                (header::CONTENT_TYPE, HeaderValue::from_static(file.content_type)),
                (header::CONTENT_LENGTH, HeaderValue::from(file.len)),
            ];
            let body = Body::from_stream(ReaderStream::new(handle));
            (headers, body).into_response()
        }
        Err(ResolveError::Traversal) => {
            tracing::warn!(path = uri.path(), "rejected content path outside the root");
            fall_through()
        }
        Err(err) => {
            tracing::debug!(path = uri.path(), error = %err, "content path not servable");
            fall_through()
        }
    }
}

async fn style_handler(State(state): State<Arc<AppState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.clone(),
    )
        .into_response()
}

async fn script_handler() -> Response {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        PROGRESS_JS,
    )
        .into_response()
}

/// Page router. Only GET and HEAD render pages; other methods get the 404
/// page.
async fn page_handler(State(state): State<Arc<AppState>>, method: Method, uri: Uri) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return page_response(&state, "/404");
    }
    page_response(&state, uri.path())
}

fn page_response(state: &AppState, path: &str) -> Response {
    let page = pages::render_path(state.page_context(), path);
    (status_for(page.status), Html(page.markup.into_string())).into_response()
}

fn status_for(status: PageStatus) -> StatusCode {
    match status {
        PageStatus::Ok => StatusCode::OK,
        PageStatus::NotFound => StatusCode::NOT_FOUND,
        PageStatus::Error => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
