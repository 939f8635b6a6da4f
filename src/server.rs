//! HTTP surface.
//!
//! Routes:
//! - `GET /jasmine/` renders the suite index.
//! - `GET /jasmine/{name}` renders a suite's runner page, or 404.
//! - `GET /static/...` serves files from the configured static root.
//!
//! State is read-only after startup; handlers clone `Arc`s and never lock.

use crate::config::ServerConfig;
use crate::dispatch::{Dispatcher, SuiteNotFound, View};
use crate::render::{TemplateRenderer, TeraRenderer};
use crate::suite::SuiteRegistry;
use anyhow::{Context, Result, bail};
use axum::Router;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path as UrlPath, Request, State};
use axum::handler::HandlerWithoutStateExt;
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use percent_encoding::percent_decode_str;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::ServeDir;

const NOT_FOUND_BODY: &str = "<!DOCTYPE html>\n<html><head><title>Not Found</title></head>\
<body><h1>Not Found</h1><p>The requested resource was not found on this server.</p></body></html>\n";

#[derive(Clone)]
pub struct AppState {
    dispatcher: Dispatcher,
    renderer: Arc<dyn TemplateRenderer>,
    static_root: Option<Arc<PathBuf>>,
}

impl AppState {
    /// `static_root` must already exist; it is canonicalized here so the
    /// symlink check can compare prefixes.
    pub fn new(
        registry: SuiteRegistry,
        renderer: Arc<dyn TemplateRenderer>,
        static_root: Option<&Path>,
    ) -> Result<Self> {
        let static_root = match static_root {
            Some(root) => {
                let canonical = fs::canonicalize(root)
                    .with_context(|| format!("resolving static root {}", root.display()))?;
                if !canonical.is_dir() {
                    bail!("static root {} is not a directory", canonical.display());
                }
                Some(Arc::new(canonical))
            }
            None => None,
        };
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::new(registry)),
            renderer,
            static_root,
        })
    }

    /// Build registry, renderer, and static root from a resolved config.
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let registry = match &config.suites {
            Some(path) => SuiteRegistry::load(path)?,
            None => SuiteRegistry::builtin()?,
        };
        let renderer = match &config.templates {
            Some(dir) => TeraRenderer::with_template_dir(dir, &config.static_url)?,
            None => TeraRenderer::builtin(&config.static_url)?,
        };
        suites_with_missing_layouts(&registry, &renderer);
        Self::new(registry, Arc::new(renderer), config.static_root.as_deref())
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }
}

pub fn router(state: AppState) -> Router {
    let statics = static_routes(state.static_root.clone());
    Router::new()
        .route("/jasmine", get(|| async { Redirect::permanent("/jasmine/") }))
        .route("/jasmine/", get(suite_index))
        .route("/jasmine/{name}", get(suite_page))
        .nest_service("/static", statics)
        .fallback(not_found)
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    tracing::info!(
        suites = state.dispatcher().registry().len(),
        static_root = ?config.static_root,
        templates = ?config.templates,
        "suite registry ready"
    );

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("binding {}", config.bind))?;
    let local = listener.local_addr().context("reading bound address")?;
    tracing::info!("serving spec runners on http://{local}/jasmine/");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server failed")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("unable to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("received shutdown request");
}

async fn suite_index(State(state): State<AppState>) -> Response {
    respond(&state, "")
}

/// Segments that don't decode to UTF-8 can't name a suite, so they 404 too.
async fn suite_page(
    State(state): State<AppState>,
    name: Result<UrlPath<String>, PathRejection>,
) -> Response {
    match name {
        Ok(UrlPath(name)) => respond(&state, &name),
        Err(rejection) => {
            tracing::info!("unusable suite name in request: {rejection}");
            not_found_response()
        }
    }
}

fn respond(state: &AppState, requested: &str) -> Response {
    let view = match state.dispatcher.handle(requested) {
        Ok(view) => view,
        Err(err) => {
            tracing::info!(suite = %err.0, "{err}");
            return err.into_response();
        }
    };
    match render_view(state.renderer.as_ref(), &view) {
        Ok(html) => {
            tracing::debug!(suite = requested, template = %view.template(), "rendered page");
            Html(html).into_response()
        }
        Err(err) => {
            tracing::error!(suite = requested, "{err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "template rendering failed\n").into_response()
        }
    }
}

fn render_view(renderer: &dyn TemplateRenderer, view: &View) -> Result<String> {
    let context = view.context().context("serializing page context")?;
    renderer.render(view.template().as_str(), &context)
}

impl IntoResponse for SuiteNotFound {
    fn into_response(self) -> Response {
        not_found_response()
    }
}

async fn not_found() -> Response {
    not_found_response()
}

fn not_found_response() -> Response {
    (StatusCode::NOT_FOUND, Html(NOT_FOUND_BODY)).into_response()
}

/// Files under the static root, or a 404 for every path when none is set.
fn static_routes(root: Option<Arc<PathBuf>>) -> Router {
    let Some(root) = root else {
        return Router::new().fallback(not_found);
    };
    let files = ServeDir::new(root.as_path())
        .append_index_html_on_directories(false)
        .not_found_service(not_found.into_service());
    Router::new()
        .fallback_service(files)
        .layer(middleware::from_fn_with_state(root, confine_to_root))
}

/// Refuse requests whose target resolves outside the static root.
///
/// `ServeDir` already rejects `..` segments but follows symlinks, so a link
/// pointing outside the root is caught here.
async fn confine_to_root(
    State(root): State<Arc<PathBuf>>,
    request: Request,
    next: Next,
) -> Response {
    let candidate = {
        let decoded = percent_decode_str(request.uri().path()).decode_utf8_lossy();
        root.join(decoded.trim_start_matches('/'))
    };
    if let Ok(canonical) = tokio::fs::canonicalize(&candidate).await {
        if !canonical.starts_with(root.as_path()) {
            tracing::warn!(path = %request.uri().path(), "static request escapes root");
            return not_found_response();
        }
    }
    next.run(request).await
}

/// Suites whose layout is not loaded in `renderer`; each one is logged.
fn suites_with_missing_layouts(registry: &SuiteRegistry, renderer: &TeraRenderer) -> Vec<String> {
    let mut missing = Vec::new();
    for suite in registry.iter() {
        let template = suite.template();
        if !renderer.has_template(template.as_str()) {
            tracing::warn!(
                suite = %suite.name,
                template = %template,
                "suite layout is not loaded; its page will fail to render"
            );
            missing.push(suite.name.0.clone());
        }
    }
    missing
}
