use anyhow::{Context, Result, bail};
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use specrunner::{AppState, SuiteDescriptor, SuiteName, SuiteRegistry, TeraRenderer, router};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::Arc;
use tower::ServiceExt;

pub struct Fetched {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: String,
}

pub fn descriptor(name: &str, sources: &[&str], specs: &[&str]) -> SuiteDescriptor {
    SuiteDescriptor {
        name: SuiteName(name.to_string()),
        template: None,
        sources: sources.iter().map(|s| s.to_string()).collect(),
        specs: specs.iter().map(|s| s.to_string()).collect(),
    }
}

/// Router over the given suites with the built-in layouts.
pub fn app(suites: Vec<SuiteDescriptor>, static_root: Option<&Path>) -> Router {
    let registry = SuiteRegistry::from_descriptors(suites).expect("valid fixture suites");
    let renderer = TeraRenderer::builtin("/static/").expect("builtin templates compile");
    let state =
        AppState::new(registry, Arc::new(renderer), static_root).expect("fixture state builds");
    router(state)
}

pub async fn get(app: Router, uri: &str) -> Fetched {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request builds");
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let (content_type, location) = {
        let header_value = |name: header::HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        (
            header_value(header::CONTENT_TYPE),
            header_value(header::LOCATION),
        )
    };
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body collects");
    Fetched {
        status,
        content_type,
        location,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}
