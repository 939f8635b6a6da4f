//! Shared library for the spec-runner server.
//!
//! The crate serves Jasmine spec-runner pages for a fixed registry of test
//! suites: `suite` holds the registry, `dispatch` maps a requested name to a
//! view, `render` turns views into HTML, and `server` exposes them over HTTP.
//! Repository discovery lives here so both binaries find `static/` the same
//! way.

use anyhow::{Result, bail};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub mod config;
pub mod dispatch;
pub mod render;
mod schema_loader;
pub mod server;
pub mod suite;

pub use config::ServerConfig;
pub use dispatch::{DetailPage, Dispatcher, IndexPage, SuiteNotFound, View};
pub use render::{DEFAULT_STATIC_URL, TemplateRenderer, TeraRenderer};
pub use server::{AppState, router, serve};
pub use suite::{
    BUILTIN_SUITES, DEFAULT_DETAIL_TEMPLATE, INDEX_TEMPLATE, SuiteDescriptor, SuiteName,
    SuiteRegistry, TemplateId,
};

const ROOT_SENTINEL: &str = "schema/suite_manifest.schema.json";
const MANIFEST: &str = "Cargo.toml";
const STATIC_DIR: &str = "static";
const DEFAULT_MANIFEST_PATH: &str = "suites/suites.json";

/// Returns true when `candidate` looks like the repository root.
fn is_repo_root(candidate: &Path) -> bool {
    candidate.join(ROOT_SENTINEL).is_file() && candidate.join(MANIFEST).is_file()
}

/// Verifies that an explicit `SPECRUNNER_ROOT` hint points at a valid repo.
fn repo_root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_repo_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_repo_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the repository root.
///
/// Honors `SPECRUNNER_ROOT` if it points at a real checkout, then climbs up
/// from the current executable, then falls back to the path recorded by
/// `build.rs`.
pub fn find_repo_root() -> Result<PathBuf> {
    if let Ok(env_root) = env::var("SPECRUNNER_ROOT") {
        if let Some(root) = repo_root_from_hint(&env_root) {
            return Ok(root);
        }
    }

    if let Ok(exe_path) = env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if let Some(root) = search_upwards(exe_dir) {
                return Ok(root);
            }
        }
    }

    if let Some(hint) = option_env!("SPECRUNNER_ROOT_HINT") {
        if let Some(root) = repo_root_from_hint(hint) {
            return Ok(root);
        }
    }

    bail!("Unable to locate the specrunner checkout. Set SPECRUNNER_ROOT to the repository.");
}

/// `<repo>/static` when it exists.
pub fn default_static_root(repo_root: &Path) -> Option<PathBuf> {
    let candidate = repo_root.join(STATIC_DIR);
    candidate.is_dir().then_some(candidate)
}

/// `<repo>/suites/suites.json`, the manifest shipped with the checkout.
pub fn default_manifest_path(repo_root: &Path) -> PathBuf {
    repo_root.join(DEFAULT_MANIFEST_PATH)
}

/// Fill `static_root` from the checkout when neither env nor flags set it.
///
/// A missing checkout is not an error: the server still runs, it just has
/// nothing to serve under `/static/`.
pub fn apply_repo_defaults(config: &mut ServerConfig) {
    if config.static_root.is_some() {
        return;
    }
    match find_repo_root() {
        Ok(root) => {
            config.static_root = default_static_root(&root);
            if config.static_root.is_none() {
                tracing::debug!(repo = %root.display(), "checkout has no static/ directory");
            }
        }
        Err(err) => tracing::debug!("{err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_checkout() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("schema")).unwrap();
        fs::write(dir.path().join(ROOT_SENTINEL), "{}").unwrap();
        fs::write(dir.path().join(MANIFEST), "[package]\n").unwrap();
        dir
    }

    #[test]
    fn sentinel_files_identify_a_checkout() {
        let checkout = fake_checkout();
        assert!(is_repo_root(checkout.path()));
        let nested = checkout.path().join("target/debug");
        fs::create_dir_all(&nested).unwrap();
        assert!(!is_repo_root(&nested));
        assert_eq!(
            search_upwards(&nested).unwrap(),
            fs::canonicalize(checkout.path()).unwrap()
        );
    }

    #[test]
    fn hints_must_point_at_a_checkout() {
        let checkout = fake_checkout();
        let unrelated = TempDir::new().unwrap();
        assert!(repo_root_from_hint("").is_none());
        assert!(repo_root_from_hint(unrelated.path().to_str().unwrap()).is_none());
        assert!(repo_root_from_hint(checkout.path().to_str().unwrap()).is_some());
    }

    #[test]
    fn static_root_defaults_only_when_present() {
        let checkout = fake_checkout();
        assert!(default_static_root(checkout.path()).is_none());
        fs::create_dir_all(checkout.path().join(STATIC_DIR)).unwrap();
        assert_eq!(
            default_static_root(checkout.path()),
            Some(checkout.path().join(STATIC_DIR))
        );
    }

    #[test]
    fn explicit_static_root_is_not_replaced() {
        let mut config = ServerConfig {
            static_root: Some(PathBuf::from("/srv/static")),
            ..ServerConfig::default()
        };
        apply_repo_defaults(&mut config);
        assert_eq!(config.static_root, Some(PathBuf::from("/srv/static")));
    }

    #[test]
    fn shipped_manifest_matches_builtin_table() {
        let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let from_disk = SuiteRegistry::load(&default_manifest_path(&root)).unwrap();
        let builtin = SuiteRegistry::builtin().unwrap();
        assert_eq!(
            from_disk.iter().collect::<Vec<_>>(),
            builtin.iter().collect::<Vec<_>>()
        );
    }
}
