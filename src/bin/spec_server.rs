//! Serves Jasmine spec-runner pages for the registered test suites.
//!
//! Configuration comes from `SPECRUNNER_*` variables, then the flags below.
//! Without `--suites` the compiled-in suite table is served; without
//! `--static-root` the checkout's `static/` directory is used when present.

use anyhow::{Context, Result, anyhow, bail};
use specrunner::config::{normalize_static_url, parse_bind};
use specrunner::{ServerConfig, apply_repo_defaults, serve};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = run().await {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let mut config = ServerConfig::from_env()?;
    Cli::parse()?.apply(&mut config)?;
    apply_repo_defaults(&mut config);
    serve(&config).await
}

#[derive(Default)]
struct Cli {
    bind: Option<String>,
    suites: Option<PathBuf>,
    static_root: Option<PathBuf>,
    templates: Option<PathBuf>,
    static_url: Option<String>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut cli = Cli::default();

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--bind" => cli.bind = Some(next_value("--bind", &mut args)?),
                "--suites" => cli.suites = Some(next_value("--suites", &mut args)?.into()),
                "--static-root" => {
                    cli.static_root = Some(next_value("--static-root", &mut args)?.into())
                }
                "--templates" => {
                    cli.templates = Some(next_value("--templates", &mut args)?.into())
                }
                "--static-url" => cli.static_url = Some(next_value("--static-url", &mut args)?),
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(cli)
    }

    fn apply(self, config: &mut ServerConfig) -> Result<()> {
        if let Some(raw) = self.bind {
            config.bind = parse_bind(&raw).with_context(|| format!("--bind {raw}"))?;
        }
        if let Some(path) = self.suites {
            config.suites = Some(path);
        }
        if let Some(path) = self.static_root {
            config.static_root = Some(path);
        }
        if let Some(path) = self.templates {
            config.templates = Some(path);
        }
        if let Some(raw) = self.static_url {
            config.static_url = normalize_static_url(&raw)?;
        }
        Ok(())
    }
}

fn next_value(flag: &str, args: &mut env::ArgsOs) -> Result<String> {
    let value = args
        .next()
        .ok_or_else(|| anyhow!("{flag} requires a value"))?
        .into_string()
        .map_err(|_| anyhow!("{flag} must be valid UTF-8"))?;
    if value.trim().is_empty() {
        bail!("{flag} must not be empty");
    }
    Ok(value)
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: spec-server [--bind ADDR] [--suites PATH] [--static-root DIR] [--templates DIR] [--static-url PREFIX]\n\nOptions:\n  --bind ADDR            Listen address (or set SPECRUNNER_BIND; default 127.0.0.1:8000).\n  --suites PATH          Suite manifest to serve (or set SPECRUNNER_SUITES; default: built-in suites).\n  --static-root DIR      Directory served under /static/ (or set SPECRUNNER_STATIC_ROOT).\n  --templates DIR        Template overrides (or set SPECRUNNER_TEMPLATES).\n  --static-url PREFIX    Prefix for source/spec URLs (or set SPECRUNNER_STATIC_URL; default /static/).\n  --help                 Show this help text."
    );
    std::process::exit(code);
}
