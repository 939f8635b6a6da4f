//! Prints the suite registry as JSON.
//!
//! By default only suite names are printed, in registry order. `--full`
//! prints every descriptor. `--suites PATH` (or `SPECRUNNER_SUITES`) lists a
//! manifest instead of the compiled-in table, validating it on the way.

use anyhow::{Result, anyhow, bail};
use specrunner::SuiteRegistry;
use specrunner::config::ENV_SUITES;
use std::env;
use std::path::PathBuf;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse()?;
    let manifest = cli.suites.or_else(|| {
        env::var(ENV_SUITES)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
    });
    let registry = match &manifest {
        Some(path) => SuiteRegistry::load(path)?,
        None => SuiteRegistry::builtin()?,
    };

    let output = if cli.full {
        serde_json::to_string_pretty(&registry.iter().collect::<Vec<_>>())?
    } else {
        serde_json::to_string_pretty(&registry.list_names())?
    };
    println!("{output}");
    Ok(())
}

struct Cli {
    suites: Option<PathBuf>,
    full: bool,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args_os();
        let _program = args.next();
        let mut suites = None;
        let mut full = false;

        while let Some(arg) = args.next() {
            let arg_str = arg
                .to_str()
                .ok_or_else(|| anyhow!("invalid UTF-8 in argument"))?;
            match arg_str {
                "--suites" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--suites requires a value"))?;
                    let path = PathBuf::from(value);
                    if path.as_os_str().is_empty() {
                        bail!("--suites must not be empty");
                    }
                    suites = Some(path);
                }
                "--full" => full = true,
                "--help" | "-h" => usage(0),
                other => bail!("unknown argument: {other}"),
            }
        }

        Ok(Self { suites, full })
    }
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: list-suites [--suites PATH] [--full]\n\nOptions:\n  --suites PATH    Suite manifest to list (or set SPECRUNNER_SUITES; default: built-in suites).\n  --full           Print full descriptors instead of names.\n  --help           Show this help text."
    );
    std::process::exit(code);
}
