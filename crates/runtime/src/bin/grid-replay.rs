//! Plays a scenario file with actions from the command line.
//!
//! ```text
//! grid-replay <scenario.ron> [--config <session.ron>] [--save-log <actions.bin>] [ACTION...]
//! ```
//!
//! Prints one JSON observation per executed action and the final snapshot
//! fingerprint. Unknown action names are skipped with a warning. Logs go to
//! stderr, filtered by `RUST_LOG`.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use grid_core::{GameError, Registry};
use grid_runtime::{Scenario, Session, SessionConfig};

struct Args {
    scenario: PathBuf,
    config: Option<PathBuf>,
    save_log: Option<PathBuf>,
    actions: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut args = std::env::args().skip(1);
    let Some(scenario) = args.next() else {
        bail!("usage: grid-replay <scenario.ron> [--config <path>] [--save-log <path>] [ACTION...]");
    };

    let mut parsed = Args {
        scenario: PathBuf::from(scenario),
        config: None,
        save_log: None,
        actions: Vec::new(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(args.next().context("--config needs a path")?.into()),
            "--save-log" => {
                parsed.save_log = Some(args.next().context("--save-log needs a path")?.into())
            }
            _ => parsed.actions.push(arg),
        }
    }
    Ok(parsed)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };

    let scenario = Scenario::load_from_file(&args.scenario)
        .with_context(|| format!("loading {}", args.scenario.display()))?;
    let state = scenario.build(&Registry::builtin())?;
    let mut session = Session::new(state, config)?;

    for name in &args.actions {
        let outcome = match session.act_str(name) {
            Ok(outcome) => outcome,
            Err(err) if err.severity().is_recoverable() => {
                tracing::warn!(
                    action = %name,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "skipping action"
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        println!("{}", outcome.observation.to_json()?);
        if outcome.terminal {
            break;
        }
    }

    if let Some(path) = &args.save_log {
        session.log().save(path)?;
        tracing::info!(path = %path.display(), entries = session.log().len(), "action log saved");
    }
    println!("{}", session.fingerprint()?);
    Ok(())
}
