//! Headless plan applier.
//!
//! Reads a plan JSON file, applies it to a workspace (empty or loaded from
//! `--workspace`), prints the apply report to stderr via logging, and
//! writes the resulting workspace JSON to stdout or `--out`.
//!
//! ```text
//! roomkit <plan.json> [--workspace <file>] [--out <file>] [--config <file>]
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use roomkit::init_logging;
use roomkit_planner::{PlanInterpreter, PlannerConfig, WorkspaceContext, WorkspaceStore};
use tracing::{info, warn};

struct Args {
    plan: PathBuf,
    workspace: Option<PathBuf>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut plan = None;
    let mut workspace = None;
    let mut out = None;
    let mut config = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--workspace" => workspace = Some(PathBuf::from(next_value(&mut args, "--workspace")?)),
            "--out" => out = Some(PathBuf::from(next_value(&mut args, "--out")?)),
            "--config" => config = Some(PathBuf::from(next_value(&mut args, "--config")?)),
            "--version" => {
                println!(
                    "roomkit {} (built {})",
                    env!("CARGO_PKG_VERSION"),
                    env!("BUILD_DATE")
                );
                std::process::exit(0);
            }
            "--help" | "-h" => {
                println!(
                    "Usage: roomkit <plan.json> [--workspace <file>] [--out <file>] [--config <file>]"
                );
                std::process::exit(0);
            }
            flag if flag.starts_with("--") => bail!("unknown flag: {}", flag),
            path if plan.is_none() => plan = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument: {}", extra),
        }
    }

    let Some(plan) = plan else {
        bail!("missing plan file; usage: roomkit <plan.json> [--workspace <file>] [--out <file>]");
    };
    Ok(Args {
        plan,
        workspace,
        out,
        config,
    })
}

fn next_value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String> {
    args.next()
        .with_context(|| format!("{} requires a value", flag))
}

fn main() -> Result<()> {
    init_logging()?;
    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<PlannerConfig>(&raw)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => PlannerConfig::default(),
    };

    let mut ctx = WorkspaceContext::new();
    if let Some(path) = &args.workspace {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading workspace {}", path.display()))?;
        ctx.store = WorkspaceStore::from_json(&raw)
            .with_context(|| format!("parsing workspace {}", path.display()))?;
        info!(entities = ctx.store.len(), "loaded existing workspace");
    }

    let plan_json = fs::read_to_string(&args.plan)
        .with_context(|| format!("reading plan {}", args.plan.display()))?;

    let interpreter = PlanInterpreter::new(config);
    let report = interpreter
        .apply_json(&plan_json, &mut ctx)
        .context("applying plan")?;

    for diagnostic in &report.diagnostics {
        warn!(diagnostic = %diagnostic, "plan diagnostic");
    }
    info!(summary = %report.summary(), "done");

    let output = ctx.store.to_json().context("serializing workspace")?;
    match &args.out {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("writing workspace {}", path.display()))?,
        None => println!("{}", output),
    }

    Ok(())
}
