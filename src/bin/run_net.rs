use std::env;
use std::fs;
use std::sync::Arc;

use anyhow::{bail, Context};

use seqnet::{
    init_logging_default, CostModelRegistry, NetDef, OperatorRegistry, ProfilingConfig,
    SequentialExecutor,
};

/// Load a JSON net definition, run it once, and optionally benchmark it.
///
/// Usage: run_net <net.json> [warmup_runs main_runs]
fn main() -> anyhow::Result<()> {
    init_logging_default();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 && args.len() != 4 {
        eprintln!("Usage: {} <net.json> [warmup_runs main_runs]", args[0]);
        std::process::exit(1);
    }

    let path = &args[1];
    let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let net: NetDef = serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    println!("Loaded net '{}' with {} operator(s)", net.name, net.len());

    let registry = OperatorRegistry::with_builtin_ops();
    let workspace = seqnet::shared_workspace();
    let mut executor = SequentialExecutor::new(Arc::new(net), workspace.clone(), &registry)
        .context("constructing executor")?
        .with_profiling(ProfilingConfig::disabled())
        .with_cost_models(Arc::new(CostModelRegistry::with_builtin_costs()));

    if !executor.run() {
        bail!("net run failed; see log for the failing operator");
    }
    println!("Run succeeded.");

    if args.len() == 4 {
        let warmup: i64 = args[2].parse().context("parsing warmup_runs")?;
        let main_runs: i64 = args[3].parse().context("parsing main_runs")?;
        let times = executor.benchmark(warmup, main_runs, true);
        println!("Mean total: {:.6} ms/iter", times[0]);
        for (idx, ms) in times[1..].iter().enumerate() {
            println!("  op #{idx}: {ms:.6} ms/iter");
        }
    }

    let ws = workspace
        .read()
        .map_err(|_| anyhow::anyhow!("workspace lock poisoned"))?;
    let mut names = ws.blob_names();
    names.sort_unstable();
    println!("Workspace holds {} blob(s): {:?}", ws.len(), names);
    Ok(())
}
