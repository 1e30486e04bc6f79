use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use wen_allocator::{config, controller, optimizer, problem, telemetry};

use config::Config;
use controller::TimeSeriesOrchestrator;
use optimizer::{Allocator, GoodLpSolver, LpSolver};
use problem::ProblemFile;
use telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;
    let problem_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(Into::into)
        .unwrap_or_else(|| cfg.run.problem_file.clone());

    let problem = ProblemFile::load(&problem_path)?;
    let formulation = problem.formulation()?;
    let periods = problem.periods()?;

    let solver: Arc<dyn LpSolver> = Arc::new(GoodLpSolver::new());
    info!(
        problem = %problem_path.display(),
        solver = solver.name(),
        mode = %formulation.kind(),
        periods = periods.len(),
        "starting wen-allocator"
    );

    let allocator = Allocator::new(solver, cfg.solver.settings());
    let orchestrator =
        TimeSeriesOrchestrator::new(allocator, cfg.orchestrator.max_concurrent_periods);
    let outcome = orchestrator.run(periods, &formulation).await?;

    let report = serde_json::to_string_pretty(&outcome.report())
        .context("failed to serialize allocation report")?;
    println!("{report}");

    if outcome.optimal_count() < outcome.len() {
        warn!(
            optimal = outcome.optimal_count(),
            periods = outcome.len(),
            "some periods have no optimal allocation"
        );
    }
    Ok(())
}
