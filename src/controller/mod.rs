use futures::stream::{self, StreamExt};
use itertools::Itertools;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::domain::{Period, Solution, SolveStatus};
use crate::error::AllocationError;
use crate::optimizer::{Allocator, Formulation};

/// Outcome of one period: a packaged solution, or the defect that stopped it
/// before the engine ran.
pub type PeriodResult = Result<Solution, AllocationError>;

/// Serializable view of one period's result.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport<'a> {
    pub period: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<&'a Solution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Results of a multi-period run, keyed by period index.
#[derive(Debug, Clone, Default)]
pub struct SeriesOutcome {
    pub periods: BTreeMap<usize, PeriodResult>,
}

impl SeriesOutcome {
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PeriodResult> {
        self.periods.get(&index)
    }

    /// Solutions in period order, skipping periods that errored
    pub fn solutions(&self) -> impl Iterator<Item = (usize, &Solution)> {
        self.periods
            .iter()
            .filter_map(|(i, r)| r.as_ref().ok().map(|s| (*i, s)))
    }

    pub fn optimal_count(&self) -> usize {
        self.solutions().filter(|(_, s)| s.is_optimal()).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = (usize, &AllocationError)> {
        self.periods
            .iter()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (*i, e)))
    }

    /// Sum of optimal objectives across the run
    pub fn total_objective(&self) -> f64 {
        self.solutions().filter_map(|(_, s)| s.objective).sum()
    }

    pub fn report(&self) -> Vec<PeriodReport<'_>> {
        self.periods
            .iter()
            .map(|(i, r)| PeriodReport {
                period: *i,
                solution: r.as_ref().ok(),
                error: r.as_ref().err().map(ToString::to_string),
            })
            .collect()
    }
}

/// Runs the allocator once per period.
///
/// Periods are independent: no state flows from one period into the next.
#[derive(Clone)]
pub struct TimeSeriesOrchestrator {
    allocator: Allocator,
    max_concurrent_periods: usize,
}

impl TimeSeriesOrchestrator {
    pub fn new(allocator: Allocator, max_concurrent_periods: usize) -> Self {
        Self {
            allocator,
            max_concurrent_periods: max_concurrent_periods.max(1),
        }
    }

    /// Solve every period and collect the results by index.
    ///
    /// Indices must be unique; a repeated index rejects the whole run before
    /// anything is solved.
    pub async fn run(
        &self,
        periods: Vec<Period>,
        formulation: &Formulation,
    ) -> Result<SeriesOutcome, AllocationError> {
        let repeated = periods.iter().map(|p| p.index).duplicates().join(", ");
        if !repeated.is_empty() {
            return Err(AllocationError::config(format!(
                "period indices must be unique, repeated: {repeated}"
            )));
        }

        let total = periods.len();
        info!(
            periods = total,
            mode = %formulation.kind(),
            concurrency = self.max_concurrent_periods,
            "starting allocation run"
        );

        let allocator = &self.allocator;
        let results: Vec<(usize, PeriodResult)> = stream::iter(periods)
            .map(|period| async move {
                let result = allocator.solve(&period.parameters, formulation).await;
                (period.index, result)
            })
            .buffered(self.max_concurrent_periods)
            .collect()
            .await;

        let mut outcome = SeriesOutcome::default();
        for (index, result) in results {
            log_period(index, &result);
            outcome.periods.insert(index, result);
        }

        info!(
            periods = total,
            optimal = outcome.optimal_count(),
            "allocation run finished"
        );
        Ok(outcome)
    }
}

fn log_period(index: usize, result: &PeriodResult) {
    match result {
        Ok(solution) if solution.status == SolveStatus::Optimal => {
            info!(period = index, objective = ?solution.objective, "period solved");
        }
        Ok(solution) => {
            warn!(
                period = index,
                status = %solution.status,
                message = solution.message.as_deref().unwrap_or(""),
                "period not solved to optimality"
            );
        }
        Err(e) => warn!(period = index, kind = e.kind(), error = %e, "period rejected"),
    }
}
