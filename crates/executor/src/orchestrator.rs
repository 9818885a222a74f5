use std::sync::Arc;
use tracing::{debug, info};

use super::error::Error;
use arb_solver_core::{RateGraph, detect, traits::CycleDetector};
use common::types::{ArbitrageResult, CurrencyIndex};

/// Runs one detection per currency over a shared, read-only rate graph.
pub struct Orchestrator<S> {
    solver: Arc<S>,
    graph: Arc<RateGraph>,
    threshold_pct: f64,
    parallel: bool,
}

impl<S> Orchestrator<S>
where
    S: CycleDetector + Send + Sync + 'static,
{
    pub fn new(graph: Arc<RateGraph>, solver: S, threshold_pct: f64, parallel: bool) -> Self {
        Orchestrator {
            solver: Arc::new(solver),
            graph,
            threshold_pct,
            parallel,
        }
    }

    /// Detects arbitrage from every currency in turn.
    ///
    /// Results are returned in currency order. In parallel mode each run is a blocking
    /// task of its own, and handles are awaited in spawn order to keep that guarantee.
    pub async fn scan_all(&self) -> Result<Vec<ArbitrageResult>, Error> {
        let results = if self.parallel {
            self.scan_parallel().await?
        } else {
            self.scan_sequential()?
        };

        let found = results.iter().filter(|r| r.found).count();
        info!(
            sources = results.len(),
            found,
            parallel = self.parallel,
            "Search complete"
        );

        Ok(results)
    }

    fn scan_sequential(&self) -> Result<Vec<ArbitrageResult>, Error> {
        self.graph
            .currencies()
            .iter()
            .map(|currency| {
                debug!(source = %currency, "Starting detection");
                detect(self.solver.as_ref(), &self.graph, currency, self.threshold_pct)
                    .map_err(Error::from)
            })
            .collect()
    }

    async fn scan_parallel(&self) -> Result<Vec<ArbitrageResult>, Error> {
        let handles: Vec<_> = self
            .graph
            .currencies()
            .iter()
            .cloned()
            .map(|currency| {
                let solver = Arc::clone(&self.solver);
                let graph = Arc::clone(&self.graph);
                let threshold_pct = self.threshold_pct;

                tokio::task::spawn_blocking(move || {
                    debug!(source = %currency, "Starting detection");
                    detect(solver.as_ref(), &graph, &currency, threshold_pct)
                })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .map_err(|e| Error::TaskFailed(e.to_string()))??;
            results.push(result);
        }

        Ok(results)
    }
}

/// Index-space paths of every found cycle, in result order, for the visualizer.
pub fn found_cycles(currencies: &CurrencyIndex, results: &[ArbitrageResult]) -> Vec<Vec<usize>> {
    results
        .iter()
        .filter(|r| r.found)
        .map(|r| {
            r.cycle
                .iter()
                .filter_map(|currency| currencies.index_of(currency))
                .collect()
        })
        .collect()
}
