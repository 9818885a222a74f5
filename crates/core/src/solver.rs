use super::traits::CycleDetector;
use super::weights::WeightMatrix;
use common::{error::Error, numeric_kernel::cycle_profit_pct, types::WeightedCycle};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a cycle is recovered from the predecessor vector once a relaxable edge is found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleExtraction {
    /// Walks the predecessor chain back from the flagged vertex and accepts the result only
    /// if it closes on itself at `source`.
    ///
    /// The chain is a shortest-path-tree ancestry, not necessarily the cycle, so this
    /// rejects every negative cycle that does not pass through `source` as the flagged
    /// vertex.
    SourceAnchored,

    /// Steps `V` predecessors back from the flagged vertex, which always lands on the
    /// cycle, then follows predecessors until that vertex repeats. Finds the true cycle
    /// regardless of `source`; rotated to start at `source` when `source` lies on it.
    #[default]
    TrueCycle,
}

/// Bellman-Ford solver over a dense log-weight matrix.
///
/// Both the relaxation passes and the negative-cycle probe scan edges in row-major
/// order (`u` ascending, then `v` ascending). That order decides which of several
/// equally short paths is recorded as predecessor, and which negative cycle is reported
/// first when more than one exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct BellmanFordSolver {
    pub extraction: CycleExtraction,
}

impl BellmanFordSolver {
    pub fn new(extraction: CycleExtraction) -> Self {
        Self { extraction }
    }

    /// Runs up to `V - 1` relaxation passes from `source`.
    ///
    /// Returns the distance and predecessor vectors. Stops early once a whole pass
    /// makes no update, since later passes could not change anything either.
    ///
    /// # Panics
    /// Panics if `source` is not a vertex of `graph`.
    pub fn relax(&self, graph: &WeightMatrix, source: usize) -> (Vec<f64>, Vec<Option<usize>>) {
        let num_nodes = graph.size();
        let mut distance = vec![f64::INFINITY; num_nodes];
        let mut predecessor = vec![None; num_nodes];
        distance[source] = 0.0;

        for _ in 1..num_nodes {
            let mut updated = false;

            for u in 0..num_nodes {
                if !distance[u].is_finite() {
                    continue;
                }
                for v in 0..num_nodes {
                    let candidate = distance[u] + graph.weight(u, v);
                    if candidate < distance[v] {
                        distance[v] = candidate;
                        predecessor[v] = Some(u);
                        updated = true;
                    }
                }
            }

            if !updated {
                break;
            }
        }

        (distance, predecessor)
    }

    /// Recovers a closed vertex path starting at the flagged vertex `entry`, using the
    /// configured [`CycleExtraction`].
    ///
    /// Returns `None` when the predecessor chain is broken or, in source-anchored mode,
    /// when it does not close at `source`.
    pub fn extract_cycle(
        &self,
        entry: usize,
        source: usize,
        predecessor: &[Option<usize>],
    ) -> Option<Vec<usize>> {
        match self.extraction {
            CycleExtraction::SourceAnchored => source_anchored_cycle(entry, source, predecessor),
            CycleExtraction::TrueCycle => true_cycle(entry, source, predecessor),
        }
    }

    /// Attaches hop rates, log-weight sum and profit to a closed vertex path.
    ///
    /// # Errors
    /// Returns `Error::NumericDegenerate` if the profit or the weight sum is not finite.
    fn weigh_cycle(graph: &WeightMatrix, path: Vec<usize>) -> Result<WeightedCycle, Error> {
        let profit_pct = cycle_profit_pct(&path, |u, v| graph.weight(u, v))?;

        let log_rate_sum: f64 = path.windows(2).map(|hop| graph.weight(hop[0], hop[1])).sum();
        if !log_rate_sum.is_finite() {
            return Err(Error::NumericDegenerate);
        }

        let rates = path
            .windows(2)
            .map(|hop| graph.rate(hop[0], hop[1]))
            .collect();

        Ok(WeightedCycle {
            path,
            rates,
            log_rate_sum,
            profit_pct,
        })
    }
}

/// Walks predecessors from `entry` until a vertex repeats, then reverses into forward
/// order. Accepted only if the path starts and ends at `source`.
fn source_anchored_cycle(
    entry: usize,
    source: usize,
    predecessor: &[Option<usize>],
) -> Option<Vec<usize>> {
    let mut path = Vec::new();
    let mut current = Some(entry);

    while let Some(node) = current {
        if path.contains(&node) {
            path.push(node);
            path.reverse();

            let closes_at_source = path.first() == Some(&source) && path.last() == Some(&source);
            return closes_at_source.then_some(path);
        }
        path.push(node);
        current = predecessor[node];
    }

    // Ran out of predecessors without closing a loop.
    None
}

/// Traces back `V` predecessors from `entry` to reach a vertex inside the cycle, then
/// collects the cycle itself.
fn true_cycle(entry: usize, source: usize, predecessor: &[Option<usize>]) -> Option<Vec<usize>> {
    let num_nodes = predecessor.len();

    let mut anchor = entry;
    for _ in 0..num_nodes {
        anchor = predecessor[anchor]?;
    }

    let mut cycle = vec![anchor];
    let mut current = predecessor[anchor]?;
    while current != anchor {
        if cycle.len() > num_nodes {
            return None;
        }
        cycle.push(current);
        current = predecessor[current]?;
    }

    cycle.reverse();

    if let Some(pos) = cycle.iter().position(|&node| node == source) {
        cycle.rotate_left(pos);
    }
    cycle.push(cycle[0]);

    Some(cycle)
}

impl CycleDetector for BellmanFordSolver {
    /// Finds the first cycle reachable from `source` whose profit exceeds `threshold_pct`.
    ///
    /// After relaxation, every edge `(u, v)` that can still be relaxed flags `v` as an
    /// entry point for cycle extraction. Candidates that cannot be extracted, evaluate to
    /// a non-finite profit, or fall at or below the threshold are skipped and the probe
    /// moves on to the next edge.
    ///
    /// # Returns
    /// - `Ok(Some(cycle))` → Profitable cycle found.
    /// - `Ok(None)` → No qualifying cycle.
    /// - `Err(Error::NodeIndexOutOfBounds)` → `source` is not a vertex.
    fn find_profitable_cycle(
        &self,
        graph: &WeightMatrix,
        source: usize,
        threshold_pct: f64,
    ) -> Result<Option<WeightedCycle>, Error> {
        let num_nodes = graph.size();
        if source >= num_nodes {
            return Err(Error::NodeIndexOutOfBounds(source));
        }

        let (distance, predecessor) = self.relax(graph, source);

        for u in 0..num_nodes {
            if !distance[u].is_finite() {
                continue;
            }
            for v in 0..num_nodes {
                if distance[u] + graph.weight(u, v) >= distance[v] {
                    continue;
                }

                let Some(path) = self.extract_cycle(v, source, &predecessor) else {
                    debug!(source, u, v, "relaxable edge did not yield a usable cycle");
                    continue;
                };

                match Self::weigh_cycle(graph, path) {
                    Ok(cycle) if cycle.profit_pct > threshold_pct => return Ok(Some(cycle)),
                    Ok(cycle) => {
                        debug!(
                            source,
                            profit_pct = cycle.profit_pct,
                            threshold_pct,
                            "cycle below threshold"
                        );
                    }
                    Err(e) => {
                        warn!(source, u, v, error = %e, "skipping numerically degenerate cycle");
                    }
                }
            }
        }

        Ok(None)
    }
}
