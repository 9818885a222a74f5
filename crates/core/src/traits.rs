use super::weights::WeightMatrix;
use common::{error::Error, types::WeightedCycle};

/// Trait for graph solvers capable of detecting profitable (negative-weight) cycles.
pub trait CycleDetector {
    /// Searches for a negative cycle reachable from `source` whose profit exceeds
    /// `threshold_pct`.
    ///
    /// Returns `Ok(Some(cycle))` for the first qualifying cycle found,
    /// `Ok(None)` if none qualifies, or `Err(e)` if `source` is not a vertex of `graph`.
    fn find_profitable_cycle(
        &self,
        graph: &WeightMatrix,
        source: usize,
        threshold_pct: f64,
    ) -> Result<Option<WeightedCycle>, Error>;
}
