use common::error::Error;
use common::types::RateMatrix;

/// Dense `N×N` matrix of edge weights `w[u][v] = -ln(rate[u][v])`, stored row-major.
///
/// The negative-log transform turns a profitable cycle (product of rates > 1) into a
/// negative-weight cycle (sum of weights < 0), which is what Bellman-Ford can detect.
/// The diagonal is always `0.0`.
///
/// Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    size: usize,
    weights: Vec<f64>,
}

/// Builds the log-weight graph for `rates`. See [`WeightMatrix::from_rates`].
pub fn build(rates: &RateMatrix) -> Result<WeightMatrix, Error> {
    WeightMatrix::from_rates(rates)
}

impl WeightMatrix {
    /// Transforms every rate into `-ln(rate)`.
    ///
    /// The whole matrix is validated before the first weight is written, so an invalid
    /// cell never yields a partially built graph.
    ///
    /// # Errors
    /// Returns `Error::InvalidRate` for the first cell (row-major) that is not a positive
    /// finite number, including cells on the diagonal.
    pub fn from_rates(rates: &RateMatrix) -> Result<Self, Error> {
        let size = rates.size();

        for (from, row) in rates.rows().enumerate() {
            if let Some((to, &rate)) = row
                .iter()
                .enumerate()
                .find(|&(_, &rate)| !(rate.is_finite() && rate > 0.0))
            {
                return Err(Error::InvalidRate { from, to, rate });
            }
        }

        let mut weights = Vec::with_capacity(size * size);
        for (from, row) in rates.rows().enumerate() {
            weights.extend(row.iter().enumerate().map(|(to, &rate)| {
                if from == to { 0.0 } else { -rate.ln() }
            }));
        }

        Ok(Self { size, weights })
    }

    /// Wraps raw weights. `f64::INFINITY` marks an absent edge.
    #[cfg(test)]
    pub(crate) fn from_raw(size: usize, weights: Vec<f64>) -> Self {
        assert_eq!(weights.len(), size * size);
        Self { size, weights }
    }

    /// Number of vertices (V).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn weight(&self, from: usize, to: usize) -> f64 {
        self.weights[from * self.size + to]
    }

    /// The rate this weight was derived from (`exp(-w)`).
    pub fn rate(&self, from: usize, to: usize) -> f64 {
        (-self.weight(from, to)).exp()
    }
}
