use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A rate that is not a positive finite number; `-ln(rate)` is undefined for it.
    #[error("Invalid rate {rate} for pair ({from}, {to}): rates must be positive and finite.")]
    InvalidRate { from: usize, to: usize, rate: f64 },

    /// The currency list and the rate matrix disagree on the number of vertices,
    /// or the matrix rows are not square.
    #[error("Dimension mismatch: expected {expected}, found {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An `exp`/`ln` evaluation produced a non-finite value.
    #[error("Numeric evaluation produced a non-finite value along the cycle.")]
    NumericDegenerate,

    /// Indicates an attempt to access a node index that exceeds the graph size (N).
    #[error("Node index {0} is out of bounds.")]
    NodeIndexOutOfBounds(usize),

    #[error("Currency {0} appears more than once.")]
    DuplicateCurrency(String),

    #[error("Currency {0} is not part of the market.")]
    UnknownCurrency(String),
}
