pub mod detector;
pub mod solver;
pub mod traits;
pub mod weights;

pub use detector::{RateGraph, detect};
pub use solver::{BellmanFordSolver, CycleExtraction};
pub use weights::{WeightMatrix, build};
