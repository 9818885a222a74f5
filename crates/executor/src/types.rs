use clap::Subcommand;
use common::types::{CurrencyIndex, RateMatrix};
use std::path::PathBuf;

use super::error::Error;

/// A trait defining the contract for any collaborator that supplies a complete rate
/// matrix for a list of currencies.
///
/// The detector never fetches rates itself; it only consumes the matrix delivered here.
/// Retries, caching and reciprocal filling are the source's concern.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
    /// Returns an `N×N` matrix where `N = currencies.len()`, indexed in currency order.
    async fn fetch(&self, currencies: &CurrencyIndex) -> Result<RateMatrix, Error>;
}

/// Where the executor takes its rates from.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum DataSource {
    /// Generate a synthetic market.
    Sim,
    /// Read `from,to,rate` rows from a CSV file.
    Csv {
        /// Path to the CSV file.
        path: PathBuf,
    },
}
