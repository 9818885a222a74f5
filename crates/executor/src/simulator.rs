use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::RateSource;
use common::types::{CurrencyIndex, RateMatrix};

/// Range of the random reference value assigned to each currency.
const VALUE_RANGE: std::ops::Range<f64> = 0.01..100.0;

/// Produces a synthetic market for simulation purposes.
///
/// Every currency gets a random reference value and `rate[i][j] = value[i] / value[j]`,
/// reduced by a random spread of up to `spread_bps`. Such a market is arbitrage-free;
/// when `inject_profit_pct` is set, the loop over the first three currencies is
/// re-priced to compound to exactly that profit.
pub struct SimulatedRateSource {
    config: SimulatorConfig,
}

impl SimulatedRateSource {
    pub fn new(config: SimulatorConfig) -> Self {
        SimulatedRateSource { config }
    }

    pub fn generate(&self, size: usize) -> RateMatrix {
        let mut rng: SmallRng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let max_spread = (self.config.spread_bps / 10_000.0).clamp(0.0, 1.0);
        let values: Vec<f64> = (0..size).map(|_| rng.random_range(VALUE_RANGE)).collect();

        let mut matrix = RateMatrix::identity(size);
        for i in 0..size {
            for j in 0..size {
                if i != j {
                    let spread = rng.random_range(0.0..=max_spread);
                    matrix.set_rate(i, j, values[i] / values[j] * (1.0 - spread));
                }
            }
        }

        if let Some(profit_pct) = self.config.inject_profit_pct {
            if size >= 3 {
                matrix.set_rate(0, 1, values[0] / values[1]);
                matrix.set_rate(1, 2, values[1] / values[2]);
                matrix.set_rate(2, 0, values[2] / values[0] * (1.0 + profit_pct / 100.0));
            }
        }

        matrix
    }
}

#[async_trait]
impl RateSource for SimulatedRateSource {
    async fn fetch(&self, currencies: &CurrencyIndex) -> Result<RateMatrix, Error> {
        let matrix = self.generate(currencies.len());
        info!(
            currencies = currencies.len(),
            injected = self.config.inject_profit_pct.is_some(),
            "SimulatedRateSource: generated market"
        );
        Ok(matrix)
    }
}
