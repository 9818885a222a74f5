use super::traits::CycleDetector;
use super::weights::WeightMatrix;
use common::{
    error::Error,
    types::{ArbitrageResult, Currency, CurrencyIndex, RateMatrix},
};

/// Validated market snapshot: currencies, their rates, and the derived log-weight graph.
///
/// Building one performs every structural check up front, so detection runs over it
/// cannot fail on bad input. Shared read-only between runs.
#[derive(Debug, Clone)]
pub struct RateGraph {
    currencies: CurrencyIndex,
    rates: RateMatrix,
    weights: WeightMatrix,
}

impl RateGraph {
    /// # Errors
    /// - `Error::DimensionMismatch` if the currency count differs from the matrix size.
    /// - `Error::InvalidRate` if any rate is not a positive finite number.
    pub fn new(currencies: CurrencyIndex, rates: RateMatrix) -> Result<Self, Error> {
        if currencies.len() != rates.size() {
            return Err(Error::DimensionMismatch {
                expected: currencies.len(),
                actual: rates.size(),
            });
        }

        let weights = WeightMatrix::from_rates(&rates)?;

        Ok(Self {
            currencies,
            rates,
            weights,
        })
    }

    pub fn currencies(&self) -> &CurrencyIndex {
        &self.currencies
    }

    pub fn rates(&self) -> &RateMatrix {
        &self.rates
    }

    pub fn weights(&self) -> &WeightMatrix {
        &self.weights
    }
}

/// Runs one detection from `source` and maps the result back to currencies.
///
/// # Errors
/// Returns `Error::UnknownCurrency` if `source` is not part of `graph`.
pub fn detect<S>(
    solver: &S,
    graph: &RateGraph,
    source: &Currency,
    threshold_pct: f64,
) -> Result<ArbitrageResult, Error>
where
    S: CycleDetector + ?Sized,
{
    let source_idx = graph
        .currencies
        .index_of(source)
        .ok_or_else(|| Error::UnknownCurrency(source.to_string()))?;

    let Some(cycle) = solver.find_profitable_cycle(&graph.weights, source_idx, threshold_pct)?
    else {
        return Ok(ArbitrageResult::not_found(source.clone()));
    };

    let currencies = cycle
        .path
        .iter()
        .map(|&idx| {
            graph
                .currencies
                .currency(idx)
                .cloned()
                .ok_or(Error::NodeIndexOutOfBounds(idx))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ArbitrageResult {
        found: true,
        source: source.clone(),
        cycle: currencies,
        profit_pct: cycle.profit_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{BellmanFordSolver, CycleExtraction};

    fn currencies() -> CurrencyIndex {
        CurrencyIndex::new(["A", "B", "C"]).unwrap()
    }

    fn three_cycle_rates() -> RateMatrix {
        RateMatrix::from_rows(vec![
            vec![1.0, 2.0, 1.0 / 0.3],
            vec![0.5, 1.0, 2.0],
            vec![0.3, 0.5, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn rejects_currency_count_mismatch() {
        let result = RateGraph::new(currencies(), RateMatrix::identity(2));

        assert!(matches!(
            result,
            Err(Error::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn rejects_invalid_rate_before_detection() {
        let mut rates = three_cycle_rates();
        rates.set_rate(2, 1, -1.0);

        let result = RateGraph::new(currencies(), rates);
        assert!(matches!(
            result,
            Err(Error::InvalidRate { from: 2, to: 1, .. })
        ));
    }

    #[test]
    fn detect_maps_cycle_to_currencies() {
        let graph = RateGraph::new(currencies(), three_cycle_rates()).unwrap();
        let solver = BellmanFordSolver::default();

        let result = detect(&solver, &graph, &Currency::from("A"), 0.1).unwrap();

        assert!(result.found);
        assert_eq!(result.source, Currency::from("A"));
        assert_eq!(
            result.cycle,
            vec!["A", "B", "C", "A"]
                .into_iter()
                .map(Currency::from)
                .collect::<Vec<_>>()
        );
        assert!((result.profit_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn detect_reports_not_found_with_empty_cycle() {
        let graph = RateGraph::new(currencies(), three_cycle_rates()).unwrap();
        let solver = BellmanFordSolver::new(CycleExtraction::SourceAnchored);

        let result = detect(&solver, &graph, &Currency::from("A"), 0.1).unwrap();

        assert_eq!(result, ArbitrageResult::not_found(Currency::from("A")));
        assert!(result.cycle.is_empty());
        assert_eq!(result.profit_pct, 0.0);
    }

    #[test]
    fn detect_rejects_unknown_source() {
        let graph = RateGraph::new(currencies(), three_cycle_rates()).unwrap();
        let solver = BellmanFordSolver::default();

        let result = detect(&solver, &graph, &Currency::from("JPY"), 0.1);
        assert_eq!(result, Err(Error::UnknownCurrency("JPY".to_string())));
    }

    #[test]
    fn single_currency_market_has_no_arbitrage() {
        let graph = RateGraph::new(
            CurrencyIndex::new(["USD"]).unwrap(),
            RateMatrix::identity(1),
        )
        .unwrap();

        let result = detect(&BellmanFordSolver::default(), &graph, &Currency::from("USD"), 0.1).unwrap();
        assert!(!result.found);
    }
}
