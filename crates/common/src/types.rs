use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::error::Error;
use super::numeric_kernel::profit_pct_from_product;

/// Opaque currency symbol (e.g. `"USD"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Currency(String);

impl Currency {
    pub fn new(symbol: impl Into<String>) -> Self {
        Currency(symbol.into())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Currency {
    fn from(symbol: &str) -> Self {
        Currency::new(symbol)
    }
}

impl From<String> for Currency {
    fn from(symbol: String) -> Self {
        Currency(symbol)
    }
}

/// Bijection between currencies and vertex indices `0..N`.
///
/// The vertex index of a currency is its position in the list it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrencyIndex {
    currencies: Vec<Currency>,
    positions: HashMap<Currency, usize>,
}

impl CurrencyIndex {
    /// # Errors
    /// Returns `Error::DuplicateCurrency` if a symbol occurs twice.
    pub fn new<I, C>(currencies: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = C>,
        C: Into<Currency>,
    {
        let currencies: Vec<Currency> = currencies.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(currencies.len());

        for (idx, currency) in currencies.iter().enumerate() {
            if positions.insert(currency.clone(), idx).is_some() {
                return Err(Error::DuplicateCurrency(currency.to_string()));
            }
        }

        Ok(Self {
            currencies,
            positions,
        })
    }

    pub fn index_of(&self, currency: &Currency) -> Option<usize> {
        self.positions.get(currency).copied()
    }

    pub fn currency(&self, idx: usize) -> Option<&Currency> {
        self.currencies.get(idx)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Currency> {
        self.currencies.iter()
    }

    pub fn as_slice(&self) -> &[Currency] {
        &self.currencies
    }
}

/// Dense `N×N` matrix of multiplicative exchange rates, stored row-major.
///
/// `rate(i, j)` is how many units of currency `j` one unit of currency `i` buys.
/// Values are not validated here; the weight builder rejects non-positive or
/// non-finite cells before any detection work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateMatrix {
    size: usize,
    rates: Vec<f64>,
}

impl RateMatrix {
    /// Builds a matrix from nested rows.
    ///
    /// # Errors
    /// Returns `Error::DimensionMismatch` if any row length differs from the row count.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, Error> {
        let size = rows.len();
        let mut rates = Vec::with_capacity(size * size);

        for row in rows {
            if row.len() != size {
                return Err(Error::DimensionMismatch {
                    expected: size,
                    actual: row.len(),
                });
            }
            rates.extend(row);
        }

        Ok(Self { size, rates })
    }

    /// A matrix where every conversion is 1:1.
    pub fn identity(size: usize) -> Self {
        Self {
            size,
            rates: vec![1.0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn rate(&self, from: usize, to: usize) -> f64 {
        self.rates[from * self.size + to]
    }

    pub fn set_rate(&mut self, from: usize, to: usize, rate: f64) {
        self.rates[from * self.size + to] = rate;
    }

    /// Iterates the matrix one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks(0) panics; an empty matrix has no cells to yield anyway.
        self.rates.chunks(self.size.max(1))
    }
}

/// Represents a closed cycle in the log-weighted currency graph.
///
/// Fields:
/// - `path`: vertex indices in forward order, first vertex repeated at the end.
/// - `rates`: original rates of each hop (`path[i] -> path[i + 1]`).
/// - `log_rate_sum`: sum of transformed weights (`-ln(rate)`); negative means profit.
/// - `profit_pct`: `(∏ rates - 1) * 100`.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedCycle {
    pub path: Vec<usize>,
    pub rates: Vec<f64>,
    pub log_rate_sum: f64,
    pub profit_pct: f64,
}

impl WeightedCycle {
    /// Returns the actual profit multiplier (∏ rate_i) for the cycle.
    ///
    /// The product is recovered from the stored sum: rate_product = e^(-sum(w_i)).
    pub fn product_rate(&self) -> f64 {
        (-self.log_rate_sum).exp()
    }

    /// Returns true if the cycle is profitable (product_rate > 1.0).
    pub fn is_profitable(&self) -> bool {
        profit_pct_from_product(self.product_rate()) > 0.0
    }

    /// Number of conversions in the cycle.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Outcome of one detection run from a single source currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArbitrageResult {
    pub found: bool,
    pub source: Currency,
    pub cycle: Vec<Currency>,
    pub profit_pct: f64,
}

impl ArbitrageResult {
    pub fn not_found(source: Currency) -> Self {
        Self {
            found: false,
            source,
            cycle: Vec::new(),
            profit_pct: 0.0,
        }
    }
}
