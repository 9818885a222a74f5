use csv::ReaderBuilder;
use serde::Deserialize;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, info};

use super::error::Error;
use super::types::RateSource;
use common::types::{Currency, CurrencyIndex, RateMatrix};

// Helper struct for CSV parsing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvRecord {
    pub from: String,
    pub to: String,
    pub rate: f64,
}

/// Reads quoted rates from a headed CSV file (`from,to,rate`, currency symbols).
pub struct CsvRateSource {
    path: PathBuf,
}

impl CsvRateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvRateSource { path: path.into() }
    }

    fn parse_records(&self) -> Result<Vec<CsvRecord>, Error> {
        let file = File::open(&self.path)?;

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: CsvRecord = result?;
            records.push(record);
        }
        Ok(records)
    }

    /// Lays quoted records out as a dense matrix in currency order.
    ///
    /// Rows for currencies outside `currencies` and self-quotes are ignored; the diagonal
    /// is always `1.0`. A later quote for the same pair replaces an earlier one. A pair
    /// with no quote is filled with the reciprocal of the opposite direction's quote.
    ///
    /// # Errors
    /// Returns `Error::MissingRate` if neither direction of a pair was quoted.
    pub fn assemble(currencies: &CurrencyIndex, records: &[CsvRecord]) -> Result<RateMatrix, Error> {
        let n = currencies.len();
        let mut quoted: Vec<Option<f64>> = vec![None; n * n];

        for record in records {
            let from = currencies.index_of(&Currency::from(record.from.as_str()));
            let to = currencies.index_of(&Currency::from(record.to.as_str()));

            match (from, to) {
                (Some(from), Some(to)) if from != to => quoted[from * n + to] = Some(record.rate),
                (Some(_), Some(_)) => debug!(currency = %record.from, "ignoring self quote"),
                _ => debug!(from = %record.from, to = %record.to, "ignoring quote outside market"),
            }
        }

        let mut matrix = RateMatrix::identity(n);
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let rate = match (quoted[i * n + j], quoted[j * n + i]) {
                    (Some(rate), _) => rate,
                    (None, Some(reverse)) => 1.0 / reverse,
                    (None, None) => {
                        return Err(Error::MissingRate {
                            from: currencies.as_slice()[i].to_string(),
                            to: currencies.as_slice()[j].to_string(),
                        });
                    }
                };
                matrix.set_rate(i, j, rate);
            }
        }

        Ok(matrix)
    }
}

#[async_trait::async_trait]
impl RateSource for CsvRateSource {
    async fn fetch(&self, currencies: &CurrencyIndex) -> Result<RateMatrix, Error> {
        let records = self.parse_records()?;
        info!(
            path = %self.path.display(),
            quotes = records.len(),
            "CsvRateSource: loaded quotes"
        );

        Self::assemble(currencies, &records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOCK_CSV_CONTENT: &str = "\
from,to,rate
USD,EUR,0.9
EUR,GBP,0.85
GBP,USD,1.3
USD,GBP,0.77
JPY,USD,0.0067
";

    fn market() -> CurrencyIndex {
        CurrencyIndex::new(["USD", "EUR", "GBP"]).unwrap()
    }

    fn record(from: &str, to: &str, rate: f64) -> CsvRecord {
        CsvRecord {
            from: from.to_string(),
            to: to.to_string(),
            rate,
        }
    }

    fn write_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(content.as_bytes())
            .expect("Failed to write mock content");
        temp_file
    }

    #[test]
    fn test_parse_records_success() {
        let temp_file = write_csv(MOCK_CSV_CONTENT);
        let source = CsvRateSource::new(temp_file.path());

        let records = source.parse_records().expect("Parsing failed");

        assert_eq!(records.len(), 5);
        assert_eq!(records[0], record("USD", "EUR", 0.9));
        assert_eq!(records[4], record("JPY", "USD", 0.0067));
    }

    #[test]
    fn test_parse_records_file_not_found() {
        let source = CsvRateSource::new("non_existent_file.csv");
        let result = source.parse_records();

        if let Err(Error::IoError(e)) = &result {
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        } else {
            panic!("Expected IoError, got: {:?}", result);
        }
    }

    #[test]
    fn test_parse_records_rejects_bad_rate() {
        let temp_file = write_csv("from,to,rate\nUSD,EUR,abc\n");
        let result = CsvRateSource::new(temp_file.path()).parse_records();

        assert!(matches!(result, Err(Error::CsvError(_))));
    }

    #[test]
    fn assemble_fills_reciprocals_and_diagonal() {
        let records = vec![
            record("USD", "EUR", 0.9),
            record("EUR", "GBP", 0.8),
            record("GBP", "USD", 1.25),
        ];
        let matrix = CsvRateSource::assemble(&market(), &records).unwrap();

        assert_eq!(matrix.rate(0, 0), 1.0);
        assert_eq!(matrix.rate(0, 1), 0.9);
        assert!((matrix.rate(1, 0) - 1.0 / 0.9).abs() < 1e-12);
        assert!((matrix.rate(2, 1) - 1.25).abs() < 1e-12);
        assert!((matrix.rate(0, 2) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn assemble_prefers_direct_quote_over_reciprocal() {
        let records = vec![record("USD", "EUR", 0.9), record("EUR", "USD", 1.2)];
        let market = CurrencyIndex::new(["USD", "EUR"]).unwrap();
        let matrix = CsvRateSource::assemble(&market, &records).unwrap();

        // Quotes need not be reciprocal of each other.
        assert_eq!(matrix.rate(0, 1), 0.9);
        assert_eq!(matrix.rate(1, 0), 1.2);
    }

    #[test]
    fn assemble_latest_quote_wins() {
        let records = vec![record("USD", "EUR", 0.9), record("USD", "EUR", 0.95)];
        let market = CurrencyIndex::new(["USD", "EUR"]).unwrap();
        let matrix = CsvRateSource::assemble(&market, &records).unwrap();

        assert_eq!(matrix.rate(0, 1), 0.95);
    }

    #[test]
    fn assemble_reports_missing_pair() {
        let records = vec![record("USD", "EUR", 0.9)];
        let result = CsvRateSource::assemble(&market(), &records);

        match result {
            Err(Error::MissingRate { from, to }) => {
                assert_eq!((from.as_str(), to.as_str()), ("USD", "GBP"));
            }
            other => panic!("Expected MissingRate, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn fetch_ignores_currencies_outside_market() {
        let temp_file = write_csv(MOCK_CSV_CONTENT);
        let source = CsvRateSource::new(temp_file.path());

        let matrix = source.fetch(&market()).await.unwrap();

        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.rate(0, 2), 0.77);
        assert_eq!(matrix.rate(2, 0), 1.3);
        assert!((matrix.rate(1, 0) - 1.0 / 0.9).abs() < 1e-12);
    }
}
