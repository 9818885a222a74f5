use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use super::error::Error;
use super::orchestrator::found_cycles;
use common::types::{ArbitrageResult, Currency, CurrencyIndex, RateMatrix};

/// Receives the outcome of a full scan. Implementations render or persist it; the
/// detector itself never draws anything.
pub trait CycleSink {
    fn present(
        &self,
        currencies: &CurrencyIndex,
        rates: &RateMatrix,
        results: &[ArbitrageResult],
    ) -> Result<(), Error>;
}

/// Logs one line per source currency.
pub struct LogSink;

impl CycleSink for LogSink {
    fn present(
        &self,
        _currencies: &CurrencyIndex,
        _rates: &RateMatrix,
        results: &[ArbitrageResult],
    ) -> Result<(), Error> {
        for result in results {
            if result.found {
                let path: Vec<&str> = result.cycle.iter().map(Currency::symbol).collect();
                info!(
                    path = %path.join(" -> "),
                    profit = %format!("{:.2}%", result.profit_pct),
                    "Arbitrage opportunity detected for {}!",
                    result.source
                );
            } else {
                info!("No arbitrage opportunity detected for {}.", result.source);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    currencies: &'a [Currency],
    rates: Vec<Vec<f64>>,
    cycles: Vec<Vec<usize>>,
    results: &'a [ArbitrageResult],
}

/// Writes the currencies, the rate matrix and every found cycle (as vertex indices) to a
/// JSON file for an external graph renderer.
pub struct JsonReportSink {
    path: PathBuf,
}

impl JsonReportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonReportSink { path: path.into() }
    }
}

impl CycleSink for JsonReportSink {
    fn present(
        &self,
        currencies: &CurrencyIndex,
        rates: &RateMatrix,
        results: &[ArbitrageResult],
    ) -> Result<(), Error> {
        let report = Report {
            currencies: currencies.as_slice(),
            rates: rates.rows().map(<[f64]>::to_vec).collect(),
            cycles: found_cycles(currencies, results),
            results,
        };

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &report)?;
        writer.flush()?;

        info!(path = %self.path.display(), cycles = report.cycles.len(), "Report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::tempdir;

    fn fixture() -> (CurrencyIndex, RateMatrix, Vec<ArbitrageResult>) {
        let currencies = CurrencyIndex::new(["A", "B", "C"]).unwrap();
        let rates = RateMatrix::from_rows(vec![
            vec![1.0, 2.0, 1.0 / 0.3],
            vec![0.5, 1.0, 2.0],
            vec![0.3, 0.5, 1.0],
        ])
        .unwrap();
        let results = vec![
            ArbitrageResult {
                found: true,
                source: Currency::from("A"),
                cycle: ["A", "B", "C", "A"].into_iter().map(Currency::from).collect(),
                profit_pct: 20.0,
            },
            ArbitrageResult::not_found(Currency::from("B")),
            ArbitrageResult::not_found(Currency::from("C")),
        ];
        (currencies, rates, results)
    }

    #[test]
    fn json_report_contains_cycles_and_matrix() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("report.json");
        let (currencies, rates, results) = fixture();

        JsonReportSink::new(&path)
            .present(&currencies, &rates, &results)
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let json: Value = serde_json::from_str(&content).unwrap();

        assert_eq!(json["currencies"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(json["cycles"], serde_json::json!([[0, 1, 2, 0]]));
        assert_eq!(json["rates"][1][2], serde_json::json!(2.0));
        assert_eq!(json["results"].as_array().map(Vec::len), Some(3));
        assert_eq!(json["results"][0]["found"], Value::Bool(true));
        assert_eq!(json["results"][1]["cycle"], serde_json::json!([]));
    }

    #[test]
    fn json_report_to_missing_directory_fails() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join("report.json");
        let (currencies, rates, results) = fixture();

        let result = JsonReportSink::new(path).present(&currencies, &rates, &results);
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn log_sink_accepts_any_results() {
        let (currencies, rates, results) = fixture();
        assert!(LogSink.present(&currencies, &rates, &results).is_ok());
    }
}
