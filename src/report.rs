//! Console and JSON rendering of benchmark parameters and results.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchParams {
    pub label: String,
    pub elements_count: usize,
    pub minimum_balance: f32,
    pub random_seed: u64,
    pub warmup_iterations: usize,
    pub iterations: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub backend: String,
    pub checksum: f64,
    pub total_seconds: f64,
    pub average_seconds: f64,
    pub elements_per_second: f64,
    pub nanoseconds_per_element: f64,
}

impl BenchReport {
    /// Derives throughput metrics from a measured total duration.
    pub fn from_timing(
        backend: &str,
        checksum: f64,
        total: Duration,
        params: &BenchParams,
    ) -> Self {
        let total_seconds = total.as_secs_f64();
        let average_seconds = if params.iterations > 0 {
            total_seconds / params.iterations as f64
        } else {
            0.0
        };
        let elements_per_second = if average_seconds > 0.0 {
            params.elements_count as f64 / average_seconds
        } else {
            0.0
        };
        let nanoseconds_per_element = if params.elements_count > 0 {
            average_seconds * 1e9 / params.elements_count as f64
        } else {
            0.0
        };
        Self {
            backend: backend.to_string(),
            checksum,
            total_seconds,
            average_seconds,
            elements_per_second,
            nanoseconds_per_element,
        }
    }
}

pub fn render_params(params: &BenchParams) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[ {} Benchmark ]", params.label);
    let _ = writeln!(out, "Elements Count    : {}", params.elements_count);
    let _ = writeln!(out, "Minimum Balance   : {:.2}", params.minimum_balance);
    let _ = writeln!(out, "Random Seed       : {}", params.random_seed);
    let _ = writeln!(out, "Warmup Iterations : {}", params.warmup_iterations);
    let _ = writeln!(out, "Iterations        : {}", params.iterations);
    out
}

pub fn render_report(params: &BenchParams, report: &BenchReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[ {} Results ]", params.label);
    let _ = writeln!(out, "Backend                    : {}", report.backend);
    let _ = writeln!(out, "Checksum                   : {:.8}", report.checksum);
    let _ = writeln!(out, "Total Time                 : {:.2} s", report.total_seconds);
    let _ = writeln!(
        out,
        "Average Time per Iteration : {:.2} s",
        report.average_seconds
    );
    let _ = writeln!(
        out,
        "Elements per Second        : {:.2} M",
        report.elements_per_second / 1e6
    );
    let _ = writeln!(
        out,
        "Nanoseconds per Element    : {:.2}",
        report.nanoseconds_per_element
    );
    out
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    params: &'a BenchParams,
    report: &'a BenchReport,
}

/// Writes the parameters and results as one pretty-printed JSON document.
pub fn write_json(
    path: &Path,
    params: &BenchParams,
    report: &BenchReport,
) -> Result<(), ReportError> {
    let document = JsonDocument { params, report };
    let body = serde_json::to_string_pretty(&document)?;
    fs::write(path, body)?;
    Ok(())
}
