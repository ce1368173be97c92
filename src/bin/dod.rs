//! Scalar filtered-sum benchmark over the flat users view.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dod_bench::datagen::{GenConfig, generate_columns};
use dod_bench::harness::measure_execution_time;
use dod_bench::report::{self, BenchParams, BenchReport, ReportError};
use dod_bench::simd::scalar;

#[derive(Debug, Parser)]
#[command(name = "bench-dod", about = "Scalar filtered-sum benchmark over the flat users view.")]
struct Args {
    /// Number of user records to generate.
    #[arg(long, default_value_t = 10_000_000)]
    count: usize,
    /// Inclusive balance threshold.
    #[arg(long, default_value_t = 250.0)]
    min_balance: f32,
    /// Data generator seed.
    #[arg(long, default_value_t = 17)]
    seed: u64,
    /// Unmeasured priming iterations.
    #[arg(long, default_value_t = 2)]
    warmup: usize,
    /// Measured iterations; the reported time is their average.
    #[arg(long, default_value_t = 8)]
    iterations: usize,
    /// Write parameters and results to this path as JSON.
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ReportError> {
    let params = BenchParams {
        label: "DoD".to_string(),
        elements_count: args.count,
        minimum_balance: args.min_balance,
        random_seed: args.seed,
        warmup_iterations: args.warmup,
        iterations: args.iterations,
    };
    print!("{}", report::render_params(&params));

    tracing::info!(count = args.count, "generating users");
    let columns = generate_columns(&GenConfig {
        count: args.count,
        seed: args.seed,
        ..GenConfig::default()
    });
    let view = columns.view();

    tracing::info!("warming up");
    let mut checksum = 0.0f32;
    for _ in 0..args.warmup {
        checksum = scalar::sum_active_balances(&view, args.min_balance);
    }

    tracing::info!("benchmarking");
    let total = measure_execution_time(args.iterations, || {
        scalar::sum_active_balances(&view, args.min_balance)
    });

    let bench = BenchReport::from_timing("scalar", checksum as f64, total, &params);
    print!("{}", report::render_report(&params, &bench));

    if let Some(path) = &args.json {
        report::write_json(path, &params, &bench)?;
    }
    Ok(())
}
