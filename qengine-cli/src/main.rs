//! `qengine`: load an N-Triples file, evaluate a star-query workload against
//! it and export the answers as CSV.
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=qengine=debug`
//! prints every query's projection.

mod error;
mod export;
mod ntriples;
mod run;
mod sparql;
mod terms;

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use qengine_core::{Database, JoinStrategy, Options};
use serde::Serialize;
use tracing::info;

use crate::run::{BenchStats, LoadStats, QueryStats};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Two-pointer merge of sorted binding lists.
    Merge,
    /// Running intersection, pattern by pattern.
    Accumulate,
}

impl From<StrategyArg> for JoinStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Merge => JoinStrategy::SortMerge,
            StrategyArg::Accumulate => JoinStrategy::Accumulate,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "qengine", version, about = "Star-query engine over dictionary-encoded triples")]
struct Cli {
    /// N-Triples data file.
    #[arg(long, value_name = "PATH", default_value = "data/100K.nt")]
    data: PathBuf,

    /// File of SELECT queries; a query ends on a line ending in '}'.
    #[arg(long, value_name = "PATH", default_value = "data/STAR_ALL_workload.queryset")]
    queries: PathBuf,

    /// CSV file receiving one record per query.
    #[arg(long, value_name = "PATH", default_value = "output/export.csv")]
    output: PathBuf,

    #[arg(long, value_enum, default_value_t = StrategyArg::Merge)]
    strategy: StrategyArg,

    /// Export terms instead of numeric ids.
    #[arg(long)]
    decode: bool,

    /// Re-run each query N times per join strategy and report timings.
    #[arg(long, value_name = "N")]
    bench: Option<usize>,

    /// Print a JSON summary to stdout.
    #[arg(long)]
    summary: bool,
}

/// Accepts the single-dash spelling of the path options (`-data <PATH>`).
fn legacy_flags(args: impl IntoIterator<Item = OsString>) -> impl Iterator<Item = OsString> {
    args.into_iter().map(|arg| match arg.to_str() {
        Some(flag @ ("-data" | "-queries" | "-output")) => OsString::from(format!("-{flag}")),
        _ => arg,
    })
}

#[derive(Debug, Serialize)]
struct Summary {
    load: LoadStats,
    queries: QueryStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    bench: Option<BenchStats>,
    total_ms: u128,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,qengine=info,qengine_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(legacy_flags(std::env::args_os()));
    let started = Instant::now();

    let options = Options::new().with_join_strategy(cli.strategy.into());
    let mut db = Database::new(options);
    let load = run::load_file(&mut db, &cli.data)?;

    let mut bench = cli.bench.map(|iterations| BenchStats {
        iterations,
        ..BenchStats::default()
    });
    let (results, queries) = run::query_file(&db, &cli.queries, bench.as_mut())?;

    let total = started.elapsed();
    info!(total_ms = total.as_millis() as u64, "execution time");
    if let Some(bench) = &bench {
        info!(
            iterations = bench.iterations,
            accumulate_ms = bench.accumulate_ms.as_millis() as u64,
            sort_merge_ms = bench.sort_merge_ms.as_millis() as u64,
            "join benchmark"
        );
    }

    let dictionary = cli.decode.then(|| db.dictionary());
    export::export(&cli.output, &results, dictionary)?;
    info!(path = %cli.output.display(), records = results.len(), "results exported");

    if cli.summary {
        let summary = Summary {
            load,
            queries,
            bench,
            total_ms: total.as_millis(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
