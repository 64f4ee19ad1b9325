//! Ingestion and query pipeline driven by the CLI.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use qengine_core::{Database, Fact, JoinStrategy, QueryResult, StarQuery};
use serde::Serialize;
use tracing::{debug, info};

use crate::ntriples::NTriplesReader;
use crate::sparql::QueryReader;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadStats {
    pub statements: usize,
    pub triples: usize,
    pub terms: usize,
    #[serde(rename = "elapsed_ms")]
    #[serde(serialize_with = "as_millis")]
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryStats {
    pub queries: usize,
    pub empty: usize,
    pub bindings: usize,
    #[serde(rename = "elapsed_ms")]
    #[serde(serialize_with = "as_millis")]
    pub elapsed: Duration,
}

/// Per-strategy timings from repeated evaluation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchStats {
    pub iterations: usize,
    #[serde(serialize_with = "as_millis")]
    pub accumulate_ms: Duration,
    #[serde(serialize_with = "as_millis")]
    pub sort_merge_ms: Duration,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(duration.as_millis())
}

fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Encodes and indexes every statement of an N-Triples file.
pub fn load_file(db: &mut Database, path: &Path) -> Result<LoadStats> {
    let input = open(path)?;
    load(db, input).with_context(|| format!("reading {}", path.display()))
}

pub fn load<R: BufRead>(db: &mut Database, input: R) -> Result<LoadStats> {
    let start = Instant::now();
    let mut statements = 0;
    for statement in NTriplesReader::new(input) {
        let statement = statement?;
        db.add_fact(Fact::new(&statement.subject, &statement.predicate, &statement.object));
        statements += 1;
    }
    let stats = LoadStats {
        statements,
        triples: db.index().len(),
        terms: db.dictionary().len(),
        elapsed: start.elapsed(),
    };
    info!(
        statements = stats.statements,
        triples = stats.triples,
        terms = stats.terms,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "data loaded"
    );
    Ok(stats)
}

pub fn query_file(db: &Database, path: &Path, bench: Option<&mut BenchStats>) -> Result<(Vec<QueryResult>, QueryStats)> {
    let input = open(path)?;
    run_queries(db, input, bench).with_context(|| format!("reading {}", path.display()))
}

/// Evaluates each query of `input` in order, one at a time.
pub fn run_queries<R: BufRead>(
    db: &Database,
    input: R,
    mut bench: Option<&mut BenchStats>,
) -> Result<(Vec<QueryResult>, QueryStats)> {
    let start = Instant::now();
    let mut results = Vec::new();
    let mut stats = QueryStats::default();

    for parsed in QueryReader::new(input) {
        let parsed = parsed?;
        let query = StarQuery::new(parsed.patterns, &parsed.projection)
            .with_context(|| format!("query starting on line {}", parsed.line))?;
        let result = db.execute(&query)?;
        debug!(line = parsed.line, variable = %result.variable, bindings = ?result.bindings, "projection");

        if let Some(bench) = bench.as_deref_mut() {
            benchmark(db, &query, bench)?;
        }

        stats.queries += 1;
        stats.bindings += result.len();
        if result.is_empty() {
            stats.empty += 1;
        }
        results.push(result);
    }

    stats.elapsed = start.elapsed();
    info!(
        queries = stats.queries,
        empty = stats.empty,
        bindings = stats.bindings,
        elapsed_ms = stats.elapsed.as_millis() as u64,
        "queries evaluated"
    );
    Ok((results, stats))
}

fn benchmark(db: &Database, query: &StarQuery, bench: &mut BenchStats) -> Result<()> {
    let iterations = bench.iterations;
    for (strategy, total) in [
        (JoinStrategy::Accumulate, &mut bench.accumulate_ms),
        (JoinStrategy::SortMerge, &mut bench.sort_merge_ms),
    ] {
        let start = Instant::now();
        for _ in 0..iterations {
            db.execute_with(query, strategy)?;
        }
        *total += start.elapsed();
    }
    Ok(())
}
