use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use shared::{logging, Record, Table};
use tracing::info;

/// Thread-scaling summary of a results file
#[derive(Debug, Parser)]
struct Args {
    /// Results file with headerless `name,threads,time_ms,prec,mse` rows
    #[arg(short, long)]
    input: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
struct Speedup {
    threads: u32,
    baseline_threads: u32,
    factor: f64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_subscriber("warn");

    let table = Table::load(&args.input).context("Loading results failed")?;
    info!(rows = table.len(), "Loaded results");

    println!("--- Summary ---");

    for name in table.names() {
        println!();
        for speedup in speedups(table.rows(name)) {
            println!(
                "{name} at {} {} at {}: {:.02}x",
                threads(speedup.threads),
                text(speedup.factor),
                threads(speedup.baseline_threads),
                speedup.factor,
            );
        }
    }

    Ok(())
}

/// Speedup of every row over the first row with the fewest threads.
/// The baseline row itself is left out.
fn speedups<'a>(rows: impl IntoIterator<Item = &'a Record>) -> Vec<Speedup> {
    let rows: Vec<_> = rows.into_iter().collect();
    let Some((base_index, baseline)) = rows.iter().enumerate().min_by_key(|(_, r)| r.threads)
    else {
        return Vec::new();
    };

    rows.iter()
        .enumerate()
        .filter(|(index, _)| *index != base_index)
        .map(|(_, row)| Speedup {
            threads: row.threads,
            baseline_threads: baseline.threads,
            factor: baseline.time_ms / row.time_ms,
        })
        .collect()
}

fn text(f: f64) -> &'static str {
    if f > 1. {
        "is faster than"
    } else if f < 1. {
        "is slower than"
    } else {
        "is equal to"
    }
}

fn threads(n: u32) -> String {
    if n == 1 {
        "1 thread".to_string()
    } else {
        format!("{n} threads")
    }
}
