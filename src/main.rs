// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This is the command line front end: it loads a catalog of actions from a
//! csv file and prints the most profitable wallet found by the chosen solver.

use std::{path::PathBuf, time::{Duration, Instant}};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use profit_optimizer::*;

/// The resolution strategies one can pick from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Enumerate all feasible wallets (small catalogs only)
    BruteForce,
    /// Branch-and-bound with a fractional upper bound
    BranchAndBound,
    /// Branch-and-bound using all the available threads
    Parallel,
    /// Dynamic programming over the budget expressed in cents
    Dynamic,
    /// Best ratios first, no guarantee
    Greedy,
}

/// When are two records of the file the same action ?
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Dedup {
    /// When they have the same name
    Name,
    /// When they have the same cost and benefit
    Value,
}
impl From<Dedup> for DedupPolicy {
    fn from(dedup: Dedup) -> Self {
        match dedup {
            Dedup::Name  => DedupPolicy::ByName,
            Dedup::Value => DedupPolicy::ByValue,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
/// Picks the most profitable wallet of actions that fits within a budget
struct Args {
    /// The path to the csv file listing the actions
    fname: PathBuf,
    /// The resolution strategy
    #[clap(short, long, value_enum, default_value_t = Strategy::BranchAndBound)]
    solver: Strategy,
    /// The maximum amount of money to invest
    #[clap(short, long, default_value = "500")]
    budget: f64,
    /// The maximum number of units of one action
    #[clap(short, long, default_value = "1")]
    limit: usize,
    /// How duplicate actions are told apart
    #[clap(long, value_enum, default_value_t = Dedup::Name)]
    dedup: Dedup,
    /// The field separator of the csv file
    #[clap(long, default_value = ",")]
    delimiter: char,
    /// The number of concurrent threads (parallel solver only; defaults to
    /// the number of hardware threads)
    #[clap(short, long)]
    threads: Option<usize>,
    /// The maximum amount of time (in seconds) you would like a search to run
    #[clap(short, long)]
    duration: Option<u64>,
    /// The number of minor units in one currency unit (amounts are rounded
    /// to whole minor units)
    #[clap(long, default_value_t = DEFAULT_SCALE_FACTOR)]
    scale: u32,
    /// Increases the verbosity of the logs (-v, -vv, -vvv)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Logs go to stderr so that they never mix with the wallet. RUST_LOG takes
/// precedence over the verbosity flag.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact())
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let start = Instant::now();
    info!(file = %args.fname.display(), solver = ?args.solver, "start");

    let options = LoadOptions { policy: args.dedup.into(), delimiter: args.delimiter };
    let report  = read_catalog(&args.fname, &options)
        .with_context(|| format!("cannot load {}", args.fname.display()))?;

    let config = SolverConfigBuilder::default()
        .max_budget(args.budget)
        .purchase_limit(args.limit)
        .scale(args.scale)
        .build()?;

    let cutoff: Box<dyn Cutoff + Send + Sync> = match args.duration {
        Some(secs) => Box::new(TimeBudget::new(Duration::from_secs(secs))),
        None       => Box::new(NoCutoff),
    };
    let solver: Box<dyn Solver + '_> = match args.solver {
        Strategy::BruteForce     => Box::new(BruteForceSolver::new(cutoff.as_ref())),
        Strategy::BranchAndBound => Box::new(BoundedBranchSolver::new(cutoff.as_ref())),
        Strategy::Parallel       => {
            let solver = ParallelBranchSolver::default().with_cutoff(cutoff.as_ref());
            match args.threads {
                Some(threads) => Box::new(solver.with_nb_threads(threads)),
                None          => Box::new(solver),
            }
        },
        Strategy::Dynamic        => Box::new(DynamicProgrammingSolver),
        Strategy::Greedy         => Box::new(GreedyHeuristicSolver),
    };

    let solving  = Instant::now();
    let solution = solver.solve(&report.catalog, &config)?;
    let duration = solving.elapsed();

    println!("Solver:        {}", solver.name());
    println!("Actions:       {} ({} rejected, {} duplicates)", report.catalog.len(), report.rejected.len(), report.duplicates);
    println!("Wallet:");
    for purchase in solution.purchases.iter() {
        println!("  {:>4} x {}", purchase.quantity, purchase.action);
    }
    if let Some(stats) = solution.stats {
        println!("Explored:      {}", stats.explored);
        println!("Pruned:        {}", stats.pruned);
    }
    println!("Total cost:    {:.2}", solution.total_cost);
    println!("Total benefit: {:.2}", solution.total_benefit);
    println!("Profitability: {:.2}%", solution.profitability());
    println!("Exact:         {}", solution.is_exact);
    println!("Duration:      {:.3} seconds", duration.as_secs_f32());

    info!(elapsed = ?start.elapsed(), "end");
    Ok(())
}
