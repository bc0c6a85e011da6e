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

//! # Profit Optimizer
//! This crate helps you decide which actions to buy in order to earn the
//! largest possible benefit without exceeding a given budget. Each action has
//! a cost and a benefit (for one unit), and one may buy up to a configurable
//! number of units of each action. In other words, this is a bounded knapsack
//! problem.
//!
//! Several solvers are offered, all of them implementing the `Solver` trait:
//! * `BruteForceSolver` enumerates every feasible wallet. It is only meant to
//!   serve as a reference on small catalogs.
//! * `BoundedBranchSolver` explores the same tree but prunes it with a
//!   fractional (linear relaxation) upper bound. This is the one you want to
//!   use most of the time.
//! * `ParallelBranchSolver` does the same as the above using all the
//!   hardware threads of your machine.
//! * `DynamicProgrammingSolver` fills a table indexed by the budget. Its
//!   running time depends on the size of the budget (in cents) rather than
//!   on the number of actions.
//! * `GreedyHeuristicSolver` quickly fills the budget with the actions that
//!   earn the most per currency unit. It comes without any guarantee.
//!
//! ## Quick Example
//! ```
//! # use profit_optimizer::*;
//! #
//! // the actions you may invest in
//! let catalog = ActionCatalog::from_actions(vec![
//!     Action::new("Action-1", 10.0,  5.0).unwrap(),
//!     Action::new("Action-2", 20.0, 15.0).unwrap(),
//!     Action::new("Action-3",  5.0,  2.0).unwrap(),
//! ], DedupPolicy::ByName);
//!
//! // how much you want to invest, and how many units of each action you may buy
//! let config = SolverConfigBuilder::default()
//!     .max_budget(30.0)
//!     .purchase_limit(2)
//!     .build()
//!     .unwrap();
//!
//! let solver   = BoundedBranchSolver::default();
//! let solution = solver.solve(&catalog, &config).unwrap();
//!
//! assert!(solution.is_exact);
//! assert_eq!(20.0, solution.total_benefit);
//! assert!(solution.total_cost <= 30.0);
//! for purchase in solution.purchases.iter() {
//!     println!("{} x {}", purchase.quantity, purchase.action);
//! }
//! ```
//!
//! ## Money
//! All solvers count money in whole minor currency units (cents, unless the
//! `scale` of the `SolverConfig` says otherwise). The cost of an action is
//! rounded up to the next cent and the budget is rounded down. As a
//! consequence, all solvers agree on which wallets are affordable, and the
//! `total_cost` of a solution never exceeds the budget.
//!
//! ## Loading a catalog
//! The catalogs are usually stored in csv files. These can be loaded with the
//! `read_catalog` function which tolerates (and reports) invalid records.

mod common;
mod money;
mod catalog;
mod config;
mod abstraction;
mod implementation;
mod io_utils;

pub use common::*;
pub use money::*;
pub use catalog::*;
pub use config::*;
pub use abstraction::*;
pub use implementation::*;
pub use io_utils::*;
