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

//! This module provide the solver implementations.
mod search;
mod brute_force;
mod bounded;
mod parallel;
mod dynamic;
mod greedy;

pub use brute_force::*;
pub use bounded::*;
pub use parallel::*;
pub use dynamic::*;
pub use greedy::*;

use crate::{ActionCatalog, ConfigError, Item, Purchase, SearchStats, Solution, SolverConfig};

/// Rejects the meaningless configurations and takes care of the trivial
/// problems (nothing to buy, or no money to spend) which all solvers answer
/// with an empty wallet.
fn trivial_solution(catalog: &ActionCatalog, config: &SolverConfig) -> Result<Option<Solution>, ConfigError> {
    config.validate()?;
    if catalog.is_empty() || config.max_budget <= 0.0 {
        Ok(Some(Solution::empty(true)))
    } else {
        Ok(None)
    }
}

/// Turns the quantities decided for each of the `items` into a wallet of
/// actions from the catalog.
fn assemble(catalog: &ActionCatalog, items: &[Item], quantities: &[usize], config: &SolverConfig, stats: Option<SearchStats>, is_exact: bool) -> Solution {
    let actions = catalog.actions();
    let mut purchases = items.iter().zip(quantities.iter())
        .filter(|(_, q)| **q > 0)
        .map(|(item, q)| (item.id, *q))
        .collect::<Vec<_>>();
    // the totals are added up in catalog order, whatever the solver
    purchases.sort_unstable_by_key(|(id, _)| *id);
    let purchases = purchases.into_iter()
        .map(|(id, quantity)| Purchase { action: actions[id].clone(), quantity })
        .collect();

    Solution::from_purchases(purchases, config.scale, stats, is_exact)
}
