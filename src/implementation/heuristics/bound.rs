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

//! This module provides the greedy "fill" of a budget which is shared by the
//! greedy heuristic and the upper bound of the branch-and-bound search. All
//! amounts are expressed in minor currency units.

use crate::Item;

/// Returns the number of whole units of an action costing `cost` that can be
/// bought with `budget`, without exceeding `limit` units. Free actions can
/// always be bought up to the limit.
pub fn affordable_units(cost: u64, budget: u64, limit: usize) -> usize {
    if cost == 0 {
        return limit;
    }
    match usize::try_from(budget / cost) {
        Ok(units) => units.min(limit),
        Err(_)    => limit,
    }
}

/// Computes an upper bound on the benefit that can be reached from a partial
/// state of the search where the quantities of the first `depth` items have
/// been decided, spending `cost` and earning `benefit`.
///
/// The bound is the value of the linear relaxation of the residual problem:
/// the remaining budget is filled with whole units of the remaining items (in
/// the order of the slice, up to `limit` units each) and, as soon as a unit
/// does not fit, a fraction of that unit is added and the filling stops.
///
/// # Important
/// This bound is admissible (never lower than the best benefit reachable from
/// the given state) **only** when the items are sorted by decreasing
/// benefit/cost ratio (see `ActionOrdering::ByRatio`). A state which has
/// exhausted its budget earns nothing more than its current `benefit`.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let items = vec![
///     Item { id: 0, cost: 2000, benefit: 15.0 },
///     Item { id: 1, cost: 1000, benefit:  5.0 },
/// ];
/// // buy all of item 0, then half of item 1
/// assert_eq!(17.5, fractional_bound(&items, 0, 2500, 1, 0, 0.0));
/// ```
pub fn fractional_bound(items: &[Item], depth: usize, max_budget: u64, limit: usize, cost: u64, benefit: f64) -> f64 {
    let mut remaining = max_budget.saturating_sub(cost);
    let mut bound     = benefit;

    for item in items.iter().skip(depth) {
        let units = affordable_units(item.cost, remaining, limit);
        bound     += item.benefit * units as f64;
        remaining -= item.cost * units as u64;

        if units < limit {
            // a unit does not fit: only a fraction of it can be bought
            bound += item.benefit * (remaining as f64 / item.cost as f64);
            break;
        }
    }
    bound
}
