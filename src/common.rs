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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.

use std::fmt;

use crate::{cost_in_minor_units, minor_units_to_amount};

// ----------------------------------------------------------------------------
// --- ACTION -----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// An action is a discrete investment opportunity. Buying one unit of it
/// costs `cost` and yields an absolute profit of `benefit`.
///
/// Actions can only be created through a validating constructor. Hence, any
/// action you get to manipulate is guaranteed to have a non-empty name and
/// finite, non-negative cost and benefit.
///
/// # Examples:
/// ```
/// # use profit_optimizer::Action;
/// let action = Action::new("Action-1", 20.0, 5.0).unwrap();
/// assert_eq!("Action-1", action.name());
/// assert_eq!(0.25, action.ratio());
///
/// // the benefit can also be derived from a profitability percentage
/// let action = Action::from_profitability("Action-2", 20.0, 10.0).unwrap();
/// assert_eq!(2.0, action.benefit());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name   : String,
    cost   : f64,
    benefit: f64,
}

impl Action {
    /// Creates a new action from its absolute benefit.
    pub fn new<S: Into<String>>(name: S, cost: f64, benefit: f64) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !cost.is_finite() || !benefit.is_finite() {
            return Err(ValidationError::NonFinite { name });
        }
        if cost < 0.0 {
            return Err(ValidationError::NegativeCost { name, cost });
        }
        if benefit < 0.0 {
            return Err(ValidationError::NegativeBenefit { name, benefit });
        }
        // normalizes -0.0 so that value based equality is not fooled
        Ok(Action { name, cost: cost + 0.0, benefit: benefit + 0.0 })
    }
    /// Creates a new action whose benefit is `cost * profitability / 100`.
    pub fn from_profitability<S: Into<String>>(name: S, cost: f64, profitability: f64) -> Result<Self, ValidationError> {
        let name = name.into();
        if profitability < 0.0 {
            return Err(ValidationError::NegativeBenefit { name, benefit: profitability });
        }
        Self::new(name, cost, cost * profitability / 100.0)
    }
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }
    #[inline]
    pub fn benefit(&self) -> f64 {
        self.benefit
    }
    /// The benefit earned per currency unit spent on this action.
    ///
    /// Free actions are infinitely profitable unless they bring nothing at
    /// all, in which case their ratio is zero.
    pub fn ratio(&self) -> f64 {
        if self.cost > 0.0 {
            self.benefit / self.cost
        } else if self.benefit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}€, {}€", self.name, self.cost, self.benefit)
    }
}

/// The reasons why an action cannot be built from raw input.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Every action must bear a non-blank name
    #[error("the name of an action must not be empty")]
    EmptyName,
    /// Costs and benefits must be actual numbers
    #[error("action {name} has a cost or a benefit which is not a finite number")]
    NonFinite { name: String },
    /// Nobody pays you to buy an action
    #[error("action {name} has a negative cost ({cost})")]
    NegativeCost { name: String, cost: f64 },
    /// Benefits (and profitabilities) cannot be negative
    #[error("action {name} has a negative benefit ({benefit})")]
    NegativeBenefit { name: String, benefit: f64 },
}

// ----------------------------------------------------------------------------
// --- PURCHASE ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A purchase is one line of the wallet: it tells how many units of a given
/// action have been bought.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub action  : Action,
    pub quantity: usize,
}
impl Purchase {
    /// The total amount spent on this purchase
    pub fn cost(&self) -> f64 {
        self.action.cost() * self.quantity as f64
    }
    /// The total profit earned from this purchase
    pub fn benefit(&self) -> f64 {
        self.action.benefit() * self.quantity as f64
    }
}

// ----------------------------------------------------------------------------
// --- STATISTICS -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// Diagnostic counters of the solvers that explore a branching tree.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SearchStats {
    /// The number of nodes of the search tree that have been visited
    pub explored: u64,
    /// The number of nodes whose subtree was discarded by the bound
    pub pruned: u64,
}
impl SearchStats {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.explored = self.explored.saturating_add(1);
    }
    #[inline]
    pub fn on_node_pruned(&mut self) {
        self.pruned = self.pruned.saturating_add(1);
    }
    /// Accumulates the counters of `other` into self
    pub fn merge(&mut self, other: SearchStats) {
        self.explored = self.explored.saturating_add(other.explored);
        self.pruned   = self.pruned.saturating_add(other.pruned);
    }
}

// ----------------------------------------------------------------------------
// --- RESULTS ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A reason explaining why a search stopped before proving optimality
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Reason {
    /// It stopped because the configured cutoff criterion was met
    CutoffOccurred
}

/// The outcome of a call to `Solver::solve`.
///
/// A solution is always feasible: its total cost never exceeds the budget it
/// was computed for, and no action is bought more often than the purchase
/// limit allows.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The actions that were bought (by decreasing benefit, then by name)
    pub purchases: Vec<Purchase>,
    /// The sum of the costs of all purchases. It is accounted in whole minor
    /// units (the cost of each action being rounded up to the next minor
    /// unit), exactly as the solvers account for the budget.
    pub total_cost: f64,
    /// The sum of the benefits of all purchases
    pub total_benefit: f64,
    /// The counters of the search (only for solvers that branch)
    pub stats: Option<SearchStats>,
    /// Is this solution proven optimal ? This is never the case of a search
    /// that was interrupted by a cutoff, nor of an heuristic (unless the
    /// problem was trivial).
    pub is_exact: bool,
}

impl Solution {
    /// The solution of a trivial problem: nothing is bought
    pub fn empty(is_exact: bool) -> Self {
        Solution {
            purchases: vec![],
            total_cost: 0.0,
            total_benefit: 0.0,
            stats: None,
            is_exact,
        }
    }
    /// Creates a solution from its purchases and computes the totals. The
    /// costs are added up in minor units, `scale` of them per currency unit.
    /// Purchases of zero units are dropped.
    pub fn from_purchases(purchases: Vec<Purchase>, scale: u32, stats: Option<SearchStats>, is_exact: bool) -> Self {
        let mut purchases: Vec<Purchase> = purchases.into_iter()
            .filter(|p| p.quantity > 0)
            .collect();

        let cost_units    = purchases.iter().fold(0_u64, |acc, p| {
            let units = cost_in_minor_units(p.action.cost(), scale);
            acc.saturating_add(units.saturating_mul(p.quantity as u64))
        });
        let total_cost    = minor_units_to_amount(cost_units, scale);
        let total_benefit = purchases.iter().fold(0.0, |acc, p| acc + p.benefit());

        purchases.sort_by(|a, b| b.benefit().total_cmp(&a.benefit())
            .then_with(|| a.action.name().cmp(b.action.name())));

        Solution { purchases, total_cost, total_benefit, stats, is_exact }
    }
    /// Attaches search statistics to this solution
    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = Some(stats);
        self
    }
    /// The number of units bought (all actions together)
    pub fn nb_units(&self) -> usize {
        self.purchases.iter().map(|p| p.quantity).sum()
    }
    /// The overall return on investment of the wallet, in percent
    pub fn profitability(&self) -> f64 {
        if self.total_cost > 0.0 {
            100.0 * self.total_benefit / self.total_cost
        } else {
            0.0
        }
    }
}

// ----------------------------------------------------------------------------
// --- SUBPROBLEM -------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A subproblem is a residual problem that must be solved in order to complete
/// the resolution of the original problem. It is identified by the quantities
/// that have already been decided for the first `depth` actions of the
/// (ordered) instance.
///
/// # Note:
/// Subproblems are automatically instanciated by the parallel solver. If you
/// are only discovering the API, rest assured.. you don't need to create any
/// subproblem yourself.
#[derive(Debug, Clone, PartialEq)]
pub struct SubProblem {
    /// The number of actions that have been decided so far
    pub depth: usize,
    /// The money spent to reach this subproblem (in minor units)
    pub cost: u64,
    /// The benefit earned on the way to this subproblem
    pub benefit: f64,
    /// An upper bound on the benefit reachable in this subproblem
    pub ub: f64,
    /// The quantity bought of each of the first `depth` actions
    pub path: Vec<usize>,
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_action {
    use crate::{Action, ValidationError};

    #[test]
    fn a_valid_action_can_be_built() {
        let a = Action::new("A", 10.0, 5.0).unwrap();
        assert_eq!("A", a.name());
        assert_eq!(10.0, a.cost());
        assert_eq!(5.0, a.benefit());
    }
    #[test]
    fn an_action_must_have_a_name() {
        assert_eq!(Err(ValidationError::EmptyName), Action::new("", 10.0, 5.0));
        assert_eq!(Err(ValidationError::EmptyName), Action::new("   ", 10.0, 5.0));
    }
    #[test]
    fn an_action_cannot_have_a_negative_cost() {
        assert!(matches!(Action::new("A", -1.0, 5.0), Err(ValidationError::NegativeCost{..})));
    }
    #[test]
    fn an_action_cannot_have_a_negative_benefit() {
        assert!(matches!(Action::new("A", 1.0, -5.0), Err(ValidationError::NegativeBenefit{..})));
        assert!(matches!(Action::from_profitability("A", 1.0, -5.0), Err(ValidationError::NegativeBenefit{..})));
    }
    #[test]
    fn an_action_cannot_have_a_nan_cost() {
        assert!(matches!(Action::new("A", f64::NAN, 5.0), Err(ValidationError::NonFinite{..})));
        assert!(matches!(Action::new("A", 1.0, f64::INFINITY), Err(ValidationError::NonFinite{..})));
    }
    #[test]
    fn benefit_is_derived_from_profitability() {
        let a = Action::from_profitability("A", 20.0, 5.0).unwrap();
        assert_eq!(1.0, a.benefit());
    }
    #[test]
    fn ratio_of_a_free_action() {
        assert_eq!(f64::INFINITY, Action::new("A", 0.0, 1.0).unwrap().ratio());
        assert_eq!(0.0, Action::new("A", 0.0, 0.0).unwrap().ratio());
        assert_eq!(0.5, Action::new("A", 4.0, 2.0).unwrap().ratio());
    }
}

#[cfg(test)]
mod test_solution {
    use crate::{Action, Purchase, Solution, SearchStats};

    fn purchase(name: &str, cost: f64, benefit: f64, quantity: usize) -> Purchase {
        Purchase { action: Action::new(name, cost, benefit).unwrap(), quantity }
    }

    #[test]
    fn totals_are_computed_from_the_purchases() {
        let sol = Solution::from_purchases(vec![
            purchase("A", 10.0, 5.0, 2),
            purchase("B", 20.0, 15.0, 1),
        ], 100, None, true);
        assert_eq!(40.0, sol.total_cost);
        assert_eq!(25.0, sol.total_benefit);
        assert_eq!(3, sol.nb_units());
        assert_eq!(62.5, sol.profitability());
    }
    #[test]
    fn purchases_are_sorted_by_decreasing_benefit() {
        let sol = Solution::from_purchases(vec![
            purchase("A", 10.0, 5.0, 1),
            purchase("B", 20.0, 15.0, 1),
            purchase("C", 20.0, 5.0, 1),
        ], 100, None, true);
        let names = sol.purchases.iter().map(|p| p.action.name()).collect::<Vec<_>>();
        assert_eq!(vec!["B", "A", "C"], names);
    }
    #[test]
    fn zero_quantities_are_dropped() {
        let sol = Solution::from_purchases(vec![purchase("A", 10.0, 5.0, 0)], 100, None, true);
        assert!(sol.purchases.is_empty());
        assert_eq!(Solution::empty(true), sol);
    }
    #[test]
    fn the_total_cost_is_counted_in_cents() {
        // in floating point, 0.1 + 0.2 > 0.3
        let sol = Solution::from_purchases(vec![
            purchase("A", 0.1, 1.0, 1),
            purchase("B", 0.2, 1.0, 1),
        ], 100, None, true);
        assert_eq!(0.3, sol.total_cost);
        assert!(sol.total_cost <= 0.3);
    }
    #[test]
    fn the_total_cost_rounds_each_cost_up() {
        let sol = Solution::from_purchases(vec![purchase("A", 10.000000001, 5.0, 1)], 100, None, true);
        assert_eq!(10.01, sol.total_cost);
    }
    #[test]
    fn stats_can_be_merged() {
        let mut a = SearchStats { explored: 3, pruned: 1 };
        a.merge(SearchStats { explored: 4, pruned: 2 });
        assert_eq!(SearchStats { explored: 7, pruned: 3 }, a);
    }
}
