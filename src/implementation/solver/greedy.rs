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

//! This module provides a fast heuristic which fills the budget with the most
//! profitable actions first.

use tracing::debug;

use crate::{ActionCatalog, ActionOrdering, ConfigError, Solution, Solver, SolverConfig, affordable_units};

use super::{assemble, trivial_solution};

/// This heuristic considers the actions by decreasing benefit/cost ratio and
/// buys as many units of each of them as the remaining budget (and the
/// purchase limit) allows. It runs in O(n log n) but offers no guarantee of
/// optimality: its solutions are never flagged as exact (except for the
/// trivial problems).
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let catalog = ActionCatalog::from_actions(vec![
///     Action::new("A", 10.0,  5.0).unwrap(),
///     Action::new("B", 20.0, 15.0).unwrap(),
///     Action::new("C",  5.0,  2.0).unwrap(),
/// ], DedupPolicy::ByName);
/// let solution = GreedyHeuristicSolver.solve(&catalog, &SolverConfig::new(20.0, 1)).unwrap();
///
/// assert!(!solution.is_exact);
/// assert_eq!(15.0, solution.total_benefit);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyHeuristicSolver;

impl Solver for GreedyHeuristicSolver {
    fn solve(&self, catalog: &ActionCatalog, config: &SolverConfig) -> Result<Solution, ConfigError> {
        if let Some(trivial) = trivial_solution(catalog, config)? {
            return Ok(trivial);
        }

        let items = ActionOrdering::ByRatio.arrange(catalog, config.scale);
        let mut quantities = vec![0; items.len()];
        let mut remaining  = config.budget_units()?;
        for (item, quantity) in items.iter().zip(quantities.iter_mut()) {
            if remaining == 0 && item.cost > 0 {
                break;
            }
            if item.benefit <= 0.0 {
                continue;
            }
            *quantity  = affordable_units(item.cost, remaining, config.purchase_limit);
            remaining -= item.cost * *quantity as u64;
        }

        debug!(remaining, "greedy fill is over");
        Ok(assemble(catalog, &items, &quantities, config, None, false))
    }

    fn name(&self) -> &'static str {
        "greedy"
    }
}

#[cfg(test)]
mod test_greedy {
    use crate::*;

    fn action(name: &str, cost: f64, benefit: f64) -> Action {
        Action::new(name, cost, benefit).unwrap()
    }
    fn catalog() -> ActionCatalog {
        ActionCatalog::from_actions(vec![
            action("A", 10.0,  5.0),
            action("B", 20.0, 15.0),
            action("C",  5.0,  2.0),
        ], DedupPolicy::ByName)
    }

    #[test]
    fn it_buys_the_best_ratios_first() {
        let solution = GreedyHeuristicSolver.solve(&catalog(), &SolverConfig::new(35.0, 1)).unwrap();
        let names    = solution.purchases.iter().map(|p| p.action.name()).collect::<Vec<_>>();
        assert_eq!(vec!["B", "A", "C"], names);
        assert_eq!(22.0, solution.total_benefit);
        assert!(!solution.is_exact);
        assert!(solution.stats.is_none());
    }
    #[test]
    fn it_buys_up_to_the_limit() {
        let solution = GreedyHeuristicSolver.solve(&catalog(), &SolverConfig::new(50.0, 2)).unwrap();
        // 2 B, then 1 A
        assert_eq!(35.0, solution.total_benefit);
        assert_eq!(50.0, solution.total_cost);
    }
    #[test]
    fn it_skips_what_it_cannot_afford() {
        // B, then C since A does not fit
        let solution = GreedyHeuristicSolver.solve(&catalog(), &SolverConfig::new(27.0, 1)).unwrap();
        assert_eq!(17.0, solution.total_benefit);
        assert_eq!(25.0, solution.total_cost);
    }
    #[test]
    fn it_never_overspends_on_cents() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 0.1, 1.0),
            action("B", 0.2, 1.0),
        ], DedupPolicy::ByName);
        let solution = GreedyHeuristicSolver.solve(&catalog, &SolverConfig::new(0.3, 1)).unwrap();
        assert_eq!(2.0, solution.total_benefit);
        assert_eq!(0.3, solution.total_cost);
    }
    #[test]
    fn it_may_miss_the_optimum() {
        let catalog = ActionCatalog::from_actions(vec![
            action("SMALL", 1.0, 2.0),
            action("LARGE", 10.0, 10.0),
        ], DedupPolicy::ByName);
        let config  = SolverConfig::new(10.0, 1);
        let greedy  = GreedyHeuristicSolver.solve(&catalog, &config).unwrap();
        let optimum = BoundedBranchSolver::default().solve(&catalog, &config).unwrap();
        assert_eq!(2.0,  greedy.total_benefit);
        assert_eq!(10.0, optimum.total_benefit);
    }
    #[test]
    fn an_empty_catalog_yields_an_empty_wallet() {
        let solution = GreedyHeuristicSolver.solve(&ActionCatalog::default(), &SolverConfig::default()).unwrap();
        assert!(solution.purchases.is_empty());
    }
    #[test]
    fn a_zero_purchase_limit_is_an_error() {
        let outcome = GreedyHeuristicSolver.solve(&catalog(), &SolverConfig::new(20.0, 0));
        assert_eq!(Err(ConfigError::ZeroPurchaseLimit), outcome);
    }
}
