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

//! This module provides the sequential branch-and-bound solver.

use tracing::debug;

use crate::{ActionCatalog, ActionOrdering, ConfigError, Cutoff, NoCutoff, SearchStats, Solution, Solver, SolverConfig};

use super::{assemble, trivial_solution, search::{BranchOrder, LocalIncumbent, Pruning, Search, root_node}};

/// This is the solver you will want to use most of the time. It explores the
/// same tree as the `BruteForceSolver` but discards every subtree whose
/// fractional upper bound does not exceed the best benefit found so far.
///
/// The actions are considered by decreasing benefit/cost ratio (this is what
/// makes the bound admissible) and, for each of them, the search first tries
/// to buy it (1 unit, then 2, ...) before it tries to leave it out. This way,
/// a good wallet is found early on, and the pruning kicks in quickly.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let catalog = ActionCatalog::from_actions(vec![
///     Action::new("A", 10.0,  5.0).unwrap(),
///     Action::new("B", 20.0, 15.0).unwrap(),
///     Action::new("C",  5.0,  2.0).unwrap(),
/// ], DedupPolicy::ByName);
/// let config   = SolverConfig::new(30.0, 2);
/// let solution = BoundedBranchSolver::default().solve(&catalog, &config).unwrap();
///
/// assert!(solution.is_exact);
/// assert_eq!(20.0, solution.total_benefit);
/// ```
#[derive(Clone, Copy)]
pub struct BoundedBranchSolver<'a> {
    cutoff: &'a (dyn Cutoff + Send + Sync),
}

impl Default for BoundedBranchSolver<'static> {
    fn default() -> Self {
        BoundedBranchSolver { cutoff: &NoCutoff }
    }
}

impl <'a> BoundedBranchSolver<'a> {
    pub fn new(cutoff: &'a (dyn Cutoff + Send + Sync)) -> Self {
        BoundedBranchSolver { cutoff }
    }
    /// Makes the search stop as soon as the cutoff criterion is met. The best
    /// wallet found so far is then returned (and flagged as not exact).
    pub fn with_cutoff<'b>(self, cutoff: &'b (dyn Cutoff + Send + Sync)) -> BoundedBranchSolver<'b> {
        BoundedBranchSolver { cutoff }
    }
}

impl Solver for BoundedBranchSolver<'_> {
    fn solve(&self, catalog: &ActionCatalog, config: &SolverConfig) -> Result<Solution, ConfigError> {
        if let Some(trivial) = trivial_solution(catalog, config)? {
            return Ok(trivial.with_stats(SearchStats::default()));
        }

        let budget = config.budget_units()?;
        let limit  = config.purchase_limit;
        let items  = ActionOrdering::ByRatio.arrange(catalog, config.scale);
        let mut incumbent = LocalIncumbent::new(items.len());
        let mut search    = Search::new(&items, budget, limit, Pruning::FractionalBound, BranchOrder::BuyFirst, self.cutoff);
        let outcome       = search.explore(&root_node(&items, budget, limit), &mut incumbent);

        debug!(
            explored = search.stats.explored, 
            pruned   = search.stats.pruned, 
            best     = incumbent.benefit, 
            complete = outcome.is_ok(), 
            "branch-and-bound search is over");
        Ok(assemble(catalog, &items, &incumbent.quantities, config, Some(search.stats), outcome.is_ok()))
    }

    fn name(&self) -> &'static str {
        "branch-and-bound"
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_bounded {
    use rand::{Rng, SeedableRng, rngs::SmallRng};

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
    fn random_catalog(rng: &mut SmallRng, size: usize) -> ActionCatalog {
        ActionCatalog::from_actions((0..size).map(|i| {
            let cost    = rng.gen_range(1..=20) as f64;
            let benefit = rng.gen_range(0..=10) as f64;
            action(&format!("action-{i}"), cost, benefit)
        }), DedupPolicy::ByName)
    }

    /// The best benefit reachable from the given state, by exhaustive search
    fn best_completion(items: &[Item], depth: usize, budget: u64, limit: usize, cost: u64, benefit: f64) -> f64 {
        if depth == items.len() {
            return benefit;
        }
        let mut best = best_completion(items, depth + 1, budget, limit, cost, benefit);
        for q in 1..=limit {
            let next = cost + items[depth].cost * q as u64;
            if next <= budget {
                let value = best_completion(items, depth + 1, budget, limit, next, benefit + items[depth].benefit * q as f64);
                best = best.max(value);
            }
        }
        best
    }
    /// Checks that the bound of every state reachable from the given one is
    /// at least as large as the best benefit reachable from that state
    fn check_admissible(items: &[Item], depth: usize, budget: u64, limit: usize, cost: u64, benefit: f64) {
        let ub   = fractional_bound(items, depth, budget, limit, cost, benefit);
        let best = best_completion(items, depth, budget, limit, cost, benefit);
        assert!(ub + 1e-9 >= best, "bound {ub} is below the reachable {best} at depth {depth}");

        if depth < items.len() {
            check_admissible(items, depth + 1, budget, limit, cost, benefit);
            for q in 1..=limit {
                let next = cost + items[depth].cost * q as u64;
                if next <= budget {
                    check_admissible(items, depth + 1, budget, limit, next, benefit + items[depth].benefit * q as f64);
                }
            }
        }
    }

    #[test]
    fn it_finds_the_best_wallet() {
        let solution = BoundedBranchSolver::default().solve(&catalog(), &SolverConfig::new(20.0, 1)).unwrap();
        assert_eq!(1, solution.purchases.len());
        assert_eq!("B", solution.purchases[0].action.name());
        assert_eq!(15.0, solution.total_benefit);
        assert!(solution.is_exact);
    }
    #[test]
    fn it_buys_several_units_when_allowed() {
        let solution = BoundedBranchSolver::default().solve(&catalog(), &SolverConfig::new(30.0, 2)).unwrap();
        assert_eq!(20.0, solution.total_benefit);
        assert!(solution.total_cost <= 30.0);
    }
    #[test]
    fn it_prunes_the_search_tree() {
        let solution = BoundedBranchSolver::default().solve(&catalog(), &SolverConfig::new(20.0, 1)).unwrap();
        let pruned   = solution.stats.unwrap();
        let brute    = BruteForceSolver::default().solve(&catalog(), &SolverConfig::new(20.0, 1)).unwrap();
        let explored = brute.stats.unwrap();
        assert!(pruned.pruned > 0);
        assert!(pruned.explored < explored.explored);
    }
    #[test]
    fn an_exact_budget_optimum_is_not_pruned() {
        // a wallet spending all of the budget is the best one
        let catalog = ActionCatalog::from_actions(vec![action("B", 20.0, 15.0)], DedupPolicy::ByName);
        let solution = BoundedBranchSolver::default().solve(&catalog, &SolverConfig::new(20.0, 1)).unwrap();
        assert_eq!(15.0, solution.total_benefit);
    }
    #[test]
    fn it_never_overspends_on_cents() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 0.1, 1.0),
            action("B", 0.2, 1.0),
        ], DedupPolicy::ByName);
        let solution = BoundedBranchSolver::default().solve(&catalog, &SolverConfig::new(0.3, 1)).unwrap();
        assert_eq!(2.0, solution.total_benefit);
        assert!(solution.total_cost <= 0.3);
    }
    #[test]
    fn it_agrees_with_brute_force() {
        let mut rng = SmallRng::seed_from_u64(20200716);
        for _ in 0..25 {
            let catalog = random_catalog(&mut rng, 7);
            let config  = SolverConfig::new(rng.gen_range(0..=60) as f64, rng.gen_range(1..=3));
            let bnb     = BoundedBranchSolver::default().solve(&catalog, &config).unwrap();
            let brute   = BruteForceSolver::default().solve(&catalog, &config).unwrap();
            assert!((bnb.total_benefit - brute.total_benefit).abs() < 1e-6);
            assert!(bnb.total_cost <= config.max_budget);
        }
    }
    #[test]
    fn the_fractional_bound_is_admissible() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..20 {
            let catalog = random_catalog(&mut rng, 5);
            let budget  = rng.gen_range(10..=60) * 100;
            let limit   = rng.gen_range(1..=3);
            let items   = ActionOrdering::ByRatio.arrange(&catalog, 100);
            check_admissible(&items, 0, budget, limit, 0, 0.0);
        }
    }
    #[test]
    fn an_empty_catalog_yields_an_empty_wallet() {
        let solution = BoundedBranchSolver::default().solve(&ActionCatalog::default(), &SolverConfig::default()).unwrap();
        assert!(solution.purchases.is_empty());
        assert_eq!(0.0, solution.total_benefit);
        assert!(solution.is_exact);
    }
    #[test]
    fn a_zero_budget_yields_an_empty_wallet() {
        let solution = BoundedBranchSolver::default().solve(&catalog(), &SolverConfig::new(0.0, 1)).unwrap();
        assert!(solution.purchases.is_empty());
    }
    #[test]
    fn a_zero_purchase_limit_is_an_error() {
        let outcome = BoundedBranchSolver::default().solve(&catalog(), &SolverConfig::new(20.0, 0));
        assert_eq!(Err(ConfigError::ZeroPurchaseLimit), outcome);
    }
    #[test]
    fn free_actions_are_bought_up_to_the_limit() {
        let catalog = ActionCatalog::from_actions(vec![
            action("FREE", 0.0, 3.0),
            action("B",   20.0, 15.0),
        ], DedupPolicy::ByName);
        let solution = BoundedBranchSolver::default().solve(&catalog, &SolverConfig::new(20.0, 2)).unwrap();
        assert_eq!(21.0, solution.total_benefit);
        assert_eq!(20.0, solution.total_cost);
    }
}
