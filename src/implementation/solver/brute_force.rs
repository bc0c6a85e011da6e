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

//! This module provides the reference solver: an exhaustive enumeration of
//! every feasible wallet.

use tracing::debug;

use crate::{ActionCatalog, ActionOrdering, ConfigError, Cutoff, NoCutoff, SearchStats, Solution, Solver, SolverConfig};

use super::{assemble, trivial_solution, search::{BranchOrder, LocalIncumbent, Pruning, Search, root_node}};

/// This solver enumerates all the feasible combinations of purchases and
/// keeps the most beneficial one. It does not prune anything, so it is only
/// usable on small catalogs. Its purpose is to serve as a reference for the
/// other solvers.
///
/// The actions are considered in catalog order; and for each of them, the
/// search first explores the wallets that leave it out. Among equally
/// beneficial wallets, the first one to be found is kept.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let catalog = ActionCatalog::from_actions(vec![
///     Action::new("A", 10.0,  5.0).unwrap(),
///     Action::new("B", 20.0, 15.0).unwrap(),
///     Action::new("C",  5.0,  2.0).unwrap(),
/// ], DedupPolicy::ByName);
/// let config   = SolverConfig::new(20.0, 1);
/// let solution = BruteForceSolver::default().solve(&catalog, &config).unwrap();
///
/// assert!(solution.is_exact);
/// assert_eq!(15.0, solution.total_benefit);
/// assert_eq!("B", solution.purchases[0].action.name());
/// ```
#[derive(Clone, Copy)]
pub struct BruteForceSolver<'a> {
    cutoff: &'a (dyn Cutoff + Send + Sync),
}

impl Default for BruteForceSolver<'static> {
    fn default() -> Self {
        BruteForceSolver { cutoff: &NoCutoff }
    }
}

impl <'a> BruteForceSolver<'a> {
    pub fn new(cutoff: &'a (dyn Cutoff + Send + Sync)) -> Self {
        BruteForceSolver { cutoff }
    }
    /// Makes the search stop as soon as the cutoff criterion is met
    pub fn with_cutoff<'b>(self, cutoff: &'b (dyn Cutoff + Send + Sync)) -> BruteForceSolver<'b> {
        BruteForceSolver { cutoff }
    }
}

impl Solver for BruteForceSolver<'_> {
    fn solve(&self, catalog: &ActionCatalog, config: &SolverConfig) -> Result<Solution, ConfigError> {
        if let Some(trivial) = trivial_solution(catalog, config)? {
            return Ok(trivial.with_stats(SearchStats::default()));
        }

        let budget = config.budget_units()?;
        let limit  = config.purchase_limit;
        let items  = ActionOrdering::Natural.arrange(catalog, config.scale);
        let mut incumbent = LocalIncumbent::new(items.len());
        let mut search    = Search::new(&items, budget, limit, Pruning::Exhaustive, BranchOrder::SkipFirst, self.cutoff);
        let outcome       = search.explore(&root_node(&items, budget, limit), &mut incumbent);

        debug!(explored = search.stats.explored, best = incumbent.benefit, complete = outcome.is_ok(), "brute force search is over");
        Ok(assemble(catalog, &items, &incumbent.quantities, config, Some(search.stats), outcome.is_ok()))
    }

    fn name(&self) -> &'static str {
        "brute-force"
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_brute_force {
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
    fn names(solution: &Solution) -> Vec<(&str, usize)> {
        solution.purchases.iter().map(|p| (p.action.name(), p.quantity)).collect()
    }

    #[test]
    fn it_finds_the_best_wallet() {
        let solution = BruteForceSolver::default().solve(&catalog(), &SolverConfig::new(20.0, 1)).unwrap();
        assert_eq!(vec![("B", 1)], names(&solution));
        assert_eq!(20.0, solution.total_cost);
        assert_eq!(15.0, solution.total_benefit);
        assert!(solution.is_exact);
    }
    #[test]
    fn it_buys_several_units_when_allowed() {
        let solution = BruteForceSolver::default().solve(&catalog(), &SolverConfig::new(30.0, 2)).unwrap();
        assert_eq!(20.0, solution.total_benefit);
        assert!(solution.total_cost <= 30.0);
        assert!(solution.purchases.iter().all(|p| p.quantity <= 2));
    }
    #[test]
    fn it_explores_the_whole_tree() {
        let solution = BruteForceSolver::default().solve(&catalog(), &SolverConfig::new(1000.0, 1)).unwrap();
        let stats    = solution.stats.unwrap();
        assert_eq!(15, stats.explored);
        assert_eq!(0,  stats.pruned);
        assert_eq!(22.0, solution.total_benefit);
    }
    #[test]
    fn a_wallet_of_cents_spending_the_whole_budget_is_affordable() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 0.1, 1.0),
            action("B", 0.2, 1.0),
        ], DedupPolicy::ByName);
        let solution = BruteForceSolver::default().solve(&catalog, &SolverConfig::new(0.3, 1)).unwrap();
        assert_eq!(vec![("A", 1), ("B", 1)], names(&solution));
        assert_eq!(2.0, solution.total_benefit);
        assert_eq!(0.3, solution.total_cost);
    }
    #[test]
    fn a_cost_a_hair_above_the_budget_is_unaffordable() {
        let catalog  = ActionCatalog::from_actions(vec![action("A", 10.000000001, 5.0)], DedupPolicy::ByName);
        let solution = BruteForceSolver::default().solve(&catalog, &SolverConfig::new(10.0, 1)).unwrap();
        assert!(solution.purchases.is_empty());
        assert_eq!(0.0, solution.total_cost);
    }
    #[test]
    fn ties_are_broken_in_favor_of_the_first_wallet_found() {
        // A is skipped first, so {B} is found before {A} which is not strictly better
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 10.0, 5.0),
            action("B", 10.0, 5.0),
        ], DedupPolicy::ByName);
        let solution = BruteForceSolver::default().solve(&catalog, &SolverConfig::new(10.0, 1)).unwrap();
        assert_eq!(vec![("B", 1)], names(&solution));
    }
    #[test]
    fn an_empty_catalog_yields_an_empty_wallet() {
        let solution = BruteForceSolver::default().solve(&ActionCatalog::default(), &SolverConfig::default()).unwrap();
        assert!(solution.purchases.is_empty());
        assert_eq!(0.0, solution.total_cost);
        assert_eq!(0.0, solution.total_benefit);
        assert_eq!(Some(SearchStats::default()), solution.stats);
    }
    #[test]
    fn a_zero_budget_yields_an_empty_wallet() {
        let solution = BruteForceSolver::default().solve(&catalog(), &SolverConfig::new(0.0, 1)).unwrap();
        assert!(solution.purchases.is_empty());
        assert!(solution.is_exact);
    }
    #[test]
    fn a_zero_purchase_limit_is_an_error() {
        let outcome = BruteForceSolver::default().solve(&catalog(), &SolverConfig::new(20.0, 0));
        assert_eq!(Err(ConfigError::ZeroPurchaseLimit), outcome);
    }
    #[test]
    fn an_interrupted_search_is_not_exact() {
        struct Always;
        impl Cutoff for Always {
            fn must_stop(&self) -> bool { true }
        }
        let solution = BruteForceSolver::default().with_cutoff(&Always)
            .solve(&catalog(), &SolverConfig::new(20.0, 1)).unwrap();
        assert!(!solution.is_exact);
        assert!(solution.purchases.is_empty());
    }
    #[test]
    fn it_has_a_name() {
        assert_eq!("brute-force", BruteForceSolver::default().name());
    }
}
