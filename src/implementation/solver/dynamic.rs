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

//! This module provides a solver based on dynamic programming over a budget
//! expressed in integer minor currency units.

use tracing::debug;

use crate::{ActionCatalog, ActionOrdering, ConfigError, Solution, Solver, SolverConfig};

use super::{assemble, trivial_solution};

/// The largest number of cells the choice table may hold (1 GiB)
const MAX_TABLE_CELLS: u64 = 1 << 28;

/// This solver computes, for every budget between 0 and the maximum budget
/// (in minor currency units), the best benefit that can be earned with the
/// actions considered so far. It then rebuilds the optimal wallet by walking
/// its decisions backwards.
///
/// Its complexity is O(n·B·L) in time and O(n·B) in memory where `n` is the
/// number of actions, `B` the budget in minor units and `L` the purchase
/// limit. Money is counted exactly as the other solvers count it (see
/// `SolverConfig`), hence they all agree on the optimum.
///
/// # Memory
/// The decisions are kept in an n×(B+1) table of `u32`. With 1000 actions
/// and a budget of 500 (50000 cents), that is about 200 MB. A problem whose
/// table would exceed 2^28 cells is rejected with
/// `ConfigError::BudgetTooLarge` before anything is allocated.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// let catalog = ActionCatalog::from_actions(vec![
///     Action::new("A", 10.0,  5.0).unwrap(),
///     Action::new("B", 20.0, 15.0).unwrap(),
///     Action::new("C",  5.0,  2.0).unwrap(),
/// ], DedupPolicy::ByName);
/// let solution = DynamicProgrammingSolver
///     .solve(&catalog, &SolverConfig::new(20.0, 1))
///     .unwrap();
///
/// assert_eq!(15.0, solution.total_benefit);
/// assert!(solution.stats.is_none());
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DynamicProgrammingSolver;

impl Solver for DynamicProgrammingSolver {
    fn solve(&self, catalog: &ActionCatalog, config: &SolverConfig) -> Result<Solution, ConfigError> {
        if let Some(trivial) = trivial_solution(catalog, config)? {
            return Ok(trivial);
        }

        let too_large = ConfigError::BudgetTooLarge(config.max_budget);
        let capacity  = config.budget_units()?;
        let items     = ActionOrdering::Natural.arrange(catalog, config.scale);
        let cells     = (items.len() as u64).checked_mul(capacity + 1)
            .filter(|cells| *cells <= MAX_TABLE_CELLS)
            .ok_or_else(|| too_large.clone())?;
        let capacity  = usize::try_from(capacity).map_err(|_| too_large.clone())?;
        let cells     = usize::try_from(cells).map_err(|_| too_large)?;
        let width     = capacity + 1;
        // quantities are recorded on 32 bits
        let limit     = config.purchase_limit.min(u32::MAX as usize);

        let weights   = items.iter()
            .map(|i| usize::try_from(i.cost).unwrap_or(usize::MAX))
            .collect::<Vec<_>>();

        // best[b] = the best benefit with a budget of at most b minor units
        let mut best   = vec![0.0_f64; width];
        // choice[i * width + b] = the quantity of item i bought in best[b]
        let mut choice = vec![0_u32; cells];

        for (i, item) in items.iter().enumerate() {
            let weight = weights[i];
            // free actions are bought outside of the table
            if weight == 0 || weight > capacity {
                continue;
            }
            let row = &mut choice[i * width..(i + 1) * width];
            let max_quantity = limit.min(capacity / weight);

            // descending budgets: best[b - q*w] still holds the value without item i
            for budget in (weight..=capacity).rev() {
                let mut value    = best[budget];
                let mut quantity = 0;
                for q in 1..=max_quantity.min(budget / weight) {
                    let candidate = best[budget - q * weight] + item.benefit * q as f64;
                    if candidate > value {
                        value    = candidate;
                        quantity = q;
                    }
                }
                best[budget] = value;
                row[budget]  = quantity as u32;
            }
        }

        let mut quantities = vec![0; items.len()];
        let mut budget     = capacity;
        for i in (0..items.len()).rev() {
            if weights[i] == 0 {
                quantities[i] = if items[i].benefit > 0.0 { limit } else { 0 };
            } else if weights[i] <= capacity {
                let quantity  = choice[i * width + budget] as usize;
                quantities[i] = quantity;
                budget       -= quantity * weights[i];
            }
        }

        debug!(scale = config.scale, capacity, best = best[capacity], "dynamic programming is over");
        Ok(assemble(catalog, &items, &quantities, config, None, true))
    }

    fn name(&self) -> &'static str {
        "dynamic"
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_dynamic {
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

    #[test]
    fn it_finds_the_best_wallet() {
        let solution = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::new(20.0, 1)).unwrap();
        assert_eq!(1, solution.purchases.len());
        assert_eq!("B", solution.purchases[0].action.name());
        assert_eq!(15.0, solution.total_benefit);
        assert!(solution.is_exact);
        assert!(solution.stats.is_none());
    }
    #[test]
    fn it_buys_several_units_when_allowed() {
        let solution = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::new(30.0, 2)).unwrap();
        assert_eq!(20.0, solution.total_benefit);
        assert!(solution.total_cost <= 30.0);
        assert!(solution.purchases.iter().all(|p| p.quantity <= 2));
    }
    #[test]
    fn it_handles_cents() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 0.1, 1.0),
            action("B", 0.2, 1.5),
            action("C", 0.3, 2.5),
        ], DedupPolicy::ByName);
        let solution = DynamicProgrammingSolver.solve(&catalog, &SolverConfig::new(0.4, 1)).unwrap();
        assert_eq!(3.5, solution.total_benefit);
    }
    #[test]
    fn a_wallet_of_cents_never_exceeds_the_budget() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 0.1, 1.0),
            action("B", 0.2, 1.0),
        ], DedupPolicy::ByName);
        let config   = SolverConfig::new(0.3, 1);
        let dynamic  = DynamicProgrammingSolver.solve(&catalog, &config).unwrap();
        let brute    = BruteForceSolver::default().solve(&catalog, &config).unwrap();
        assert_eq!(2.0, dynamic.total_benefit);
        assert!(dynamic.total_cost <= config.max_budget);
        assert_eq!(brute.total_benefit, dynamic.total_benefit);
        assert_eq!(brute.total_cost, dynamic.total_cost);
    }
    #[test]
    fn a_cost_a_hair_above_a_cent_is_rounded_up() {
        let catalog  = ActionCatalog::from_actions(vec![action("A", 10.000000001, 5.0)], DedupPolicy::ByName);
        let solution = DynamicProgrammingSolver.solve(&catalog, &SolverConfig::new(10.0, 1)).unwrap();
        assert!(solution.purchases.is_empty());
        assert_eq!(0.0, solution.total_benefit);
    }
    #[test]
    fn it_never_exceeds_the_budget_with_fractional_cents() {
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 10.005, 5.0),
            action("B", 10.005, 5.0),
        ], DedupPolicy::ByName);
        let solution = DynamicProgrammingSolver.solve(&catalog, &SolverConfig::new(20.01, 1)).unwrap();
        assert!(solution.total_cost <= 20.01);
        assert_eq!(5.0, solution.total_benefit);
    }
    #[test]
    fn free_actions_are_bought_up_to_the_limit() {
        let catalog = ActionCatalog::from_actions(vec![
            action("FREE", 0.0, 3.0),
            action("B",   20.0, 15.0),
        ], DedupPolicy::ByName);
        let solution = DynamicProgrammingSolver.solve(&catalog, &SolverConfig::new(20.0, 2)).unwrap();
        assert_eq!(21.0, solution.total_benefit);
    }
    #[test]
    fn unaffordable_actions_are_left_out() {
        let catalog = ActionCatalog::from_actions(vec![
            action("HUGE", 1e12, 1e12),
            action("B",    20.0, 15.0),
        ], DedupPolicy::ByName);
        let solution = DynamicProgrammingSolver.solve(&catalog, &SolverConfig::new(20.0, 1)).unwrap();
        assert_eq!(15.0, solution.total_benefit);
    }
    #[test]
    fn it_agrees_with_brute_force_on_cents() {
        let mut rng = SmallRng::seed_from_u64(1789);
        for _ in 0..25 {
            let catalog = ActionCatalog::from_actions((0..7).map(|i| {
                let cost = rng.gen_range(1..=2000) as f64 / 100.0;
                action(&format!("action-{i}"), cost, rng.gen_range(0..=10) as f64)
            }), DedupPolicy::ByName);
            let config  = SolverConfig::new(rng.gen_range(0..=6000) as f64 / 100.0, rng.gen_range(1..=3));
            let dynamic = DynamicProgrammingSolver.solve(&catalog, &config).unwrap();
            let brute   = BruteForceSolver::default().solve(&catalog, &config).unwrap();
            assert!((dynamic.total_benefit - brute.total_benefit).abs() < 1e-6);
            assert!(dynamic.total_cost <= config.max_budget);
        }
    }
    #[test]
    fn a_budget_too_large_to_be_counted_is_an_error() {
        let outcome = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::new(1e300, 1));
        assert_eq!(Err(ConfigError::BudgetTooLarge(1e300)), outcome);
    }
    #[test]
    fn a_budget_too_large_for_the_table_is_an_error() {
        // 3 actions x 100_000_001 cents does not fit in the table
        let outcome = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::new(1e6, 1));
        assert_eq!(Err(ConfigError::BudgetTooLarge(1e6)), outcome);
    }
    #[test]
    fn a_zero_scale_is_an_error() {
        let outcome = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::default().with_scale(0));
        assert_eq!(Err(ConfigError::InvalidScale), outcome);
    }
    #[test]
    fn a_coarser_scale_counts_whole_currency_units() {
        // at one minor unit per currency unit, 0.5 costs as much as 1
        let catalog = ActionCatalog::from_actions(vec![
            action("A", 0.5, 1.0),
            action("B", 0.5, 1.0),
        ], DedupPolicy::ByName);
        let solution = DynamicProgrammingSolver.solve(&catalog, &SolverConfig::new(1.0, 1).with_scale(1)).unwrap();
        assert_eq!(1.0, solution.total_benefit);
        assert_eq!(1.0, solution.total_cost);
    }
    #[test]
    fn a_zero_purchase_limit_is_an_error() {
        let outcome = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::new(20.0, 0));
        assert_eq!(Err(ConfigError::ZeroPurchaseLimit), outcome);
    }
    #[test]
    fn an_empty_catalog_yields_an_empty_wallet() {
        let solution = DynamicProgrammingSolver.solve(&ActionCatalog::default(), &SolverConfig::default()).unwrap();
        assert!(solution.purchases.is_empty());
        assert_eq!(0.0, solution.total_cost);
    }
    #[test]
    fn a_zero_budget_yields_an_empty_wallet() {
        let solution = DynamicProgrammingSolver.solve(&catalog(), &SolverConfig::new(0.0, 1)).unwrap();
        assert!(solution.purchases.is_empty());
    }
}
