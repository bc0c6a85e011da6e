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

//! This module converts amounts of money to and from whole minor currency
//! units (cents by default). All solvers decide what is affordable by adding
//! up integer minor units. This way, they all agree on what fits in a budget
//! and the floating point noise of amounts such as 0.1 + 0.2 never lets a
//! wallet overflow its budget.

/// By default, amounts are expressed in cents
pub const DEFAULT_SCALE_FACTOR: u32 = 100;
/// The largest number of minor units an amount may be made of. Beyond this
/// point, consecutive integers are no longer representable as `f64`.
pub const MAX_MINOR_UNITS: u64 = 1 << 53;

/// Returns the smallest number of minor units which is worth at least `cost`.
/// Hence, a cost is never rounded down and a positive cost is never free.
///
/// A cost too large to be counted is mapped to `MAX_MINOR_UNITS + 1`, which
/// no budget can afford.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// assert_eq!(110,  cost_in_minor_units(1.1, 100));
/// assert_eq!(1001, cost_in_minor_units(10.000000001, 100));
/// assert_eq!(1,    cost_in_minor_units(0.0001, 100));
/// ```
pub fn cost_in_minor_units(cost: f64, scale: u32) -> u64 {
    if cost.is_nan() || cost <= 0.0 {
        return 0;
    }
    let scale  = f64::from(scale.max(1));
    let scaled = cost * scale;
    if !(scaled < MAX_MINOR_UNITS as f64) {
        return MAX_MINOR_UNITS + 1;
    }
    // the product may be off by one ulp in either direction
    let mut units = (scaled.round() as u64).max(1);
    while (units as f64) / scale < cost {
        units += 1;
    }
    while units > 1 && ((units - 1) as f64) / scale >= cost {
        units -= 1;
    }
    units
}

/// Returns the largest number of minor units which is worth at most
/// `budget`, or None when that number exceeds `MAX_MINOR_UNITS`.
///
/// For any `units` not larger than the returned value,
/// `minor_units_to_amount(units, scale) <= budget` holds.
pub fn budget_in_minor_units(budget: f64, scale: u32) -> Option<u64> {
    if budget.is_nan() || budget <= 0.0 {
        return Some(0);
    }
    let scale  = f64::from(scale.max(1));
    let scaled = budget * scale;
    if !(scaled <= MAX_MINOR_UNITS as f64) {
        return None;
    }
    let mut units = scaled.round() as u64;
    while units > 0 && (units as f64) / scale > budget {
        units -= 1;
    }
    while units < MAX_MINOR_UNITS && ((units + 1) as f64) / scale <= budget {
        units += 1;
    }
    Some(units)
}

/// Converts a number of minor units back into an amount of money
pub fn minor_units_to_amount(units: u64, scale: u32) -> f64 {
    units as f64 / f64::from(scale.max(1))
}

#[cfg(test)]
mod test_money {
    use crate::{budget_in_minor_units, cost_in_minor_units, minor_units_to_amount, MAX_MINOR_UNITS};

    #[test]
    fn whole_cents_are_counted_exactly() {
        assert_eq!(10,    cost_in_minor_units(0.1, 100));
        assert_eq!(20,    cost_in_minor_units(0.2, 100));
        assert_eq!(30,    cost_in_minor_units(0.3, 100));
        assert_eq!(110,   cost_in_minor_units(1.1, 100));
        assert_eq!(50000, cost_in_minor_units(500.0, 100));
    }
    #[test]
    fn costs_are_rounded_up() {
        assert_eq!(1001, cost_in_minor_units(10.001, 100));
        assert_eq!(1001, cost_in_minor_units(10.000000001, 100));
        assert_eq!(1,    cost_in_minor_units(0.0001, 100));
        assert_eq!(0,    cost_in_minor_units(0.0, 100));
    }
    #[test]
    fn budgets_are_rounded_down() {
        assert_eq!(Some(1000),  budget_in_minor_units(10.009, 100));
        assert_eq!(Some(999),   budget_in_minor_units(9.999999999, 100));
        assert_eq!(Some(110),   budget_in_minor_units(1.1, 100));
        assert_eq!(Some(30),    budget_in_minor_units(0.3, 100));
        assert_eq!(Some(50000), budget_in_minor_units(500.0, 100));
        assert_eq!(Some(0),     budget_in_minor_units(0.0, 100));
    }
    #[test]
    fn huge_amounts_cannot_be_counted() {
        assert_eq!(None, budget_in_minor_units(1e300, 100));
        assert_eq!(MAX_MINOR_UNITS + 1, cost_in_minor_units(1e300, 100));
    }
    #[test]
    fn an_affordable_number_of_units_is_never_worth_more_than_the_budget() {
        for cents in 0..5000_u64 {
            let budget = cents as f64 / 100.0;
            let units  = budget_in_minor_units(budget, 100).unwrap();
            assert_eq!(cents, units);
            assert!(minor_units_to_amount(units, 100) <= budget);
        }
    }
    #[test]
    fn a_cost_is_never_worth_less_than_its_minor_units() {
        for cents in 1..5000_u64 {
            let cost  = cents as f64 / 100.0;
            let units = cost_in_minor_units(cost, 100);
            assert_eq!(cents, units);
            assert!(minor_units_to_amount(units, 100) >= cost);
        }
    }
}
