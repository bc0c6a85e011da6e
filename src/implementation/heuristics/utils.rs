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

//! This module provide some convenient utilities to order subproblems.

use std::cmp::Ordering;

use compare::Compare;

use crate::SubProblem;

/// The ordering of a best-first fringe: the subproblem having the highest
/// upper bound comes first. Ties are broken in favor of the subproblem which
/// has already earned the most, and then of the deepest one.
///
/// This object implements the `Compare` trait, as is required to configure
/// the order of a binary heap.
///
/// # Example
/// ```
/// # use profit_optimizer::*;
/// # use compare::Compare;
/// let a = SubProblem { depth: 1, cost: 0, benefit: 0.0, ub: 10.0, path: vec![0] };
/// let b = SubProblem { depth: 1, cost: 500, benefit: 4.0, ub: 12.0, path: vec![1] };
/// assert_eq!(std::cmp::Ordering::Less, MaxUB.compare(&a, &b));
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct MaxUB;
impl Compare<SubProblem> for MaxUB {
    fn compare(&self, l: &SubProblem, r: &SubProblem) -> Ordering {
        l.ub.total_cmp(&r.ub)
            .then_with(|| l.benefit.total_cmp(&r.benefit))
            .then_with(|| l.depth.cmp(&r.depth))
    }
}
