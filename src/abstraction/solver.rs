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

//! This module defines the `Solver` trait.

use crate::{ActionCatalog, SolverConfig, Solution, ConfigError};

/// This is the solver abstraction. It is implemented by every strategy that
/// is able to pick a wallet of actions within a given budget: be it an exact
/// method (brute force, branch-and-bound, dynamic programming) or an
/// heuristic one (greedy).
///
/// A solver does not keep any state from one call to the next: everything it
/// needs for a resolution is created when `solve` is called and dropped when
/// it returns. Hence, one and the same solver can safely be used to solve
/// several (independent) problems concurrently.
pub trait Solver {
    /// This method orders the solver to look for the most profitable wallet
    /// of actions from the `catalog` that fits within the budget and purchase
    /// limit given in `config`.
    ///
    /// The returned `Solution` is always feasible. It is marked **exact** when
    /// the solver has proved that no better wallet exists. An heuristic only
    /// does so for the trivial problems, and an exact method which was stopped
    /// by some cutoff criterion before it could complete its proof never does.
    ///
    /// An empty catalog or a zero budget are not errors: they simply yield an
    /// empty wallet. However, a configuration which does not make sense (e.g.
    /// a purchase limit of zero) is rejected before any work is attempted.
    fn solve(&self, catalog: &ActionCatalog, config: &SolverConfig) -> Result<Solution, ConfigError>;

    /// A short human readable name for this strategy
    fn name(&self) -> &'static str;
}
