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

//! This module provides the depth first search which is shared by the brute
//! force and the branch-and-bound solvers.
//!
//! Rather than recursing, the search is driven by an explicit stack of
//! frames. The quantities decided along the current branch are recorded on a
//! trail indexed by depth: a frame writes its own decision at its depth when
//! it is popped, and a frame is only ever popped after all the frames of its
//! previous sibling's subtree. Hence no decision ever leaks from one branch
//! to its siblings.
//!
//! Money is counted in whole minor units, so a branch is affordable iff its
//! integer cost does not exceed the integer budget.

use crate::{Cutoff, Item, Reason, SearchStats, SubProblem, affordable_units, fractional_bound};

/// The best complete wallet known to a search
pub(crate) trait Incumbent {
    /// The benefit which must be strictly exceeded to improve the incumbent
    fn best_benefit(&mut self) -> f64;
    /// Records a better wallet: `quantities[i]` units of the i-th item
    fn improve(&mut self, benefit: f64, quantities: &[usize]);
}

/// The incumbent of a search running on a single thread. Initially, it is
/// the empty wallet (which is always feasible).
#[derive(Debug, Clone)]
pub(crate) struct LocalIncumbent {
    pub benefit   : f64,
    pub quantities: Vec<usize>,
}
impl LocalIncumbent {
    pub fn new(nb_items: usize) -> Self {
        LocalIncumbent { benefit: 0.0, quantities: vec![0; nb_items] }
    }
}
impl Incumbent for LocalIncumbent {
    fn best_benefit(&mut self) -> f64 {
        self.benefit
    }
    fn improve(&mut self, benefit: f64, quantities: &[usize]) {
        self.benefit = benefit;
        self.quantities.copy_from_slice(quantities);
    }
}

/// Does the search discard the subtrees which cannot improve the incumbent ?
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Pruning {
    /// Every feasible combination is enumerated
    Exhaustive,
    /// Subtrees whose `fractional_bound` does not exceed the incumbent are
    /// discarded
    FractionalBound,
}

/// In which order are the children of a node explored ?
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum BranchOrder {
    /// Leave the action out first, then buy 1, 2, .. units of it
    SkipFirst,
    /// Buy 1, 2, .. units of the action first, and leave it out last
    BuyFirst,
}

#[derive(Debug, Copy, Clone)]
struct Frame {
    depth   : usize,
    cost    : u64,
    benefit : f64,
    /// The quantity bought of item `depth - 1` (None for the root of a search)
    decision: Option<usize>,
}

pub(crate) struct Search<'a> {
    items     : &'a [Item],
    max_budget: u64,
    limit     : usize,
    pruning   : Pruning,
    order     : BranchOrder,
    cutoff    : &'a dyn Cutoff,
    trail     : Vec<usize>,
    stack     : Vec<Frame>,
    pub stats : SearchStats,
}

impl <'a> Search<'a> {
    /// Prepares a search spending at most `max_budget` minor units and buying
    /// at most `limit` units of each item.
    pub fn new(items: &'a [Item], max_budget: u64, limit: usize, pruning: Pruning, order: BranchOrder, cutoff: &'a dyn Cutoff) -> Self {
        Search {
            items,
            max_budget,
            limit,
            pruning,
            order,
            cutoff,
            trail     : vec![0; items.len()],
            stack     : Vec::with_capacity(items.len().saturating_mul(limit.min(16) + 1)),
            stats     : SearchStats::default(),
        }
    }

    /// Explores the whole subtree rooted in `root` and reports every strict
    /// improvement to the `incumbent`. It fails iff the cutoff stopped the
    /// exploration before it could be completed.
    pub fn explore(&mut self, root: &SubProblem, incumbent: &mut dyn Incumbent) -> Result<(), Reason> {
        self.trail[..root.depth].copy_from_slice(&root.path);
        self.trail[root.depth..].iter_mut().for_each(|q| *q = 0);

        self.stack.clear();
        self.stack.push(Frame { depth: root.depth, cost: root.cost, benefit: root.benefit, decision: None });

        while let Some(frame) = self.stack.pop() {
            if self.cutoff.must_stop() {
                self.stack.clear();
                return Err(Reason::CutoffOccurred);
            }
            if let Some(quantity) = frame.decision {
                self.trail[frame.depth - 1] = quantity;
            }
            self.stats.on_node_explored();

            let best = incumbent.best_benefit();
            if self.pruning == Pruning::FractionalBound {
                let ub = fractional_bound(self.items, frame.depth, self.max_budget, self.limit, frame.cost, frame.benefit);
                if ub <= best {
                    self.stats.on_node_pruned();
                    continue;
                }
            }

            if frame.depth == self.items.len() {
                if frame.benefit > best && frame.cost <= self.max_budget {
                    incumbent.improve(frame.benefit, &self.trail);
                }
            } else {
                self.branch(frame);
            }
        }
        Ok(())
    }

    /// Pushes the children of `frame` onto the stack. Since the stack is LIFO,
    /// the children are pushed in the reverse order of their exploration.
    fn branch(&mut self, frame: Frame) {
        let item  = self.items[frame.depth];
        let depth = frame.depth + 1;
        let skip  = Frame { depth, cost: frame.cost, benefit: frame.benefit, decision: Some(0) };

        if self.order == BranchOrder::BuyFirst {
            self.stack.push(skip);
        }
        // buying an action which brings nothing never helps
        let limit = if item.benefit > 0.0 { self.limit } else { 0 };
        let limit = affordable_units(item.cost, self.max_budget.saturating_sub(frame.cost), limit);
        for quantity in (1..=limit).rev() {
            let cost    = frame.cost + item.cost * quantity as u64;
            let benefit = frame.benefit + item.benefit * quantity as f64;
            self.stack.push(Frame { depth, cost, benefit, decision: Some(quantity) });
        }
        if self.order == BranchOrder::SkipFirst {
            self.stack.push(skip);
        }
    }
}

/// The root of a complete search
pub(crate) fn root_node(items: &[Item], max_budget: u64, limit: usize) -> SubProblem {
    SubProblem {
        depth  : 0,
        cost   : 0,
        benefit: 0.0,
        ub     : fractional_bound(items, 0, max_budget, limit, 0, 0.0),
        path   : vec![],
    }
}
