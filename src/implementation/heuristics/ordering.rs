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

//! This module defines how the solvers arrange the actions of a catalog before
//! they start working. All solvers operate on an explicitly ordered sequence
//! of items which is derived once from the catalog. This is what makes their
//! traversal (hence their output) reproducible.

use std::cmp::Ordering;

use crate::{ActionCatalog, cost_in_minor_units};

/// An action of the catalog, seen through the eyes of a solver. The `id`
/// is the position of the action in the catalog it was taken from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub id     : usize,
    /// The cost of one unit, in minor currency units (rounded up)
    pub cost   : u64,
    pub benefit: f64,
}
impl Item {
    /// The benefit earned per minor unit spent on this item
    pub fn ratio(&self) -> f64 {
        if self.cost > 0 {
            self.benefit / self.cost as f64
        } else if self.benefit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

/// The order in which a solver considers the actions of the catalog.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActionOrdering {
    /// The order in which the actions were inserted in the catalog
    Natural,
    /// By decreasing benefit per minor unit. Actions having the same ratio
    /// are sorted by decreasing benefit, and then by catalog order.
    #[default]
    ByRatio,
}

impl ActionOrdering {
    /// Derives the ordered sequence of items a solver is going to work with.
    /// Costs are counted in minor units, `scale` of them per currency unit.
    pub fn arrange(self, catalog: &ActionCatalog, scale: u32) -> Vec<Item> {
        let mut items = catalog.iter().enumerate()
            .map(|(id, a)| Item { id, cost: cost_in_minor_units(a.cost(), scale), benefit: a.benefit() })
            .collect::<Vec<_>>();

        if self == ActionOrdering::ByRatio {
            // stable: ties keep the catalog order
            items.sort_by(by_decreasing_ratio);
        }
        items
    }
}

/// Compares two items so that the one earning the most per minor unit comes
/// first. When both are equally profitable, the one with the highest benefit
/// comes first.
pub fn by_decreasing_ratio(a: &Item, b: &Item) -> Ordering {
    b.ratio().total_cmp(&a.ratio())
        .then_with(|| b.benefit.total_cmp(&a.benefit))
}
