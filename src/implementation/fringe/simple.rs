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

//! This module provides the implementation of a simple solver fringe (priority queue)

use binary_heap_plus::BinaryHeap;

use crate::{Fringe, MaxUB, SubProblem};

/// The simplest fringe implementation you can think of: it basically consists
/// of a binary heap that pushes and pops subproblems in best-first order
/// (highest upper bound first).
///
/// # Note
/// This is the fringe used by the parallel solver. Hence, you don't need to
/// take any action in order to use the `SimpleFringe`.
pub struct SimpleFringe {
    heap: BinaryHeap<SubProblem, MaxUB>
}
impl SimpleFringe {
    pub fn new() -> Self {
        Self{ heap: BinaryHeap::from_vec_cmp(vec![], MaxUB) }
    }
}
impl Default for SimpleFringe {
    fn default() -> Self {
        Self::new()
    }
}
impl Fringe for SimpleFringe {
    fn push(&mut self, node: SubProblem) {
        self.heap.push(node)
    }

    fn pop(&mut self) -> Option<SubProblem> {
        self.heap.pop()
    }

    fn clear(&mut self) {
        self.heap.clear()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
