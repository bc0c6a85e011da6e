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

//! This module provides the implementation of a parallel branch-and-bound
//! solver. That is a solver that will solve the problem using as many threads
//! as requested. By default, it uses as many threads as the number of hardware
//! threads available on the machine.

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::{ActionCatalog, ActionOrdering, ConfigError, Cutoff, Fringe, Item, NoCutoff, Reason, SearchStats, SimpleFringe, Solution, Solver, SolverConfig, SubProblem, affordable_units, fractional_bound};

use super::{assemble, trivial_solution, search::{BranchOrder, Incumbent, Pruning, Search, root_node}};

/// The number of subproblems that are created (at least) for each thread
const SUBPROBLEMS_PER_THREAD: usize = 8;
/// The number of times a worker consults its cached view of the best benefit
/// before it refreshes it from the shared state.
const REFRESH_PERIOD: u32 = 1024;

/// The shared data that may only be manipulated within critical sections
struct Critical {
    /// This is the fringe: the set of subproblems that must still be explored
    /// before the problem can be considered 'solved'.
    ///
    /// # Note:
    /// This fringe orders the subproblems by upper bound (so the highest ub is
    /// going to pop first). So, it is guaranteed that the upper bound of the
    /// first subproblem being popped is an upper bound on the benefit reachable
    /// by exploring any of the subproblems remaining on the fringe. As a
    /// consequence, the exploration can be stopped as soon as a subproblem
    /// with an ub <= current best benefit is popped.
    fringe: SimpleFringe,
    /// This is the number of subproblems that are currently being explored.
    ///
    /// # Note
    /// This is the piece of information that lets us distinguish between a
    /// starvation and the completion of the resolution. It needs to be
    /// carefully managed to guarantee the termination of all threads.
    ongoing: usize,
    /// The benefit of the best wallet found so far
    best_benefit: f64,
    /// The quantities of the best wallet found so far
    best_quantities: Vec<usize>,
    /// The counters of all threads together
    stats: SearchStats,
    /// If we decide not to go through a complete proof of optimality, this is
    /// the reason why we took that decision.
    abort_proof: Option<Reason>,
}
/// The state which is shared among the many running threads: it provides an
/// access to the critical data (protected by a mutex) as well as a monitor
/// (condvar) to park threads in case of starvation.
struct Shared<'a> {
    /// The items of the problem, by decreasing ratio
    items: &'a [Item],
    /// The budget, in minor units
    budget: u64,
    /// The maximum number of units of one item
    limit: usize,
    /// The subproblems above this depth are split in smaller subproblems
    /// rather than being explored
    split_depth: usize,
    /// A cutoff heuristic meant to decide when to stop the resolution
    cutoff: &'a (dyn Cutoff + Send + Sync),
    /// The critical data
    critical: Mutex<Critical>,
    /// This is the monitor on which threads must wait when facing an empty
    /// fringe. Whenever a thread has completed the processing of a subproblem,
    /// it must wake-up all parked threads waiting on this monitor.
    monitor: Condvar,
}
/// The workload a thread can get from the shared state
enum WorkLoad {
    /// There is no work left to be done: you can safely terminate
    Complete,
    /// The work must stop because of an external cutoff
    Aborted,
    /// There is nothing you can do right now. Check again when you wake up
    Starvation,
    /// The item to process
    WorkItem { node: SubProblem },
}

/// The view a worker has of the best wallet. It is shared among all threads,
/// but the best benefit is only read from the shared state every now and
/// then. A stale view only means that a little less is pruned.
struct SharedIncumbent<'s, 'a> {
    shared: &'s Shared<'a>,
    cached: f64,
    reads : u32,
}
impl <'s, 'a> SharedIncumbent<'s, 'a> {
    fn new(shared: &'s Shared<'a>) -> Self {
        let cached = shared.critical.lock().best_benefit;
        SharedIncumbent { shared, cached, reads: 0 }
    }
}
impl Incumbent for SharedIncumbent<'_, '_> {
    fn best_benefit(&mut self) -> f64 {
        self.reads += 1;
        if self.reads >= REFRESH_PERIOD {
            self.reads  = 0;
            self.cached = self.shared.critical.lock().best_benefit;
        }
        self.cached
    }
    fn improve(&mut self, benefit: f64, quantities: &[usize]) {
        let mut critical = self.shared.critical.lock();
        if benefit > critical.best_benefit {
            critical.best_benefit = benefit;
            critical.best_quantities.copy_from_slice(quantities);
        }
        self.cached = critical.best_benefit;
    }
}

/// This is the structure implementing a multi-threaded branch-and-bound
/// solver. The top of the search tree is split in a number of subproblems
/// which are placed on a fringe (ordered by decreasing upper bound). The
/// threads then take turns picking the most promising subproblem and
/// exploring it depth first. All threads share the same incumbent.
///
/// # Example Usage
/// ```
/// # use profit_optimizer::*;
/// let catalog = ActionCatalog::from_actions(vec![
///     Action::new("A", 10.0,  5.0).unwrap(),
///     Action::new("B", 20.0, 15.0).unwrap(),
///     Action::new("C",  5.0,  2.0).unwrap(),
/// ], DedupPolicy::ByName);
/// let solver   = ParallelBranchSolver::default().with_nb_threads(2);
/// let solution = solver.solve(&catalog, &SolverConfig::new(20.0, 1)).unwrap();
///
/// assert!(solution.is_exact);
/// assert_eq!(15.0, solution.total_benefit);
/// ```
#[derive(Clone, Copy)]
pub struct ParallelBranchSolver<'a> {
    cutoff: &'a (dyn Cutoff + Send + Sync),
    /// The number of threads spawned to solve a problem
    nb_threads: usize,
}

impl Default for ParallelBranchSolver<'static> {
    fn default() -> Self {
        ParallelBranchSolver { cutoff: &NoCutoff, nb_threads: num_cpus::get() }
    }
}

impl <'a> ParallelBranchSolver<'a> {
    pub fn new(cutoff: &'a (dyn Cutoff + Send + Sync), nb_threads: usize) -> Self {
        ParallelBranchSolver { cutoff, nb_threads: nb_threads.max(1) }
    }
    /// Sets the number of threads used by the solver
    pub fn with_nb_threads(mut self, nb_threads: usize) -> Self {
        self.nb_threads = nb_threads.max(1);
        self
    }
    /// Makes the search stop as soon as the cutoff criterion is met
    pub fn with_cutoff<'b>(self, cutoff: &'b (dyn Cutoff + Send + Sync)) -> ParallelBranchSolver<'b> {
        ParallelBranchSolver { cutoff, nb_threads: self.nb_threads }
    }
    pub fn nb_threads(&self) -> usize {
        self.nb_threads
    }

    /// The depth at which there are enough subproblems to keep all threads busy
    fn split_depth(&self, nb_items: usize, limit: usize) -> usize {
        let wanted    = self.nb_threads.saturating_mul(SUBPROBLEMS_PER_THREAD);
        let branching = limit.saturating_add(1);
        let mut depth = 0;
        let mut width = 1_usize;
        while depth < nb_items && width < wanted {
            width  = width.saturating_mul(branching);
            depth += 1;
        }
        depth
    }
}

/// Processes one subproblem: either it is split into its children which
/// are pushed onto the fringe, or it is explored depth first.
fn process_one_node(shared: &Shared, search: &mut Search, node: SubProblem) -> Result<(), Reason> {
    if node.depth < shared.split_depth {
        split(shared, node);
        Ok(())
    } else {
        let mut incumbent = SharedIncumbent::new(shared);
        search.explore(&node, &mut incumbent)
    }
}
/// Pushes the children of `node` whose bound exceeds the best benefit
fn split(shared: &Shared, node: SubProblem) {
    let item  = shared.items[node.depth];
    let depth = node.depth + 1;
    let max_budget = shared.budget;
    let limit      = shared.limit;

    let max_quantity = if item.benefit > 0.0 { limit } else { 0 };
    let max_quantity = affordable_units(item.cost, max_budget.saturating_sub(node.cost), max_quantity);

    let mut critical = shared.critical.lock();
    critical.stats.on_node_explored();
    for quantity in 0..=max_quantity {
        let cost    = node.cost + item.cost * quantity as u64;
        let benefit = node.benefit + item.benefit * quantity as f64;
        let ub      = fractional_bound(shared.items, depth, max_budget, limit, cost, benefit);
        if ub <= critical.best_benefit {
            critical.stats.on_node_pruned();
            continue;
        }
        let mut path = Vec::with_capacity(depth);
        path.extend_from_slice(&node.path);
        path.push(quantity);
        critical.fringe.push(SubProblem { depth, cost, benefit, ub, path });
    }
}
/// Acknowledges that a thread finished processing its subproblem
fn notify_node_finished(shared: &Shared) {
    let mut critical = shared.critical.lock();
    critical.ongoing -= 1;
    shared.monitor.notify_all();
}
/// Stops the search altogether
fn abort_search(shared: &Shared, reason: Reason) {
    let mut critical = shared.critical.lock();
    critical.abort_proof = Some(reason);
    critical.fringe.clear();
}
/// Consults the shared state to fetch a workload
fn get_workload(shared: &Shared) -> WorkLoad {
    let mut critical = shared.critical.lock();

    // Are we done ?
    if critical.ongoing == 0 && critical.fringe.is_empty() {
        return WorkLoad::Complete;
    }

    // Do we need to stop
    if critical.abort_proof.is_some() {
        return WorkLoad::Aborted;
    }

    // Nothing to do yet ? => Wait for someone to post jobs
    let node = match critical.fringe.pop() {
        Some(node) => node,
        None => {
            shared.monitor.wait(&mut critical);
            return WorkLoad::Starvation;
        }
    };

    // Nothing relevant ? => nothing else on the fringe is either
    if node.ub <= critical.best_benefit {
        critical.stats.on_node_pruned();
        critical.fringe.clear();
        return WorkLoad::Starvation;
    }

    critical.ongoing += 1;
    WorkLoad::WorkItem { node }
}

impl Solver for ParallelBranchSolver<'_> {
    fn solve(&self, catalog: &ActionCatalog, config: &SolverConfig) -> Result<Solution, ConfigError> {
        if let Some(trivial) = trivial_solution(catalog, config)? {
            return Ok(trivial.with_stats(SearchStats::default()));
        }

        let budget = config.budget_units()?;
        let items  = ActionOrdering::ByRatio.arrange(catalog, config.scale);
        let shared = Shared {
            items      : &items,
            budget,
            limit      : config.purchase_limit,
            split_depth: self.split_depth(items.len(), config.purchase_limit),
            cutoff     : self.cutoff,
            critical   : Mutex::new(Critical {
                fringe         : SimpleFringe::new(),
                ongoing        : 0,
                best_benefit   : 0.0,
                best_quantities: vec![0; items.len()],
                stats          : SearchStats::default(),
                abort_proof    : None,
            }),
            monitor    : Condvar::new(),
        };
        shared.critical.lock().fringe.push(root_node(&items, budget, config.purchase_limit));

        std::thread::scope(|s| {
            for _ in 0..self.nb_threads {
                let shared = &shared;
                s.spawn(move || {
                    let mut search = Search::new(shared.items, shared.budget, shared.limit, Pruning::FractionalBound, BranchOrder::BuyFirst, shared.cutoff);
                    loop {
                        match get_workload(shared) {
                            WorkLoad::Complete   => break,
                            WorkLoad::Aborted    => break,
                            WorkLoad::Starvation => continue,
                            WorkLoad::WorkItem { node } => {
                                let outcome = process_one_node(shared, &mut search, node);
                                if let Err(reason) = outcome {
                                    abort_search(shared, reason);
                                    notify_node_finished(shared);
                                    break;
                                } else {
                                    notify_node_finished(shared);
                                }
                            }
                        }
                    }
                    shared.critical.lock().stats.merge(search.stats);
                });
            }
        });

        let critical = shared.critical.into_inner();
        debug!(
            threads  = self.nb_threads,
            explored = critical.stats.explored,
            pruned   = critical.stats.pruned,
            best     = critical.best_benefit,
            complete = critical.abort_proof.is_none(),
            "parallel branch-and-bound search is over");

        let is_exact = critical.abort_proof.is_none();
        Ok(assemble(catalog, &items, &critical.best_quantities, config, Some(critical.stats), is_exact))
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}

// ############################################################################
// #### TESTS #################################################################
// ############################################################################
