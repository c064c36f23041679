//! Best-first search engine (A* and uniform-cost).
//!
//! The engine knows nothing about the problem it searches. A `SearchSpace`
//! supplies the edge cost, the remaining-cost estimate, the goal test and the
//! neighbor generator; nodes are compared and hashed by value.

use std::collections::HashMap;
use std::hash::Hash;

use tracing::{debug, trace};

use super::frontier::Frontier;

/// The four collaborators a search needs.
pub trait SearchSpace {
    type Node: Clone + Eq + Hash;

    /// Cost of the edge `from -> to`.
    fn cost(&self, from: &Self::Node, to: &Self::Node) -> f64;

    /// Lower bound on the remaining cost from `node` to any goal. Must never
    /// overestimate for the first goal found to be optimal.
    fn estimate(&self, node: &Self::Node) -> f64;

    fn is_goal(&self, node: &Self::Node) -> bool;

    /// Nodes reachable from `node` in one step.
    fn neighbors(&self, node: &Self::Node) -> Vec<Self::Node>;
}

// ---------------------------------------------------------------------------
// SearchOutcome
// ---------------------------------------------------------------------------

/// Bookkeeping left behind by one search call.
#[derive(Debug, Clone)]
pub struct SearchOutcome<N> {
    /// Predecessor of every discovered node except the start.
    pub came_from: HashMap<N, N>,
    /// Best known accumulated cost of every discovered node.
    pub cost_so_far: HashMap<N, f64>,
    /// The goal node, or `None` if the frontier ran dry first.
    pub goal: Option<N>,
    /// Number of nodes handed to the neighbor generator.
    pub expansions: usize,
}

impl<N: Clone + Eq + Hash> SearchOutcome<N> {
    pub fn found(&self) -> bool {
        self.goal.is_some()
    }

    /// Accumulated cost of the goal node.
    pub fn goal_cost(&self) -> Option<f64> {
        self.goal
            .as_ref()
            .and_then(|g| self.cost_so_far.get(g).copied())
    }

    /// Start-to-goal path, both ends included. Empty when no goal was found.
    pub fn path(&self) -> Vec<N> {
        let mut path = Vec::new();
        let mut current = match &self.goal {
            Some(goal) => goal.clone(),
            None => return path,
        };
        // A predecessor chain is at most one longer than the map itself.
        for _ in 0..=self.came_from.len() {
            let previous = self.came_from.get(&current).cloned();
            path.push(current);
            match previous {
                Some(p) => current = p,
                None => break,
            }
        }
        path.reverse();
        path
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// A* search: frontier priority is accumulated cost plus `estimate`.
pub fn astar<S: SearchSpace>(start: S::Node, space: &S) -> SearchOutcome<S::Node> {
    best_first(start, space, true)
}

/// Uniform-cost (Dijkstra) search: same loop, priority is accumulated cost only.
pub fn uniform_cost<S: SearchSpace>(start: S::Node, space: &S) -> SearchOutcome<S::Node> {
    best_first(start, space, false)
}

fn best_first<S: SearchSpace>(
    start: S::Node,
    space: &S,
    use_estimate: bool,
) -> SearchOutcome<S::Node> {
    let mut frontier = Frontier::new();
    let mut came_from: HashMap<S::Node, S::Node> = HashMap::new();
    let mut cost_so_far: HashMap<S::Node, f64> = HashMap::new();
    let mut expansions = 0usize;
    let mut goal = None;

    cost_so_far.insert(start.clone(), 0.0);
    frontier.push(start, 0.0);

    // Stale duplicates are not skipped on pop; re-expanding one cannot improve
    // any recorded cost, so it only adds work.
    while let Some(entry) = frontier.pop_min() {
        let current = entry.into_value();

        if space.is_goal(&current) {
            goal = Some(current);
            break;
        }

        expansions += 1;
        let current_cost = cost_so_far.get(&current).copied().unwrap_or_default();
        let neighbors = space.neighbors(&current);
        trace!(
            expansion = expansions,
            cost = current_cost,
            neighbors = neighbors.len(),
            frontier = frontier.len(),
            "expanding node"
        );

        for next in neighbors {
            let new_cost = current_cost + space.cost(&current, &next);
            let improves = match cost_so_far.get(&next) {
                Some(&known) => new_cost < known,
                None => true,
            };
            if !improves {
                continue;
            }
            let priority = if use_estimate {
                new_cost + space.estimate(&next)
            } else {
                new_cost
            };
            cost_so_far.insert(next.clone(), new_cost);
            came_from.insert(next.clone(), current.clone());
            frontier.push(next, priority);
        }
    }

    debug!(
        found = goal.is_some(),
        expansions,
        discovered = cost_so_far.len(),
        "search finished"
    );

    SearchOutcome {
        came_from,
        cost_so_far,
        goal,
        expansions,
    }
}
