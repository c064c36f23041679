//! Per-node lifecycle classification and per-cluster progress floors.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::state::{NodeState, State};

/// Lifecycle position of a node relative to a target revision.
///
/// `NotStarted` also covers malformed combinations such as a stopped app
/// still in the pool; treating those as step 0 makes the drain the next
/// eligible action, after which the classifier skips the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    /// Wrong revision, still in the pool.
    NotStarted = 0,
    /// Drained from the pool, wrong revision, app still running.
    Drained = 1,
    /// Drained, app stopped, wrong revision.
    Stopped = 2,
    /// Target revision installed, app not running.
    Updated = 3,
    /// Running at target revision, cache cold.
    Started = 4,
    /// Running and warm, not yet back in the pool.
    Warmed = 5,
    /// Target revision, running, warm, in the pool.
    Complete = 6,
}

impl Step {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Classify a node. The checks run in a fixed precedence order.
pub fn step_for_node(node: &NodeState, target_revision: u32) -> Step {
    let wrong_revision = !node.at_revision(target_revision);
    if wrong_revision && node.in_loadbalancer_pool {
        return Step::NotStarted;
    }
    if wrong_revision && node.app_running {
        return Step::Drained;
    }
    if wrong_revision {
        return Step::Stopped;
    }
    if !node.app_running {
        return Step::Updated;
    }
    if !node.cache_warmed {
        return Step::Started;
    }
    if !node.in_loadbalancer_pool {
        return Step::Warmed;
    }
    Step::Complete
}

/// Lowest step among the nodes of `cluster`, or `None` if it has no nodes.
pub fn lowest_step_for_cluster(state: &State, cluster: u32, target_revision: u32) -> Option<Step> {
    state
        .nodes()
        .iter()
        .filter(|n| n.cluster == cluster)
        .map(|n| step_for_node(n, target_revision))
        .min()
}

/// Lowest step of every cluster present in `state`.
pub fn cluster_floors(state: &State, target_revision: u32) -> BTreeMap<u32, Step> {
    let mut floors: BTreeMap<u32, Step> = BTreeMap::new();
    for node in state.nodes() {
        let step = step_for_node(node, target_revision);
        floors
            .entry(node.cluster)
            .and_modify(|s| *s = (*s).min(step))
            .or_insert(step);
    }
    floors
}
