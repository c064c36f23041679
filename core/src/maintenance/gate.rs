//! Cluster safety gate: at most one cluster may be degraded at a time.

use std::collections::BTreeSet;

use crate::types::state::State;

/// Clusters with at least one node outside the load-balancer pool.
pub fn down_clusters(state: &State) -> BTreeSet<u32> {
    state
        .nodes()
        .iter()
        .filter(|n| !n.in_loadbalancer_pool)
        .map(|n| n.cluster)
        .collect()
}

/// The one cluster allowed to start or continue taking nodes down.
///
/// - two or more clusters already down: `None`, nothing may be drained
/// - exactly one cluster down: that cluster, so it finishes first
/// - none down: the lowest-numbered cluster still off the target revision
/// - none down and all at target: `None`, nothing left to do
pub fn downable_cluster(state: &State, target_revision: u32) -> Option<u32> {
    let down = down_clusters(state);
    match down.len() {
        0 => state
            .nodes()
            .iter()
            .filter(|n| !n.at_revision(target_revision))
            .map(|n| n.cluster)
            .min(),
        1 => down.into_iter().next(),
        _ => None,
    }
}
