//! Remaining-cost estimate, goal test and edge cost for the planner.
//!
//! The estimate counts only the steps each node must take on its own and
//! ignores cluster barriers and the safety gate, so it never exceeds the
//! length of a real plan.

use crate::types::state::{NodeState, State};

/// Every action costs the same.
pub const EDGE_COST: f64 = 1.0;

/// Minimum number of actions `node` still needs.
pub fn node_estimate(node: &NodeState, target_revision: u32) -> u32 {
    let mut cost = 0;
    if !node.at_revision(target_revision) {
        // update, start, warm, add back
        cost += 4;
        // A stopped node can still be pooled, so draining and stopping are
        // counted separately.
        if node.in_loadbalancer_pool {
            cost += 1;
        }
        if node.app_running {
            cost += 1;
        }
    } else {
        if !node.app_running {
            cost += 1;
        }
        if !node.cache_warmed {
            cost += 1;
        }
        if !node.in_loadbalancer_pool {
            cost += 1;
        }
    }
    cost
}

/// Sum of the per-node estimates.
pub fn state_estimate(state: &State, target_revision: u32) -> f64 {
    state
        .nodes()
        .iter()
        .map(|n| f64::from(node_estimate(n, target_revision)))
        .sum()
}

/// Every node runs the target revision and is back in the pool.
pub fn is_goal(state: &State, target_revision: u32) -> bool {
    state
        .nodes()
        .iter()
        .all(|n| n.at_revision(target_revision) && n.in_loadbalancer_pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_node(revision: u32, running: bool, pooled: bool, warm: bool) -> NodeState {
        NodeState {
            name: "n".into(),
            cluster: 1,
            software_revision: revision,
            app_running: running,
            in_loadbalancer_pool: pooled,
            cache_warmed: warm,
        }
    }

    #[test]
    fn wrong_revision_bounds() {
        assert_eq!(node_estimate(&make_node(1, true, true, true), 2), 6);
        assert_eq!(node_estimate(&make_node(1, true, false, true), 2), 5);
        assert_eq!(node_estimate(&make_node(1, false, true, false), 2), 5);
        assert_eq!(node_estimate(&make_node(1, false, false, false), 2), 4);
        // Warmth is irrelevant before the update.
        assert_eq!(node_estimate(&make_node(1, false, false, true), 2), 4);
    }

    #[test]
    fn right_revision_counts_missing_facts() {
        assert_eq!(node_estimate(&make_node(2, true, true, true), 2), 0);
        assert_eq!(node_estimate(&make_node(2, false, false, false), 2), 3);
        assert_eq!(node_estimate(&make_node(2, true, false, false), 2), 2);
        assert_eq!(node_estimate(&make_node(2, true, false, true), 2), 1);
    }

    #[test]
    fn state_estimate_sums_nodes() {
        let state = State::new(vec![
            make_node(1, true, true, true),
            make_node(1, false, false, false),
            make_node(2, true, false, true),
        ]);
        assert_eq!(state_estimate(&state, 2), 11.0);
        assert_eq!(state_estimate(&State::default(), 2), 0.0);
    }

    #[test]
    fn goal_checks_revision_and_pool_only() {
        let done = State::new(vec![make_node(2, true, true, true)]);
        assert!(is_goal(&done, 2));
        assert!(!is_goal(&done, 3));

        let drained = State::new(vec![make_node(2, true, false, true)]);
        assert!(!is_goal(&drained, 2));

        // Cold cache does not block the goal predicate.
        let cold = State::new(vec![make_node(2, true, true, false)]);
        assert!(is_goal(&cold, 2));
    }

    #[test]
    fn converged_state_estimates_zero() {
        let state = State::new(vec![make_node(5, true, true, true), make_node(5, true, true, true)]);
        assert!(state.is_converged(5));
        assert_eq!(state_estimate(&state, 5), 0.0);
    }
}
