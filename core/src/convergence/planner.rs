//! Maintenance planner: searches for the shortest safe rollout.
//!
//! The planner seeds the search with a `NoOp` action holding the starting
//! state, lets the search engine explore actions generated by the six
//! `ActionKind`s, and returns the winning chain origin-first with the `NoOp`
//! stripped. An empty plan is a normal result: either the fleet is already
//! converged or no legal sequence reaches the goal.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::maintenance::action::{Action, ActionKind};
use crate::maintenance::heuristic::{is_goal, state_estimate, EDGE_COST};
use crate::search::{astar, uniform_cost, SearchSpace};
use crate::types::config::{PlannerSettings, SearchAlgorithm};
use crate::types::state::State;

// ---------------------------------------------------------------------------
// MaintenanceSpace
// ---------------------------------------------------------------------------

/// The maintenance domain seen as a search graph over `Action`s.
#[derive(Debug, Clone, Copy)]
pub struct MaintenanceSpace {
    target_revision: u32,
}

impl MaintenanceSpace {
    pub fn new(target_revision: u32) -> Self {
        MaintenanceSpace { target_revision }
    }
}

impl SearchSpace for MaintenanceSpace {
    type Node = Action;

    fn cost(&self, _from: &Action, _to: &Action) -> f64 {
        EDGE_COST
    }

    fn estimate(&self, node: &Action) -> f64 {
        state_estimate(node.final_state(), self.target_revision)
    }

    fn is_goal(&self, node: &Action) -> bool {
        is_goal(node.final_state(), self.target_revision)
    }

    fn neighbors(&self, node: &Action) -> Vec<Action> {
        let state = node.final_state();
        ActionKind::ALL
            .iter()
            .flat_map(|kind| kind.successors(state, self.target_revision))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Result of one planning call.
#[derive(Debug, Clone)]
pub struct Plan {
    pub target_revision: u32,
    pub algorithm: SearchAlgorithm,
    /// Actions in execution order. Never contains `Action::NoOp`.
    pub actions: Vec<Action>,
    pub expansions: usize,
    /// Cost of the goal node; `None` when no goal was reachable.
    pub total_cost: Option<f64>,
    pub elapsed: Duration,
}

impl Plan {
    /// One `"<label>: <node>"` line per action.
    pub fn descriptions(&self) -> Vec<String> {
        self.actions.iter().map(|a| a.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether the search reached a goal (an already-converged fleet counts).
    pub fn reached_goal(&self) -> bool {
        self.total_cost.is_some()
    }

    pub fn report(&self) -> PlanReport {
        PlanReport {
            target_revision: self.target_revision,
            algorithm: self.algorithm,
            actions: self.descriptions(),
            expansions: self.expansions,
            total_cost: self.total_cost,
            elapsed_ms: self.elapsed.as_millis() as u64,
        }
    }
}

/// Serializable summary of a `Plan`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanReport {
    pub target_revision: u32,
    pub algorithm: SearchAlgorithm,
    pub actions: Vec<String>,
    pub expansions: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    pub elapsed_ms: u64,
}

// ---------------------------------------------------------------------------
// MaintenancePlanner
// ---------------------------------------------------------------------------

/// Stateless planner. Each `plan` call owns its own search bookkeeping, so one
/// planner can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenancePlanner {
    algorithm: SearchAlgorithm,
}

impl MaintenancePlanner {
    pub fn new() -> Self {
        MaintenancePlanner::default()
    }

    pub fn with_algorithm(algorithm: SearchAlgorithm) -> Self {
        MaintenancePlanner { algorithm }
    }

    pub fn from_settings(settings: &PlannerSettings) -> Self {
        MaintenancePlanner::with_algorithm(settings.algorithm)
    }

    pub fn algorithm(&self) -> SearchAlgorithm {
        self.algorithm
    }

    /// Compute the shortest legal action sequence from `start` to a fleet
    /// fully on `target_revision`.
    pub fn plan(&self, start: &State, target_revision: u32) -> Plan {
        let space = MaintenanceSpace::new(target_revision);
        let root = Action::start(start.clone());
        debug!(
            nodes = start.len(),
            target_revision,
            algorithm = ?self.algorithm,
            estimate = space.estimate(&root),
            "planning"
        );

        let started = Instant::now();
        let outcome = match self.algorithm {
            SearchAlgorithm::AStar => astar(root, &space),
            SearchAlgorithm::UniformCost => uniform_cost(root, &space),
        };
        let elapsed = started.elapsed();
        let total_cost = outcome.goal_cost();

        info!(
            elapsed_ms = elapsed.as_millis() as u64,
            expansions = outcome.expansions,
            total_cost = total_cost.unwrap_or(f64::NAN),
            "plan generated"
        );

        // The path starts with the NoOp root; drop it.
        let actions: Vec<Action> = outcome
            .path()
            .into_iter()
            .filter(|a| !a.is_noop())
            .collect();

        if total_cost.is_none() {
            warn!(
                target_revision,
                expansions = outcome.expansions,
                "no feasible plan reaches the target revision"
            );
        }

        Plan {
            target_revision,
            algorithm: self.algorithm,
            actions,
            expansions: outcome.expansions,
            total_cost,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::statefile::example_state;
    use crate::maintenance::step::lowest_step_for_cluster;
    use crate::types::state::NodeState;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn make_node(name: &str, cluster: u32, revision: u32, running: bool, pooled: bool, warm: bool) -> NodeState {
        NodeState {
            name: name.into(),
            cluster,
            software_revision: revision,
            app_running: running,
            in_loadbalancer_pool: pooled,
            cache_warmed: warm,
        }
    }

    /// Cluster 1 fully in service; cluster 2 half way through a rollout.
    fn reference_fleet() -> State {
        State::new(vec![
            make_node("app1-1", 1, 1, true, true, true),
            make_node("app1-2", 1, 1, true, true, true),
            make_node("app2-1", 2, 1, false, false, false),
            make_node("app2-2", 2, 1, true, false, true),
        ])
    }

    /// Replays `plan` from `start`, checking each action was generated by its
    /// kind from the preceding state and that the cluster floor allowed it.
    fn assert_replayable(start: &State, plan: &Plan) {
        let target = plan.target_revision;
        let mut current = start.clone();
        for action in &plan.actions {
            let kind = action.kind().expect("plan contains NoOp");
            let node_name = action.node().unwrap();
            let node = current.node(node_name).unwrap();
            let floor = lowest_step_for_cluster(&current, node.cluster, target).unwrap();
            assert!(
                floor >= kind.required_floor(),
                "{} ran with cluster floor {}",
                action,
                floor
            );
            assert!(
                kind.successors(&current, target).contains(action),
                "{} was not legal from\n{}",
                action,
                current
            );
            current = action.final_state().clone();
        }
        assert!(is_goal(&current, target));
    }

    #[test]
    fn reference_fleet_plan() {
        let start = reference_fleet();
        let plan = MaintenancePlanner::new().plan(&start, 2);
        let descriptions = plan.descriptions();

        assert_eq!(plan.len(), 21);
        assert_eq!(plan.total_cost, Some(21.0));
        assert_eq!(descriptions[0], "Stop app: app2-2");
        assert!(descriptions[20].starts_with("Add node to pool: app1-"));

        let mut sorted = descriptions.clone();
        sorted.sort();
        let mut expected: Vec<String> = [
            "Stop app: app2-2",
            "Update software: app2-1",
            "Update software: app2-2",
            "Start app: app2-2",
            "Start app: app2-1",
            "Warm cache: app2-2",
            "Warm cache: app2-1",
            "Add node to pool: app2-2",
            "Add node to pool: app2-1",
            "Drain node from pool: app1-2",
            "Drain node from pool: app1-1",
            "Stop app: app1-2",
            "Stop app: app1-1",
            "Update software: app1-2",
            "Update software: app1-1",
            "Start app: app1-2",
            "Start app: app1-1",
            "Warm cache: app1-2",
            "Warm cache: app1-1",
            "Add node to pool: app1-2",
            "Add node to pool: app1-1",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        expected.sort();
        assert_eq!(sorted, expected);

        assert_replayable(&start, &plan);
    }

    #[test]
    fn partially_down_cluster_finishes_first() {
        let plan = MaintenancePlanner::new().plan(&reference_fleet(), 2);
        let first_cluster_one = plan
            .actions
            .iter()
            .position(|a| a.node().map_or(false, |n| n.starts_with("app1-")))
            .unwrap();
        let last_cluster_two = plan
            .actions
            .iter()
            .rposition(|a| a.node().map_or(false, |n| n.starts_with("app2-")))
            .unwrap();
        assert!(last_cluster_two < first_cluster_one);
        assert_eq!(plan.actions[first_cluster_one].kind(), Some(ActionKind::DrainFromPool));
    }

    #[test]
    fn reference_fleet_expansions_stay_small() {
        let plan = MaintenancePlanner::new().plan(&reference_fleet(), 2);
        assert!(plan.expansions > 0);
        assert!(plan.expansions < 500, "expanded {} nodes", plan.expansions);
    }

    #[test]
    fn uniform_cost_finds_equally_short_plan() {
        let start = reference_fleet();
        let astar_plan = MaintenancePlanner::new().plan(&start, 2);
        let ucs_plan = MaintenancePlanner::with_algorithm(SearchAlgorithm::UniformCost).plan(&start, 2);
        assert_eq!(ucs_plan.len(), astar_plan.len());
        assert_eq!(ucs_plan.total_cost, astar_plan.total_cost);
        assert!(astar_plan.expansions <= ucs_plan.expansions);
        assert_replayable(&start, &ucs_plan);
    }

    #[test]
    fn example_fleet_plan_is_legal_and_tight() {
        let start = example_state();
        let plan = MaintenancePlanner::new().plan(&start, 2);
        // The per-node estimate is exact for every node in this fleet.
        assert_eq!(plan.total_cost, Some(33.0));
        assert_eq!(plan.len(), 33);
        assert_replayable(&start, &plan);
        assert!(plan.actions.last().unwrap().final_state().is_converged(2));
    }

    #[test]
    fn converged_fleet_yields_empty_plan_without_search() {
        let start = State::new(vec![
            NodeState::in_service("app1-1", 1, 2),
            NodeState::in_service("app2-1", 2, 2),
        ]);
        let plan = MaintenancePlanner::new().plan(&start, 2);
        assert!(plan.is_empty());
        assert_eq!(plan.expansions, 0);
        assert_eq!(plan.total_cost, Some(0.0));
        assert!(plan.reached_goal());
    }

    #[test]
    fn two_down_clusters_cannot_be_planned() {
        let start = State::new(vec![
            make_node("app1-1", 1, 1, true, false, true),
            make_node("app2-1", 2, 1, true, false, true),
            make_node("app3-1", 3, 1, true, true, true),
        ]);
        let plan = MaintenancePlanner::new().plan(&start, 2);
        assert!(plan.is_empty());
        assert!(!plan.reached_goal());
        assert_eq!(plan.total_cost, None);
        assert_eq!(plan.expansions, 1);
    }

    #[test]
    fn stopped_nodes_in_two_down_clusters_recover() {
        // Updates ignore the gate, so cluster 1 can come back up and unblock
        // the rest of the rollout.
        let start = State::new(vec![
            make_node("app1-1", 1, 1, false, false, false),
            make_node("app2-1", 2, 1, false, false, false),
            make_node("app3-1", 3, 1, true, true, true),
        ]);
        let plan = MaintenancePlanner::new().plan(&start, 2);
        assert!(plan.reached_goal());
        assert_eq!(plan.total_cost, Some(14.0));
        assert_replayable(&start, &plan);
    }

    #[test]
    fn plans_are_deterministic() {
        let start = example_state();
        let planner = MaintenancePlanner::new();
        assert_eq!(planner.plan(&start, 2).descriptions(), planner.plan(&start, 2).descriptions());
    }

    #[test]
    fn report_mirrors_plan() {
        let plan = MaintenancePlanner::new().plan(&reference_fleet(), 2);
        let report = plan.report();
        assert_eq!(report.actions, plan.descriptions());
        assert_eq!(report.total_cost, Some(21.0));
        assert_eq!(report.algorithm, SearchAlgorithm::AStar);

        let json = serde_json::to_string(&report).unwrap();
        let back: PlanReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn from_settings_picks_algorithm() {
        let settings = PlannerSettings {
            algorithm: SearchAlgorithm::UniformCost,
            ..PlannerSettings::default()
        };
        assert_eq!(MaintenancePlanner::from_settings(&settings).algorithm(), SearchAlgorithm::UniformCost);
    }

    /// Up to three nodes over two clusters. A node already at the target and
    /// in the pool satisfies the goal test, so it is generated fully in
    /// service: a cold or stopped pooled node would count toward the estimate
    /// while needing no action.
    fn arb_small_fleet() -> impl Strategy<Value = State> {
        let node = (1u32..3, 1u32..3, any::<bool>(), any::<bool>(), any::<bool>());
        proptest::collection::vec(node, 1..4).prop_map(|nodes| {
            State::new(
                nodes
                    .into_iter()
                    .enumerate()
                    .map(|(i, (cluster, revision, running, pooled, warm))| {
                        let in_service = revision == 2 && pooled;
                        make_node(
                            &format!("n{}", i),
                            cluster,
                            revision,
                            running || in_service,
                            pooled,
                            warm || in_service,
                        )
                    })
                    .collect(),
            )
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        /// The estimate never exceeds the true optimum found by exhaustive
        /// uniform-cost search, at the start or anywhere along the plan.
        #[test]
        fn estimate_is_admissible(start in arb_small_fleet()) {
            let plan = MaintenancePlanner::with_algorithm(SearchAlgorithm::UniformCost).plan(&start, 2);
            if let Some(optimum) = plan.total_cost {
                prop_assert!(state_estimate(&start, 2) <= optimum);
                let mut remaining = optimum;
                for action in &plan.actions {
                    remaining -= EDGE_COST;
                    prop_assert!(state_estimate(action.final_state(), 2) <= remaining);
                }
            }
        }

        #[test]
        fn astar_matches_uniform_cost_optimum(start in arb_small_fleet()) {
            let a = MaintenancePlanner::new().plan(&start, 2);
            let u = MaintenancePlanner::with_algorithm(SearchAlgorithm::UniformCost).plan(&start, 2);
            prop_assert_eq!(a.total_cost, u.total_cost);
            prop_assert_eq!(a.len(), u.len());
        }

        #[test]
        fn returned_plans_respect_cluster_barriers(start in arb_small_fleet()) {
            let plan = MaintenancePlanner::new().plan(&start, 2);
            if plan.reached_goal() {
                assert_replayable(&start, &plan);
            }
        }
    }
}
