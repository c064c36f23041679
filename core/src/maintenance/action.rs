//! Maintenance actions and the rules that generate them.
//!
//! `ActionKind` is one of the six per-node lifecycle steps. Asked for
//! successors of a `State`, a kind emits one `Action` per node that may take
//! that step right now:
//!
//! | Kind | From step | Sets | Cluster gate |
//! |------|-----------|------|--------------|
//! | `DrainFromPool` | 0 | pooled = false | must be the downable cluster |
//! | `StopApp` | 1 | running = false, warm = false | must be the downable cluster |
//! | `UpdateRevision` | 2 | revision = target | |
//! | `StartApp` | 3 | running = true, warm = false | |
//! | `WarmCache` | 4 | warm = true | |
//! | `AddToPool` | 5 | pooled = true | |
//!
//! Every kind also requires the node's whole cluster to have reached the
//! kind's starting step, so no node gets more than one step ahead of its
//! slowest cluster-mate.

use std::fmt;

use super::gate::downable_cluster;
use super::step::{cluster_floors, step_for_node, Step};
use crate::types::state::{NodeState, State};

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    DrainFromPool,
    StopApp,
    UpdateRevision,
    StartApp,
    WarmCache,
    AddToPool,
}

impl ActionKind {
    /// All kinds, in the order their successors are generated.
    pub const ALL: [ActionKind; 6] = [
        ActionKind::DrainFromPool,
        ActionKind::StopApp,
        ActionKind::UpdateRevision,
        ActionKind::StartApp,
        ActionKind::WarmCache,
        ActionKind::AddToPool,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::DrainFromPool => "Drain node from pool",
            ActionKind::StopApp => "Stop app",
            ActionKind::UpdateRevision => "Update software",
            ActionKind::StartApp => "Start app",
            ActionKind::WarmCache => "Warm cache",
            ActionKind::AddToPool => "Add node to pool",
        }
    }

    /// Step a node must be at to take this action.
    pub fn consumes(self) -> Step {
        match self {
            ActionKind::DrainFromPool => Step::NotStarted,
            ActionKind::StopApp => Step::Drained,
            ActionKind::UpdateRevision => Step::Stopped,
            ActionKind::StartApp => Step::Updated,
            ActionKind::WarmCache => Step::Started,
            ActionKind::AddToPool => Step::Warmed,
        }
    }

    /// Step the node lands on afterwards (for well-formed nodes).
    pub fn produces(self) -> Step {
        match self {
            ActionKind::DrainFromPool => Step::Drained,
            ActionKind::StopApp => Step::Stopped,
            ActionKind::UpdateRevision => Step::Updated,
            ActionKind::StartApp => Step::Started,
            ActionKind::WarmCache => Step::Warmed,
            ActionKind::AddToPool => Step::Complete,
        }
    }

    /// Whether the node's cluster must be the one the safety gate selects.
    pub fn requires_gate(self) -> bool {
        matches!(self, ActionKind::DrainFromPool | ActionKind::StopApp)
    }

    /// Lowest step the whole cluster must have reached.
    pub fn required_floor(self) -> Step {
        self.consumes()
    }

    fn apply(self, node: &NodeState, target_revision: u32) -> NodeState {
        let mut next = node.clone();
        match self {
            ActionKind::DrainFromPool => next.in_loadbalancer_pool = false,
            ActionKind::StopApp => {
                next.app_running = false;
                next.cache_warmed = false;
            }
            ActionKind::UpdateRevision => next.software_revision = target_revision,
            ActionKind::StartApp => {
                next.app_running = true;
                next.cache_warmed = false;
            }
            ActionKind::WarmCache => next.cache_warmed = true,
            ActionKind::AddToPool => next.in_loadbalancer_pool = true,
        }
        next
    }

    fn wrap(self, transition: Transition) -> Action {
        match self {
            ActionKind::DrainFromPool => Action::DrainFromPool(transition),
            ActionKind::StopApp => Action::StopApp(transition),
            ActionKind::UpdateRevision => Action::UpdateRevision(transition),
            ActionKind::StartApp => Action::StartApp(transition),
            ActionKind::WarmCache => Action::WarmCache(transition),
            ActionKind::AddToPool => Action::AddToPool(transition),
        }
    }

    /// Every action of this kind that is legal from `state`, in node order.
    pub fn successors(self, state: &State, target_revision: u32) -> Vec<Action> {
        let gate = if self.requires_gate() {
            match downable_cluster(state, target_revision) {
                Some(cluster) => Some(cluster),
                None => return Vec::new(),
            }
        } else {
            None
        };
        let floors = cluster_floors(state, target_revision);

        let mut out = Vec::new();
        for (index, node) in state.nodes().iter().enumerate() {
            if step_for_node(node, target_revision) != self.consumes() {
                continue;
            }
            match floors.get(&node.cluster) {
                Some(floor) if *floor >= self.required_floor() => {}
                _ => continue,
            }
            if let Some(cluster) = gate {
                if node.cluster != cluster {
                    continue;
                }
            }
            let next = self.apply(node, target_revision);
            out.push(self.wrap(Transition {
                node: next.name.clone(),
                target_revision,
                state: state.with_node(index, next),
            }));
        }
        out
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Payload shared by every concrete action: the node acted on, the revision
/// the plan targets, and the full fleet state after the action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Transition {
    pub node: String,
    pub target_revision: u32,
    pub state: State,
}

/// A node in the plan graph. `NoOp` only seeds the search with the starting
/// state and is never part of a returned plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    NoOp { state: State },
    DrainFromPool(Transition),
    StopApp(Transition),
    UpdateRevision(Transition),
    StartApp(Transition),
    WarmCache(Transition),
    AddToPool(Transition),
}

impl Action {
    pub fn start(state: State) -> Self {
        Action::NoOp { state }
    }

    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::NoOp { .. } => None,
            Action::DrainFromPool(_) => Some(ActionKind::DrainFromPool),
            Action::StopApp(_) => Some(ActionKind::StopApp),
            Action::UpdateRevision(_) => Some(ActionKind::UpdateRevision),
            Action::StartApp(_) => Some(ActionKind::StartApp),
            Action::WarmCache(_) => Some(ActionKind::WarmCache),
            Action::AddToPool(_) => Some(ActionKind::AddToPool),
        }
    }

    fn transition(&self) -> Option<&Transition> {
        match self {
            Action::NoOp { .. } => None,
            Action::DrainFromPool(t)
            | Action::StopApp(t)
            | Action::UpdateRevision(t)
            | Action::StartApp(t)
            | Action::WarmCache(t)
            | Action::AddToPool(t) => Some(t),
        }
    }

    /// Name of the node this action changes.
    pub fn node(&self) -> Option<&str> {
        self.transition().map(|t| t.node.as_str())
    }

    pub fn target_revision(&self) -> Option<u32> {
        self.transition().map(|t| t.target_revision)
    }

    /// Fleet state after this action.
    pub fn final_state(&self) -> &State {
        match self {
            Action::NoOp { state } => state,
            Action::DrainFromPool(t)
            | Action::StopApp(t)
            | Action::UpdateRevision(t)
            | Action::StartApp(t)
            | Action::WarmCache(t)
            | Action::AddToPool(t) => &t.state,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Action::NoOp { .. })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.kind(), self.node()) {
            (Some(kind), Some(node)) => write!(f, "{}: {}", kind.label(), node),
            _ => f.write_str("No-op"),
        }
    }
}
