//! Fleet state: one `NodeState` per node, grouped into clusters.
//!
//! Both types are plain values. A transition never mutates a `State` in place;
//! it builds a fresh copy with exactly one node replaced.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// NodeState
// ---------------------------------------------------------------------------

/// Observable configuration of a single service node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeState {
    pub name: String,
    pub cluster: u32,
    #[serde(alias = "softwarerevision")]
    pub software_revision: u32,
    #[serde(alias = "apprunning")]
    pub app_running: bool,
    #[serde(alias = "inloadbalancerpool")]
    pub in_loadbalancer_pool: bool,
    #[serde(alias = "cachewarmed")]
    pub cache_warmed: bool,
}

impl NodeState {
    /// A node that is fully in service at `revision`: running, warm, pooled.
    pub fn in_service(name: &str, cluster: u32, revision: u32) -> Self {
        NodeState {
            name: name.to_string(),
            cluster,
            software_revision: revision,
            app_running: true,
            in_loadbalancer_pool: true,
            cache_warmed: true,
        }
    }

    /// Whether the node already runs the given revision.
    pub fn at_revision(&self, revision: u32) -> bool {
        self.software_revision == revision
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Complete snapshot of the fleet. Node order is preserved and significant:
/// it determines the order in which candidate actions are generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct State(Vec<NodeState>);

impl State {
    pub fn new(nodes: Vec<NodeState>) -> Self {
        State(nodes)
    }

    pub fn nodes(&self) -> &[NodeState] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&NodeState> {
        self.0.iter().find(|n| n.name == name)
    }

    /// Copy of this state with the node at `index` replaced.
    ///
    /// Panics if `index` is out of bounds; callers only pass indices obtained
    /// from iterating this same state.
    pub fn with_node(&self, index: usize, node: NodeState) -> State {
        let mut nodes = self.0.clone();
        nodes[index] = node;
        State(nodes)
    }

    /// Every node at `revision`, running, warm, and in the pool.
    pub fn is_converged(&self, revision: u32) -> bool {
        self.0.iter().all(|n| {
            n.at_revision(revision) && n.app_running && n.cache_warmed && n.in_loadbalancer_pool
        })
    }

    pub fn into_nodes(self) -> Vec<NodeState> {
        self.0
    }
}

impl From<Vec<NodeState>> for State {
    fn from(nodes: Vec<NodeState>) -> Self {
        State(nodes)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.0 {
            writeln!(
                f,
                "{} cluster={} rev={} running={} pooled={} warm={}",
                node.name,
                node.cluster,
                node.software_revision,
                node.app_running,
                node.in_loadbalancer_pool,
                node.cache_warmed,
            )?;
        }
        Ok(())
    }
}
