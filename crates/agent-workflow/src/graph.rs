//! Workflow graph definition and validation
//!
//! A `Graph` is an immutable DAG of nodes with a single source and a single
//! sink. It is validated once at construction and then shared read-only by
//! every run.

use crate::GraphError;
use agent_core::{Node, NodeId, SEED_PRODUCER};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// Result type for graph construction
pub type Result<T> = std::result::Result<T, GraphError>;

struct GraphNode {
    node: Arc<dyn Node>,
    dependencies: Vec<usize>,
    dependents: Vec<usize>,
}

/// A validated, immutable workflow DAG
///
/// Nodes keep the order in which they were added to the builder; the
/// scheduler merges node output in this declaration order.
///
/// # Example
///
/// ```ignore
/// let graph = Graph::builder()
///     .add_node(fetch)
///     .add_node(analyze)
///     .add_edge("fetch", "analyze")
///     .source("fetch")
///     .sink("analyze")
///     .build()?;
/// ```
pub struct Graph {
    nodes: Vec<GraphNode>,
    index: HashMap<NodeId, usize>,
    source: usize,
    sink: usize,
}

impl Graph {
    /// Create a new graph builder
    pub fn builder() -> GraphBuilder {
        GraphBuilder::new()
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes (never true for a built graph)
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Node ids in declaration order
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|n| n.node.id())
    }

    /// Id of the source node
    pub fn source(&self) -> &NodeId {
        self.nodes[self.source].node.id()
    }

    /// Id of the sink node
    pub fn sink(&self) -> &NodeId {
        self.nodes[self.sink].node.id()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Arc<dyn Node>> {
        self.index.get(id).map(|&i| &self.nodes[i].node)
    }

    /// Direct dependencies of a node, in declaration order
    pub fn dependencies(&self, id: &str) -> Vec<&NodeId> {
        self.neighbours(id, |n| &n.dependencies)
    }

    /// Direct dependents of a node, in declaration order
    pub fn dependents(&self, id: &str) -> Vec<&NodeId> {
        self.neighbours(id, |n| &n.dependents)
    }

    fn neighbours(&self, id: &str, pick: impl Fn(&GraphNode) -> &Vec<usize>) -> Vec<&NodeId> {
        self.index
            .get(id)
            .map(|&i| {
                pick(&self.nodes[i])
                    .iter()
                    .map(|&j| self.nodes[j].node.id())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub(crate) fn node_at(&self, idx: usize) -> &Arc<dyn Node> {
        &self.nodes[idx].node
    }

    pub(crate) fn dependencies_at(&self, idx: usize) -> &[usize] {
        &self.nodes[idx].dependencies
    }

    pub(crate) fn sink_index(&self) -> usize {
        self.sink
    }
}

impl std::fmt::Debug for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("nodes", &self.node_ids().collect::<Vec<_>>())
            .field("source", self.source())
            .field("sink", self.sink())
            .finish()
    }
}

/// Builder for constructing graphs
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<Arc<dyn Node>>,
    edges: Vec<(NodeId, NodeId)>,
    source: Option<NodeId>,
    sink: Option<NodeId>,
}

impl GraphBuilder {
    /// Create a new graph builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node; declaration order is the order of these calls
    pub fn add_node(mut self, node: Arc<dyn Node>) -> Self {
        self.nodes.push(node);
        self
    }

    /// Declare that `to` depends on `from`
    pub fn add_edge(mut self, from: impl Into<NodeId>, to: impl Into<NodeId>) -> Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Set the entry node
    pub fn source(mut self, id: impl Into<NodeId>) -> Self {
        self.source = Some(id.into());
        self
    }

    /// Set the terminal node
    pub fn sink(mut self, id: impl Into<NodeId>) -> Self {
        self.sink = Some(id.into());
        self
    }

    /// Validate and build the graph
    pub fn build(self) -> Result<Graph> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (i, node) in self.nodes.iter().enumerate() {
            if node.id().as_str() == SEED_PRODUCER {
                return Err(GraphError::ReservedNode(node.id().clone()));
            }
            if index.insert(node.id().clone(), i).is_some() {
                return Err(GraphError::DuplicateNode(node.id().clone()));
            }
        }

        let lookup = |id: &NodeId| {
            index
                .get(id)
                .copied()
                .ok_or_else(|| GraphError::UnknownNode(id.clone()))
        };
        let source = lookup(
            self.source
                .as_ref()
                .ok_or(GraphError::MissingEndpoint("source"))?,
        )?;
        let sink = lookup(self.sink.as_ref().ok_or(GraphError::MissingEndpoint("sink"))?)?;

        let mut dependencies = vec![Vec::new(); self.nodes.len()];
        let mut dependents = vec![Vec::new(); self.nodes.len()];
        let mut seen = HashSet::new();
        for (from, to) in &self.edges {
            let (from, to) = (lookup(from)?, lookup(to)?);
            if seen.insert((from, to)) {
                dependents[from].push(to);
                dependencies[to].push(from);
            }
        }
        for list in dependencies.iter_mut().chain(dependents.iter_mut()) {
            list.sort_unstable();
        }

        check_acyclic(&self.nodes, &dependencies, &dependents)?;

        let from_source = reachable(source, &dependents);
        if let Some(i) = (0..self.nodes.len()).find(|i| !from_source.contains(i)) {
            return Err(GraphError::Disconnected {
                node: self.nodes[i].id().clone(),
                detail: "is unreachable from the source",
            });
        }
        let to_sink = reachable(sink, &dependencies);
        if let Some(i) = (0..self.nodes.len()).find(|i| !to_sink.contains(i)) {
            return Err(GraphError::Disconnected {
                node: self.nodes[i].id().clone(),
                detail: "cannot reach the sink",
            });
        }

        let nodes = self
            .nodes
            .into_iter()
            .zip(dependencies.into_iter().zip(dependents))
            .map(|(node, (dependencies, dependents))| GraphNode {
                node,
                dependencies,
                dependents,
            })
            .collect();

        Ok(Graph {
            nodes,
            index,
            source,
            sink,
        })
    }
}

/// Kahn's algorithm; whatever is left unvisited sits on a cycle
fn check_acyclic(
    nodes: &[Arc<dyn Node>],
    dependencies: &[Vec<usize>],
    dependents: &[Vec<usize>],
) -> Result<()> {
    let mut in_degree: Vec<usize> = dependencies.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| in_degree[i] == 0).collect();
    let mut visited = 0;

    while let Some(i) = queue.pop_front() {
        visited += 1;
        for &next in &dependents[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if visited == nodes.len() {
        Ok(())
    } else {
        let stuck = (0..nodes.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| nodes[i].id().clone())
            .collect();
        Err(GraphError::Cyclic(stuck))
    }
}

fn reachable(start: usize, adjacency: &[Vec<usize>]) -> HashSet<usize> {
    let mut seen = HashSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(i) = queue.pop_front() {
        for &next in &adjacency[i] {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}
