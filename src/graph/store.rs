//! Concurrent in-memory storage tables
//!
//! One `Storage` instance backs each named graph. Five tables are kept:
//! primary node and edge tables plus label, property and adjacency indexes.
//! Every table sits behind its own `parking_lot::RwLock`, so readers never
//! block readers and a write only locks the table it touches.
//!
//! # Atomicity
//!
//! Each individual table update is atomic. A logical operation that spans
//! tables (inserting a node also updates the label and property indexes)
//! takes the locks one at a time; a concurrent reader may observe the state
//! between two of those updates. Callers that need a cross-table snapshot
//! must serialize externally.
//!
//! # Lock ordering
//!
//! To stay deadlock-free, locks are always acquired in this order and each
//! is released before the next is taken:
//!
//! 1. `nodes`
//! 2. `edges`
//! 3. `label_index`
//! 4. `property_index`
//! 5. `adjacency`

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyValue;
use super::types::{EdgeId, Label, NodeId};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur during graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("edge {0} already exists")]
    EdgeAlreadyExists(EdgeId),

    #[error("no path between {from} and {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("invalid graph name: {0:?}")]
    InvalidGraphName(String),

    #[error("storage failure: {0}")]
    StorageFailure(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Concurrency hints for a storage instance.
///
/// Both flags are hints only: they are recorded and may steer capacity
/// choices, but the locking discipline and the semantics of every operation
/// are identical either way.
#[derive(Debug, Clone, Copy)]
pub struct StorageConfig {
    /// Expect many concurrent readers
    pub read_concurrency: bool,
    /// Expect many concurrent writers
    pub write_concurrency: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            read_concurrency: true,
            write_concurrency: false,
        }
    }
}

/// Per-node record of incident edge ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyEntry {
    /// Edges arriving at this node
    pub incoming: Vec<EdgeId>,
    /// Edges leaving this node
    pub outgoing: Vec<EdgeId>,
}

/// In-memory storage for one graph.
///
/// Tables:
/// - `nodes`: NodeId -> Node
/// - `edges`: EdgeId -> Edge
/// - `label_index`: Label -> set of NodeIds
/// - `property_index`: (key, value) -> set of NodeIds
/// - `adjacency`: NodeId -> { incoming, outgoing } edge ids
#[derive(Debug)]
pub struct Storage {
    name: String,
    config: StorageConfig,

    nodes: RwLock<HashMap<NodeId, Node>>,
    edges: RwLock<HashMap<EdgeId, Edge>>,
    label_index: RwLock<HashMap<Label, HashSet<NodeId>>>,
    property_index: RwLock<HashMap<(String, PropertyValue), HashSet<NodeId>>>,
    adjacency: RwLock<HashMap<NodeId, AdjacencyEntry>>,
}

impl Storage {
    /// Create a new empty storage instance for the named graph
    pub fn new(name: impl Into<String>, config: StorageConfig) -> Self {
        let name = name.into();
        debug!(graph = %name, ?config, "creating storage");
        Storage {
            name,
            config,
            nodes: RwLock::new(HashMap::new()),
            edges: RwLock::new(HashMap::new()),
            label_index: RwLock::new(HashMap::new()),
            property_index: RwLock::new(HashMap::new()),
            adjacency: RwLock::new(HashMap::new()),
        }
    }

    /// Name of the graph this storage belongs to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The concurrency hints this storage was created with
    pub fn config(&self) -> StorageConfig {
        self.config
    }

    // ------------------------------------------------------------------
    // Node operations
    // ------------------------------------------------------------------

    /// Insert a node. Rejects an id that is already present.
    pub fn put_node(&self, node: Node) -> GraphResult<()> {
        let id = node.id;
        {
            let mut nodes = self.nodes.write();
            if nodes.contains_key(&id) {
                return Err(GraphError::NodeAlreadyExists(id));
            }
            nodes.insert(id, node.clone());
        }

        {
            let mut label_index = self.label_index.write();
            for label in &node.labels {
                label_index.entry(label.clone()).or_default().insert(id);
            }
        }

        {
            let mut property_index = self.property_index.write();
            for (key, value) in &node.properties {
                property_index
                    .entry((key.clone(), value.clone()))
                    .or_default()
                    .insert(id);
            }
        }

        debug!(graph = %self.name, node = %id, "node inserted");
        Ok(())
    }

    /// Point lookup of a node
    pub fn get_node(&self, id: NodeId) -> GraphResult<Node> {
        self.nodes
            .read()
            .get(&id)
            .cloned()
            .ok_or(GraphError::NodeNotFound(id))
    }

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.read().contains_key(&id)
    }

    /// Delete a node and its index entries.
    ///
    /// Incident edges are NOT removed here; `Graph::delete_node` cascades
    /// through them first.
    pub fn delete_node(&self, id: NodeId) -> GraphResult<Node> {
        let node = {
            let mut nodes = self.nodes.write();
            nodes.remove(&id).ok_or(GraphError::NodeNotFound(id))?
        };

        {
            let mut label_index = self.label_index.write();
            for label in &node.labels {
                if let Some(members) = label_index.get_mut(label) {
                    members.remove(&id);
                    if members.is_empty() {
                        label_index.remove(label);
                    }
                }
            }
        }

        {
            let mut property_index = self.property_index.write();
            for (key, value) in &node.properties {
                let index_key = (key.clone(), value.clone());
                if let Some(members) = property_index.get_mut(&index_key) {
                    members.remove(&id);
                    if members.is_empty() {
                        property_index.remove(&index_key);
                    }
                }
            }
        }

        self.adjacency.write().remove(&id);

        debug!(graph = %self.name, node = %id, "node deleted");
        Ok(node)
    }

    // ------------------------------------------------------------------
    // Edge operations
    // ------------------------------------------------------------------

    /// Insert an edge and register it in both endpoints' adjacency records.
    ///
    /// Endpoint existence is validated by `Graph::add_edge`; storage only
    /// rejects duplicate edge ids.
    pub fn put_edge(&self, edge: Edge) -> GraphResult<()> {
        let id = edge.id;
        let (source, target) = (edge.source, edge.target);
        {
            let mut edges = self.edges.write();
            if edges.contains_key(&id) {
                return Err(GraphError::EdgeAlreadyExists(id));
            }
            edges.insert(id, edge);
        }

        {
            let mut adjacency = self.adjacency.write();
            adjacency.entry(source).or_default().outgoing.push(id);
            adjacency.entry(target).or_default().incoming.push(id);
        }

        debug!(graph = %self.name, edge = %id, "edge inserted");
        Ok(())
    }

    /// Point lookup of an edge
    pub fn get_edge(&self, id: EdgeId) -> GraphResult<Edge> {
        self.edges
            .read()
            .get(&id)
            .cloned()
            .ok_or(GraphError::EdgeNotFound(id))
    }

    /// Check if an edge exists
    pub fn has_edge(&self, id: EdgeId) -> bool {
        self.edges.read().contains_key(&id)
    }

    /// Delete an edge and unregister it from both endpoints.
    ///
    /// Missing endpoint records are tolerated silently; a cascading node
    /// delete may already have removed them.
    pub fn delete_edge(&self, id: EdgeId) -> GraphResult<Edge> {
        let edge = {
            let mut edges = self.edges.write();
            edges.remove(&id).ok_or(GraphError::EdgeNotFound(id))?
        };

        {
            let mut adjacency = self.adjacency.write();
            if let Some(entry) = adjacency.get_mut(&edge.source) {
                entry.outgoing.retain(|&eid| eid != id);
            }
            if let Some(entry) = adjacency.get_mut(&edge.target) {
                entry.incoming.retain(|&eid| eid != id);
            }
        }

        debug!(graph = %self.name, edge = %id, "edge deleted");
        Ok(edge)
    }

    // ------------------------------------------------------------------
    // Adjacency queries
    // ------------------------------------------------------------------

    /// Ids of edges leaving a node
    pub fn outgoing_edge_ids(&self, id: NodeId) -> Vec<EdgeId> {
        self.adjacency
            .read()
            .get(&id)
            .map(|entry| entry.outgoing.clone())
            .unwrap_or_default()
    }

    /// Ids of edges arriving at a node
    pub fn incoming_edge_ids(&self, id: NodeId) -> Vec<EdgeId> {
        self.adjacency
            .read()
            .get(&id)
            .map(|entry| entry.incoming.clone())
            .unwrap_or_default()
    }

    /// All edges incident to a node (incoming and outgoing, deduplicated).
    ///
    /// Adjacency ids pointing at edges that no longer exist are filtered
    /// out and logged rather than treated as fatal.
    pub fn get_edges_for_node(&self, id: NodeId) -> Vec<Edge> {
        let ids: Vec<EdgeId> = {
            let adjacency = self.adjacency.read();
            match adjacency.get(&id) {
                Some(entry) => {
                    let mut seen = HashSet::new();
                    entry
                        .incoming
                        .iter()
                        .chain(entry.outgoing.iter())
                        .filter(|eid| seen.insert(**eid))
                        .copied()
                        .collect()
                }
                None => return Vec::new(),
            }
        };

        let edges = self.edges.read();
        ids.iter()
            .filter_map(|eid| {
                let edge = edges.get(eid).cloned();
                if edge.is_none() {
                    warn!(graph = %self.name, node = %id, edge = %eid, "adjacency entry points at missing edge");
                }
                edge
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // Index queries
    // ------------------------------------------------------------------

    /// All nodes carrying a label. Order unspecified.
    pub fn get_nodes_by_label(&self, label: &Label) -> Vec<Node> {
        let ids: Vec<NodeId> = self
            .label_index
            .read()
            .get(label)
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default();

        let nodes = self.nodes.read();
        ids.iter().filter_map(|id| nodes.get(id).cloned()).collect()
    }

    /// All nodes whose property `key` equals `value` (structural equality).
    /// Order unspecified.
    pub fn get_nodes_by_property(&self, key: &str, value: &PropertyValue) -> Vec<Node> {
        let ids: Vec<NodeId> = self
            .property_index
            .read()
            .get(&(key.to_string(), value.clone()))
            .map(|members| members.iter().copied().collect())
            .unwrap_or_default();

        let nodes = self.nodes.read();
        ids.iter().filter_map(|id| nodes.get(id).cloned()).collect()
    }

    // ------------------------------------------------------------------
    // Scans and counts
    // ------------------------------------------------------------------

    /// Snapshot of every node
    pub fn all_nodes(&self) -> Vec<Node> {
        self.nodes.read().values().cloned().collect()
    }

    /// Snapshot of every edge
    pub fn all_edges(&self) -> Vec<Edge> {
        self.edges.read().values().cloned().collect()
    }

    /// Total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.read().len()
    }

    /// Whether a node still has an adjacency record (test/inspection hook)
    pub fn has_adjacency_entry(&self, id: NodeId) -> bool {
        self.adjacency.read().contains_key(&id)
    }

    /// Number of label-index entries naming this node (test/inspection hook)
    pub fn label_entries_for(&self, id: NodeId) -> usize {
        self.label_index
            .read()
            .values()
            .filter(|members| members.contains(&id))
            .count()
    }

    /// Number of property-index entries naming this node (test/inspection hook)
    pub fn property_entries_for(&self, id: NodeId) -> usize {
        self.property_index
            .read()
            .values()
            .filter(|members| members.contains(&id))
            .count()
    }
}
