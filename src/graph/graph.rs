//! Named graph coordinator
//!
//! `Graph` is a thin layer over [`Storage`]: it validates referential
//! integrity (edge endpoints must exist), cascades edge deletion when a node
//! goes away, and routes filtered listings through the right index.

use super::edge::Edge;
use super::node::Node;
use super::property::PropertyValue;
use super::store::{GraphError, GraphResult, Storage, StorageConfig};
use super::types::{EdgeId, EdgeType, Label, NodeId};
use tracing::debug;

/// Filter for [`Graph::list_nodes`].
///
/// With only a label or only a property set, the matching secondary index
/// answers the query. A composite filter (label AND property) falls back to
/// a full scan with a predicate; there is no composite index.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub label: Option<Label>,
    pub property: Option<(String, PropertyValue)>,
}

impl NodeFilter {
    /// Match every node
    pub fn any() -> Self {
        Self::default()
    }

    /// Match nodes carrying the label
    pub fn label(label: impl Into<Label>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    /// Match nodes whose property `key` equals `value`
    pub fn property(key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            property: Some((key.into(), value.into())),
            ..Self::default()
        }
    }

    /// Add a property constraint to an existing filter
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.property = Some((key.into(), value.into()));
        self
    }

    fn matches(&self, node: &Node) -> bool {
        if let Some(label) = &self.label {
            if !node.has_label(label) {
                return false;
            }
        }
        if let Some((key, value)) = &self.property {
            match node.get_property(key) {
                Some(actual) if actual == value => {}
                _ => return false,
            }
        }
        true
    }
}

/// Filter for [`Graph::list_edges`]. Edge listings are always full scans.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    pub edge_type: Option<EdgeType>,
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
    pub property: Option<(String, PropertyValue)>,
}

impl EdgeFilter {
    /// Match every edge
    pub fn any() -> Self {
        Self::default()
    }

    /// Match edges of the given relationship type
    pub fn edge_type(edge_type: impl Into<EdgeType>) -> Self {
        Self {
            edge_type: Some(edge_type.into()),
            ..Self::default()
        }
    }

    pub fn from(mut self, source: NodeId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn to(mut self, target: NodeId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.property = Some((key.into(), value.into()));
        self
    }

    fn matches(&self, edge: &Edge) -> bool {
        if let Some(edge_type) = &self.edge_type {
            if edge.edge_type != *edge_type {
                return false;
            }
        }
        if let Some(source) = self.source {
            if edge.source != source {
                return false;
            }
        }
        if let Some(target) = self.target {
            if edge.target != target {
                return false;
            }
        }
        if let Some((key, value)) = &self.property {
            match edge.get_property(key) {
                Some(actual) if actual == value => {}
                _ => return false,
            }
        }
        true
    }
}

/// A named property graph backed by in-memory storage.
///
/// Several graphs can coexist in one process; each owns its storage and all
/// tables are released when the graph is dropped.
#[derive(Debug)]
pub struct Graph {
    name: String,
    storage: Storage,
    created_at: i64,
}

impl Graph {
    /// Create a new empty graph with default storage configuration
    pub fn new(name: impl Into<String>) -> GraphResult<Self> {
        Self::with_config(name, StorageConfig::default())
    }

    /// Create a new empty graph with explicit concurrency hints
    pub fn with_config(name: impl Into<String>, config: StorageConfig) -> GraphResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GraphError::InvalidGraphName(name));
        }
        Ok(Graph {
            storage: Storage::new(name.clone(), config),
            name,
            created_at: chrono::Utc::now().timestamp_millis(),
        })
    }

    /// Graph name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Creation timestamp (Unix milliseconds)
    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    /// The underlying storage handle
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    // ------------------------------------------------------------------
    // CRUD
    // ------------------------------------------------------------------

    /// Add a node to the graph
    pub fn add_node(&self, node: Node) -> GraphResult<()> {
        self.storage.put_node(node)
    }

    /// Add an edge after validating that both endpoints exist.
    ///
    /// Validation and insertion are two steps over different tables; a
    /// concurrent delete of an endpoint between them can leave an edge
    /// referencing a deleted node. This is the documented weak point of the
    /// per-table atomicity model.
    pub fn add_edge(&self, edge: Edge) -> GraphResult<()> {
        if !self.storage.has_node(edge.source) {
            return Err(GraphError::NodeNotFound(edge.source));
        }
        if !self.storage.has_node(edge.target) {
            return Err(GraphError::NodeNotFound(edge.target));
        }
        self.storage.put_edge(edge)
    }

    /// Get a node by id
    pub fn get_node(&self, id: NodeId) -> GraphResult<Node> {
        self.storage.get_node(id)
    }

    /// Get an edge by id
    pub fn get_edge(&self, id: EdgeId) -> GraphResult<Edge> {
        self.storage.get_edge(id)
    }

    /// Delete a node, cascading over its incident edges first.
    ///
    /// Readers observing the node mid-delete may still see some of its
    /// edges, but once the node record is gone every incident edge is gone
    /// too.
    pub fn delete_node(&self, id: NodeId) -> GraphResult<Node> {
        // Ensure the node exists before starting the cascade
        self.storage.get_node(id)?;

        let incident = self.storage.get_edges_for_node(id);
        debug!(graph = %self.name, node = %id, edges = incident.len(), "cascading node delete");
        for edge in incident {
            // Another cascade may have raced us to this edge
            match self.storage.delete_edge(edge.id) {
                Ok(_) | Err(GraphError::EdgeNotFound(_)) => {}
                Err(other) => return Err(other),
            }
        }

        self.storage.delete_node(id)
    }

    /// Delete an edge
    pub fn delete_edge(&self, id: EdgeId) -> GraphResult<Edge> {
        self.storage.delete_edge(id)
    }

    // ------------------------------------------------------------------
    // Listings
    // ------------------------------------------------------------------

    /// List nodes matching a filter; see [`NodeFilter`] for index usage.
    pub fn list_nodes(&self, filter: &NodeFilter) -> Vec<Node> {
        match (&filter.label, &filter.property) {
            (None, None) => self.storage.all_nodes(),
            (Some(label), None) => self.storage.get_nodes_by_label(label),
            (None, Some((key, value))) => self.storage.get_nodes_by_property(key, value),
            (Some(_), Some(_)) => {
                // Composite filters are not indexed
                self.storage
                    .all_nodes()
                    .into_iter()
                    .filter(|node| filter.matches(node))
                    .collect()
            }
        }
    }

    /// List edges matching a filter (full scan)
    pub fn list_edges(&self, filter: &EdgeFilter) -> Vec<Edge> {
        self.storage
            .all_edges()
            .into_iter()
            .filter(|edge| filter.matches(edge))
            .collect()
    }

    /// Edges leaving a node
    pub fn get_outgoing_edges(&self, id: NodeId) -> Vec<Edge> {
        let ids = self.storage.outgoing_edge_ids(id);
        ids.iter()
            .filter_map(|eid| self.storage.get_edge(*eid).ok())
            .collect()
    }

    /// Edges arriving at a node
    pub fn get_incoming_edges(&self, id: NodeId) -> Vec<Edge> {
        let ids = self.storage.incoming_edge_ids(id);
        ids.iter()
            .filter_map(|eid| self.storage.get_edge(*eid).ok())
            .collect()
    }

    /// Snapshot of all nodes
    pub fn nodes(&self) -> Vec<Node> {
        self.storage.all_nodes()
    }

    /// Snapshot of all edges
    pub fn edges(&self) -> Vec<Edge> {
        self.storage.all_edges()
    }

    /// Total node count
    pub fn node_count(&self) -> usize {
        self.storage.node_count()
    }

    /// Total edge count
    pub fn edge_count(&self) -> usize {
        self.storage.edge_count()
    }
}
