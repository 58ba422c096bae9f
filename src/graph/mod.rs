//! Property graph core
//!
//! The data model: nodes with multiple labels and properties, directed typed
//! edges with properties, and a named [`Graph`] coordinating concurrent
//! in-memory [`Storage`] tables with label, property and adjacency indexes.

pub mod edge;
pub mod graph;
pub mod node;
pub mod property;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::Edge;
pub use graph::{EdgeFilter, Graph, NodeFilter};
pub use node::Node;
pub use property::{PropertyMap, PropertyValue};
pub use store::{AdjacencyEntry, GraphError, GraphResult, Storage, StorageConfig};
pub use types::{Direction, EdgeId, EdgeType, Label, NodeId};
