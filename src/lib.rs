//! Lattica — an embedded, in-memory property-graph engine
//!
//! Three tightly-coupled cores:
//!
//! - **Storage & indexing** (`graph`): concurrent node/edge tables with
//!   label, property and adjacency indexes behind per-table read-write
//!   locks. Readers never block readers.
//! - **Query engine** (`query`, `algo`): a Cypher-subset pattern language
//!   (pest parser → AST → bindings-expansion executor) plus BFS traversal
//!   primitives.
//! - **Algebraic layer** (`matrix`): dense and sparse/COO adjacency
//!   matrices over `ndarray`, classical and semiring multiplication, and
//!   matrix powers for k-hop reachability, shortest paths, path counting
//!   and probabilistic reach.
//!
//! Everything is memory-only and in-process: no persistence, no wire
//! protocol, no transactions.
//!
//! # Example
//!
//! ```rust
//! use lattica::graph::{Edge, EdgeId, Graph, Node, NodeFilter, NodeId};
//! use lattica::query::QueryEngine;
//!
//! let graph = Graph::new("social").unwrap();
//!
//! let mut alice = Node::with_label(NodeId::new(1), "Person");
//! alice.set_property("name", "Alice");
//! let mut bob = Node::with_label(NodeId::new(2), "Person");
//! bob.set_property("name", "Bob");
//! graph.add_node(alice).unwrap();
//! graph.add_node(bob).unwrap();
//! graph
//!     .add_edge(Edge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2), "KNOWS"))
//!     .unwrap();
//!
//! // Index-backed listing
//! assert_eq!(graph.list_nodes(&NodeFilter::label("Person")).len(), 2);
//!
//! // Query subset
//! let engine = QueryEngine::new();
//! let result = engine.execute("MATCH (n:Person) RETURN n.name", &graph).unwrap();
//! assert_eq!(result.len(), 2);
//! ```

#![warn(clippy::all)]

pub mod algo;
pub mod graph;
pub mod matrix;
pub mod query;

// Re-export main types for convenience
pub use graph::{
    Direction, Edge, EdgeFilter, EdgeId, EdgeType, Graph, GraphError, GraphResult, Label, Node,
    NodeFilter, NodeId, PropertyMap, PropertyValue, Storage, StorageConfig,
};

pub use algo::{neighborhood, shortest_path, TraversalOptions};

pub use matrix::{
    AdjacencyMatrix, BooleanSemiring, CooMatrix, CountingSemiring, CustomSemiring, MatrixData,
    MatrixError, MatrixKind, MatrixResult, ProbabilitySemiring, Semiring, TropicalSemiring,
};

pub use query::{
    parse_query, ExecutionResult, Query, QueryBuilder, QueryEngine, QueryError, QueryResult,
};
