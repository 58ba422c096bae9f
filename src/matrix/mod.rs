//! Algebraic layer: adjacency matrices and semiring multiplication
//!
//! Graphs project into dense (`ndarray`) or sparse/COO adjacency matrices
//! carrying a node-id ↔ index bijection. Classical multiplication, powers and
//! elementwise ops cover k-hop reachability and path counting; the semiring
//! variants generalize the same shapes to shortest paths and probabilistic
//! reach. Matrices are snapshots: once built they are independent of later
//! graph mutations, and their non-zero entries can be exported back to graph
//! space as `(from, to, weight)` tuples.

pub mod adjacency;
pub mod semiring;

pub use adjacency::{
    AdjacencyMatrix, CooMatrix, MatrixData, MatrixError, MatrixKind, MatrixResult, NodeMapping,
};
pub use semiring::{
    BooleanSemiring, CountingSemiring, CustomSemiring, ProbabilitySemiring, Semiring,
    Specialization, TropicalSemiring,
};
