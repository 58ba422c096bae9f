//! Adjacency matrices with a node-id ↔ index bijection
//!
//! [`AdjacencyMatrix::from_graph`] snapshots a graph into either a dense
//! `ndarray` tensor or a sparse coordinate-list form. Every matrix carries
//! the [`NodeMapping`] that fixes which row/column belongs to which node, so
//! results of algebra can be read back in graph terms via [`AdjacencyMatrix::to_edges`].

use super::semiring::{semiring_matmul, Semiring};
use crate::graph::{Graph, NodeId, PropertyValue};
use ndarray::{Array2, Axis};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::debug;

/// Errors from matrix operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("node mappings do not match")]
    IncompatibleMapping,

    #[error("incompatible dimensions: {left:?} vs {right:?}")]
    IncompatibleDimensions {
        left: (usize, usize),
        right: (usize, usize),
    },
}

pub type MatrixResult<T> = Result<T, MatrixError>;

/// Requested matrix representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    Dense,
    Sparse,
}

/// Coordinate-list (COO) sparse matrix: parallel row/col/value arrays.
///
/// Entries are coalesced — at most one stored value per `(row, col)` — with
/// last-write-wins applied at construction to match dense semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<f64>,
    pub shape: (usize, usize),
}

impl CooMatrix {
    /// Build from coalesced `(row, col) -> value` entries
    fn from_entries(entries: BTreeMap<(usize, usize), f64>, shape: (usize, usize)) -> Self {
        let mut rows = Vec::with_capacity(entries.len());
        let mut cols = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        for ((row, col), value) in entries {
            rows.push(row);
            cols.push(col);
            values.push(value);
        }
        CooMatrix {
            rows,
            cols,
            values,
            shape,
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate stored entries as `(row, col, value)`
    pub fn triples(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((&row, &col), &value)| (row, col, value))
    }

    /// Scatter into a dense tensor, absent entries filled with `fill`
    fn to_dense_with(&self, fill: f64) -> Array2<f64> {
        let mut dense = Array2::<f64>::from_elem(self.shape, fill);
        for (row, col, value) in self.triples() {
            dense[[row, col]] = value;
        }
        dense
    }

    /// Scatter into a zero-filled dense tensor
    pub fn to_dense(&self) -> Array2<f64> {
        self.to_dense_with(0.0)
    }

    /// Gather the non-zero entries of a dense tensor
    pub fn from_dense(dense: &Array2<f64>) -> Self {
        let mut entries = BTreeMap::new();
        for ((row, col), &value) in dense.indexed_iter() {
            if value != 0.0 {
                entries.insert((row, col), value);
            }
        }
        Self::from_entries(entries, dense.dim())
    }
}

/// Matrix payload. `Empty` is the sentinel for a zero-node graph and
/// propagates through every operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixData {
    Empty,
    Dense(Array2<f64>),
    Sparse(CooMatrix),
}

/// Bijection between node ids and matrix indices `0..n`.
#[derive(Debug, Clone)]
pub struct NodeMapping {
    order: Vec<NodeId>,
    positions: HashMap<NodeId, usize>,
}

impl NodeMapping {
    fn from_order(order: Vec<NodeId>) -> Self {
        let positions = order
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();
        NodeMapping { order, positions }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Matrix index of a node id
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Node id at a matrix index
    pub fn node_at(&self, index: usize) -> Option<NodeId> {
        self.order.get(index).copied()
    }

    /// All node ids in index order
    pub fn nodes(&self) -> &[NodeId] {
        &self.order
    }
}

impl PartialEq for NodeMapping {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

/// Weight of an edge for matrix construction: the `"weight"` property,
/// falling back to `"Weight"`, defaulting to 1. Integers widen to floats.
fn edge_weight(properties: &crate::graph::PropertyMap) -> f64 {
    properties
        .get("weight")
        .or_else(|| properties.get("Weight"))
        .and_then(PropertyValue::as_number)
        .unwrap_or(1.0)
}

/// An adjacency matrix snapshot of a graph.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    data: MatrixData,
    mapping: NodeMapping,
}

impl AdjacencyMatrix {
    /// Build the adjacency matrix of a graph.
    ///
    /// Nodes are enumerated in ascending id order to fix the mapping. Each
    /// edge contributes its weight at `(index(source), index(target))`;
    /// multi-edges between the same endpoints collapse last-write-wins in
    /// ascending edge-id order, for dense and sparse alike. An empty graph
    /// yields the empty sentinel.
    pub fn from_graph(graph: &Graph, kind: MatrixKind) -> Self {
        let mut ids: Vec<NodeId> = graph.nodes().iter().map(|node| node.id).collect();
        ids.sort_unstable();
        let mapping = NodeMapping::from_order(ids);
        let n = mapping.len();

        if n == 0 {
            return AdjacencyMatrix {
                data: MatrixData::Empty,
                mapping,
            };
        }

        let mut edges = graph.edges();
        edges.sort_unstable_by_key(|edge| edge.id);

        let mut entries = BTreeMap::new();
        for edge in &edges {
            let (Some(row), Some(col)) = (mapping.index_of(edge.source), mapping.index_of(edge.target))
            else {
                continue;
            };
            entries.insert((row, col), edge_weight(&edge.properties));
        }
        debug!(
            graph = graph.name(),
            nodes = n,
            entries = entries.len(),
            ?kind,
            "built adjacency matrix"
        );

        let data = match kind {
            MatrixKind::Dense => {
                let mut dense = Array2::<f64>::zeros((n, n));
                for ((row, col), value) in entries {
                    dense[[row, col]] = value;
                }
                MatrixData::Dense(dense)
            }
            MatrixKind::Sparse => MatrixData::Sparse(CooMatrix::from_entries(entries, (n, n))),
        };

        AdjacencyMatrix { data, mapping }
    }

    /// Construct directly from dense data and an index-ordered id list.
    /// Intended for tests and for deriving matrices from other matrices.
    pub fn from_dense(order: Vec<NodeId>, dense: Array2<f64>) -> Self {
        let mapping = NodeMapping::from_order(order);
        if mapping.is_empty() {
            return AdjacencyMatrix {
                data: MatrixData::Empty,
                mapping,
            };
        }
        AdjacencyMatrix {
            data: MatrixData::Dense(dense),
            mapping,
        }
    }

    /// The payload
    pub fn data(&self) -> &MatrixData {
        &self.data
    }

    /// The node-id ↔ index bijection
    pub fn mapping(&self) -> &NodeMapping {
        &self.mapping
    }

    /// `(rows, cols)`; the empty sentinel reports `(0, 0)`
    pub fn dimensions(&self) -> (usize, usize) {
        match &self.data {
            MatrixData::Empty => (0, 0),
            MatrixData::Dense(dense) => dense.dim(),
            MatrixData::Sparse(coo) => coo.shape,
        }
    }

    /// Is this the empty sentinel
    pub fn is_empty(&self) -> bool {
        matches!(self.data, MatrixData::Empty)
    }

    /// Current representation, `None` for the empty sentinel
    pub fn kind(&self) -> Option<MatrixKind> {
        match &self.data {
            MatrixData::Empty => None,
            MatrixData::Dense(_) => Some(MatrixKind::Dense),
            MatrixData::Sparse(_) => Some(MatrixKind::Sparse),
        }
    }

    /// Entry for a node pair, `None` if either node is unmapped.
    /// Sparse matrices report absent entries as `0.0`.
    pub fn get(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let row = self.mapping.index_of(from)?;
        let col = self.mapping.index_of(to)?;
        match &self.data {
            MatrixData::Empty => None,
            MatrixData::Dense(dense) => Some(dense[[row, col]]),
            MatrixData::Sparse(coo) => Some(
                coo.triples()
                    .find(|&(r, c, _)| r == row && c == col)
                    .map(|(_, _, value)| value)
                    .unwrap_or(0.0),
            ),
        }
    }

    /// Dense copy of the payload, `None` for the empty sentinel
    fn dense_data(&self) -> Option<Array2<f64>> {
        match &self.data {
            MatrixData::Empty => None,
            MatrixData::Dense(dense) => Some(dense.clone()),
            MatrixData::Sparse(coo) => Some(coo.to_dense()),
        }
    }

    fn empty_like(&self) -> Self {
        AdjacencyMatrix {
            data: MatrixData::Empty,
            mapping: self.mapping.clone(),
        }
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Swap axes. Sparse stays sparse, dense stays dense, empty stays empty.
    pub fn transpose(&self) -> Self {
        let data = match &self.data {
            MatrixData::Empty => MatrixData::Empty,
            MatrixData::Dense(dense) => MatrixData::Dense(dense.t().to_owned()),
            MatrixData::Sparse(coo) => {
                let mut entries = BTreeMap::new();
                for (row, col, value) in coo.triples() {
                    entries.insert((col, row), value);
                }
                MatrixData::Sparse(CooMatrix::from_entries(
                    entries,
                    (coo.shape.1, coo.shape.0),
                ))
            }
        };
        AdjacencyMatrix {
            data,
            mapping: self.mapping.clone(),
        }
    }

    /// Classical matrix product.
    ///
    /// Both operands must share the same node mapping. A sparse operand is
    /// converted to dense first — this crate has no true sparse product —
    /// and the result is dense.
    pub fn multiply(&self, other: &Self) -> MatrixResult<Self> {
        self.binary_dense(other, |a, b| a.dot(b))
    }

    /// Semiring matrix product: same shape as [`multiply`] with the
    /// semiring's ⊕/⊗ in place of +/·.
    ///
    /// [`multiply`]: AdjacencyMatrix::multiply
    pub fn multiply_with(&self, other: &Self, semiring: &dyn Semiring) -> MatrixResult<Self> {
        self.binary_dense(other, |a, b| semiring_matmul(a, b, semiring))
    }

    /// `k`-th matrix power by left-folded multiplication. `power(0)` is the
    /// identity matrix, `power(1)` the matrix itself.
    pub fn power(&self, k: u32) -> MatrixResult<Self> {
        if self.is_empty() {
            return Ok(self.empty_like());
        }
        if k == 0 {
            return Ok(self.identity_like(0.0, 1.0));
        }
        let mut result = self.clone();
        for _ in 1..k {
            result = result.multiply(self)?;
        }
        Ok(result)
    }

    /// `k`-th semiring power. `power_with(0, s)` is the semiring identity
    /// matrix (`s.one()` on the diagonal, `s.zero()` elsewhere).
    pub fn power_with(&self, k: u32, semiring: &dyn Semiring) -> MatrixResult<Self> {
        if self.is_empty() {
            return Ok(self.empty_like());
        }
        if k == 0 {
            return Ok(self.identity_like(semiring.zero(), semiring.one()));
        }
        let mut result = self.clone();
        for _ in 1..k {
            result = result.multiply_with(self, semiring)?;
        }
        Ok(result)
    }

    /// Pairwise addition. Mappings must match; the result is dense.
    pub fn elementwise_add(&self, other: &Self) -> MatrixResult<Self> {
        self.binary_dense(other, |a, b| a + b)
    }

    fn binary_dense(
        &self,
        other: &Self,
        op: impl Fn(&Array2<f64>, &Array2<f64>) -> Array2<f64>,
    ) -> MatrixResult<Self> {
        if self.mapping != other.mapping {
            return Err(MatrixError::IncompatibleMapping);
        }
        let (Some(a), Some(b)) = (self.dense_data(), other.dense_data()) else {
            // Equal mappings, so both are the empty sentinel
            return Ok(self.empty_like());
        };
        if a.ncols() != b.nrows() {
            return Err(MatrixError::IncompatibleDimensions {
                left: a.dim(),
                right: b.dim(),
            });
        }
        Ok(AdjacencyMatrix {
            data: MatrixData::Dense(op(&a, &b)),
            mapping: self.mapping.clone(),
        })
    }

    fn identity_like(&self, zero: f64, one: f64) -> Self {
        let n = self.mapping.len();
        let mut dense = Array2::<f64>::from_elem((n, n), zero);
        for i in 0..n {
            dense[[i, i]] = one;
        }
        AdjacencyMatrix {
            data: MatrixData::Dense(dense),
            mapping: self.mapping.clone(),
        }
    }

    /// Project onto the given node ids.
    ///
    /// Ids keep the caller's order in the new mapping; ids not present in
    /// this matrix are skipped. Retaining nothing yields the empty sentinel.
    pub fn subgraph(&self, ids: &[NodeId]) -> Self {
        let mut retained = Vec::new();
        let mut indices = Vec::new();
        for &id in ids {
            if let Some(index) = self.mapping.index_of(id) {
                if !retained.contains(&id) {
                    retained.push(id);
                    indices.push(index);
                }
            }
        }
        let mapping = NodeMapping::from_order(retained);
        if mapping.is_empty() {
            return AdjacencyMatrix {
                data: MatrixData::Empty,
                mapping,
            };
        }

        let data = match &self.data {
            MatrixData::Empty => MatrixData::Empty,
            MatrixData::Dense(dense) => {
                let projected = dense.select(Axis(0), &indices).select(Axis(1), &indices);
                MatrixData::Dense(projected)
            }
            MatrixData::Sparse(coo) => {
                let position: HashMap<usize, usize> = indices
                    .iter()
                    .enumerate()
                    .map(|(new, &old)| (old, new))
                    .collect();
                let mut entries = BTreeMap::new();
                for (row, col, value) in coo.triples() {
                    if let (Some(&new_row), Some(&new_col)) = (position.get(&row), position.get(&col)) {
                        entries.insert((new_row, new_col), value);
                    }
                }
                MatrixData::Sparse(CooMatrix::from_entries(
                    entries,
                    (indices.len(), indices.len()),
                ))
            }
        };

        AdjacencyMatrix { data, mapping }
    }

    /// Export non-zero entries as `(from, to, weight)` through the inverse
    /// mapping.
    pub fn to_edges(&self) -> Vec<(NodeId, NodeId, f64)> {
        match &self.data {
            MatrixData::Empty => Vec::new(),
            MatrixData::Dense(dense) => dense
                .indexed_iter()
                .filter(|&(_, &value)| value != 0.0)
                .filter_map(|((row, col), &value)| {
                    Some((self.mapping.node_at(row)?, self.mapping.node_at(col)?, value))
                })
                .collect(),
            MatrixData::Sparse(coo) => coo
                .triples()
                .filter(|&(_, _, value)| value != 0.0)
                .filter_map(|(row, col, value)| {
                    Some((self.mapping.node_at(row)?, self.mapping.node_at(col)?, value))
                })
                .collect(),
        }
    }

    /// Convert between dense and sparse. Identity on a matching kind and on
    /// the empty sentinel. Dense → sparse drops zeros; sparse → dense
    /// scatters into a zero-filled tensor.
    pub fn convert(&self, kind: MatrixKind) -> Self {
        let data = match (&self.data, kind) {
            (MatrixData::Empty, _) => MatrixData::Empty,
            (MatrixData::Dense(dense), MatrixKind::Dense) => MatrixData::Dense(dense.clone()),
            (MatrixData::Sparse(coo), MatrixKind::Sparse) => MatrixData::Sparse(coo.clone()),
            (MatrixData::Dense(dense), MatrixKind::Sparse) => {
                MatrixData::Sparse(CooMatrix::from_dense(dense))
            }
            (MatrixData::Sparse(coo), MatrixKind::Dense) => MatrixData::Dense(coo.to_dense()),
        };
        AdjacencyMatrix {
            data,
            mapping: self.mapping.clone(),
        }
    }

    /// Recode the matrix for a semiring: entries that mean "no edge" become
    /// the semiring's zero. Dense entries equal to `0.0` are taken as
    /// absent (a stored weight of exactly zero is indistinguishable); sparse
    /// matrices scatter their stored entries over a `zero()`-filled tensor.
    /// The result is dense.
    pub fn for_semiring(&self, semiring: &dyn Semiring) -> Self {
        let zero = semiring.zero();
        let data = match &self.data {
            MatrixData::Empty => MatrixData::Empty,
            MatrixData::Dense(dense) => {
                MatrixData::Dense(dense.mapv(|value| if value == 0.0 { zero } else { value }))
            }
            MatrixData::Sparse(coo) => MatrixData::Dense(coo.to_dense_with(zero)),
        };
        AdjacencyMatrix {
            data,
            mapping: self.mapping.clone(),
        }
    }

    /// Copy with every diagonal entry set to `value` (e.g. a zero-cost
    /// self-loop for tropical powers). The result is dense.
    pub fn with_diagonal(&self, value: f64) -> Self {
        match self.dense_data() {
            None => self.empty_like(),
            Some(mut dense) => {
                let n = dense.nrows().min(dense.ncols());
                for i in 0..n {
                    dense[[i, i]] = value;
                }
                AdjacencyMatrix {
                    data: MatrixData::Dense(dense),
                    mapping: self.mapping.clone(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeId, Node};

    fn weighted_graph() -> Graph {
        let graph = Graph::new("weights").unwrap();
        for id in 1..=3 {
            graph.add_node(Node::with_label(NodeId::new(id), "Node")).unwrap();
        }
        let mut ab = Edge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2), "LINK");
        ab.set_property("weight", 1.0);
        let mut bc = Edge::new(EdgeId::new(2), NodeId::new(2), NodeId::new(3), "LINK");
        bc.set_property("weight", 2.5);
        graph.add_edge(ab).unwrap();
        graph.add_edge(bc).unwrap();
        graph
    }

    #[test]
    fn test_from_graph_dense() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);

        assert_eq!(matrix.dimensions(), (3, 3));
        assert_eq!(matrix.kind(), Some(MatrixKind::Dense));
        assert_eq!(matrix.get(NodeId::new(1), NodeId::new(2)), Some(1.0));
        assert_eq!(matrix.get(NodeId::new(2), NodeId::new(3)), Some(2.5));
        assert_eq!(matrix.get(NodeId::new(1), NodeId::new(3)), Some(0.0));
    }

    #[test]
    fn test_from_graph_sparse_round_trip() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);

        let mut edges = matrix.to_edges();
        edges.sort_by_key(|&(from, to, _)| (from, to));
        assert_eq!(
            edges,
            vec![
                (NodeId::new(1), NodeId::new(2), 1.0),
                (NodeId::new(2), NodeId::new(3), 2.5),
            ]
        );
    }

    #[test]
    fn test_weight_fallback_key_and_default() {
        let graph = Graph::new("fallback").unwrap();
        graph.add_node(Node::with_label(NodeId::new(1), "Node")).unwrap();
        graph.add_node(Node::with_label(NodeId::new(2), "Node")).unwrap();
        graph.add_node(Node::with_label(NodeId::new(3), "Node")).unwrap();

        let mut capitalized = Edge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2), "LINK");
        capitalized.set_property("Weight", 4i64);
        graph.add_edge(capitalized).unwrap();
        // No weight property at all -> defaults to 1
        graph
            .add_edge(Edge::new(EdgeId::new(2), NodeId::new(2), NodeId::new(3), "LINK"))
            .unwrap();

        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
        assert_eq!(matrix.get(NodeId::new(1), NodeId::new(2)), Some(4.0));
        assert_eq!(matrix.get(NodeId::new(2), NodeId::new(3)), Some(1.0));
    }

    #[test]
    fn test_multi_edge_last_write_wins() {
        let graph = Graph::new("multi").unwrap();
        graph.add_node(Node::with_label(NodeId::new(1), "Node")).unwrap();
        graph.add_node(Node::with_label(NodeId::new(2), "Node")).unwrap();

        let mut first = Edge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2), "LINK");
        first.set_property("weight", 5.0);
        let mut second = Edge::new(EdgeId::new(2), NodeId::new(1), NodeId::new(2), "LINK");
        second.set_property("weight", 9.0);
        graph.add_edge(first).unwrap();
        graph.add_edge(second).unwrap();

        for kind in [MatrixKind::Dense, MatrixKind::Sparse] {
            let matrix = AdjacencyMatrix::from_graph(&graph, kind);
            assert_eq!(matrix.get(NodeId::new(1), NodeId::new(2)), Some(9.0));
            assert_eq!(matrix.to_edges().len(), 1);
        }
    }

    #[test]
    fn test_empty_graph_sentinel() {
        let graph = Graph::new("empty").unwrap();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);

        assert!(matrix.is_empty());
        assert_eq!(matrix.dimensions(), (0, 0));
        assert!(matrix.to_edges().is_empty());

        // Empty propagates through every operation
        assert!(matrix.transpose().is_empty());
        assert!(matrix.power(3).unwrap().is_empty());
        assert!(matrix.convert(MatrixKind::Sparse).is_empty());
        assert!(matrix.multiply(&matrix.clone()).unwrap().is_empty());
        assert!(matrix.elementwise_add(&matrix.clone()).unwrap().is_empty());
    }

    #[test]
    fn test_transpose_involution() {
        let graph = weighted_graph();
        for kind in [MatrixKind::Dense, MatrixKind::Sparse] {
            let matrix = AdjacencyMatrix::from_graph(&graph, kind);
            assert_eq!(matrix.transpose().transpose(), matrix);
        }
    }

    #[test]
    fn test_multiply_requires_matching_mapping() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);

        let other_graph = Graph::new("other").unwrap();
        other_graph.add_node(Node::with_label(NodeId::new(7), "Node")).unwrap();
        let other = AdjacencyMatrix::from_graph(&other_graph, MatrixKind::Dense);

        assert_eq!(matrix.multiply(&other), Err(MatrixError::IncompatibleMapping));
    }

    #[test]
    fn test_multiply_dimensions() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
        let product = matrix.multiply(&matrix).unwrap();
        assert_eq!(product.dimensions(), (3, 3));
        // Two-hop weight multiplies along the path: 1 -> 2 -> 3
        assert_eq!(product.get(NodeId::new(1), NodeId::new(3)), Some(2.5));
    }

    #[test]
    fn test_multiply_sparse_falls_back_to_dense() {
        let graph = weighted_graph();
        let sparse = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
        let product = sparse.multiply(&sparse).unwrap();
        assert_eq!(product.kind(), Some(MatrixKind::Dense));
        assert_eq!(product.get(NodeId::new(1), NodeId::new(3)), Some(2.5));
    }

    #[test]
    fn test_power() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);

        assert_eq!(matrix.power(1).unwrap(), matrix);

        let squared = matrix.power(2).unwrap();
        assert_eq!(squared, matrix.multiply(&matrix).unwrap());

        let identity = matrix.power(0).unwrap();
        assert_eq!(identity.get(NodeId::new(1), NodeId::new(1)), Some(1.0));
        assert_eq!(identity.get(NodeId::new(1), NodeId::new(2)), Some(0.0));
    }

    #[test]
    fn test_elementwise_add() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
        let doubled = matrix.elementwise_add(&matrix).unwrap();
        assert_eq!(doubled.get(NodeId::new(1), NodeId::new(2)), Some(2.0));
        assert_eq!(doubled.get(NodeId::new(2), NodeId::new(3)), Some(5.0));
    }

    #[test]
    fn test_subgraph_caller_order() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);

        // Caller order defines the new mapping; unknown ids are skipped
        let sub = matrix.subgraph(&[NodeId::new(3), NodeId::new(2), NodeId::new(99)]);
        assert_eq!(sub.dimensions(), (2, 2));
        assert_eq!(sub.mapping().nodes(), &[NodeId::new(3), NodeId::new(2)]);
        assert_eq!(sub.get(NodeId::new(2), NodeId::new(3)), Some(2.5));
        assert_eq!(sub.get(NodeId::new(3), NodeId::new(2)), Some(0.0));
    }

    #[test]
    fn test_subgraph_sparse() {
        let graph = weighted_graph();
        let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);
        let sub = matrix.subgraph(&[NodeId::new(2), NodeId::new(3)]);
        assert_eq!(sub.kind(), Some(MatrixKind::Sparse));
        assert_eq!(sub.to_edges(), vec![(NodeId::new(2), NodeId::new(3), 2.5)]);
    }

    #[test]
    fn test_convert_round_trip() {
        let graph = weighted_graph();
        let dense = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);

        let sparse = dense.convert(MatrixKind::Sparse);
        assert_eq!(sparse.kind(), Some(MatrixKind::Sparse));
        match sparse.data() {
            MatrixData::Sparse(coo) => assert_eq!(coo.nnz(), 2),
            other => panic!("expected sparse payload, got {:?}", other),
        }

        let back = sparse.convert(MatrixKind::Dense);
        assert_eq!(back, dense);
    }
}
