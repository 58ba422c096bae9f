//! Adjacency matrices and semiring algebra end to end

use lattica::graph::{Edge, EdgeId, Graph, Node, NodeId};
use lattica::matrix::{
    AdjacencyMatrix, BooleanSemiring, CountingSemiring, CustomSemiring, MatrixKind,
    ProbabilitySemiring, Semiring, TropicalSemiring,
};

fn add_weighted_edge(graph: &Graph, id: u64, from: u64, to: u64, weight: f64) {
    let mut edge = Edge::new(EdgeId::new(id), NodeId::new(from), NodeId::new(to), "LINK");
    edge.set_property("weight", weight);
    graph.add_edge(edge).unwrap();
}

fn nodes(graph: &Graph, n: u64) {
    for id in 1..=n {
        graph.add_node(Node::with_label(NodeId::new(id), "Node")).unwrap();
    }
}

#[test]
fn test_round_trip_preserves_edges() {
    // a(1) -> b(2) w=1, b -> c(3) w=2.5
    let graph = Graph::new("roundtrip").unwrap();
    nodes(&graph, 3);
    add_weighted_edge(&graph, 1, 1, 2, 1.0);
    add_weighted_edge(&graph, 2, 2, 3, 2.5);

    for kind in [MatrixKind::Dense, MatrixKind::Sparse] {
        let matrix = AdjacencyMatrix::from_graph(&graph, kind);
        let mut edges = matrix.to_edges();
        edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        assert_eq!(
            edges,
            vec![
                (NodeId::new(1), NodeId::new(2), 1.0),
                (NodeId::new(2), NodeId::new(3), 2.5),
            ],
            "kind {:?}",
            kind
        );
    }
}

#[test]
fn test_transpose_is_an_involution() {
    let graph = Graph::new("transpose").unwrap();
    nodes(&graph, 4);
    add_weighted_edge(&graph, 1, 1, 2, 3.0);
    add_weighted_edge(&graph, 2, 2, 4, 1.5);
    add_weighted_edge(&graph, 3, 4, 1, 2.0);

    for kind in [MatrixKind::Dense, MatrixKind::Sparse] {
        let matrix = AdjacencyMatrix::from_graph(&graph, kind);
        assert_eq!(matrix.transpose().transpose(), matrix);
        // Transpose actually swaps the entry
        assert_eq!(
            matrix.transpose().get(NodeId::new(2), NodeId::new(1)),
            Some(3.0)
        );
    }
}

#[test]
fn test_multiply_dimensions_and_mapping() {
    let graph = Graph::new("dims").unwrap();
    nodes(&graph, 3);
    add_weighted_edge(&graph, 1, 1, 2, 1.0);

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let product = matrix.multiply(&matrix).unwrap();
    assert_eq!(product.dimensions(), (3, 3));
    assert_eq!(product.mapping(), matrix.mapping());
}

#[test]
fn test_boolean_reachability() {
    // A(1) -> B(2) -> C(3)
    let graph = Graph::new("reach").unwrap();
    nodes(&graph, 3);
    add_weighted_edge(&graph, 1, 1, 2, 1.0);
    add_weighted_edge(&graph, 2, 2, 3, 1.0);

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.power_with(2, &BooleanSemiring).unwrap();

    // Exactly one walk of length 2: A -> B -> C
    assert_eq!(squared.get(NodeId::new(1), NodeId::new(3)), Some(1.0));
    assert_eq!(squared.get(NodeId::new(1), NodeId::new(1)), Some(0.0));
    assert_eq!(squared.get(NodeId::new(1), NodeId::new(2)), Some(0.0));
}

#[test]
fn test_tropical_shortest_walk() {
    // A(1) -> B(2) cost 2, B -> C(3) cost 3, A -> C cost 7
    let graph = Graph::new("tropical").unwrap();
    nodes(&graph, 3);
    add_weighted_edge(&graph, 1, 1, 2, 2.0);
    add_weighted_edge(&graph, 2, 2, 3, 3.0);
    add_weighted_edge(&graph, 3, 1, 3, 7.0);

    let tropical = TropicalSemiring;
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense)
        .for_semiring(&tropical)
        .with_diagonal(tropical.one());

    let squared = matrix.power_with(2, &tropical).unwrap();

    // Two hops beat the direct edge: 2 + 3 < 7
    assert_eq!(squared.get(NodeId::new(1), NodeId::new(3)), Some(5.0));
    // Unreachable pairs stay at infinity
    assert_eq!(
        squared.get(NodeId::new(2), NodeId::new(1)),
        Some(f64::INFINITY)
    );
    // Diagonal stays at zero cost
    assert_eq!(squared.get(NodeId::new(1), NodeId::new(1)), Some(0.0));
}

#[test]
fn test_counting_walks() {
    // Diamond: 1 -> 2 -> 4 and 1 -> 3 -> 4
    let graph = Graph::new("count").unwrap();
    nodes(&graph, 4);
    add_weighted_edge(&graph, 1, 1, 2, 1.0);
    add_weighted_edge(&graph, 2, 1, 3, 1.0);
    add_weighted_edge(&graph, 3, 2, 4, 1.0);
    add_weighted_edge(&graph, 4, 3, 4, 1.0);

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.power_with(2, &CountingSemiring).unwrap();

    assert_eq!(squared.get(NodeId::new(1), NodeId::new(4)), Some(2.0));
}

#[test]
fn test_probability_of_reach() {
    // Diamond with probability 0.5 on every edge
    let graph = Graph::new("prob").unwrap();
    nodes(&graph, 4);
    add_weighted_edge(&graph, 1, 1, 2, 0.5);
    add_weighted_edge(&graph, 2, 1, 3, 0.5);
    add_weighted_edge(&graph, 3, 2, 4, 0.5);
    add_weighted_edge(&graph, 4, 3, 4, 0.5);

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.power_with(2, &ProbabilitySemiring).unwrap();

    // Two independent 0.25 paths: 0.25 + 0.25 - 0.0625
    let reach = squared.get(NodeId::new(1), NodeId::new(4)).unwrap();
    assert!((reach - 0.4375).abs() < 1e-12);
}

#[test]
fn test_custom_semiring_max_times() {
    // Most-probable single path
    let graph = Graph::new("maxtimes").unwrap();
    nodes(&graph, 4);
    add_weighted_edge(&graph, 1, 1, 2, 0.9);
    add_weighted_edge(&graph, 2, 1, 3, 0.5);
    add_weighted_edge(&graph, 3, 2, 4, 0.8);
    add_weighted_edge(&graph, 4, 3, 4, 0.9);

    let semiring = CustomSemiring::new("max-times", 0.0, 1.0, f64::max, |a, b| a * b);
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let squared = matrix.power_with(2, &semiring).unwrap();

    let best = squared.get(NodeId::new(1), NodeId::new(4)).unwrap();
    assert!((best - 0.72).abs() < 1e-12); // 0.9 * 0.8 beats 0.5 * 0.9
}

#[test]
fn test_sparse_semiring_power_matches_dense() {
    let graph = Graph::new("sparse-power").unwrap();
    nodes(&graph, 3);
    add_weighted_edge(&graph, 1, 1, 2, 1.0);
    add_weighted_edge(&graph, 2, 2, 3, 1.0);

    let dense = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let sparse = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);

    let from_dense = dense.power_with(2, &BooleanSemiring).unwrap();
    let from_sparse = sparse.power_with(2, &BooleanSemiring).unwrap();
    assert_eq!(from_dense, from_sparse);
}

#[test]
fn test_subgraph_projection() {
    let graph = Graph::new("subgraph").unwrap();
    nodes(&graph, 4);
    add_weighted_edge(&graph, 1, 1, 2, 1.0);
    add_weighted_edge(&graph, 2, 2, 3, 2.0);
    add_weighted_edge(&graph, 3, 3, 4, 3.0);

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let sub = matrix.subgraph(&[NodeId::new(2), NodeId::new(3)]);

    assert_eq!(sub.dimensions(), (2, 2));
    assert_eq!(sub.get(NodeId::new(2), NodeId::new(3)), Some(2.0));
    assert_eq!(sub.to_edges(), vec![(NodeId::new(2), NodeId::new(3), 2.0)]);
}

#[test]
fn test_empty_graph_propagates() {
    let graph = Graph::new("void").unwrap();
    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Sparse);

    assert!(matrix.is_empty());
    assert_eq!(matrix.dimensions(), (0, 0));
    assert!(matrix.transpose().is_empty());
    assert!(matrix.power_with(3, &BooleanSemiring).unwrap().is_empty());
    assert!(matrix.for_semiring(&TropicalSemiring).is_empty());
    assert!(matrix.to_edges().is_empty());
}

#[test]
fn test_elementwise_add() {
    let graph = Graph::new("add").unwrap();
    nodes(&graph, 2);
    add_weighted_edge(&graph, 1, 1, 2, 1.5);

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    let doubled = matrix.elementwise_add(&matrix).unwrap();
    assert_eq!(doubled.get(NodeId::new(1), NodeId::new(2)), Some(3.0));
}

#[test]
fn test_integer_weights_widen() {
    let graph = Graph::new("int-weights").unwrap();
    nodes(&graph, 2);
    let mut edge = Edge::new(EdgeId::new(1), NodeId::new(1), NodeId::new(2), "LINK");
    edge.set_property("weight", 3i64);
    graph.add_edge(edge).unwrap();

    let matrix = AdjacencyMatrix::from_graph(&graph, MatrixKind::Dense);
    assert_eq!(matrix.get(NodeId::new(1), NodeId::new(2)), Some(3.0));
}
