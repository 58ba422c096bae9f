//! BFS neighborhood expansion and unweighted shortest path

use crate::graph::{Direction, Edge, Graph, GraphError, GraphResult, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Options for [`neighborhood`] expansion.
#[derive(Debug, Clone, Copy)]
pub struct TraversalOptions {
    /// Maximum number of hops from the start node (inclusive)
    pub max_depth: usize,
    /// Which incident edges to follow at each hop
    pub direction: Direction,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            direction: Direction::Both,
        }
    }
}

fn incident_edges(graph: &Graph, node: NodeId, direction: Direction) -> Vec<Edge> {
    match direction {
        Direction::Outgoing => graph.get_outgoing_edges(node),
        Direction::Incoming => graph.get_incoming_edges(node),
        Direction::Both => {
            let mut edges = graph.get_outgoing_edges(node);
            let mut seen: HashSet<_> = edges.iter().map(|e| e.id).collect();
            for edge in graph.get_incoming_edges(node) {
                if seen.insert(edge.id) {
                    edges.push(edge);
                }
            }
            edges
        }
    }
}

/// The neighbor reached by stepping over `edge` from `node` in `direction`.
///
/// Stepping outgoing lands on the target, incoming on the source; for `Both`
/// the step lands on whichever endpoint is not the current node.
fn step(edge: &Edge, node: NodeId, direction: Direction) -> NodeId {
    match direction {
        Direction::Outgoing => edge.target,
        Direction::Incoming => edge.source,
        Direction::Both => edge.opposite(node),
    }
}

/// Collect every node reachable from `start` within `max_depth` hops,
/// including `start` itself.
///
/// BFS with a visited set; nodes appear in discovery order, which follows
/// adjacency insertion order.
pub fn neighborhood(
    graph: &Graph,
    start: NodeId,
    options: &TraversalOptions,
) -> GraphResult<Vec<NodeId>> {
    graph.get_node(start)?;

    let mut visited = HashSet::new();
    let mut result = Vec::new();
    let mut queue = VecDeque::new();

    visited.insert(start);
    result.push(start);
    queue.push_back((start, 0usize));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= options.max_depth {
            continue;
        }
        for edge in incident_edges(graph, current, options.direction) {
            let neighbor = step(&edge, current, options.direction);
            if visited.insert(neighbor) {
                result.push(neighbor);
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    Ok(result)
}

/// Unweighted shortest path between two nodes over undirected adjacency.
///
/// A step may traverse an edge in either direction. Returns the node-id
/// sequence from `from` to `to` (just `[from]` when the endpoints coincide),
/// with ties broken by first discovery. `NoPath` when the endpoints are
/// disconnected.
pub fn shortest_path(graph: &Graph, from: NodeId, to: NodeId) -> GraphResult<Vec<NodeId>> {
    graph.get_node(from)?;
    graph.get_node(to)?;

    if from == to {
        return Ok(vec![from]);
    }

    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    visited.insert(from);
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        for edge in incident_edges(graph, current, Direction::Both) {
            let neighbor = edge.opposite(current);
            if !visited.insert(neighbor) {
                continue;
            }
            parents.insert(neighbor, current);
            if neighbor == to {
                // Reconstruct by walking parents back to the start
                let mut path = vec![to];
                let mut cursor = to;
                while let Some(&parent) = parents.get(&cursor) {
                    path.push(parent);
                    cursor = parent;
                }
                path.reverse();
                return Ok(path);
            }
            queue.push_back(neighbor);
        }
    }

    Err(GraphError::NoPath { from, to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, EdgeId, Node};

    fn chain(n: u64) -> Graph {
        let graph = Graph::new("chain").unwrap();
        for i in 1..=n {
            graph.add_node(Node::with_label(NodeId::new(i), "Node")).unwrap();
        }
        for i in 1..n {
            graph
                .add_edge(Edge::new(EdgeId::new(i), NodeId::new(i), NodeId::new(i + 1), "LINK"))
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_neighborhood_depth_limits() {
        let graph = chain(5);
        let options = TraversalOptions {
            max_depth: 2,
            direction: Direction::Outgoing,
        };
        let reached = neighborhood(&graph, NodeId::new(1), &options).unwrap();
        assert_eq!(reached, vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]);
    }

    #[test]
    fn test_neighborhood_direction() {
        let graph = chain(3);
        // Node 2 sits in the middle of 1 -> 2 -> 3
        let outgoing = neighborhood(
            &graph,
            NodeId::new(2),
            &TraversalOptions {
                max_depth: 1,
                direction: Direction::Outgoing,
            },
        )
        .unwrap();
        assert_eq!(outgoing, vec![NodeId::new(2), NodeId::new(3)]);

        let incoming = neighborhood(
            &graph,
            NodeId::new(2),
            &TraversalOptions {
                max_depth: 1,
                direction: Direction::Incoming,
            },
        )
        .unwrap();
        assert_eq!(incoming, vec![NodeId::new(2), NodeId::new(1)]);

        let both = neighborhood(
            &graph,
            NodeId::new(2),
            &TraversalOptions {
                max_depth: 1,
                direction: Direction::Both,
            },
        )
        .unwrap();
        assert_eq!(both.len(), 3);
    }

    #[test]
    fn test_neighborhood_missing_start() {
        let graph = chain(2);
        let result = neighborhood(&graph, NodeId::new(99), &TraversalOptions::default());
        assert_eq!(result, Err(GraphError::NodeNotFound(NodeId::new(99))));
    }

    #[test]
    fn test_shortest_path_chain() {
        let graph = chain(3);
        let path = shortest_path(&graph, NodeId::new(1), NodeId::new(3)).unwrap();
        assert_eq!(path, vec![NodeId::new(1), NodeId::new(2), NodeId::new(3)]);
    }

    #[test]
    fn test_shortest_path_is_undirected() {
        let graph = chain(3);
        // Walk against edge direction: 3 -> 2 -> 1
        let path = shortest_path(&graph, NodeId::new(3), NodeId::new(1)).unwrap();
        assert_eq!(path, vec![NodeId::new(3), NodeId::new(2), NodeId::new(1)]);
    }

    #[test]
    fn test_shortest_path_prefers_fewer_hops() {
        let graph = chain(4);
        // Add a shortcut 1 -> 4
        graph
            .add_edge(Edge::new(EdgeId::new(99), NodeId::new(1), NodeId::new(4), "LINK"))
            .unwrap();
        let path = shortest_path(&graph, NodeId::new(1), NodeId::new(4)).unwrap();
        assert_eq!(path, vec![NodeId::new(1), NodeId::new(4)]);
    }

    #[test]
    fn test_shortest_path_same_node() {
        let graph = chain(2);
        let path = shortest_path(&graph, NodeId::new(1), NodeId::new(1)).unwrap();
        assert_eq!(path, vec![NodeId::new(1)]);
    }

    #[test]
    fn test_shortest_path_disconnected() {
        let graph = chain(2);
        graph.add_node(Node::with_label(NodeId::new(10), "Island")).unwrap();
        let result = shortest_path(&graph, NodeId::new(1), NodeId::new(10));
        assert_eq!(
            result,
            Err(GraphError::NoPath {
                from: NodeId::new(1),
                to: NodeId::new(10)
            })
        );
    }
}
