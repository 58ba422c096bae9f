//! Query executor: seed → expand → filter → project → order/skip/limit
//!
//! Bindings (partial assignments from pattern variables to graph elements)
//! flow through the pipeline. Entities are cloned into bindings as they are
//! touched, so a result set is stable even if the graph changes afterwards.

use crate::graph::{Direction, Edge, Graph, Node, NodeFilter, PropertyValue};
use crate::query::ast::*;
use crate::query::{QueryError, QueryResult};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::Instant;
use tracing::debug;

/// A value appearing in a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultValue {
    /// A bound node
    Node(Node),
    /// A bound edge
    Edge(Edge),
    /// A property value
    Value(PropertyValue),
    /// Unbound variable or missing property
    Null,
}

impl ResultValue {
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            ResultValue::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            ResultValue::Edge(edge) => Some(edge),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&PropertyValue> {
        match self {
            ResultValue::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ResultValue::Null)
    }
}

/// One result row, keyed by canonical column names.
#[derive(Debug, Clone, Default)]
pub struct Record {
    values: HashMap<String, ResultValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: ResultValue) {
        self.values.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&ResultValue> {
        self.values.get(column)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Counters collected while executing a query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionStats {
    /// Nodes examined during seeding and expansion
    pub nodes_visited: usize,
    /// Edges examined during expansion
    pub edges_traversed: usize,
    /// Wall-clock execution time in milliseconds
    pub execution_time_ms: f64,
}

/// Result of executing a query.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Canonical column names, in return-item order
    pub columns: Vec<String>,
    /// Result rows
    pub rows: Vec<Record>,
    /// Execution counters
    pub stats: ExecutionStats,
}

impl ExecutionResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// What a pattern variable is bound to.
#[derive(Debug, Clone)]
enum Bound {
    Node(Node),
    Edge(Edge),
}

type Binding = HashMap<String, Bound>;

/// Executes queries against a graph.
pub struct QueryExecutor<'a> {
    graph: &'a Graph,
    nodes_visited: usize,
    edges_traversed: usize,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(graph: &'a Graph) -> Self {
        Self {
            graph,
            nodes_visited: 0,
            edges_traversed: 0,
        }
    }

    /// Run the full pipeline for a query.
    pub fn execute(&mut self, query: &Query) -> QueryResult<ExecutionResult> {
        let started = Instant::now();

        for pattern in &query.match_patterns {
            if !pattern.is_well_formed() {
                return Err(QueryError::UnsupportedPattern(
                    "pattern must alternate nodes and edges along a path".to_string(),
                ));
            }
            for edge in &pattern.edges {
                if edge.is_variable_length() {
                    return Err(QueryError::UnsupportedPattern(
                        "variable-length paths are declared but not executed".to_string(),
                    ));
                }
            }
        }

        // Seed with a single empty binding, then expand pattern by pattern
        let mut bindings: Vec<Binding> = vec![Binding::new()];
        for pattern in &query.match_patterns {
            bindings = self.expand_pattern(bindings, pattern);
        }

        // Filter
        bindings.retain(|binding| {
            query
                .where_conditions
                .iter()
                .all(|condition| self.evaluate(binding, condition))
        });

        // Project
        let columns: Vec<String> = query
            .return_items
            .iter()
            .map(ReturnItem::column_name)
            .collect();
        let mut rows: Vec<Record> = bindings
            .iter()
            .map(|binding| self.project(binding, &query.return_items))
            .collect();

        // Order, then window
        sort_rows(&mut rows, &query.order_by);
        if let Some(skip) = query.skip {
            rows.drain(..skip.min(rows.len()));
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let stats = ExecutionStats {
            nodes_visited: self.nodes_visited,
            edges_traversed: self.edges_traversed,
            execution_time_ms: started.elapsed().as_secs_f64() * 1_000.0,
        };
        debug!(
            graph = self.graph.name(),
            rows = rows.len(),
            nodes_visited = stats.nodes_visited,
            edges_traversed = stats.edges_traversed,
            "query executed"
        );

        Ok(ExecutionResult {
            columns,
            rows,
            stats,
        })
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    fn expand_pattern(&mut self, bindings: Vec<Binding>, pattern: &MatchPattern) -> Vec<Binding> {
        let first = &pattern.nodes[0];
        let mut expanded = Vec::new();

        for binding in bindings {
            let starts: Vec<Node> = match first.variable.as_ref().and_then(|var| binding.get(var)) {
                // Already bound: the pattern re-constrains the same node
                Some(Bound::Node(node)) => {
                    if first.matches(node) {
                        vec![node.clone()]
                    } else {
                        Vec::new()
                    }
                }
                // A node pattern over an edge-bound variable never matches
                Some(Bound::Edge(_)) => Vec::new(),
                None => self.seed_candidates(first),
            };

            for start in starts {
                let mut seeded = binding.clone();
                if let Some(var) = &first.variable {
                    seeded.insert(var.clone(), Bound::Node(start.clone()));
                }
                self.walk_segment(seeded, &start, pattern, 0, &mut expanded);
            }
        }

        expanded
    }

    /// Candidates for an unbound pattern node: the label index when a label
    /// is present, otherwise a full scan, both post-filtered by the pattern.
    fn seed_candidates(&mut self, pattern: &NodePattern) -> Vec<Node> {
        let candidates = match pattern.labels.first() {
            Some(label) => self.graph.list_nodes(&NodeFilter::label(label.clone())),
            None => self.graph.nodes(),
        };
        self.nodes_visited += candidates.len();
        candidates
            .into_iter()
            .filter(|node| pattern.matches(node))
            .collect()
    }

    /// Recursively walk path segments starting after node `segment`,
    /// collecting completed bindings.
    fn walk_segment(
        &mut self,
        binding: Binding,
        current: &Node,
        pattern: &MatchPattern,
        segment: usize,
        out: &mut Vec<Binding>,
    ) {
        if segment == pattern.edges.len() {
            out.push(binding);
            return;
        }
        let edge_pattern = &pattern.edges[segment];
        let node_pattern = &pattern.nodes[segment + 1];

        for edge in self.incident_edges(current, edge_pattern.direction) {
            self.edges_traversed += 1;
            if !edge_pattern.matches(&edge) {
                continue;
            }
            let neighbor_id = match edge_pattern.direction {
                Direction::Outgoing => edge.target,
                Direction::Incoming => edge.source,
                Direction::Both => edge.opposite(current.id),
            };
            // A dangling adjacency entry is filtered, not fatal
            let Ok(neighbor) = self.graph.get_node(neighbor_id) else {
                continue;
            };
            self.nodes_visited += 1;
            if !node_pattern.matches(&neighbor) {
                continue;
            }

            let mut extended = binding.clone();
            if let Some(var) = &edge_pattern.variable {
                match extended.get(var) {
                    Some(Bound::Edge(existing)) if existing.id == edge.id => {}
                    Some(_) => continue,
                    None => {
                        extended.insert(var.clone(), Bound::Edge(edge.clone()));
                    }
                }
            }
            if let Some(var) = &node_pattern.variable {
                match extended.get(var) {
                    Some(Bound::Node(existing)) if existing.id == neighbor.id => {}
                    Some(_) => continue,
                    None => {
                        extended.insert(var.clone(), Bound::Node(neighbor.clone()));
                    }
                }
            }

            self.walk_segment(extended, &neighbor, pattern, segment + 1, out);
        }
    }

    fn incident_edges(&self, node: &Node, direction: Direction) -> Vec<Edge> {
        match direction {
            Direction::Outgoing => self.graph.get_outgoing_edges(node.id),
            Direction::Incoming => self.graph.get_incoming_edges(node.id),
            Direction::Both => {
                let mut edges = self.graph.get_outgoing_edges(node.id);
                let seen: std::collections::HashSet<_> = edges.iter().map(|e| e.id).collect();
                for edge in self.graph.get_incoming_edges(node.id) {
                    if !seen.contains(&edge.id) {
                        edges.push(edge);
                    }
                }
                edges
            }
        }
    }

    // ------------------------------------------------------------------
    // Filtering
    // ------------------------------------------------------------------

    fn evaluate(&self, binding: &Binding, condition: &Condition) -> bool {
        match condition {
            Condition::Comparison { left, op, right } => {
                match (resolve(binding, left), resolve(binding, right)) {
                    (Some(lhs), Some(rhs)) => compare_values(&lhs, *op, &rhs),
                    _ => false,
                }
            }
            Condition::Logical { op, children } => match op {
                LogicalOp::And => children.iter().all(|child| self.evaluate(binding, child)),
                LogicalOp::Or => children.iter().any(|child| self.evaluate(binding, child)),
                LogicalOp::Not => children
                    .first()
                    .map(|child| !self.evaluate(binding, child))
                    .unwrap_or(false),
            },
            Condition::PropertyExists { variable, key } => binding
                .get(variable)
                .map(|bound| match bound {
                    Bound::Node(node) => node.has_property(key),
                    Bound::Edge(edge) => edge.has_property(key),
                })
                .unwrap_or(false),
        }
    }

    // ------------------------------------------------------------------
    // Projection
    // ------------------------------------------------------------------

    fn project(&self, binding: &Binding, items: &[ReturnItem]) -> Record {
        let mut record = Record::new();
        for item in items {
            let value = match item {
                ReturnItem::Variable(variable) => match binding.get(variable) {
                    Some(Bound::Node(node)) => ResultValue::Node(node.clone()),
                    Some(Bound::Edge(edge)) => ResultValue::Edge(edge.clone()),
                    None => ResultValue::Null,
                },
                ReturnItem::Property { variable, key } => property_value(binding, variable, key),
                // Aggregation is pass-through in the subset: each row carries
                // the operand value under the aggregate column name
                ReturnItem::Aggregation { variable, key, .. } => match key {
                    Some(key) => property_value(binding, variable, key),
                    None => match binding.get(variable) {
                        Some(Bound::Node(node)) => ResultValue::Node(node.clone()),
                        Some(Bound::Edge(edge)) => ResultValue::Edge(edge.clone()),
                        None => ResultValue::Null,
                    },
                },
            };
            record.insert(item.column_name(), value);
        }
        record
    }
}

fn property_value(binding: &Binding, variable: &str, key: &str) -> ResultValue {
    binding
        .get(variable)
        .and_then(|bound| match bound {
            Bound::Node(node) => node.get_property(key).cloned(),
            Bound::Edge(edge) => edge.get_property(key).cloned(),
        })
        .map(ResultValue::Value)
        .unwrap_or(ResultValue::Null)
}

fn resolve(binding: &Binding, operand: &Operand) -> Option<PropertyValue> {
    match operand {
        Operand::Literal(value) => Some(value.clone()),
        Operand::Reference { variable, property } => {
            let bound = binding.get(variable)?;
            let key = property.as_ref()?;
            match bound {
                Bound::Node(node) => node.get_property(key).cloned(),
                Bound::Edge(edge) => edge.get_property(key).cloned(),
            }
        }
    }
}

fn compare_values(left: &PropertyValue, op: CompareOp, right: &PropertyValue) -> bool {
    match op {
        CompareOp::Eq => left.loose_eq(right),
        CompareOp::Neq => !left.loose_eq(right),
        CompareOp::Gt => matches!(left.compare(right), Some(Ordering::Greater)),
        CompareOp::Gte => matches!(
            left.compare(right),
            Some(Ordering::Greater) | Some(Ordering::Equal)
        ),
        CompareOp::Lt => matches!(left.compare(right), Some(Ordering::Less)),
        CompareOp::Lte => matches!(
            left.compare(right),
            Some(Ordering::Less) | Some(Ordering::Equal)
        ),
        CompareOp::In => right
            .as_array()
            .map(|items| items.iter().any(|item| left.loose_eq(item)))
            .unwrap_or(false),
        CompareOp::Contains => match (left.as_string(), right.as_string()) {
            (Some(haystack), Some(needle)) => haystack.contains(needle),
            _ => false,
        },
    }
}

/// Stable sort by the ORDER BY pairs in sequence. Only property values
/// order; nodes, edges and nulls sort after values and tie with each other.
fn sort_rows(rows: &mut [Record], order_by: &[OrderBy]) {
    if order_by.is_empty() {
        return;
    }
    rows.sort_by(|a, b| {
        for clause in order_by {
            let ordering = compare_row_values(a.get(&clause.key), b.get(&clause.key));
            let ordering = match clause.order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn compare_row_values(a: Option<&ResultValue>, b: Option<&ResultValue>) -> Ordering {
    let left = a.and_then(ResultValue::as_value);
    let right = b.and_then(ResultValue::as_value);
    match (left, right) {
        (Some(left), Some(right)) => left.compare(right).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
