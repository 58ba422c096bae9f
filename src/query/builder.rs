//! Fluent builder for assembling queries without the parser
//!
//! Every AST field is settable here, including the ones the parser treats as
//! extensions (variable-length hops, aggregations, ordering and windowing).

use crate::graph::Graph;
use crate::query::ast::{Condition, MatchPattern, OrderBy, Query, ReturnItem};
use crate::query::executor::{ExecutionResult, QueryExecutor};
use crate::query::QueryResult;

/// Builder form of [`Query`]:
/// `QueryBuilder::new().matching(…).filter(…).returns(…).limit(…).execute(&graph)`.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    query: Query,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a MATCH pattern
    pub fn matching(mut self, pattern: MatchPattern) -> Self {
        self.query.match_patterns.push(pattern);
        self
    }

    /// Add a WHERE condition (all conditions must hold)
    pub fn filter(mut self, condition: Condition) -> Self {
        self.query.where_conditions.push(condition);
        self
    }

    /// Add a RETURN item
    pub fn returns(mut self, item: ReturnItem) -> Self {
        self.query.return_items.push(item);
        self
    }

    /// Add an ORDER BY pair
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.query.order_by.push(order);
        self
    }

    /// Drop the first `n` rows
    pub fn skip(mut self, n: usize) -> Self {
        self.query.skip = Some(n);
        self
    }

    /// Keep at most `n` rows
    pub fn limit(mut self, n: usize) -> Self {
        self.query.limit = Some(n);
        self
    }

    /// Finish building and return the AST
    pub fn build(self) -> Query {
        self.query
    }

    /// Build and execute against a graph
    pub fn execute(self, graph: &Graph) -> QueryResult<ExecutionResult> {
        QueryExecutor::new(graph).execute(&self.query)
    }
}
