//! Query engine: pattern-match subset, parser, builder and executor
//!
//! The supported surface is `MATCH … [WHERE …] RETURN … [ORDER BY …]
//! [SKIP n] [LIMIT n]`. Queries arrive either as strings through
//! [`parse_query`] / [`QueryEngine::execute`], or as hand-assembled ASTs
//! through [`QueryBuilder`] / [`QueryEngine::execute_ast`].

pub mod ast;
pub mod builder;
pub mod executor;
pub mod parser;

pub use ast::{
    AggregateFunc, CompareOp, Condition, EdgePattern, LogicalOp, MatchPattern, NodePattern,
    Operand, OrderBy, Query, ReturnItem, SortOrder,
};
pub use builder::QueryBuilder;
pub use executor::{ExecutionResult, ExecutionStats, QueryExecutor, Record, ResultValue};
pub use parser::parse_query;

use crate::graph::{Graph, GraphError};
use thiserror::Error;

/// Errors from parsing or executing queries
#[derive(Error, Debug)]
pub enum QueryError {
    /// Syntax error with the byte offset where parsing failed
    #[error("parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// The AST declares a shape outside the executed subset
    #[error("unsupported pattern: {0}")]
    UnsupportedPattern(String),

    /// An underlying graph operation failed
    #[error(transparent)]
    Graph(#[from] GraphError),
}

pub type QueryResult<T> = Result<T, QueryError>;

/// High-level interface for executing queries against a graph.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    pub fn new() -> Self {
        Self
    }

    /// Parse and execute a query string
    pub fn execute(&self, query_str: &str, graph: &Graph) -> QueryResult<ExecutionResult> {
        let query = parse_query(query_str)?;
        self.execute_ast(&query, graph)
    }

    /// Execute an already-built AST
    pub fn execute_ast(&self, query: &Query, graph: &Graph) -> QueryResult<ExecutionResult> {
        QueryExecutor::new(graph).execute(query)
    }
}
