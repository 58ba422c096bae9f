//! Query parser for the supported subset
//!
//! Built on a pest grammar (`cypher.pest`) restricted to
//! `MATCH … [WHERE …] RETURN … [ORDER BY …] [SKIP n] [LIMIT n]`.
//! Anything outside the subset fails with a positioned
//! [`QueryError::Parse`] rather than being silently accepted.

use crate::graph::PropertyMap;
use crate::graph::PropertyValue;
use crate::query::ast::*;
use crate::query::{QueryError, QueryResult};
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "query/cypher.pest"]
struct CypherParser;

fn pest_error(err: pest::error::Error<Rule>) -> QueryError {
    let position = match err.location {
        pest::error::InputLocation::Pos(pos) => pos,
        pest::error::InputLocation::Span((start, _)) => start,
    };
    QueryError::Parse {
        position,
        message: err.variant.message().into_owned(),
    }
}

fn error_at(pair: &Pair<Rule>, message: impl Into<String>) -> QueryError {
    QueryError::Parse {
        position: pair.as_span().start(),
        message: message.into(),
    }
}

/// Parse a query string into an AST.
pub fn parse_query(input: &str) -> QueryResult<Query> {
    let mut pairs = CypherParser::parse(Rule::query, input).map_err(pest_error)?;
    let mut query = Query::new();

    let Some(root) = pairs.next() else {
        return Ok(query);
    };

    for pair in root.into_inner() {
        match pair.as_rule() {
            Rule::match_clause => {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::pattern {
                        query.match_patterns.push(parse_pattern(inner)?);
                    }
                }
            }
            Rule::where_clause => {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::or_expr {
                        query.where_conditions.push(parse_or_expr(inner)?);
                    }
                }
            }
            Rule::return_clause => {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::return_item {
                        query.return_items.push(parse_return_item(inner)?);
                    }
                }
            }
            Rule::order_by_clause => {
                for inner in pair.into_inner() {
                    if inner.as_rule() == Rule::order_item {
                        query.order_by.push(parse_order_item(inner)?);
                    }
                }
            }
            Rule::skip_clause => {
                query.skip = Some(parse_uint_clause(pair)?);
            }
            Rule::limit_clause => {
                query.limit = Some(parse_uint_clause(pair)?);
            }
            Rule::EOI => {}
            _ => {}
        }
    }

    Ok(query)
}

fn parse_uint_clause(pair: Pair<Rule>) -> QueryResult<usize> {
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::uint {
            return inner
                .as_str()
                .parse::<usize>()
                .map_err(|err| error_at(&inner, format!("invalid count: {}", err)));
        }
    }
    Err(QueryError::Parse {
        position: 0,
        message: "expected a count".to_string(),
    })
}

// ------------------------------------------------------------------
// Patterns
// ------------------------------------------------------------------

fn parse_pattern(pair: Pair<Rule>) -> QueryResult<MatchPattern> {
    let mut pattern = MatchPattern::default();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::node_pattern => pattern.nodes.push(parse_node_pattern(inner)?),
            Rule::edge_pattern => pattern.edges.push(parse_edge_pattern(inner)?),
            _ => {}
        }
    }
    Ok(pattern)
}

fn parse_node_pattern(pair: Pair<Rule>) -> QueryResult<NodePattern> {
    let mut node = NodePattern::any();
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::node_var => node.variable = Some(inner.as_str().to_string()),
            Rule::node_label => {
                for label_inner in inner.into_inner() {
                    if label_inner.as_rule() == Rule::identifier {
                        node.labels.push(label_inner.as_str().into());
                    }
                }
            }
            Rule::property_map => node.properties = parse_property_map(inner)?,
            _ => {}
        }
    }
    Ok(node)
}

fn parse_edge_pattern(pair: Pair<Rule>) -> QueryResult<EdgePattern> {
    let mut edge = EdgePattern::outgoing();
    for direction_pair in pair.into_inner() {
        edge.direction = match direction_pair.as_rule() {
            Rule::outgoing_edge => crate::graph::Direction::Outgoing,
            Rule::incoming_edge => crate::graph::Direction::Incoming,
            Rule::undirected_edge => crate::graph::Direction::Both,
            _ => continue,
        };
        for inner in direction_pair.into_inner() {
            if inner.as_rule() == Rule::edge_body {
                parse_edge_body(inner, &mut edge)?;
            }
        }
    }
    Ok(edge)
}

fn parse_edge_body(pair: Pair<Rule>, edge: &mut EdgePattern) -> QueryResult<()> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::edge_var => edge.variable = Some(inner.as_str().to_string()),
            Rule::edge_type_ann => {
                for type_inner in inner.into_inner() {
                    if type_inner.as_rule() == Rule::identifier {
                        edge.edge_type = Some(type_inner.as_str().into());
                    }
                }
            }
            Rule::length_pattern => {
                let (min, max) = parse_length_pattern(inner)?;
                edge.min_hops = min;
                edge.max_hops = max;
            }
            Rule::property_map => edge.properties = parse_property_map(inner)?,
            _ => {}
        }
    }
    Ok(())
}

/// `*`, `*n`, `*a..`, `*a..b`
fn parse_length_pattern(pair: Pair<Rule>) -> QueryResult<(Option<usize>, Option<usize>)> {
    let open_ended = pair.as_str().contains("..");
    let mut bounds = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::uint {
            bounds.push(
                inner
                    .as_str()
                    .parse::<usize>()
                    .map_err(|err| error_at(&inner, format!("invalid hop count: {}", err)))?,
            );
        }
    }
    Ok(match (bounds.len(), open_ended) {
        (0, _) => (Some(1), None),
        (1, false) => (Some(bounds[0]), Some(bounds[0])),
        (1, true) => (Some(bounds[0]), None),
        _ => (Some(bounds[0]), Some(bounds[1])),
    })
}

fn parse_property_map(pair: Pair<Rule>) -> QueryResult<PropertyMap> {
    let mut properties = PropertyMap::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::property_pair {
            let mut key = None;
            let mut value = None;
            for pair_inner in inner.into_inner() {
                match pair_inner.as_rule() {
                    Rule::identifier => key = Some(pair_inner.as_str().to_string()),
                    Rule::literal => value = Some(parse_literal(pair_inner)?),
                    _ => {}
                }
            }
            if let (Some(key), Some(value)) = (key, value) {
                properties.insert(key, value);
            }
        }
    }
    Ok(properties)
}

// ------------------------------------------------------------------
// Literals
// ------------------------------------------------------------------

fn parse_literal(pair: Pair<Rule>) -> QueryResult<PropertyValue> {
    let inner = pair
        .clone()
        .into_inner()
        .next()
        .ok_or_else(|| error_at(&pair, "expected a literal"))?;
    match inner.as_rule() {
        Rule::float => inner
            .as_str()
            .parse::<f64>()
            .map(PropertyValue::Float)
            .map_err(|err| error_at(&inner, format!("invalid float: {}", err))),
        Rule::integer => inner
            .as_str()
            .parse::<i64>()
            .map(PropertyValue::Integer)
            .map_err(|err| error_at(&inner, format!("invalid integer: {}", err))),
        Rule::boolean => Ok(PropertyValue::Boolean(
            inner.as_str().eq_ignore_ascii_case("true"),
        )),
        Rule::null => Ok(PropertyValue::Null),
        Rule::string => {
            let raw = inner.as_str();
            Ok(PropertyValue::String(raw[1..raw.len() - 1].to_string()))
        }
        Rule::list => {
            let mut items = Vec::new();
            for item in inner.into_inner() {
                if item.as_rule() == Rule::literal {
                    items.push(parse_literal(item)?);
                }
            }
            Ok(PropertyValue::Array(items))
        }
        _ => Err(error_at(&inner, "unsupported literal")),
    }
}

// ------------------------------------------------------------------
// Conditions
// ------------------------------------------------------------------

fn parse_or_expr(pair: Pair<Rule>) -> QueryResult<Condition> {
    let mut children = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::and_expr {
            children.push(parse_and_expr(inner)?);
        }
    }
    if children.len() == 1 {
        Ok(children.remove(0))
    } else {
        Ok(Condition::or(children))
    }
}

fn parse_and_expr(pair: Pair<Rule>) -> QueryResult<Condition> {
    let mut children = Vec::new();
    for inner in pair.into_inner() {
        if inner.as_rule() == Rule::not_expr {
            children.push(parse_not_expr(inner)?);
        }
    }
    if children.len() == 1 {
        Ok(children.remove(0))
    } else {
        Ok(Condition::and(children))
    }
}

fn parse_not_expr(pair: Pair<Rule>) -> QueryResult<Condition> {
    let mut negated = false;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::not_op => negated = true,
            Rule::not_expr => {
                let child = parse_not_expr(inner)?;
                return Ok(if negated { Condition::not(child) } else { child });
            }
            Rule::condition => {
                let child = parse_condition(inner)?;
                return Ok(if negated { Condition::not(child) } else { child });
            }
            _ => {}
        }
    }
    Err(QueryError::Parse {
        position: 0,
        message: "expected a condition".to_string(),
    })
}

fn parse_condition(pair: Pair<Rule>) -> QueryResult<Condition> {
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::or_expr => return parse_or_expr(inner),
            Rule::exists_fn => {
                for exists_inner in inner.into_inner() {
                    if exists_inner.as_rule() == Rule::property_access {
                        let (variable, key) = parse_property_access(exists_inner)?;
                        return Ok(Condition::property_exists(variable, key));
                    }
                }
            }
            Rule::comparison => return parse_comparison(inner),
            _ => {}
        }
    }
    Err(QueryError::Parse {
        position: 0,
        message: "expected a condition".to_string(),
    })
}

fn parse_comparison(pair: Pair<Rule>) -> QueryResult<Condition> {
    let span_start = pair.as_span().start();
    let mut left = None;
    let mut op = None;
    let mut right = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::operand => {
                let operand = parse_operand(inner)?;
                if left.is_none() {
                    left = Some(operand);
                } else {
                    right = Some(operand);
                }
            }
            Rule::comp_op => op = Some(parse_compare_op(&inner)?),
            _ => {}
        }
    }
    match (left, op, right) {
        (Some(left), Some(op), Some(right)) => Ok(Condition::comparison(left, op, right)),
        _ => Err(QueryError::Parse {
            position: span_start,
            message: "malformed comparison".to_string(),
        }),
    }
}

fn parse_compare_op(pair: &Pair<Rule>) -> QueryResult<CompareOp> {
    match pair.as_str().trim().to_uppercase().as_str() {
        "=" => Ok(CompareOp::Eq),
        "!=" | "<>" => Ok(CompareOp::Neq),
        ">" => Ok(CompareOp::Gt),
        ">=" => Ok(CompareOp::Gte),
        "<" => Ok(CompareOp::Lt),
        "<=" => Ok(CompareOp::Lte),
        "IN" => Ok(CompareOp::In),
        "CONTAINS" => Ok(CompareOp::Contains),
        other => Err(error_at(pair, format!("unsupported operator: {}", other))),
    }
}

fn parse_operand(pair: Pair<Rule>) -> QueryResult<Operand> {
    let inner = pair
        .clone()
        .into_inner()
        .next()
        .ok_or_else(|| error_at(&pair, "expected an operand"))?;
    match inner.as_rule() {
        Rule::literal => Ok(Operand::Literal(parse_literal(inner)?)),
        Rule::property_access => {
            let (variable, key) = parse_property_access(inner)?;
            Ok(Operand::property(variable, key))
        }
        Rule::variable_ref => Ok(Operand::variable(inner.as_str())),
        _ => Err(error_at(&inner, "unsupported operand")),
    }
}

fn parse_property_access(pair: Pair<Rule>) -> QueryResult<(String, String)> {
    let mut parts = Vec::new();
    for inner in pair.clone().into_inner() {
        if inner.as_rule() == Rule::identifier {
            parts.push(inner.as_str().to_string());
        }
    }
    if parts.len() == 2 {
        let key = parts.pop().unwrap_or_default();
        let variable = parts.pop().unwrap_or_default();
        Ok((variable, key))
    } else {
        Err(error_at(&pair, "expected variable.property"))
    }
}

// ------------------------------------------------------------------
// Return items and ordering
// ------------------------------------------------------------------

fn parse_return_item(pair: Pair<Rule>) -> QueryResult<ReturnItem> {
    let inner = pair
        .clone()
        .into_inner()
        .next()
        .ok_or_else(|| error_at(&pair, "expected a return item"))?;
    match inner.as_rule() {
        Rule::aggregation => parse_aggregation(inner),
        Rule::property_access => {
            let (variable, key) = parse_property_access(inner)?;
            Ok(ReturnItem::property(variable, key))
        }
        Rule::variable_ref => Ok(ReturnItem::variable(inner.as_str())),
        _ => Err(error_at(&inner, "unsupported return item")),
    }
}

fn parse_aggregation(pair: Pair<Rule>) -> QueryResult<ReturnItem> {
    let mut func = None;
    let mut variable = None;
    let mut key = None;
    for inner in pair.clone().into_inner() {
        match inner.as_rule() {
            Rule::agg_fn => {
                func = Some(match inner.as_str().to_uppercase().as_str() {
                    "COUNT" => AggregateFunc::Count,
                    "SUM" => AggregateFunc::Sum,
                    "AVG" => AggregateFunc::Avg,
                    "MIN" => AggregateFunc::Min,
                    _ => AggregateFunc::Max,
                });
            }
            Rule::property_access => {
                let (var, k) = parse_property_access(inner)?;
                variable = Some(var);
                key = Some(k);
            }
            Rule::variable_ref => variable = Some(inner.as_str().to_string()),
            _ => {}
        }
    }
    match (func, variable) {
        (Some(func), Some(variable)) => Ok(ReturnItem::aggregation(func, variable, key)),
        _ => Err(error_at(&pair, "malformed aggregation")),
    }
}

fn parse_order_item(pair: Pair<Rule>) -> QueryResult<OrderBy> {
    let mut key = None;
    let mut order = SortOrder::Ascending;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::aggregation => key = Some(parse_aggregation(inner)?.column_name()),
            Rule::property_access => {
                let (variable, property) = parse_property_access(inner)?;
                key = Some(format!("{}.{}", variable, property));
            }
            Rule::variable_ref => key = Some(inner.as_str().to_string()),
            Rule::kw_desc => order = SortOrder::Descending,
            Rule::kw_asc => order = SortOrder::Ascending,
            _ => {}
        }
    }
    match key {
        Some(key) => Ok(OrderBy { key, order }),
        None => Err(QueryError::Parse {
            position: 0,
            message: "malformed ORDER BY item".to_string(),
        }),
    }
}
