//! Step-by-step explanation of SELECT queries.
//!
//! Uses sqlparser-rs with the PostgreSQL dialect to break a SELECT into the
//! clauses a learner reads in order: columns, FROM, JOINs, WHERE, GROUP BY,
//! HAVING, ORDER BY and LIMIT.

use serde::Serialize;
use sqlparser::ast::{
    GroupByExpr, JoinConstraint, JoinOperator, Query, Select, SelectItem, SetExpr, Statement,
    TableFactor,
};
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

/// The clause a step explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Select,
    From,
    Join,
    Where,
    Group,
    Having,
    Order,
    Limit,
}

/// One explained clause of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryStep {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub description: String,
    /// Keyword to highlight in the query text.
    pub highlight: String,
}

impl QueryStep {
    fn new(kind: StepKind, description: String, highlight: impl Into<String>) -> Self {
        Self {
            kind,
            description,
            highlight: highlight.into(),
        }
    }
}

/// The explanation of a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Walkthrough {
    pub steps: Vec<QueryStep>,
    /// Tables read by the query, in the order they appear.
    pub tables: Vec<String>,
    /// Why no steps were produced, when that is the case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Walkthrough {
    fn with_note(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }
}

/// Explains a single SELECT statement step by step.
///
/// Anything else (other statements, set operations, unparsable text) yields
/// an empty walkthrough with a note.
pub fn explain_query(sql: &str) -> Walkthrough {
    let statements = match Parser::parse_sql(&PostgreSqlDialect {}, sql) {
        Ok(statements) => statements,
        Err(e) => return Walkthrough::with_note(format!("Could not parse query: {e}")),
    };

    match statements.as_slice() {
        [Statement::Query(query)] => explain_select_query(query),
        [_] => Walkthrough::with_note("Only SELECT queries can be explained step by step"),
        [] => Walkthrough::with_note("Empty query"),
        _ => Walkthrough::with_note("Explain one statement at a time"),
    }
}

fn explain_select_query(query: &Query) -> Walkthrough {
    let SetExpr::Select(select) = query.body.as_ref() else {
        return Walkthrough::with_note("Set operations and VALUES lists are not broken down");
    };

    let mut walkthrough = Walkthrough::default();
    explain_select(select, &mut walkthrough);

    if let Some(order_by) = &query.order_by {
        if !order_by.exprs.is_empty() {
            walkthrough.steps.push(QueryStep::new(
                StepKind::Order,
                format!("Sorting by: {}", join_display(&order_by.exprs)),
                "ORDER BY",
            ));
        }
    }

    if let Some(limit) = &query.limit {
        walkthrough.steps.push(QueryStep::new(
            StepKind::Limit,
            format!("Limiting to {limit} rows"),
            "LIMIT",
        ));
    }

    walkthrough
}

fn explain_select(select: &Select, walkthrough: &mut Walkthrough) {
    let description = match select.projection.as_slice() {
        [SelectItem::Wildcard(_)] => "Selecting all columns".to_string(),
        items => format!("Selecting columns: {}", join_display(items)),
    };
    walkthrough
        .steps
        .push(QueryStep::new(StepKind::Select, description, "SELECT"));

    for from in &select.from {
        let table = describe_relation(&from.relation);
        walkthrough.steps.push(QueryStep::new(
            StepKind::From,
            format!("Reading from table: {table}"),
            "FROM",
        ));
        walkthrough.tables.push(table);

        for join in &from.joins {
            let (join_type, constraint) = describe_join(&join.join_operator);
            let table = describe_relation(&join.relation);
            let description = match constraint {
                Some(condition) => format!("{join_type} JOIN with {table} on {condition}"),
                None => format!("{join_type} JOIN with {table}"),
            };
            walkthrough.steps.push(QueryStep::new(
                StepKind::Join,
                description,
                format!("{join_type} JOIN"),
            ));
            walkthrough.tables.push(table);
        }
    }

    if let Some(selection) = &select.selection {
        walkthrough.steps.push(QueryStep::new(
            StepKind::Where,
            format!("Filtering rows where: {selection}"),
            "WHERE",
        ));
    }

    if let GroupByExpr::Expressions(exprs, _) = &select.group_by {
        if !exprs.is_empty() {
            walkthrough.steps.push(QueryStep::new(
                StepKind::Group,
                format!("Grouping by: {}", join_display(exprs)),
                "GROUP BY",
            ));
        }
    }

    if let Some(having) = &select.having {
        walkthrough.steps.push(QueryStep::new(
            StepKind::Having,
            format!("Filtering groups having: {having}"),
            "HAVING",
        ));
    }
}

/// Names a FROM or JOIN relation; base tables by name, anything else by alias.
fn describe_relation(relation: &TableFactor) -> String {
    match relation {
        TableFactor::Table { name, .. } => name
            .0
            .iter()
            .map(|ident| ident.value.as_str())
            .collect::<Vec<_>>()
            .join("."),
        TableFactor::Derived {
            alias: Some(alias), ..
        } => format!("subquery {}", alias.name.value),
        TableFactor::Derived { .. } => "subquery".to_string(),
        other => other.to_string(),
    }
}

fn describe_join(operator: &JoinOperator) -> (&'static str, Option<String>) {
    let (join_type, constraint) = match operator {
        JoinOperator::Inner(c) => ("INNER", Some(c)),
        JoinOperator::LeftOuter(c) => ("LEFT", Some(c)),
        JoinOperator::RightOuter(c) => ("RIGHT", Some(c)),
        JoinOperator::FullOuter(c) => ("FULL", Some(c)),
        JoinOperator::CrossJoin => ("CROSS", None),
        _ => ("INNER", None),
    };

    let condition = constraint.and_then(|c| match c {
        JoinConstraint::On(expr) => Some(expr.to_string()),
        JoinConstraint::Using(columns) => Some(format!("USING ({})", join_display(columns))),
        _ => None,
    });

    (join_type, condition)
}

fn join_display<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
