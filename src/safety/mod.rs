//! Query safety classification module.
//!
//! Classifies raw SQL typed into the teaching console so the server can decide
//! whether to reject it, preview it, or run it. Classification is a keyword and
//! regex heuristic over the text, not a parse: any dangerous keyword anywhere in
//! the input wins, even inside a string literal or identifier.

mod classifier;
pub mod walkthrough;

pub use classifier::{classify_sql, dangerous_keyword, DANGEROUS_KEYWORDS};
pub use walkthrough::{explain_query, QueryStep, StepKind, Walkthrough};

use serde::Serialize;
use std::fmt;

/// The kind of statement detected in console input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
    /// Contains a schema-altering or execution keyword; never run.
    Dangerous,
    Unknown,
}

impl QueryKind {
    /// Returns true for statements whose preview includes a row estimate.
    pub fn needs_row_estimate(&self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }

    /// Returns the keyword form of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Dangerous => "DANGEROUS",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInfo {
    /// The detected statement kind.
    pub kind: QueryKind,
    /// Target table, when the statement shape names one.
    pub table: Option<String>,
    /// WHERE clause body for DELETE and UPDATE.
    pub where_clause: Option<String>,
}

impl QueryInfo {
    /// Creates a classification with no extracted metadata.
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            table: None,
            where_clause: None,
        }
    }

    /// Returns the table name or a generic placeholder for messages.
    pub fn table_or_placeholder(&self) -> &str {
        self.table.as_deref().unwrap_or("the table")
    }
}
