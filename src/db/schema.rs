//! Database schema types for the playground.
//!
//! Represents the tables and columns exposed to the SQL console, along with
//! the static descriptions shown next to each known table.

use serde::{Deserialize, Serialize};

/// Represents the public schema of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    /// All tables in the schema, ordered by name.
    pub tables: Vec<Table>,
}

impl Schema {
    /// Finds a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }
}

/// Represents a database table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Columns in ordinal order.
    pub columns: Vec<Column>,
}

/// Represents a column in a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Data type as reported by `information_schema`.
    pub data_type: String,

    /// Whether the column accepts NULL.
    pub is_nullable: bool,

    /// Default value expression, if any.
    pub default: Option<String>,
}

impl Column {
    /// Returns the name as it must be written in a query.
    ///
    /// PostgreSQL folds unquoted identifiers to lowercase, so any name with an
    /// uppercase letter has to be double-quoted.
    pub fn quoted_name(&self) -> String {
        if self.name.chars().any(|c| c.is_ascii_uppercase()) {
            format!("\"{}\"", self.name)
        } else {
            self.name.clone()
        }
    }
}

/// Static description of a table the playground knows about.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TableMetadata {
    /// Table name in the store.
    #[serde(skip)]
    pub table: &'static str,
    /// Name of the record type the table holds.
    pub model: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

const KNOWN_TABLES: &[TableMetadata] = &[
    TableMetadata {
        table: "lego_bricks",
        model: "LegoBrick",
        description: "Individual Lego bricks with color, size and shape",
        category: "Lego",
    },
    TableMetadata {
        table: "lego_sets",
        model: "LegoSet",
        description: "Lego sets with theme, piece count and difficulty",
        category: "Lego",
    },
    TableMetadata {
        table: "menu_items",
        model: "MenuItem",
        description: "Dishes and drinks on the restaurant menu",
        category: "Restaurant",
    },
    TableMetadata {
        table: "orders",
        model: "Order",
        description: "Customer orders with table number, status and total price",
        category: "Restaurant",
    },
    TableMetadata {
        table: "order_items",
        model: "OrderItem",
        description: "Menu items belonging to an order, with quantities",
        category: "Restaurant",
    },
    TableMetadata {
        table: "users",
        model: "User",
        description: "Registered customers with name and location",
        category: "Users",
    },
];

/// Returns the metadata for every known table.
pub fn known_tables() -> &'static [TableMetadata] {
    KNOWN_TABLES
}
