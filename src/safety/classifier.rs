//! Keyword and regex based SQL classification.

use regex::Regex;
use std::sync::LazyLock;

use super::{QueryInfo, QueryKind};

/// Keywords that block a statement wherever they appear in the text.
pub const DANGEROUS_KEYWORDS: &[&str] = &["DROP", "ALTER", "CREATE", "TRUNCATE", "EXEC", "EXECUTE"];

static DELETE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)DELETE\s+FROM\s+["']?(\w+)["']?"#).expect("valid DELETE regex")
});

static UPDATE_TABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)UPDATE\s+["']?(\w+)["']?"#).expect("valid UPDATE regex"));

static INSERT_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)INSERT\s+INTO\s+["']?(\w+)["']?"#).expect("valid INSERT regex")
});

// Lazy body so the first ORDER BY / LIMIT ends the clause; `s` lets it span lines.
static WHERE_CLAUSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\bWHERE\s+(.+?)(?:\s+ORDER\s+BY\b|\s+LIMIT\b|$)").expect("valid WHERE regex")
});

/// Returns the first dangerous keyword contained in `sql`, ignoring case.
pub fn dangerous_keyword(sql: &str) -> Option<&'static str> {
    let upper = sql.to_uppercase();
    DANGEROUS_KEYWORDS
        .iter()
        .copied()
        .find(|keyword| upper.contains(keyword))
}

/// Classifies console input into a statement kind plus target table and WHERE clause.
///
/// Dangerous keywords take priority over everything else. Otherwise dispatch is
/// on the leading keyword; identifiers keep the casing they were typed with.
pub fn classify_sql(sql: &str) -> QueryInfo {
    if dangerous_keyword(sql).is_some() {
        return QueryInfo::new(QueryKind::Dangerous);
    }

    let statement = sql.trim().trim_end_matches(';').trim_end();
    let upper = statement.to_uppercase();

    if upper.starts_with("DELETE") {
        QueryInfo {
            kind: QueryKind::Delete,
            table: capture(&DELETE_TABLE, statement),
            where_clause: capture(&WHERE_CLAUSE, statement),
        }
    } else if upper.starts_with("UPDATE") {
        QueryInfo {
            kind: QueryKind::Update,
            table: capture(&UPDATE_TABLE, statement),
            where_clause: capture(&WHERE_CLAUSE, statement),
        }
    } else if upper.starts_with("INSERT") {
        QueryInfo {
            kind: QueryKind::Insert,
            table: capture(&INSERT_TABLE, statement),
            where_clause: None,
        }
    } else if upper.starts_with("SELECT") {
        QueryInfo::new(QueryKind::Select)
    } else {
        QueryInfo::new(QueryKind::Unknown)
    }
}

fn capture(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn info(kind: QueryKind, table: Option<&str>, where_clause: Option<&str>) -> QueryInfo {
        QueryInfo {
            kind,
            table: table.map(String::from),
            where_clause: where_clause.map(String::from),
        }
    }

    #[test]
    fn test_select_is_select() {
        assert_eq!(
            classify_sql("SELECT * FROM orders LIMIT 5;"),
            QueryInfo::new(QueryKind::Select)
        );
        assert_eq!(
            classify_sql("  select status from orders").kind,
            QueryKind::Select
        );
    }

    #[test]
    fn test_delete_extracts_table_and_where() {
        assert_eq!(
            classify_sql("DELETE FROM orders WHERE status = 'CANCELLED';"),
            info(QueryKind::Delete, Some("orders"), Some("status = 'CANCELLED'"))
        );
    }

    #[test]
    fn test_delete_without_where() {
        assert_eq!(
            classify_sql("delete from menu_items"),
            info(QueryKind::Delete, Some("menu_items"), None)
        );
    }

    #[test]
    fn test_delete_with_quoted_table() {
        assert_eq!(
            classify_sql(r#"DELETE FROM "orders" WHERE "tableNumber" = 5"#),
            info(QueryKind::Delete, Some("orders"), Some(r#""tableNumber" = 5"#))
        );
    }

    #[test]
    fn test_update_extracts_table_and_where() {
        assert_eq!(
            classify_sql("UPDATE orders SET status='DELIVERED' WHERE status='READY';"),
            info(QueryKind::Update, Some("orders"), Some("status='READY'"))
        );
    }

    #[test]
    fn test_where_stops_at_order_by_and_limit() {
        let result = classify_sql("DELETE FROM orders WHERE status = 'PENDING' ORDER BY id LIMIT 3");
        assert_eq!(result.where_clause.as_deref(), Some("status = 'PENDING'"));

        let result = classify_sql("UPDATE orders SET notes = '' WHERE \"totalPrice\" > 10 LIMIT 1");
        assert_eq!(result.where_clause.as_deref(), Some("\"totalPrice\" > 10"));
    }

    #[test]
    fn test_where_spans_newlines() {
        let sql = "DELETE FROM orders\nWHERE status = 'CANCELLED'\n  AND \"tableNumber\" = 4;";
        assert_eq!(
            classify_sql(sql).where_clause.as_deref(),
            Some("status = 'CANCELLED'\n  AND \"tableNumber\" = 4")
        );
    }

    #[test]
    fn test_identifier_casing_is_preserved() {
        let result = classify_sql("delete from OrderItems where menuItemId = 'x'");
        assert_eq!(result.table.as_deref(), Some("OrderItems"));
        assert_eq!(result.where_clause.as_deref(), Some("menuItemId = 'x'"));
    }

    #[test]
    fn test_insert_extracts_table_only() {
        assert_eq!(
            classify_sql(
                "INSERT INTO users (email, \"firstName\") VALUES ('test@example.com', 'Test') WHERE x"
            ),
            info(QueryKind::Insert, Some("users"), None)
        );
    }

    #[test]
    fn test_malformed_delete_has_no_table() {
        assert_eq!(classify_sql("DELETE orders"), info(QueryKind::Delete, None, None));
    }

    #[test]
    fn test_unknown_statements() {
        assert_eq!(classify_sql("SHOW search_path").kind, QueryKind::Unknown);
        assert_eq!(classify_sql("").kind, QueryKind::Unknown);
        assert_eq!(
            classify_sql("WITH x AS (SELECT 1) SELECT * FROM x").kind,
            QueryKind::Unknown
        );
    }

    #[test]
    fn test_dangerous_keywords_anywhere() {
        for sql in [
            "DROP TABLE orders",
            "alter table orders add column x int",
            "CREATE TABLE t (id int)",
            "TRUNCATE orders",
            "EXEC sp_who",
            "execute my_plan",
        ] {
            assert_eq!(classify_sql(sql).kind, QueryKind::Dangerous, "SQL: {sql}");
        }
    }

    #[test]
    fn test_dangerous_wins_over_leading_select() {
        assert_eq!(
            classify_sql("SELECT * FROM orders; DROP TABLE orders;").kind,
            QueryKind::Dangerous
        );
        assert_eq!(
            classify_sql("DELETE FROM orders WHERE notes = 'please drop off at door'").kind,
            QueryKind::Dangerous
        );
    }

    #[test]
    fn test_keyword_inside_identifier_is_dangerous() {
        let result = classify_sql("SELECT * FROM orders ORDER BY \"createdAt\" DESC");
        assert_eq!(result, QueryInfo::new(QueryKind::Dangerous));
        assert_eq!(dangerous_keyword("select \"createdAt\" from orders"), Some("CREATE"));
    }

    #[test]
    fn test_dangerous_keyword_none_for_plain_select() {
        assert_eq!(dangerous_keyword("SELECT * FROM orders"), None);
    }
}
