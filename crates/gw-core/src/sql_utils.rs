//! SQL identifier quoting utilities
//!
//! All DDL Groundwork generates goes through these helpers so that table,
//! column, and index names taken from migration files cannot break out of
//! their identifier position.

/// Quote a SQL identifier to prevent injection.
///
/// Wraps the identifier in double quotes and escapes any embedded double quotes
/// by doubling them, following the SQL standard.
///
/// # Examples
/// ```
/// use gw_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("products"), r#""products""#);
/// assert_eq!(quote_ident(r#"my"table"#), r#""my""table""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a potentially schema-qualified name (e.g. `schema.table`).
///
/// Splits on `.` and individually quotes each component.
///
/// # Examples
/// ```
/// use gw_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("products"), r#""products""#);
/// assert_eq!(quote_qualified("staging.orders"), r#""staging"."orders""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}
