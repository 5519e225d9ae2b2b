//! Transpiler test modules.
//!
//! Tests are organized by category:
//! - `core`: SELECT rendering, expressions, joins, grouping, sub-queries
//! - `statements`: INSERT, UPDATE, DELETE and parameter binding
//! - `dialects`: quoting, placeholders and boolean support per dialect
//! - `layout`: block layout output and compact/block equivalence

mod core;
mod statements;

use crate::ast::*;
use crate::transpiler::{Dialect, ToSql};

fn customers() -> Table {
    Table::new("customers", ["Id", "Age", "Name", "Active"])
}

fn orders() -> Table {
    Table::new("orders", ["Id", "CustomerId", "Total", "Status"])
}

fn items() -> Table {
    Table::new("items", ["OrderId", "Sku"])
}

/// Compact SQL Server text.
fn mssql(node: &impl ToSql) -> String {
    node.to_sql_with_dialect(Dialect::SqlServer).unwrap().sql
}
