//! # qail-ir: typed query IR, compiled to SQL
//!
//! > **Build trees, not strings.**
//!
//! Queries and statements are built as typed trees, fused into canonical
//! shape, and lowered to SQL text for SQL Server, SQLite or PostgreSQL
//! together with the values bound to each placeholder.
//!
//! ## Quick Example
//!
//! ```
//! use qail_ir::prelude::*;
//!
//! let customers = Table::new("customers", ["Id", "Age", "Name"]);
//! let query = Query::from(customers.source())
//!     .filter(gt(customers.int("Age"), 18))
//!     .filter(ne(customers.text("Name"), "Admin"));
//!
//! let out = query.to_sql_with_dialect(Dialect::SqlServer).unwrap();
//! assert_eq!(
//!     out.sql,
//!     "SELECT * FROM customers WHERE (customers.Age > 18) AND (customers.Name != 'Admin')"
//! );
//! ```
//!
//! ## Parameters
//!
//! Only statement values bind parameters (`@p0`, `:p0`, ...). The null
//! sentinel is written as `NULL` in place and never consumes an index.

pub mod ast;
pub mod config;
pub mod error;
pub mod normalize;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::builders::*;
    pub use crate::ast::*;
    pub use crate::config::CompileConfig;
    pub use crate::error::*;
    pub use crate::normalize::normalize;
    pub use crate::transpiler::{Compiled, Dialect, Layout, ToSql};
}

/// Compile any IR node with a configuration.
///
/// # Example
///
/// ```
/// use qail_ir::prelude::*;
///
/// let customers = Table::new("customers", ["Id", "Age", "Name"]);
/// let insert = Insert::into_table(customers).value("Id", 1).value("Name", None::<&str>);
/// let config = CompileConfig { dialect: Dialect::SqlServer, layout: Layout::Compact };
///
/// let out = qail_ir::compile(&Statement::from(insert).into(), &config).unwrap();
/// assert_eq!(out.sql, "INSERT INTO customers (Id, Name) VALUES (@p0, NULL)");
/// assert_eq!(out.params.len(), 1);
/// ```
pub fn compile(
    ir: &ast::Ir,
    config: &config::CompileConfig,
) -> error::IrResult<transpiler::Compiled> {
    use transpiler::ToSql;
    ir.to_sql_with(config.dialect, config.layout)
}
