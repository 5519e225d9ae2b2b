//! The query IR: typed expressions, query chains and statements.

pub mod builders;
pub mod expr;
pub mod operators;
pub mod query;
pub mod stmt;
pub mod values;

pub use self::expr::*;
pub use self::operators::*;
pub use self::query::*;
pub use self::stmt::*;
pub use self::values::*;

use serde::{Deserialize, Serialize};

/// Anything the compiler accepts at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ir {
    Query(Query),
    Statement(Statement),
    Expr(Expr),
}

impl From<Query> for Ir {
    fn from(q: Query) -> Self {
        Ir::Query(q)
    }
}

impl From<Statement> for Ir {
    fn from(s: Statement) -> Self {
        Ir::Statement(s)
    }
}

impl From<Expr> for Ir {
    fn from(e: Expr) -> Self {
        Ir::Expr(e)
    }
}
