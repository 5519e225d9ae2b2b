//! SQL Transpiler for the query IR.
//!
//! Lowers queries, statements and expressions to SQL text plus the
//! parameter map for the placeholders that text contains.

pub mod context;
pub mod dialect;
pub mod dml;
pub mod expr;
pub mod layout;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::ast::*;
use crate::error::IrResult;
pub use context::CompileContext;
pub use dialect::{Dialect, DialectConfig, Layout};
pub use expr::ExprToSql;
pub use traits::SqlGenerator;

/// Compiled SQL text and its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compiled {
    pub sql: String,
    pub params: ParamMap,
}

/// Trait for converting IR nodes to SQL.
pub trait ToSql {
    /// Render into an existing context.
    fn render(&self, cx: &mut CompileContext) -> IrResult<String>;

    /// A fresh context for a top-level compile of this node.
    fn context(&self, dialect: Dialect, layout: Layout) -> CompileContext {
        CompileContext::new(dialect, layout)
    }

    /// Compile with the default dialect and compact layout.
    fn to_sql(&self) -> IrResult<Compiled> {
        self.to_sql_with(Dialect::default(), Layout::default())
    }

    /// Compile with a specific dialect and compact layout.
    fn to_sql_with_dialect(&self, dialect: Dialect) -> IrResult<Compiled> {
        self.to_sql_with(dialect, Layout::default())
    }

    fn to_sql_with(&self, dialect: Dialect, layout: Layout) -> IrResult<Compiled> {
        let mut cx = self.context(dialect, layout);
        let sql = self.render(&mut cx)?;
        let params = cx.into_params();
        tracing::debug!(%dialect, %layout, params = params.len(), "compiled");
        Ok(Compiled { sql, params })
    }
}

impl ToSql for Query {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        cx.push_scope();
        let sql = dml::select::build_select(self, cx);
        cx.pop_scope();
        sql
    }
}

impl ToSql for Insert {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        dml::insert::build_insert(self, cx)
    }
}

impl ToSql for Update {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        dml::update::build_update(self, cx)
    }
}

impl ToSql for Delete {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        dml::delete::build_delete(self, cx)
    }
}

impl ToSql for Statement {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            Statement::Insert(s) => s.render(cx),
            Statement::Update(s) => s.render(cx),
            Statement::Delete(s) => s.render(cx),
        }
    }
}

/// A standalone expression. A scalar sub-query at the top is emitted bare;
/// a boolean expression is rendered as a condition.
impl ToSql for Expr {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            Expr::Int(IntExpr::Scalar(q))
            | Expr::Text(TextExpr::Scalar(q))
            | Expr::Bool(BoolExpr::Scalar(q)) => q.render(cx),
            Expr::Bool(e) => {
                cx.push_scope();
                let sql = expr::predicate(e, cx);
                cx.pop_scope();
                sql
            }
            Expr::Int(_) | Expr::Text(_) => {
                cx.push_scope();
                let sql = ExprToSql::to_sql(self, cx);
                cx.pop_scope();
                sql
            }
        }
    }

    fn context(&self, dialect: Dialect, layout: Layout) -> CompileContext {
        CompileContext::open(dialect, layout)
    }
}

impl ToSql for Ir {
    fn render(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            Ir::Query(q) => q.render(cx),
            Ir::Statement(s) => s.render(cx),
            Ir::Expr(e) => e.render(cx),
        }
    }

    fn context(&self, dialect: Dialect, layout: Layout) -> CompileContext {
        match self {
            Ir::Expr(e) => e.context(dialect, layout),
            _ => CompileContext::new(dialect, layout),
        }
    }
}
