pub mod delete;
pub mod insert;
pub mod select;
pub mod update;

use crate::ast::{Assigned, Table};
use crate::error::{IrError, IrResult};
use crate::transpiler::context::CompileContext;
use crate::transpiler::expr::ExprToSql;

/// VALUES/SET slot: values bind a parameter, the null sentinel is written
/// in place without consuming an index, expressions render inline.
fn assigned_value(value: &Assigned, cx: &mut CompileContext) -> IrResult<String> {
    match value {
        Assigned::Value(v) => Ok(cx.add_param(v.clone())),
        Assigned::Null => Ok("NULL".to_string()),
        Assigned::Expr(e) => e.to_sql(cx),
    }
}

fn check_column(table: &Table, column: &str) -> IrResult<()> {
    if table.has_column(column) {
        Ok(())
    } else {
        Err(IrError::UnknownColumn {
            table: table.name.clone(),
            column: column.to_string(),
        })
    }
}
