//! DELETE SQL generation.

use crate::ast::*;
use crate::error::IrResult;
use crate::transpiler::context::{Clause, CompileContext};
use crate::transpiler::expr::predicate;
use crate::transpiler::layout::SqlWriter;

pub fn build_delete(delete: &Delete, cx: &mut CompileContext) -> IrResult<String> {
    let mut w = SqlWriter::new(cx.layout());
    w.line(&format!("DELETE FROM {}", cx.ident(&delete.table.name)));

    // No filter deletes every row.
    if let Some(filter) = &delete.filter {
        cx.push_statement_scope(&delete.table, Clause::Where);
        let rendered = predicate(filter, cx);
        cx.pop_scope();
        w.single("WHERE", rendered?);
    }
    Ok(w.finish())
}
