//! UPDATE SQL generation.

use crate::ast::*;
use crate::error::{IrError, IrResult};
use crate::transpiler::context::{Clause, CompileContext};
use crate::transpiler::expr::predicate;
use crate::transpiler::layout::SqlWriter;

use super::{assigned_value, check_column};

pub fn build_update(update: &Update, cx: &mut CompileContext) -> IrResult<String> {
    if update.assignments.is_empty() {
        return Err(IrError::malformed(format!(
            "UPDATE of '{}' without assignments",
            update.table.name
        )));
    }

    cx.push_statement_scope(&update.table, Clause::Set);
    let rendered = render_update(update, cx);
    cx.pop_scope();
    rendered
}

fn render_update(update: &Update, cx: &mut CompileContext) -> IrResult<String> {
    let mut w = SqlWriter::new(cx.layout());
    w.line(&format!("UPDATE {}", cx.ident(&update.table.name)));

    let mut sets = Vec::with_capacity(update.assignments.len());
    for assignment in &update.assignments {
        check_column(&update.table, &assignment.column)?;
        let column = cx.ident(&assignment.column);
        sets.push(format!("{} = {}", column, assigned_value(&assignment.value, cx)?));
    }
    w.list("SET", &sets);

    if let Some(filter) = &update.filter {
        cx.set_clause(Clause::Where);
        w.single("WHERE", predicate(filter, cx)?);
    }
    Ok(w.finish())
}
