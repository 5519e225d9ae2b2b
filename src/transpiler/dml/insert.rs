//! INSERT SQL generation.

use crate::ast::*;
use crate::error::IrResult;
use crate::transpiler::context::{Clause, CompileContext};
use crate::transpiler::layout::SqlWriter;

use super::{assigned_value, check_column};

pub fn build_insert(insert: &Insert, cx: &mut CompileContext) -> IrResult<String> {
    let head = format!("INSERT INTO {}", cx.ident(&insert.table.name));
    let mut w = SqlWriter::new(cx.layout());

    if insert.values.is_empty() {
        w.line(&head);
        w.line("DEFAULT VALUES");
        return Ok(w.finish());
    }

    cx.push_statement_scope(&insert.table, Clause::Values);
    let rendered = render_values(insert, cx);
    cx.pop_scope();
    let (columns, values) = rendered?;

    w.tuple(&head, &columns);
    w.tuple("VALUES", &values);
    Ok(w.finish())
}

fn render_values(
    insert: &Insert,
    cx: &mut CompileContext,
) -> IrResult<(Vec<String>, Vec<String>)> {
    let mut columns = Vec::with_capacity(insert.values.len());
    let mut values = Vec::with_capacity(insert.values.len());
    for assignment in &insert.values {
        check_column(&insert.table, &assignment.column)?;
        columns.push(cx.ident(&assignment.column));
        values.push(assigned_value(&assignment.value, cx)?);
    }
    Ok((columns, values))
}
