//! SELECT SQL generation.

use std::sync::Arc;

use crate::ast::*;
use crate::error::{IrError, IrResult};
use crate::normalize::normalize;
use crate::transpiler::context::{Clause, CompileContext};
use crate::transpiler::expr::{ExprToSql, aggregate, comparison, predicate};
use crate::transpiler::layout::{SqlWriter, wrap_nested};

enum SelectList<'q> {
    Star,
    Fields(&'q Projection),
    Keys(&'q [Expr]),
    Aggregate(&'q Aggregate),
}

/// A query chain folded into clause slots.
struct SelectPlan<'q> {
    select: SelectList<'q>,
    joins: Vec<&'q JoinStage>,
    virtuals: Vec<&'q Projection>,
    wheres: Vec<&'q BoolExpr>,
    group_by: Option<&'q [Expr]>,
    havings: Vec<&'q BoolExpr>,
    order_by: Vec<&'q OrderKey>,
}

impl<'q> SelectPlan<'q> {
    fn fold(links: &'q [Link]) -> IrResult<Self> {
        let mut plan = SelectPlan {
            select: SelectList::Star,
            joins: Vec::new(),
            virtuals: Vec::new(),
            wheres: Vec::new(),
            group_by: None,
            havings: Vec::new(),
            order_by: Vec::new(),
        };
        let mut terminal = false;

        for link in links {
            if terminal {
                return Err(IrError::malformed("link after an aggregate terminal"));
            }
            match link {
                Link::Filter(p) if plan.group_by.is_some() => plan.havings.push(p),
                Link::Filter(p) => plan.wheres.push(p),
                Link::Project(projection) => {
                    plan.select = SelectList::Fields(projection);
                    plan.virtuals.push(projection);
                }
                Link::OrderBy(keys) => plan.order_by.extend(keys),
                Link::GroupBy(grouping) => {
                    if plan.group_by.is_some() {
                        return Err(IrError::malformed("GROUP BY over a grouped query"));
                    }
                    plan.group_by = Some(grouping.keys.as_slice());
                    plan.select = SelectList::Keys(grouping.keys.as_slice());
                    if let Some(having) = &grouping.having {
                        plan.havings.push(having);
                    }
                }
                Link::Join(join) => {
                    if plan.group_by.is_some() {
                        return Err(IrError::malformed("JOIN after GROUP BY"));
                    }
                    if join.stages.is_empty() {
                        return Err(IrError::Internal("join without stages".to_string()));
                    }
                    for stage in &join.stages {
                        plan.joins.push(stage);
                        if let Some(result) = &stage.result {
                            plan.virtuals.push(result);
                        }
                    }
                    plan.select = SelectList::Fields(&join.projection);
                    plan.virtuals.push(&join.projection);
                }
                Link::Aggregate(agg) => {
                    if plan.group_by.is_some() {
                        return Err(IrError::malformed("aggregate terminal after GROUP BY"));
                    }
                    plan.select = SelectList::Aggregate(agg);
                    terminal = true;
                }
            }
        }

        // A scalar aggregate has a single row; ordering it is meaningless.
        if terminal {
            plan.order_by.clear();
        }
        Ok(plan)
    }
}

/// Render a query in the current scope. The caller owns the scope.
pub fn build_select(query: &Query, cx: &mut CompileContext) -> IrResult<String> {
    let query = normalize(query);
    let plan = SelectPlan::fold(&query.links)?;

    cx.bind_source(&query.source)?;
    for stage in &plan.joins {
        cx.bind_source(&stage.source)?;
    }
    for projection in &plan.virtuals {
        cx.bind_virtual(projection)?;
    }

    let mut w = SqlWriter::new(cx.layout());

    cx.set_clause(Clause::Select);
    let select = match plan.select {
        SelectList::Star => vec!["*".to_string()],
        SelectList::Fields(projection) => render_all(projection.fields.iter().map(|f| &f.expr), cx)?,
        SelectList::Keys(keys) => render_all(keys.iter(), cx)?,
        SelectList::Aggregate(agg) => vec![aggregate(agg, cx)?],
    };
    w.list("SELECT", &select);

    let from = build_source(&query.source, cx)?;
    w.single("FROM", from);

    cx.set_clause(Clause::On);
    for stage in &plan.joins {
        let source = build_source(&stage.source, cx)?;
        let on = comparison(&stage.key.comparison(), cx)?;
        w.line(&format!("{} {} ON {}", stage.kind, source, on));
    }

    if let Some(filter) = conjoin(&plan.wheres) {
        cx.set_clause(Clause::Where);
        w.single("WHERE", predicate(&filter, cx)?);
    }

    if let Some(keys) = plan.group_by {
        cx.set_clause(Clause::GroupBy);
        let keys = render_all(keys.iter(), cx)?;
        w.list("GROUP BY", &keys);
    }

    if let Some(having) = conjoin(&plan.havings) {
        cx.set_clause(Clause::Having);
        w.single("HAVING", predicate(&having, cx)?);
    }

    if !plan.order_by.is_empty() {
        cx.set_clause(Clause::OrderBy);
        let mut keys = Vec::with_capacity(plan.order_by.len());
        for key in &plan.order_by {
            keys.push(format!("{} {}", key.expr.to_sql(cx)?, key.order));
        }
        w.list("ORDER BY", &keys);
    }

    Ok(w.finish())
}

/// `name`, `name AS alias` or `(SELECT ...) AS alias`.
pub fn build_source(source: &Source, cx: &mut CompileContext) -> IrResult<String> {
    match source {
        Source::Table { table, alias } if *alias == table.name => Ok(cx.ident(&table.name)),
        Source::Table { table, alias } => {
            Ok(format!("{} AS {}", cx.ident(&table.name), cx.ident(alias)))
        }
        Source::Query { query, alias } => {
            cx.push_scope();
            let inner = build_select(query, cx);
            cx.pop_scope();
            Ok(format!("{} AS {}", wrap_nested(cx.layout(), &inner?), cx.ident(alias)))
        }
    }
}

fn render_all<'e>(
    exprs: impl Iterator<Item = &'e Expr>,
    cx: &mut CompileContext,
) -> IrResult<Vec<String>> {
    exprs.map(|e| e.to_sql(cx)).collect()
}

/// Non-adjacent filters AND-ed in chain order.
fn conjoin(predicates: &[&BoolExpr]) -> Option<BoolExpr> {
    let (first, rest) = predicates.split_first()?;
    Some(rest.iter().fold((*first).clone(), |acc, next| BoolExpr::Logical {
        op: LogicalOp::And,
        left: Arc::new(acc),
        right: Arc::new((*next).clone()),
    }))
}
