//! Expression rendering.
//!
//! Parenthesization is structural: arithmetic prints its own parens, AND/OR
//! parenthesize both operands, comparisons print none.

use crate::ast::{
    Aggregate, BoolExpr, ColumnRef, CompareOp, Comparison, Expr, InSet, IntExpr, Membership,
    Query, TextExpr,
};
use crate::error::{IrError, IrResult};
use crate::transpiler::context::{CompileContext, Resolved};
use crate::transpiler::dml::select::build_select;
use crate::transpiler::layout::wrap_nested;

/// Render an expression node as a value.
pub trait ExprToSql {
    fn to_sql(&self, cx: &mut CompileContext) -> IrResult<String>;
}

impl ExprToSql for Expr {
    fn to_sql(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            Expr::Int(e) => e.to_sql(cx),
            Expr::Text(e) => e.to_sql(cx),
            Expr::Bool(e) => e.to_sql(cx),
        }
    }
}

impl ExprToSql for IntExpr {
    fn to_sql(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            IntExpr::Literal(n) => Ok(n.to_string()),
            IntExpr::Null => Ok("NULL".to_string()),
            IntExpr::Column(col) => column(col, cx, |e| match e {
                Expr::Int(e) => Some(e),
                _ => None,
            }),
            IntExpr::Neg(x) => {
                let inner = x.to_sql(cx)?;
                // `--` would open a line comment.
                if inner.starts_with('-') {
                    Ok(format!("- {}", inner))
                } else {
                    Ok(format!("-{}", inner))
                }
            }
            IntExpr::Abs(x) => Ok(format!("ABS({})", x.to_sql(cx)?)),
            IntExpr::Arith { op, left, right } => Ok(format!(
                "({} {} {})",
                left.to_sql(cx)?,
                op,
                right.to_sql(cx)?
            )),
            IntExpr::Aggregate(agg) => {
                cx.check_aggregate()?;
                aggregate(agg, cx)
            }
            IntExpr::Scalar(q) => nested_query(q, cx),
        }
    }
}

impl ExprToSql for TextExpr {
    fn to_sql(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            TextExpr::Literal(s) => Ok(cx.generator().string_literal(s)),
            TextExpr::Null => Ok("NULL".to_string()),
            TextExpr::Column(col) => column(col, cx, |e| match e {
                Expr::Text(e) => Some(e),
                _ => None,
            }),
            TextExpr::Concat { left, right } => {
                let l = left.to_sql(cx)?;
                let r = right.to_sql(cx)?;
                Ok(cx.generator().string_concat(&l, &r))
            }
            TextExpr::Scalar(q) => nested_query(q, cx),
        }
    }
}

/// Boolean expressions in value position. A predicate used as a value is
/// parenthesized; dialects without boolean values reject it.
impl ExprToSql for BoolExpr {
    fn to_sql(&self, cx: &mut CompileContext) -> IrResult<String> {
        match self {
            BoolExpr::Literal(b) => bool_literal(*b, cx),
            BoolExpr::Null => Ok("NULL".to_string()),
            BoolExpr::Column(col) => column(col, cx, |e| match e {
                Expr::Bool(e) => Some(e),
                _ => None,
            }),
            BoolExpr::Scalar(q) => nested_query(q, cx),
            BoolExpr::Not(_) | BoolExpr::Logical { .. } | BoolExpr::Compare(_) | BoolExpr::In(_) => {
                if !cx.generator().supports_booleans() {
                    return Err(IrError::unsupported(
                        "predicate used as a value",
                        cx.generator().name(),
                    ));
                }
                Ok(format!("({})", predicate(self, cx)?))
            }
        }
    }
}

/// Render a boolean expression where a condition is expected
/// (WHERE, HAVING, operands of AND/OR/NOT).
pub fn predicate(e: &BoolExpr, cx: &mut CompileContext) -> IrResult<String> {
    match e {
        BoolExpr::Not(x) => Ok(format!("NOT ({})", predicate(x, cx)?)),
        BoolExpr::Logical { op, left, right } => Ok(format!(
            "({}) {} ({})",
            predicate(left, cx)?,
            op,
            predicate(right, cx)?
        )),
        BoolExpr::Compare(cmp) => comparison(cmp, cx),
        BoolExpr::In(m) => membership(m, cx),
        // A virtual field holding a predicate stays a predicate.
        BoolExpr::Column(col) => match cx.resolve(col)? {
            Resolved::Field(Expr::Bool(inner)) => {
                cx.enter_field(col)?;
                let rendered = predicate(&inner, cx);
                cx.leave_field();
                rendered
            }
            Resolved::Field(_) => Err(IrError::malformed(format!(
                "field '{}' has a different type",
                col
            ))),
            Resolved::Column(text) => {
                if !cx.generator().supports_booleans() {
                    return Err(IrError::unsupported(
                        "boolean value used as a predicate",
                        cx.generator().name(),
                    ));
                }
                Ok(text)
            }
        },
        BoolExpr::Literal(_) | BoolExpr::Null | BoolExpr::Scalar(_) => {
            if !cx.generator().supports_booleans() {
                let construct = match e {
                    BoolExpr::Literal(_) => "boolean literal",
                    _ => "boolean value used as a predicate",
                };
                return Err(IrError::unsupported(construct, cx.generator().name()));
            }
            e.to_sql(cx)
        }
    }
}

fn bool_literal(val: bool, cx: &CompileContext) -> IrResult<String> {
    cx.generator()
        .bool_literal(val)
        .map(str::to_string)
        .ok_or_else(|| IrError::unsupported("boolean literal", cx.generator().name()))
}

fn column<T: ExprToSql>(
    col: &ColumnRef,
    cx: &mut CompileContext,
    project: impl Fn(&Expr) -> Option<&T>,
) -> IrResult<String> {
    match cx.resolve(col)? {
        Resolved::Column(text) => Ok(text),
        Resolved::Field(expr) => {
            let inner = project(&expr).ok_or_else(|| {
                IrError::malformed(format!("field '{}' has a different type", col))
            })?;
            cx.enter_field(col)?;
            let rendered = inner.to_sql(cx);
            cx.leave_field();
            rendered
        }
    }
}

pub(crate) fn aggregate(agg: &Aggregate, cx: &mut CompileContext) -> IrResult<String> {
    match agg {
        Aggregate::Count => Ok("COUNT(*)".to_string()),
        Aggregate::Sum(x) => Ok(format!("SUM({})", x.to_sql(cx)?)),
    }
}

/// Compile a nested query in its own scope and parenthesize it.
pub(crate) fn nested_query(query: &Query, cx: &mut CompileContext) -> IrResult<String> {
    cx.push_scope();
    let inner = build_select(query, cx);
    cx.pop_scope();
    Ok(wrap_nested(cx.layout(), &inner?))
}

pub(crate) fn comparison(cmp: &Comparison, cx: &mut CompileContext) -> IrResult<String> {
    match cmp {
        Comparison::Int { op, left, right } => {
            let (l, r) = (left.to_sql(cx)?, right.to_sql(cx)?);
            let l_null = null_operand(left.is_null(), left.as_column(), cx)?;
            let r_null = null_operand(right.is_null(), right.as_column(), cx)?;
            Ok(compare(*op, (l, l_null), (r, r_null)))
        }
        Comparison::Text { op, left, right } => {
            let (l, r) = (left.to_sql(cx)?, right.to_sql(cx)?);
            let l_null = null_operand(left.is_null(), left.as_column(), cx)?;
            let r_null = null_operand(right.is_null(), right.as_column(), cx)?;
            Ok(compare(*op, (l, l_null), (r, r_null)))
        }
        Comparison::Bool { op, left, right } => {
            let (l, r) = (left.to_sql(cx)?, right.to_sql(cx)?);
            let l_null = null_operand(left.is_null(), left.as_column(), cx)?;
            let r_null = null_operand(right.is_null(), right.as_column(), cx)?;
            Ok(compare(*op, (l, l_null), (r, r_null)))
        }
    }
}

/// Whether an operand is the null sentinel, following virtual fields to the
/// expression they inline.
fn null_operand(
    is_null: bool,
    column: Option<&ColumnRef>,
    cx: &mut CompileContext,
) -> IrResult<bool> {
    let Some(col) = column else {
        return Ok(is_null);
    };
    match cx.resolve(col)? {
        Resolved::Column(_) => Ok(false),
        Resolved::Field(inner) => {
            cx.enter_field(col)?;
            let found = null_operand(inner.is_null(), inner.as_column(), cx);
            cx.leave_field();
            found
        }
    }
}

/// `=`/`!=` against the null sentinel on either side becomes
/// `IS NULL`/`IS NOT NULL`. Other operators keep the `NULL` token.
fn compare(op: CompareOp, left: (String, bool), right: (String, bool)) -> String {
    match (op.null_test(), left, right) {
        (Some(test), (l, _), (_, true)) => format!("{} {}", l, test),
        (Some(test), (_, true), (r, false)) => format!("{} {}", r, test),
        (_, (l, _), (r, _)) => format!("{} {} {}", l, op, r),
    }
}

fn membership(m: &Membership, cx: &mut CompileContext) -> IrResult<String> {
    let (needle, set) = match m {
        Membership::Int { needle, set } => {
            let needle = needle.to_sql(cx)?;
            let set = match set {
                InSet::Values(values) if values.is_empty() => None,
                InSet::Values(values) => Some(format!(
                    "({})",
                    values.iter().map(i64::to_string).collect::<Vec<_>>().join(", ")
                )),
                InSet::Query(q) => Some(nested_query(q, cx)?),
            };
            (needle, set)
        }
        Membership::Text { needle, set } => {
            let needle = needle.to_sql(cx)?;
            let set = match set {
                InSet::Values(values) if values.is_empty() => None,
                InSet::Values(values) => Some(format!(
                    "({})",
                    values
                        .iter()
                        .map(|v| cx.generator().string_literal(v))
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
                InSet::Query(q) => Some(nested_query(q, cx)?),
            };
            (needle, set)
        }
    };

    match set {
        Some(set) => Ok(format!("{} IN {}", needle, set)),
        None => Ok(cx.generator().false_predicate().to_string()),
    }
}
