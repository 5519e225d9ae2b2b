use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{ArithOp, CompareOp, LogicalOp, Query};

/// A column reference: `(source alias, column name)`.
///
/// The alias names either a real source (table or derived query) or a virtual
/// one (a named projection or join result), in which case the field's
/// expression is inlined at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub source: String,
    pub name: String,
}

impl ColumnRef {
    pub fn new(source: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.source, self.name)
    }
}

/// Aggregate functions.
///
/// Inside an expression this is the grouped form (`COUNT(*)` over the current
/// group). As a [`Link::Aggregate`](crate::ast::Link::Aggregate) terminal it
/// turns the whole query into a scalar query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Aggregate {
    Count,
    Sum(Arc<IntExpr>),
}

/// Integer-valued expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IntExpr {
    Literal(i64),
    /// Typed NULL sentinel; never a literal.
    Null,
    Column(ColumnRef),
    /// Unary minus (`-x`)
    Neg(Arc<IntExpr>),
    /// Absolute value (`ABS(x)`)
    Abs(Arc<IntExpr>),
    Arith {
        op: ArithOp,
        left: Arc<IntExpr>,
        right: Arc<IntExpr>,
    },
    Aggregate(Aggregate),
    Scalar(Arc<Query>),
}

/// Text-valued expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextExpr {
    Literal(String),
    Null,
    Column(ColumnRef),
    /// `CONCAT(left, right)`
    Concat {
        left: Arc<TextExpr>,
        right: Arc<TextExpr>,
    },
    Scalar(Arc<Query>),
}

/// Boolean-valued expression (predicates included).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BoolExpr {
    Literal(bool),
    Null,
    Column(ColumnRef),
    Not(Arc<BoolExpr>),
    Logical {
        op: LogicalOp,
        left: Arc<BoolExpr>,
        right: Arc<BoolExpr>,
    },
    Compare(Comparison),
    In(Membership),
    Scalar(Arc<Query>),
}

/// A comparison between two operands of the same category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Comparison {
    Int {
        op: CompareOp,
        left: Arc<IntExpr>,
        right: Arc<IntExpr>,
    },
    Text {
        op: CompareOp,
        left: Arc<TextExpr>,
        right: Arc<TextExpr>,
    },
    Bool {
        op: CompareOp,
        left: Arc<BoolExpr>,
        right: Arc<BoolExpr>,
    },
}

/// `needle IN (...)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Membership {
    Int {
        needle: Arc<IntExpr>,
        set: InSet<i64>,
    },
    Text {
        needle: Arc<TextExpr>,
        set: InSet<String>,
    },
}

/// Right-hand side of a membership test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InSet<T> {
    Values(Vec<T>),
    Query(Arc<Query>),
}

/// Category-erased expression, used wherever the category is not fixed by
/// the position (projections, ordering and grouping keys, join keys).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Int(IntExpr),
    Text(TextExpr),
    Bool(BoolExpr),
}

impl IntExpr {
    pub fn is_null(&self) -> bool {
        matches!(self, IntExpr::Null)
    }

    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            IntExpr::Column(c) => Some(c),
            _ => None,
        }
    }
}

impl TextExpr {
    pub fn is_null(&self) -> bool {
        matches!(self, TextExpr::Null)
    }

    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            TextExpr::Column(c) => Some(c),
            _ => None,
        }
    }
}

impl BoolExpr {
    pub fn is_null(&self) -> bool {
        matches!(self, BoolExpr::Null)
    }

    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            BoolExpr::Column(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this node is a predicate form (comparison, membership or a
    /// logical combination) rather than a plain boolean value.
    pub fn is_predicate(&self) -> bool {
        matches!(
            self,
            BoolExpr::Not(_) | BoolExpr::Logical { .. } | BoolExpr::Compare(_) | BoolExpr::In(_)
        )
    }
}

impl Expr {
    pub fn is_null(&self) -> bool {
        match self {
            Expr::Int(e) => e.is_null(),
            Expr::Text(e) => e.is_null(),
            Expr::Bool(e) => e.is_null(),
        }
    }

    /// The column reference this expression is, if it is a bare column.
    pub fn as_column(&self) -> Option<&ColumnRef> {
        match self {
            Expr::Int(e) => e.as_column(),
            Expr::Text(e) => e.as_column(),
            Expr::Bool(e) => e.as_column(),
        }
    }
}

impl From<IntExpr> for Expr {
    fn from(e: IntExpr) -> Self {
        Expr::Int(e)
    }
}

impl From<TextExpr> for Expr {
    fn from(e: TextExpr) -> Self {
        Expr::Text(e)
    }
}

impl From<BoolExpr> for Expr {
    fn from(e: BoolExpr) -> Self {
        Expr::Bool(e)
    }
}
