use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::builders::Operand;
use crate::ast::{
    Aggregate, BoolExpr, ColumnRef, CompareOp, Comparison, Expr, IntExpr, JoinKind, LogicalOp,
    SortOrder, TextExpr,
};

/// A named table with its ordered column list.
///
/// An empty column list means the columns are not declared and references to
/// the table are not checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Table {
    pub fn new<C: Into<String>>(name: impl Into<String>, columns: impl IntoIterator<Item = C>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// A table without a declared column list.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.is_empty() || self.columns.iter().any(|c| c == column)
    }

    /// This table as a source aliased by its own name.
    pub fn source(&self) -> Source {
        self.aliased(self.name.clone())
    }

    pub fn aliased(&self, alias: impl Into<String>) -> Source {
        Source::Table {
            table: self.clone(),
            alias: alias.into(),
        }
    }

    pub fn int(&self, column: &str) -> IntExpr {
        IntExpr::Column(ColumnRef::new(&self.name, column))
    }

    pub fn text(&self, column: &str) -> TextExpr {
        TextExpr::Column(ColumnRef::new(&self.name, column))
    }

    pub fn boolean(&self, column: &str) -> BoolExpr {
        BoolExpr::Column(ColumnRef::new(&self.name, column))
    }
}

/// Where rows come from. Always carries the alias used for qualification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Source {
    Table { table: Table, alias: String },
    /// A query used as a source (`(SELECT ...) AS alias`).
    Query { query: Arc<Query>, alias: String },
}

impl Source {
    pub fn subquery(query: Query, alias: impl Into<String>) -> Self {
        Source::Query {
            query: Arc::new(query),
            alias: alias.into(),
        }
    }

    pub fn alias(&self) -> &str {
        match self {
            Source::Table { alias, .. } | Source::Query { alias, .. } => alias,
        }
    }

    pub fn int(&self, column: &str) -> IntExpr {
        IntExpr::Column(ColumnRef::new(self.alias(), column))
    }

    pub fn text(&self, column: &str) -> TextExpr {
        TextExpr::Column(ColumnRef::new(self.alias(), column))
    }

    pub fn boolean(&self, column: &str) -> BoolExpr {
        BoolExpr::Column(ColumnRef::new(self.alias(), column))
    }
}

/// One entry of a projection. The name is carried for the host only and is
/// never emitted as an SQL alias; it is what later links use to address the
/// field through the projection's alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projected {
    #[serde(default)]
    pub name: Option<String>,
    pub expr: Expr,
}

impl Projected {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self {
            name: None,
            expr: expr.into(),
        }
    }

    pub fn named(name: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            name: Some(name.into()),
            expr: expr.into(),
        }
    }
}

/// An ordered projection, optionally addressable as a virtual source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    #[serde(default)]
    pub alias: Option<String>,
    pub fields: Vec<Projected>,
}

impl Projection {
    pub fn new(fields: impl IntoIterator<Item = Projected>) -> Self {
        Self {
            alias: None,
            fields: fields.into_iter().collect(),
        }
    }

    pub fn named(alias: impl Into<String>, fields: impl IntoIterator<Item = Projected>) -> Self {
        Self {
            alias: Some(alias.into()),
            fields: fields.into_iter().collect(),
        }
    }

    /// The expression behind a named field.
    pub fn field(&self, name: &str) -> Option<&Expr> {
        self.fields
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
            .map(|f| &f.expr)
    }
}

/// One sort key. Earlier keys take priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderKey {
    pub expr: Expr,
    #[serde(default)]
    pub order: SortOrder,
}

/// GROUP BY keys with an optional HAVING predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub keys: Vec<Expr>,
    #[serde(default)]
    pub having: Option<BoolExpr>,
}

/// The `left = right` key pair of a join, both sides of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum JoinKey {
    Int {
        left: Arc<IntExpr>,
        right: Arc<IntExpr>,
    },
    Text {
        left: Arc<TextExpr>,
        right: Arc<TextExpr>,
    },
    Bool {
        left: Arc<BoolExpr>,
        right: Arc<BoolExpr>,
    },
}

impl JoinKey {
    /// The key equality as an ordinary comparison.
    pub fn comparison(&self) -> Comparison {
        let op = CompareOp::Eq;
        match self {
            JoinKey::Int { left, right } => Comparison::Int {
                op,
                left: left.clone(),
                right: right.clone(),
            },
            JoinKey::Text { left, right } => Comparison::Text {
                op,
                left: left.clone(),
                right: right.clone(),
            },
            JoinKey::Bool { left, right } => Comparison::Bool {
                op,
                left: left.clone(),
                right: right.clone(),
            },
        }
    }
}

/// One `JOIN ... ON left = right` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinStage {
    pub kind: JoinKind,
    pub source: Source,
    pub key: JoinKey,
    /// The intermediate result this stage produced before it was fused with
    /// a following join. Later stages may still address it.
    #[serde(default)]
    pub result: Option<Projection>,
}

/// A join plan: one or more stages and the final result projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub stages: Vec<JoinStage>,
    pub projection: Projection,
}

/// One link of a query chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Link {
    Filter(BoolExpr),
    Project(Projection),
    OrderBy(Vec<OrderKey>),
    GroupBy(Grouping),
    Join(Join),
    /// Terminal `COUNT(*)` / `SUM(e)`.
    Aggregate(Aggregate),
}

/// An immutable, append-only query chain rooted at a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub source: Source,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl From<Source> for Query {
    fn from(source: Source) -> Self {
        Self {
            source,
            links: Vec::new(),
        }
    }
}

impl Query {
    pub fn from_source(source: Source) -> Self {
        source.into()
    }

    pub fn filter(mut self, predicate: BoolExpr) -> Self {
        self.links.push(Link::Filter(predicate));
        self
    }

    pub fn select(mut self, fields: impl IntoIterator<Item = Projected>) -> Self {
        self.links.push(Link::Project(Projection::new(fields)));
        self
    }

    /// Project into a virtual source addressable as `alias`.
    pub fn select_as(
        mut self,
        alias: impl Into<String>,
        fields: impl IntoIterator<Item = Projected>,
    ) -> Self {
        self.links.push(Link::Project(Projection::named(alias, fields)));
        self
    }

    /// Add a sort key. Consecutive calls fuse into one ordered key list.
    pub fn order_by(mut self, expr: impl Into<Expr>, order: SortOrder) -> Self {
        self.links.push(Link::OrderBy(vec![OrderKey {
            expr: expr.into(),
            order,
        }]));
        self
    }

    pub fn group_by(mut self, keys: impl IntoIterator<Item = Expr>) -> Self {
        self.links.push(Link::GroupBy(Grouping {
            keys: keys.into_iter().collect(),
            having: None,
        }));
        self
    }

    /// Attach a HAVING predicate to the trailing GROUP BY. Anywhere else this
    /// is a plain filter, which the compiler folds into HAVING when it follows
    /// a grouping.
    pub fn having(mut self, predicate: BoolExpr) -> Self {
        if let Some(Link::GroupBy(grouping)) = self.links.last_mut() {
            grouping.having = Some(match grouping.having.take() {
                Some(existing) => BoolExpr::Logical {
                    op: LogicalOp::And,
                    left: Arc::new(existing),
                    right: Arc::new(predicate),
                },
                None => predicate,
            });
            return self;
        }
        self.filter(predicate)
    }

    /// Join `source` on `left_key = right_key`. Both keys share a category.
    pub fn join<T: Operand>(
        mut self,
        kind: JoinKind,
        source: Source,
        left_key: T,
        right_key: impl Into<T>,
        projection: Projection,
    ) -> Self {
        self.links.push(Link::Join(Join {
            stages: vec![JoinStage {
                kind,
                source,
                key: T::join_key(left_key, right_key.into()),
                result: None,
            }],
            projection,
        }));
        self
    }

    pub fn count(mut self) -> Self {
        self.links.push(Link::Aggregate(Aggregate::Count));
        self
    }

    pub fn sum(mut self, expr: IntExpr) -> Self {
        self.links.push(Link::Aggregate(Aggregate::Sum(Arc::new(expr))));
        self
    }

    /// Use this query where a single integer is expected.
    pub fn scalar_int(self) -> IntExpr {
        IntExpr::Scalar(Arc::new(self))
    }

    pub fn scalar_text(self) -> TextExpr {
        TextExpr::Scalar(Arc::new(self))
    }

    pub fn scalar_bool(self) -> BoolExpr {
        BoolExpr::Scalar(Arc::new(self))
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.links.last(), Some(Link::Aggregate(_)))
    }
}
