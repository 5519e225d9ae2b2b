//! Link fusion.
//!
//! Rewrites adjacent same-kind links of a query chain into one canonical
//! link. The input is never mutated; a new chain is returned.
//!
//! - `Filter, Filter` becomes one filter over `(earlier) AND (later)`.
//! - `OrderBy, OrderBy` becomes one ordered key list, earlier keys first.
//! - `Join, Join` becomes one multi-stage join. The first join's result is
//!   kept on its last stage as a virtual source, and references to it from
//!   the second join are inlined.
//!
//! `Project`, `GroupBy` and `Aggregate` links never fuse, so nothing looks
//! through them. Nested queries are left alone here; the compiler
//! normalizes each one as it renders it.

use std::sync::Arc;

use crate::ast::{
    Aggregate, BoolExpr, Comparison, Expr, IntExpr, Join, JoinKey, Link, LogicalOp, Membership,
    Projected, Projection, Query, TextExpr,
};

/// Fuse adjacent links. Idempotent.
pub fn normalize(query: &Query) -> Query {
    let mut links: Vec<Link> = Vec::with_capacity(query.links.len());

    for link in &query.links {
        let fused = match (links.last_mut(), link) {
            (Some(Link::Filter(prev)), Link::Filter(next)) => {
                tracing::trace!("fusing adjacent filters");
                *prev = BoolExpr::Logical {
                    op: LogicalOp::And,
                    left: Arc::new(prev.clone()),
                    right: Arc::new(next.clone()),
                };
                true
            }
            (Some(Link::OrderBy(prev)), Link::OrderBy(next)) => {
                tracing::trace!("fusing adjacent orderings");
                prev.extend(next.iter().cloned());
                true
            }
            (Some(Link::Join(prev)), Link::Join(next)) => {
                tracing::trace!(
                    stages = prev.stages.len() + next.stages.len(),
                    "fusing adjacent joins"
                );
                *prev = fuse_joins(prev, next);
                true
            }
            _ => false,
        };

        if !fused {
            links.push(link.clone());
        }
    }

    Query {
        source: query.source.clone(),
        links,
    }
}

fn fuse_joins(first: &Join, second: &Join) -> Join {
    let mut stages = first.stages.clone();
    if let Some(last) = stages.last_mut() {
        last.result = Some(first.projection.clone());
    }

    let inline = first
        .projection
        .alias
        .as_deref()
        .map(|alias| Inliner {
            alias,
            projection: &first.projection,
        });

    let rewrite = |e: &Expr| match &inline {
        Some(inliner) => inliner.expr(e),
        None => e.clone(),
    };

    for stage in &second.stages {
        let mut stage = stage.clone();
        if let Some(inliner) = &inline {
            stage.key = inliner.key(&stage.key);
        }
        if let Some(result) = &stage.result {
            stage.result = Some(Projection {
                alias: result.alias.clone(),
                fields: result.fields.iter().map(|f| rewrite_field(f, &rewrite)).collect(),
            });
        }
        stages.push(stage);
    }

    let projection = Projection {
        alias: second.projection.alias.clone(),
        fields: second
            .projection
            .fields
            .iter()
            .map(|f| rewrite_field(f, &rewrite))
            .collect(),
    };

    Join { stages, projection }
}

fn rewrite_field(field: &Projected, rewrite: &impl Fn(&Expr) -> Expr) -> Projected {
    Projected {
        name: field.name.clone(),
        expr: rewrite(&field.expr),
    }
}

/// Replaces references to a projection's fields with the fields' own
/// expressions. A reference whose field is missing or of another category
/// is kept as is and resolved (or rejected) by the compiler.
struct Inliner<'a> {
    alias: &'a str,
    projection: &'a Projection,
}

impl Inliner<'_> {
    fn expr(&self, e: &Expr) -> Expr {
        match e {
            Expr::Int(e) => Expr::Int(self.int(e)),
            Expr::Text(e) => Expr::Text(self.text(e)),
            Expr::Bool(e) => Expr::Bool(self.boolean(e)),
        }
    }

    fn key(&self, key: &JoinKey) -> JoinKey {
        match key {
            JoinKey::Int { left, right } => JoinKey::Int {
                left: Arc::new(self.int(left)),
                right: Arc::new(self.int(right)),
            },
            JoinKey::Text { left, right } => JoinKey::Text {
                left: Arc::new(self.text(left)),
                right: Arc::new(self.text(right)),
            },
            JoinKey::Bool { left, right } => JoinKey::Bool {
                left: Arc::new(self.boolean(left)),
                right: Arc::new(self.boolean(right)),
            },
        }
    }

    fn field(&self, source: &str, name: &str) -> Option<&Expr> {
        if source == self.alias {
            self.projection.field(name)
        } else {
            None
        }
    }

    fn int(&self, e: &IntExpr) -> IntExpr {
        match e {
            IntExpr::Column(c) => match self.field(&c.source, &c.name) {
                Some(Expr::Int(inner)) => inner.clone(),
                _ => e.clone(),
            },
            IntExpr::Neg(x) => IntExpr::Neg(Arc::new(self.int(x))),
            IntExpr::Abs(x) => IntExpr::Abs(Arc::new(self.int(x))),
            IntExpr::Arith { op, left, right } => IntExpr::Arith {
                op: *op,
                left: Arc::new(self.int(left)),
                right: Arc::new(self.int(right)),
            },
            IntExpr::Aggregate(Aggregate::Sum(x)) => {
                IntExpr::Aggregate(Aggregate::Sum(Arc::new(self.int(x))))
            }
            IntExpr::Literal(_)
            | IntExpr::Null
            | IntExpr::Aggregate(Aggregate::Count)
            | IntExpr::Scalar(_) => e.clone(),
        }
    }

    fn text(&self, e: &TextExpr) -> TextExpr {
        match e {
            TextExpr::Column(c) => match self.field(&c.source, &c.name) {
                Some(Expr::Text(inner)) => inner.clone(),
                _ => e.clone(),
            },
            TextExpr::Concat { left, right } => TextExpr::Concat {
                left: Arc::new(self.text(left)),
                right: Arc::new(self.text(right)),
            },
            TextExpr::Literal(_) | TextExpr::Null | TextExpr::Scalar(_) => e.clone(),
        }
    }

    fn boolean(&self, e: &BoolExpr) -> BoolExpr {
        match e {
            BoolExpr::Column(c) => match self.field(&c.source, &c.name) {
                Some(Expr::Bool(inner)) => inner.clone(),
                _ => e.clone(),
            },
            BoolExpr::Not(x) => BoolExpr::Not(Arc::new(self.boolean(x))),
            BoolExpr::Logical { op, left, right } => BoolExpr::Logical {
                op: *op,
                left: Arc::new(self.boolean(left)),
                right: Arc::new(self.boolean(right)),
            },
            BoolExpr::Compare(cmp) => BoolExpr::Compare(match cmp {
                Comparison::Int { op, left, right } => Comparison::Int {
                    op: *op,
                    left: Arc::new(self.int(left)),
                    right: Arc::new(self.int(right)),
                },
                Comparison::Text { op, left, right } => Comparison::Text {
                    op: *op,
                    left: Arc::new(self.text(left)),
                    right: Arc::new(self.text(right)),
                },
                Comparison::Bool { op, left, right } => Comparison::Bool {
                    op: *op,
                    left: Arc::new(self.boolean(left)),
                    right: Arc::new(self.boolean(right)),
                },
            }),
            BoolExpr::In(m) => BoolExpr::In(match m {
                Membership::Int { needle, set } => Membership::Int {
                    needle: Arc::new(self.int(needle)),
                    set: set.clone(),
                },
                Membership::Text { needle, set } => Membership::Text {
                    needle: Arc::new(self.text(needle)),
                    set: set.clone(),
                },
            }),
            BoolExpr::Literal(_) | BoolExpr::Null | BoolExpr::Scalar(_) => e.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builders::{gt, ne};
    use crate::ast::{ColumnRef, JoinKind, SortOrder, Table};

    fn customers() -> Table {
        Table::new("customers", ["Id", "Age", "Name"])
    }

    #[test]
    fn test_adjacent_filters_fuse_into_conjunction() {
        let c = customers();
        let q = Query::from(c.source())
            .filter(gt(c.int("Age"), 18))
            .filter(ne(c.text("Name"), "Admin"));

        let single = Query::from(c.source())
            .filter(gt(c.int("Age"), 18) & ne(c.text("Name"), "Admin"));

        assert_eq!(normalize(&q), single);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let c = customers();
        let q = Query::from(c.source())
            .filter(gt(c.int("Age"), 18))
            .filter(gt(c.int("Age"), 20))
            .filter(ne(c.text("Name"), "Admin"))
            .order_by(c.int("Age"), SortOrder::Desc)
            .order_by(c.text("Name"), SortOrder::Asc);

        let once = normalize(&q);
        assert_eq!(normalize(&once), once);
        assert_eq!(once.links.len(), 2);
    }

    #[test]
    fn test_orderings_fuse_in_priority_order() {
        let c = customers();
        let q = Query::from(c.source())
            .order_by(c.int("Age"), SortOrder::Desc)
            .order_by(c.text("Name"), SortOrder::Asc);

        match &normalize(&q).links[..] {
            [Link::OrderBy(keys)] => {
                assert_eq!(keys.len(), 2);
                assert_eq!(keys[0].order, SortOrder::Desc);
                assert_eq!(keys[1].expr, Expr::Text(c.text("Name")));
            }
            other => panic!("expected one ordering, got {:?}", other),
        }
    }

    #[test]
    fn test_projection_is_a_barrier() {
        let c = customers();
        let q = Query::from(c.source())
            .filter(gt(c.int("Age"), 18))
            .select([Projected::new(c.int("Age"))])
            .filter(gt(c.int("Age"), 20));

        assert_eq!(normalize(&q).links.len(), 3);
    }

    #[test]
    fn test_joins_fuse_and_inline_first_result() {
        let c = customers();
        let orders = Table::new("orders", ["Id", "CustomerId", "ItemId"]);
        let items = Table::new("items", ["Id", "Title"]);

        let q = Query::from(c.source())
            .join(
                JoinKind::Inner,
                orders.source(),
                c.int("Id"),
                orders.int("CustomerId"),
                Projection::named(
                    "co",
                    [
                        Projected::named("Name", c.text("Name")),
                        Projected::named("ItemId", orders.int("ItemId")),
                    ],
                ),
            )
            .join(
                JoinKind::Left,
                items.source(),
                IntExpr::Column(ColumnRef::new("co", "ItemId")),
                items.int("Id"),
                Projection::new([
                    Projected::new(TextExpr::Column(ColumnRef::new("co", "Name"))),
                    Projected::new(items.text("Title")),
                ]),
            );

        let n = normalize(&q);
        let join = match &n.links[..] {
            [Link::Join(join)] => join,
            other => panic!("expected one join, got {:?}", other),
        };

        assert_eq!(join.stages.len(), 2);
        assert!(join.stages[0].result.is_some());
        assert_eq!(
            join.stages[1].key,
            JoinKey::Int {
                left: Arc::new(orders.int("ItemId")),
                right: Arc::new(items.int("Id")),
            }
        );
        assert_eq!(join.projection.fields[0].expr, Expr::Text(c.text("Name")));
        assert_eq!(normalize(&n), n);
    }
}
