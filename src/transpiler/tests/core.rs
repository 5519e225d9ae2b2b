//! Core SELECT and expression rendering tests.

use super::{customers, items, mssql, orders};
use crate::ast::builders::*;
use crate::ast::*;
use crate::error::IrError;
use crate::transpiler::{Dialect, ToSql};

#[test]
fn test_simple_select() {
    let c = customers();
    assert_eq!(mssql(&Query::from(c.source())), "SELECT * FROM customers");
}

#[test]
fn test_select_with_where() {
    let c = customers();
    let q = Query::from(c.source()).filter(gt(c.int("Age"), 18));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE customers.Age > 18");
}

#[test]
fn test_projection_names_are_not_emitted() {
    let c = customers();
    let q = Query::from(c.source()).select([
        Projected::named("years", c.int("Age")),
        Projected::new(c.text("Name")),
    ]);
    assert_eq!(mssql(&q), "SELECT customers.Age, customers.Name FROM customers");
}

#[test]
fn test_arithmetic_is_fully_parenthesized() {
    let c = customers();
    let q = Query::from(c.source())
        .select([Projected::new((c.int("Age") + 1) * 2 - c.int("Id"))]);
    assert_eq!(
        mssql(&q),
        "SELECT (((customers.Age + 1) * 2) - customers.Id) FROM customers"
    );
}

#[test]
fn test_negation_and_abs() {
    let c = customers();
    let q = Query::from(c.source()).select([Projected::new(-abs(c.int("Age") - 30))]);
    assert_eq!(mssql(&q), "SELECT -ABS((customers.Age - 30)) FROM customers");
}

#[test]
fn test_double_negation_never_opens_a_comment() {
    let c = customers();
    let q = Query::from(c.source())
        .filter(gt(-IntExpr::Literal(-5), c.int("Age")))
        .order_by(c.int("Age"), SortOrder::Asc);
    assert_eq!(
        mssql(&q),
        "SELECT * FROM customers WHERE - -5 > customers.Age ORDER BY customers.Age ASC"
    );

    let q = Query::from(c.source()).filter(gt(-(-c.int("Age")), 1));
    let sql = mssql(&q);
    assert_eq!(sql, "SELECT * FROM customers WHERE - -customers.Age > 1");
    assert!(!sql.contains("--"));
}

#[test]
fn test_logical_operands_always_parenthesized() {
    let c = customers();
    let q = Query::from(c.source())
        .filter(gt(c.int("Age"), 18) | not(eq(c.text("Name"), "Bob")));
    assert_eq!(
        mssql(&q),
        "SELECT * FROM customers WHERE (customers.Age > 18) OR (NOT (customers.Name = 'Bob'))"
    );
}

#[test]
fn test_null_comparisons() {
    let c = customers();
    let q = Query::from(c.source()).filter(eq(c.text("Name"), None::<&str>));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE customers.Name IS NULL");

    let q = Query::from(c.source()).filter(ne(IntExpr::Null, c.int("Age")));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE customers.Age IS NOT NULL");

    let q = Query::from(c.source()).filter(gt(c.int("Age"), IntExpr::Null));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE customers.Age > NULL");
}

#[test]
fn test_null_behind_virtual_field_is_a_null_test() {
    let c = customers();
    let q = Query::from(c.source())
        .select_as(
            "v",
            [
                Projected::named("x", IntExpr::Null),
                Projected::named("y", IntExpr::Column(ColumnRef::new("v", "x"))),
            ],
        )
        .filter(eq(c.int("Age"), IntExpr::Column(ColumnRef::new("v", "x"))))
        .filter(ne(IntExpr::Column(ColumnRef::new("v", "y")), c.int("Id")));
    assert_eq!(
        mssql(&q),
        "SELECT NULL, NULL FROM customers WHERE (customers.Age IS NULL) AND (customers.Id IS NOT NULL)"
    );
}

#[test]
fn test_concat_and_string_escaping() {
    let c = customers();
    let q = Query::from(c.source())
        .filter(eq(c.text("Name"), "O'Brien"))
        .select([Projected::new(concat(c.text("Name"), "!"))]);
    assert_eq!(
        mssql(&q),
        "SELECT CONCAT(customers.Name, '!') FROM customers WHERE customers.Name = 'O''Brien'"
    );
}

#[test]
fn test_membership() {
    let c = customers();
    let q = Query::from(c.source()).filter(is_in(c.int("Id"), [1, 2, 3]));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE customers.Id IN (1, 2, 3)");

    let q = Query::from(c.source()).filter(is_in(c.text("Name"), ["a", "b"]));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE customers.Name IN ('a', 'b')");

    let q = Query::from(c.source()).filter(is_in(c.int("Id"), Vec::<i64>::new()));
    assert_eq!(mssql(&q), "SELECT * FROM customers WHERE 1 = 0");
}

#[test]
fn test_membership_in_subquery() {
    let c = customers();
    let o = orders();
    let buyers = Query::from(o.source()).select([Projected::new(o.int("CustomerId"))]);
    let q = Query::from(c.source()).filter(in_query(c.int("Id"), buyers));
    assert_eq!(
        mssql(&q),
        "SELECT * FROM customers WHERE customers.Id IN (SELECT orders.CustomerId FROM orders)"
    );
}

#[test]
fn test_order_by_keeps_priority() {
    let c = customers();
    let q = Query::from(c.source())
        .order_by(c.int("Age"), SortOrder::Desc)
        .order_by(c.text("Name"), SortOrder::Asc);
    assert_eq!(
        mssql(&q),
        "SELECT * FROM customers ORDER BY customers.Age DESC, customers.Name ASC"
    );
}

#[test]
fn test_group_by_having() {
    let o = orders();
    let q = Query::from(o.source())
        .group_by([Expr::from(o.int("CustomerId"))])
        .having(gt(count(), 2))
        .select([
            Projected::new(o.int("CustomerId")),
            Projected::new(sum(o.int("Total"))),
        ]);
    assert_eq!(
        mssql(&q),
        "SELECT orders.CustomerId, SUM(orders.Total) FROM orders GROUP BY orders.CustomerId HAVING COUNT(*) > 2"
    );
}

#[test]
fn test_group_by_selects_keys_and_later_filter_is_having() {
    let o = orders();
    let q = Query::from(o.source())
        .filter(eq(o.text("Status"), "open"))
        .group_by([Expr::from(o.int("CustomerId"))])
        .filter(gt(sum(o.int("Total")), 100));
    assert_eq!(
        mssql(&q),
        "SELECT orders.CustomerId FROM orders WHERE orders.Status = 'open' GROUP BY orders.CustomerId HAVING SUM(orders.Total) > 100"
    );
}

#[test]
fn test_aggregate_terminal() {
    let o = orders();
    let q = Query::from(o.source())
        .filter(eq(o.text("Status"), "open"))
        .order_by(o.int("Total"), SortOrder::Desc)
        .count();
    assert_eq!(
        mssql(&q),
        "SELECT COUNT(*) FROM orders WHERE orders.Status = 'open'"
    );

    let q = Query::from(o.source()).sum(o.int("Total"));
    assert_eq!(mssql(&q), "SELECT SUM(orders.Total) FROM orders");
}

#[test]
fn test_correlated_scalar_subquery() {
    let c = customers();
    let o = orders();
    let order_count = Query::from(o.source())
        .filter(eq(o.int("CustomerId"), c.int("Id")))
        .count();

    let q = Query::from(c.source()).select([
        Projected::new(c.text("Name")),
        Projected::new(order_count.clone().scalar_int()),
    ]);
    assert_eq!(
        mssql(&q),
        "SELECT customers.Name, (SELECT COUNT(*) FROM orders WHERE orders.CustomerId = customers.Id) FROM customers"
    );

    let q = Query::from(c.source()).filter(gt(order_count.scalar_int(), 5));
    assert_eq!(
        mssql(&q),
        "SELECT * FROM customers WHERE (SELECT COUNT(*) FROM orders WHERE orders.CustomerId = customers.Id) > 5"
    );
}

#[test]
fn test_top_level_scalar_is_bare() {
    let o = orders();
    let scalar = Expr::from(Query::from(o.source()).count().scalar_int());
    assert_eq!(mssql(&scalar), "SELECT COUNT(*) FROM orders");
}

#[test]
fn test_standalone_predicate() {
    let c = customers();
    let e = Expr::from(gt(c.int("Age"), 18) & ne(c.text("Name"), "Admin"));
    assert_eq!(
        mssql(&e),
        "(customers.Age > 18) AND (customers.Name != 'Admin')"
    );
}

#[test]
fn test_subquery_as_source() {
    let c = customers();
    let adults = Source::subquery(
        Query::from(c.source()).filter(gt(c.int("Age"), 18)),
        "adults",
    );
    let q = Query::from(adults.clone()).select([Projected::new(adults.text("Name"))]);
    assert_eq!(
        mssql(&q),
        "SELECT adults.Name FROM (SELECT * FROM customers WHERE customers.Age > 18) AS adults"
    );
}

#[test]
fn test_aliased_table() {
    let c = customers();
    let c2 = c.aliased("c2");
    let q = Query::from(c2.clone()).filter(gt(c2.int("Age"), 1));
    assert_eq!(mssql(&q), "SELECT * FROM customers AS c2 WHERE c2.Age > 1");
}

#[test]
fn test_join() {
    let c = customers();
    let o = orders();
    let q = Query::from(c.source()).join(
        JoinKind::Inner,
        o.source(),
        c.int("Id"),
        o.int("CustomerId"),
        Projection::new([Projected::new(c.text("Name")), Projected::new(o.int("Total"))]),
    );
    assert_eq!(
        mssql(&q),
        "SELECT customers.Name, orders.Total FROM customers INNER JOIN orders ON customers.Id = orders.CustomerId"
    );
}

#[test]
fn test_join_on_null_key_is_a_null_test() {
    let c = customers();
    let o = orders();
    let q = Query::from(c.source()).join(
        JoinKind::Left,
        o.source(),
        c.int("Id"),
        IntExpr::Null,
        Projection::new([Projected::new(c.text("Name"))]),
    );
    assert_eq!(
        mssql(&q),
        "SELECT customers.Name FROM customers LEFT JOIN orders ON customers.Id IS NULL"
    );
}

#[test]
fn test_join_keys_share_a_category() {
    let c = customers();
    let o = orders();
    let q = Query::from(c.source()).join(
        JoinKind::Inner,
        o.source(),
        c.text("Name"),
        o.text("Status"),
        Projection::new([Projected::new(o.int("Id"))]),
    );
    let Some(Link::Join(join)) = q.links.last() else {
        panic!("expected a join link");
    };
    assert!(matches!(join.stages[0].key, JoinKey::Text { .. }));
    assert_eq!(
        mssql(&q),
        "SELECT orders.Id FROM customers INNER JOIN orders ON customers.Name = orders.Status"
    );

    // An integer key pair cannot carry a text operand.
    let mixed = r#"{"Int": {"left": {"Column": {"source": "customers", "name": "Id"}}, "right": {"Literal": "x"}}}"#;
    assert!(serde_json::from_str::<JoinKey>(mixed).is_err());
}

#[test]
fn test_filter_on_join_result() {
    let c = customers();
    let o = orders();
    let q = Query::from(c.source())
        .join(
            JoinKind::Inner,
            o.source(),
            c.int("Id"),
            o.int("CustomerId"),
            Projection::named(
                "co",
                [
                    Projected::named("Name", c.text("Name")),
                    Projected::named("Total", o.int("Total")),
                ],
            ),
        )
        .filter(gt(IntExpr::Column(ColumnRef::new("co", "Total")), 100));
    assert_eq!(
        mssql(&q),
        "SELECT customers.Name, orders.Total FROM customers INNER JOIN orders ON customers.Id = orders.CustomerId WHERE orders.Total > 100"
    );
}

#[test]
fn test_chained_joins_flatten() {
    let c = customers();
    let o = orders();
    let i = items();
    let q = Query::from(c.source())
        .join(
            JoinKind::Inner,
            o.source(),
            c.int("Id"),
            o.int("CustomerId"),
            Projection::named(
                "co",
                [
                    Projected::named("Name", c.text("Name")),
                    Projected::named("OrderId", o.int("Id")),
                ],
            ),
        )
        .join(
            JoinKind::Left,
            i.source(),
            IntExpr::Column(ColumnRef::new("co", "OrderId")),
            i.int("OrderId"),
            Projection::new([
                Projected::new(TextExpr::Column(ColumnRef::new("co", "Name"))),
                Projected::new(i.text("Sku")),
            ]),
        );
    assert_eq!(
        mssql(&q),
        "SELECT customers.Name, items.Sku FROM customers INNER JOIN orders ON customers.Id = orders.CustomerId LEFT JOIN items ON orders.Id = items.OrderId"
    );
}

#[test]
fn test_virtual_projection_is_inlined() {
    let c = customers();
    let q = Query::from(c.source())
        .select_as("v", [Projected::named("AgeNext", c.int("Age") + 1)])
        .filter(gt(IntExpr::Column(ColumnRef::new("v", "AgeNext")), 21));
    assert_eq!(
        mssql(&q),
        "SELECT (customers.Age + 1) FROM customers WHERE (customers.Age + 1) > 21"
    );
}

#[test]
fn test_chained_filters_equal_single_filter() {
    let c = customers();
    let chained = Query::from(c.source())
        .filter(gt(c.int("Age"), 18))
        .filter(ne(c.text("Name"), "Admin"));
    let single = Query::from(c.source())
        .filter(gt(c.int("Age"), 18) & ne(c.text("Name"), "Admin"));
    assert_eq!(mssql(&chained), mssql(&single));
}

#[test]
fn test_compile_is_deterministic() {
    let c = customers();
    let q = Query::from(c.source())
        .filter(is_in(c.text("Name"), ["a", "b"]))
        .order_by(c.int("Age"), SortOrder::Asc);
    let first = q.to_sql_with_dialect(Dialect::Postgres).unwrap();
    let second = q.to_sql_with_dialect(Dialect::Postgres).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unknown_column_and_alias() {
    let c = customers();
    let q = Query::from(c.source()).filter(gt(c.int("Agee"), 1));
    assert!(matches!(
        q.to_sql(),
        Err(IrError::UnknownColumn { ref table, ref column }) if table == "customers" && column == "Agee"
    ));

    let q = Query::from(c.source()).filter(gt(IntExpr::Column(ColumnRef::new("x", "Age")), 1));
    assert!(matches!(q.to_sql(), Err(IrError::UnknownAlias(ref a)) if a == "x"));
}

#[test]
fn test_malformed_chains() {
    let c = customers();
    let o = orders();

    let after_terminal = Query::from(c.source()).count().filter(gt(c.int("Age"), 1));
    assert!(matches!(after_terminal.to_sql(), Err(IrError::Malformed(_))));

    let aggregate_in_where = Query::from(c.source()).filter(gt(count(), 1));
    assert!(matches!(aggregate_in_where.to_sql(), Err(IrError::Malformed(_))));

    let double_group = Query::from(o.source())
        .group_by([Expr::from(o.int("CustomerId"))])
        .select([Projected::new(o.int("CustomerId"))])
        .group_by([Expr::from(o.int("CustomerId"))]);
    assert!(matches!(double_group.to_sql(), Err(IrError::Malformed(_))));

    let self_ref = Query::from(c.source()).select_as(
        "v",
        [Projected::named("a", IntExpr::Column(ColumnRef::new("v", "a")))],
    );
    assert!(matches!(self_ref.to_sql(), Err(IrError::Malformed(_))));
}

#[test]
fn test_join_without_stages_is_internal_error() {
    let c = customers();
    let q = Query {
        source: c.source(),
        links: vec![Link::Join(Join {
            stages: Vec::new(),
            projection: Projection::new([]),
        })],
    };
    assert!(matches!(q.to_sql(), Err(IrError::Internal(_))));
}
