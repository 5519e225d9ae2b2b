//! INSERT / UPDATE / DELETE and parameter binding tests.

use super::{customers, mssql, orders};
use crate::ast::builders::*;
use crate::ast::*;
use crate::error::IrError;
use crate::transpiler::{Dialect, ToSql};

#[test]
fn test_insert_binds_values_in_order() {
    let insert = Insert::into_table(customers())
        .value("Id", 1)
        .value("Age", 25)
        .value("Name", "John Doe");
    let out = insert.to_sql_with_dialect(Dialect::SqlServer).unwrap();

    assert_eq!(out.sql, "INSERT INTO customers (Id, Age, Name) VALUES (@p0, @p1, @p2)");
    assert_eq!(
        out.params.iter().collect::<Vec<_>>(),
        vec![
            ("@p0", &Value::Int(1)),
            ("@p1", &Value::Int(25)),
            ("@p2", &Value::Text("John Doe".to_string())),
        ]
    );
}

#[test]
fn test_null_does_not_consume_an_index() {
    let insert = Insert::into_table(customers())
        .value("Id", 1)
        .value("Name", None::<&str>)
        .value("Age", 25);
    let out = insert.to_sql_with_dialect(Dialect::SqlServer).unwrap();

    assert_eq!(out.sql, "INSERT INTO customers (Id, Name, Age) VALUES (@p0, NULL, @p1)");
    assert_eq!(out.params.len(), 2);
    assert_eq!(out.params.get("@p1"), Some(&Value::Int(25)));
}

#[test]
fn test_explicit_null_and_inline_expression() {
    let c = customers();
    let insert = Insert::into_table(c.clone())
        .value("Id", Assigned::Null)
        .value("Age", IntExpr::Literal(40) + 2);
    let out = insert.to_sql_with_dialect(Dialect::Postgres).unwrap();

    assert_eq!(out.sql, "INSERT INTO customers (Id, Age) VALUES (NULL, (40 + 2))");
    assert!(out.params.is_empty());
}

#[test]
fn test_insert_without_values() {
    let insert = Insert::into_table(customers());
    assert_eq!(mssql(&insert), "INSERT INTO customers DEFAULT VALUES");
}

#[test]
fn test_insert_unknown_column() {
    let insert = Insert::into_table(customers()).value("Agee", 1);
    assert!(matches!(
        insert.to_sql(),
        Err(IrError::UnknownColumn { ref column, .. }) if column == "Agee"
    ));
}

#[test]
fn test_update() {
    let c = customers();
    let update = Update::table(c.clone())
        .set("Age", 26)
        .set("Name", None::<String>)
        .filter(eq(c.int("Id"), 1));
    let out = update.to_sql_with_dialect(Dialect::SqlServer).unwrap();

    assert_eq!(out.sql, "UPDATE customers SET Age = @p0, Name = NULL WHERE Id = 1");
    assert_eq!(out.params.len(), 1);
    assert_eq!(out.params.get("@p0"), Some(&Value::Int(26)));
}

#[test]
fn test_update_with_expression() {
    let c = customers();
    let update = Update::table(c.clone()).set("Age", c.int("Age") + 1);
    assert_eq!(mssql(&update), "UPDATE customers SET Age = (Age + 1)");
}

#[test]
fn test_update_filters_are_anded() {
    let c = customers();
    let update = Update::table(c.clone())
        .set("Name", "x")
        .filter(gt(c.int("Age"), 18))
        .filter(lt(c.int("Age"), 65));
    assert_eq!(
        mssql(&update),
        "UPDATE customers SET Name = @p0 WHERE (Age > 18) AND (Age < 65)"
    );
}

#[test]
fn test_update_without_assignments() {
    let update = Update::table(customers());
    assert!(matches!(update.to_sql(), Err(IrError::Malformed(_))));
}

#[test]
fn test_aggregate_in_set_is_rejected() {
    let update = Update::table(customers()).set("Age", count());
    assert!(matches!(update.to_sql(), Err(IrError::Malformed(_))));
}

#[test]
fn test_delete() {
    let c = customers();
    assert_eq!(mssql(&Delete::from_table(c.clone())), "DELETE FROM customers");

    let delete = Delete::from_table(c.clone()).filter(lt(c.int("Age"), 18));
    assert_eq!(mssql(&delete), "DELETE FROM customers WHERE Age < 18");
}

#[test]
fn test_correlated_reference_to_target_is_qualified() {
    let c = customers();
    let o = orders();
    let order_count = Query::from(o.source())
        .filter(eq(o.int("CustomerId"), c.int("Id")))
        .count()
        .scalar_int();
    let delete = Delete::from_table(c.clone()).filter(eq(order_count, 0));
    assert_eq!(
        mssql(&delete),
        "DELETE FROM customers WHERE (SELECT COUNT(*) FROM orders WHERE orders.CustomerId = customers.Id) = 0"
    );
}

#[test]
fn test_placeholder_count_matches_params() {
    let c = customers();
    let statements: Vec<Statement> = vec![
        Insert::into_table(c.clone())
            .value("Id", 7)
            .value("Name", None::<&str>)
            .value("Active", true)
            .into(),
        Update::table(c.clone())
            .set("Age", 1)
            .set("Name", "n")
            .set("Active", None::<bool>)
            .filter(eq(c.int("Id"), 7))
            .into(),
        Delete::from_table(c.clone()).into(),
    ];

    for stmt in &statements {
        let out = stmt.to_sql_with_dialect(Dialect::SqlServer).unwrap();
        assert_eq!(out.sql.matches("@p").count(), out.params.len(), "{}", out.sql);
        for name in out.params.names() {
            assert!(out.sql.contains(name));
        }
    }
}
