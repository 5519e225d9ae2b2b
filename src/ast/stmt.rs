use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ast::{BoolExpr, Expr, IntExpr, LogicalOp, Table, TextExpr, Value};

/// What goes into a VALUES slot or a SET assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Assigned {
    /// Bound as a parameter.
    Value(Value),
    /// Emitted as `NULL` in place; never bound.
    Null,
    /// Rendered inline.
    Expr(Expr),
}

impl From<Value> for Assigned {
    fn from(v: Value) -> Self {
        Assigned::Value(v)
    }
}

impl From<bool> for Assigned {
    fn from(v: bool) -> Self {
        Assigned::Value(v.into())
    }
}

impl From<i32> for Assigned {
    fn from(v: i32) -> Self {
        Assigned::Value(v.into())
    }
}

impl From<i64> for Assigned {
    fn from(v: i64) -> Self {
        Assigned::Value(v.into())
    }
}

impl From<&str> for Assigned {
    fn from(v: &str) -> Self {
        Assigned::Value(v.into())
    }
}

impl From<String> for Assigned {
    fn from(v: String) -> Self {
        Assigned::Value(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Assigned {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => Assigned::Value(v.into()),
            None => Assigned::Null,
        }
    }
}

impl From<Expr> for Assigned {
    fn from(e: Expr) -> Self {
        Assigned::Expr(e)
    }
}

impl From<IntExpr> for Assigned {
    fn from(e: IntExpr) -> Self {
        Assigned::Expr(e.into())
    }
}

impl From<TextExpr> for Assigned {
    fn from(e: TextExpr) -> Self {
        Assigned::Expr(e.into())
    }
}

impl From<BoolExpr> for Assigned {
    fn from(e: BoolExpr) -> Self {
        Assigned::Expr(e.into())
    }
}

/// `column = value` in an INSERT or UPDATE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub column: String,
    pub value: Assigned,
}

/// `INSERT INTO table (columns) VALUES (values)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insert {
    pub table: Table,
    #[serde(default)]
    pub values: Vec<Assignment>,
}

impl Insert {
    pub fn into_table(table: Table) -> Self {
        Self {
            table,
            values: Vec::new(),
        }
    }

    pub fn value(mut self, column: impl Into<String>, value: impl Into<Assigned>) -> Self {
        self.values.push(Assignment {
            column: column.into(),
            value: value.into(),
        });
        self
    }
}

/// `UPDATE table SET ... [WHERE ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Update {
    pub table: Table,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub filter: Option<BoolExpr>,
}

impl Update {
    pub fn table(table: Table) -> Self {
        Self {
            table,
            assignments: Vec::new(),
            filter: None,
        }
    }

    pub fn set(mut self, column: impl Into<String>, value: impl Into<Assigned>) -> Self {
        self.assignments.push(Assignment {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    /// Restrict the rows. Repeated calls are AND-ed in call order.
    pub fn filter(mut self, predicate: BoolExpr) -> Self {
        self.filter = Some(conjoin(self.filter.take(), predicate));
        self
    }
}

/// `DELETE FROM table [WHERE ...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub table: Table,
    #[serde(default)]
    pub filter: Option<BoolExpr>,
}

impl Delete {
    pub fn from_table(table: Table) -> Self {
        Self {
            table,
            filter: None,
        }
    }

    /// Restrict the rows. Repeated calls are AND-ed in call order.
    pub fn filter(mut self, predicate: BoolExpr) -> Self {
        self.filter = Some(conjoin(self.filter.take(), predicate));
        self
    }
}

fn conjoin(existing: Option<BoolExpr>, next: BoolExpr) -> BoolExpr {
    match existing {
        Some(prev) => BoolExpr::Logical {
            op: LogicalOp::And,
            left: Arc::new(prev),
            right: Arc::new(next),
        },
        None => next,
    }
}

/// A data-modification statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    pub fn table(&self) -> &Table {
        match self {
            Statement::Insert(s) => &s.table,
            Statement::Update(s) => &s.table,
            Statement::Delete(s) => &s.table,
        }
    }
}

impl From<Insert> for Statement {
    fn from(s: Insert) -> Self {
        Statement::Insert(s)
    }
}

impl From<Update> for Statement {
    fn from(s: Update) -> Self {
        Statement::Update(s)
    }
}

impl From<Delete> for Statement {
    fn from(s: Delete) -> Self {
        Statement::Delete(s)
    }
}
