//! Typed construction helpers.
//!
//! Free functions build predicates, std operators build arithmetic and
//! logical nodes. Every helper only accepts operands of a matching category.
//!
//! ```
//! use qail_ir::ast::{builders::*, Table};
//!
//! let customers = Table::new("customers", ["Id", "Age", "Name"]);
//! let adult = gt(customers.int("Age"), 18) & ne(customers.text("Name"), "Admin");
//! ```

use std::sync::Arc;

use crate::ast::{
    Aggregate, ArithOp, BoolExpr, CompareOp, Comparison, InSet, IntExpr, JoinKey, LogicalOp,
    Membership, Query, TextExpr,
};

/// An expression category that can appear on both sides of a comparison.
pub trait Operand: Sized {
    fn compare(op: CompareOp, left: Self, right: Self) -> BoolExpr;

    fn join_key(left: Self, right: Self) -> JoinKey;
}

impl Operand for IntExpr {
    fn compare(op: CompareOp, left: Self, right: Self) -> BoolExpr {
        BoolExpr::Compare(Comparison::Int {
            op,
            left: Arc::new(left),
            right: Arc::new(right),
        })
    }

    fn join_key(left: Self, right: Self) -> JoinKey {
        JoinKey::Int {
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }
}

impl Operand for TextExpr {
    fn compare(op: CompareOp, left: Self, right: Self) -> BoolExpr {
        BoolExpr::Compare(Comparison::Text {
            op,
            left: Arc::new(left),
            right: Arc::new(right),
        })
    }

    fn join_key(left: Self, right: Self) -> JoinKey {
        JoinKey::Text {
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }
}

impl Operand for BoolExpr {
    fn compare(op: CompareOp, left: Self, right: Self) -> BoolExpr {
        BoolExpr::Compare(Comparison::Bool {
            op,
            left: Arc::new(left),
            right: Arc::new(right),
        })
    }

    fn join_key(left: Self, right: Self) -> JoinKey {
        JoinKey::Bool {
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }
}

/// `left = right` (`IS NULL` against the null sentinel)
pub fn eq<T: Operand>(left: T, right: impl Into<T>) -> BoolExpr {
    T::compare(CompareOp::Eq, left, right.into())
}

/// `left != right` (`IS NOT NULL` against the null sentinel)
pub fn ne<T: Operand>(left: T, right: impl Into<T>) -> BoolExpr {
    T::compare(CompareOp::Ne, left, right.into())
}

pub fn gt<T: Operand>(left: T, right: impl Into<T>) -> BoolExpr {
    T::compare(CompareOp::Gt, left, right.into())
}

pub fn gte<T: Operand>(left: T, right: impl Into<T>) -> BoolExpr {
    T::compare(CompareOp::Gte, left, right.into())
}

pub fn lt<T: Operand>(left: T, right: impl Into<T>) -> BoolExpr {
    T::compare(CompareOp::Lt, left, right.into())
}

pub fn lte<T: Operand>(left: T, right: impl Into<T>) -> BoolExpr {
    T::compare(CompareOp::Lte, left, right.into())
}

/// Categories with a literal `IN (...)` form.
pub trait Member: Sized {
    type Item;
    fn membership(needle: Self, set: InSet<Self::Item>) -> BoolExpr;
}

impl Member for IntExpr {
    type Item = i64;

    fn membership(needle: Self, set: InSet<i64>) -> BoolExpr {
        BoolExpr::In(Membership::Int {
            needle: Arc::new(needle),
            set,
        })
    }
}

impl Member for TextExpr {
    type Item = String;

    fn membership(needle: Self, set: InSet<String>) -> BoolExpr {
        BoolExpr::In(Membership::Text {
            needle: Arc::new(needle),
            set,
        })
    }
}

/// `needle IN (v0, v1, ...)`
pub fn is_in<T: Member, V: Into<T::Item>>(
    needle: T,
    values: impl IntoIterator<Item = V>,
) -> BoolExpr {
    T::membership(needle, InSet::Values(values.into_iter().map(Into::into).collect()))
}

/// `needle IN (SELECT ...)`
pub fn in_query<T: Member>(needle: T, query: Query) -> BoolExpr {
    T::membership(needle, InSet::Query(Arc::new(query)))
}

pub fn and(left: BoolExpr, right: BoolExpr) -> BoolExpr {
    BoolExpr::Logical {
        op: LogicalOp::And,
        left: Arc::new(left),
        right: Arc::new(right),
    }
}

pub fn or(left: BoolExpr, right: BoolExpr) -> BoolExpr {
    BoolExpr::Logical {
        op: LogicalOp::Or,
        left: Arc::new(left),
        right: Arc::new(right),
    }
}

pub fn not(operand: BoolExpr) -> BoolExpr {
    BoolExpr::Not(Arc::new(operand))
}

/// `ABS(x)`
pub fn abs(operand: impl Into<IntExpr>) -> IntExpr {
    IntExpr::Abs(Arc::new(operand.into()))
}

/// `CONCAT(left, right)`
pub fn concat(left: impl Into<TextExpr>, right: impl Into<TextExpr>) -> TextExpr {
    TextExpr::Concat {
        left: Arc::new(left.into()),
        right: Arc::new(right.into()),
    }
}

/// Grouped `COUNT(*)`, valid in a projection or HAVING after a GROUP BY.
pub fn count() -> IntExpr {
    IntExpr::Aggregate(Aggregate::Count)
}

/// Grouped `SUM(x)`.
pub fn sum(operand: impl Into<IntExpr>) -> IntExpr {
    IntExpr::Aggregate(Aggregate::Sum(Arc::new(operand.into())))
}

fn arith(op: ArithOp, left: IntExpr, right: IntExpr) -> IntExpr {
    IntExpr::Arith {
        op,
        left: Arc::new(left),
        right: Arc::new(right),
    }
}

macro_rules! arith_operator {
    ($trait:ident, $method:ident, $op:expr) => {
        impl<R: Into<IntExpr>> std::ops::$trait<R> for IntExpr {
            type Output = IntExpr;

            fn $method(self, rhs: R) -> IntExpr {
                arith($op, self, rhs.into())
            }
        }
    };
}

arith_operator!(Add, add, ArithOp::Add);
arith_operator!(Sub, sub, ArithOp::Sub);
arith_operator!(Mul, mul, ArithOp::Mul);
arith_operator!(Div, div, ArithOp::Div);

impl std::ops::Neg for IntExpr {
    type Output = IntExpr;

    fn neg(self) -> IntExpr {
        IntExpr::Neg(Arc::new(self))
    }
}

impl std::ops::Not for BoolExpr {
    type Output = BoolExpr;

    fn not(self) -> BoolExpr {
        not(self)
    }
}

impl std::ops::BitAnd for BoolExpr {
    type Output = BoolExpr;

    fn bitand(self, rhs: BoolExpr) -> BoolExpr {
        and(self, rhs)
    }
}

impl std::ops::BitOr for BoolExpr {
    type Output = BoolExpr;

    fn bitor(self, rhs: BoolExpr) -> BoolExpr {
        or(self, rhs)
    }
}

impl From<i64> for IntExpr {
    fn from(n: i64) -> Self {
        IntExpr::Literal(n)
    }
}

impl From<i32> for IntExpr {
    fn from(n: i32) -> Self {
        IntExpr::Literal(n as i64)
    }
}

impl From<&str> for TextExpr {
    fn from(s: &str) -> Self {
        TextExpr::Literal(s.to_string())
    }
}

impl From<String> for TextExpr {
    fn from(s: String) -> Self {
        TextExpr::Literal(s)
    }
}

impl From<bool> for BoolExpr {
    fn from(b: bool) -> Self {
        BoolExpr::Literal(b)
    }
}

/// `Option::None` is the null sentinel of the target category.
impl<T: Into<IntExpr>> From<Option<T>> for IntExpr {
    fn from(v: Option<T>) -> Self {
        v.map_or(IntExpr::Null, Into::into)
    }
}

impl<T: Into<TextExpr>> From<Option<T>> for TextExpr {
    fn from(v: Option<T>) -> Self {
        v.map_or(TextExpr::Null, Into::into)
    }
}
