//! SeaORM adapters. Functions here return `DbErr`; repos translate.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::ColumnTrait;

pub mod customers_sea;
pub mod orders_sea;
pub mod users_sea;

/// `lower(col) LIKE pattern`; the pattern is expected to be lowercase already.
pub(crate) fn lower_like<Col: ColumnTrait>(col: Col, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(pattern)
}
