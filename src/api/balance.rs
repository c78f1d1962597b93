use axum::{routing::get, Router};
use sqlx::PgPool;

use crate::db::queries::balance::get_balance;

pub fn balance_routes() -> Router<PgPool> {
    Router::new().route("/balance", get(get_balance))
}
