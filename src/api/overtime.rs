use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;

use crate::db::queries::overtime::*;

pub fn overtime_routes() -> Router<PgPool> {
    Router::new()
        .route("/overtime", post(create_overtime_request))
        .route("/overtime", get(list_overtime_requests))
        .route("/overtime/{request_id}", delete(delete_overtime_request))
}
