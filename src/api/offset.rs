use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::PgPool;

use crate::db::queries::offset::*;

pub fn offset_routes() -> Router<PgPool> {
    Router::new()
        .route("/offset", post(create_offset_request))
        .route("/offset", get(list_offset_requests))
        .route("/offset/{request_id}", delete(delete_offset_request))
}
