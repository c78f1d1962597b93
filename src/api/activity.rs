use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;

use crate::db::queries::activity::*;

pub fn activity_routes() -> Router<PgPool> {
    Router::new()
        .route("/activities", post(create_activity))
        .route("/activities", get(list_activities))
        .route("/activities/{activity_id}", get(get_activity))
}
