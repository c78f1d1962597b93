use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;

use crate::db::queries::project::*;

pub fn project_routes() -> Router<PgPool> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects", get(list_projects))
}
