// src/db/queries/project.rs
use axum::{extract::State, http::StatusCode, Json};
use sqlx::{PgPool, Row};

use crate::db::models::project::{NewProject, Project};
use crate::db::models::CreatedId;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::LedgerError;

#[utoipa::path(
    post,
    path = "/projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = CreatedId),
        (status = 400, description = "Validation failure"),
        (status = 500, description = "Database error")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn create_project(
    State(pool): State<PgPool>,
    Json(payload): Json<NewProject>,
) -> Result<ApiResponse<CreatedId>, LedgerError> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(LedgerError::Validation("Title is required".into()));
    }

    let row = sqlx::query(
        "INSERT INTO projects (title, description) VALUES ($1, $2) RETURNING id",
    )
    .bind(&title)
    .bind(&payload.description)
    .fetch_one(&pool)
    .await?;
    let id: i32 = row.try_get("id")?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Project created",
        CreatedId { id },
    ))
}

#[utoipa::path(
    get,
    path = "/projects",
    responses(
        (status = 200, description = "List of projects", body = Vec<Project>),
        (status = 500, description = "Database error")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn list_projects(
    State(pool): State<PgPool>,
) -> Result<ApiResponse<Vec<Project>>, LedgerError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT id, title, description, created_at FROM projects ORDER BY created_at DESC",
    )
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(StatusCode::OK, "Projects", projects))
}

use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(
    paths(create_project, list_projects),
    components(schemas(Project, NewProject, CreatedId)),
    tags(
        (name = "Projects", description = "Project directory endpoints")
    )
)]
pub struct ProjectDoc;
