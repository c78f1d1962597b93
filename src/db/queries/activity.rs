// src/db/queries/activity.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{PgPool, Row};

use crate::db::models::activity::{Activity, NewActivity};
use crate::db::models::CreatedId;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::LedgerError;

#[utoipa::path(
    post,
    path = "/activities",
    request_body = NewActivity,
    responses(
        (status = 201, description = "Activity created", body = CreatedId),
        (status = 400, description = "Validation failure"),
        (status = 500, description = "Database error")
    ),
    tag = "Activities",
    security(("bearerAuth" = []))
)]
pub async fn create_activity(
    State(pool): State<PgPool>,
    Json(payload): Json<NewActivity>,
) -> Result<ApiResponse<CreatedId>, LedgerError> {
    let title = payload.title.trim().to_string();
    if title.is_empty() {
        return Err(LedgerError::Validation("Title is required".into()));
    }
    if let Some(end) = payload.end_date {
        if end < payload.start_date {
            return Err(LedgerError::Validation(
                "End date cannot be before start date".into(),
            ));
        }
    }

    let row = sqlx::query(
        r#"
        INSERT INTO activities (project_id, title, description, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(payload.project_id)
    .bind(&title)
    .bind(&payload.description)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .fetch_one(&pool)
    .await?;
    let id: i32 = row.try_get("id")?;

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Activity created",
        CreatedId { id },
    ))
}

#[utoipa::path(
    get,
    path = "/activities",
    responses(
        (status = 200, description = "List of activities", body = Vec<Activity>),
        (status = 500, description = "Database error")
    ),
    tag = "Activities",
    security(("bearerAuth" = []))
)]
pub async fn list_activities(
    State(pool): State<PgPool>,
) -> Result<ApiResponse<Vec<Activity>>, LedgerError> {
    let activities = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, project_id, title, description, start_date, end_date, status,
               created_at, updated_at
        FROM activities
        ORDER BY start_date DESC, title ASC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(StatusCode::OK, "Activities", activities))
}

#[utoipa::path(
    get,
    path = "/activities/{activity_id}",
    params(("activity_id" = i32, Path, description = "Activity ID")),
    responses(
        (status = 200, description = "Activity retrieved", body = Activity),
        (status = 400, description = "Activity does not exist"),
        (status = 500, description = "Database error")
    ),
    tag = "Activities",
    security(("bearerAuth" = []))
)]
pub async fn get_activity(
    State(pool): State<PgPool>,
    Path(activity_id): Path<i32>,
) -> Result<ApiResponse<Activity>, LedgerError> {
    let activity = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, project_id, title, description, start_date, end_date, status,
               created_at, updated_at
        FROM activities
        WHERE id = $1
        "#,
    )
    .bind(activity_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(LedgerError::InvalidActivity)?;

    Ok(ApiResponse::success(StatusCode::OK, "Activity", activity))
}

use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(
    paths(create_activity, list_activities, get_activity),
    components(schemas(Activity, NewActivity, CreatedId)),
    tags(
        (name = "Activities", description = "Activity directory endpoints")
    )
)]
pub struct ActivityDoc;
