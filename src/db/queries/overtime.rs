// src/db/queries/overtime.rs
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{PgPool, Row};

use crate::api::auth::Claims;
use crate::db::models::activity::Activity;
use crate::db::models::overtime::{NewOvertimeRequest, OvertimeRequestRow};
use crate::db::models::CreatedId;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::LedgerError;

/// Registers a new overtime grant for an activity.
///
/// The requested days are capped by the activity's duration in calendar days
/// (single day when the activity has no end date). The grant is inserted
/// already approved, with the activity's dates snapshotted onto it.
#[utoipa::path(
    post,
    path = "/overtime",
    request_body = NewOvertimeRequest,
    responses(
        (status = 201, description = "Overtime request submitted successfully", body = CreatedId),
        (status = 400, description = "Validation failure, invalid activity, or days exceed the activity duration"),
        (status = 500, description = "Database error")
    ),
    tag = "Overtime",
    security(("bearerAuth" = []))
)]
pub async fn create_overtime_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewOvertimeRequest>,
) -> Result<ApiResponse<CreatedId>, LedgerError> {
    let user_id = claims.user_id()?;

    if payload.days < 1 {
        return Err(LedgerError::Validation(
            "Number of days must be at least 1".into(),
        ));
    }

    let mut tx = pool.begin().await?;

    let activity = sqlx::query_as::<_, Activity>(
        r#"
        SELECT id, project_id, title, description, start_date, end_date, status,
               created_at, updated_at
        FROM activities
        WHERE id = $1
        "#,
    )
    .bind(payload.activity_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(LedgerError::InvalidActivity)?;

    let max_days = activity.max_overtime_days();
    if i64::from(payload.days) > max_days {
        return Err(LedgerError::ExceedsActivityDuration { max_days });
    }

    let row = sqlx::query(
        r#"
        INSERT INTO overtime_requests
            (user_id, activity_id, total_days, used_days, status, start_date, end_date,
             created_at, updated_at)
        VALUES ($1, $2, $3, 0, 'approved', $4, $5, NOW(), NOW())
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(activity.id)
    .bind(payload.days)
    .bind(activity.start_date)
    .bind(activity.end_date)
    .fetch_one(&mut *tx)
    .await?;
    let grant_id: i32 = row.try_get("id")?;

    tx.commit().await?;

    tracing::info!(grant_id, days = payload.days, "overtime grant created");

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Overtime request submitted successfully",
        CreatedId { id: grant_id },
    ))
}

/// Lists the user's overtime grants, newest activity span first.
#[utoipa::path(
    get,
    path = "/overtime",
    responses(
        (status = 200, description = "List of overtime requests", body = Vec<OvertimeRequestRow>),
        (status = 500, description = "Database error")
    ),
    tag = "Overtime",
    security(("bearerAuth" = []))
)]
pub async fn list_overtime_requests(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<Vec<OvertimeRequestRow>>, LedgerError> {
    let user_id = claims.user_id()?;

    let rows = sqlx::query_as::<_, OvertimeRequestRow>(
        r#"
        SELECT orq.id, orq.user_id, orq.activity_id, a.title AS activity_title,
               orq.total_days, orq.used_days, orq.status, orq.start_date,
               orq.end_date, orq.created_at
        FROM overtime_requests orq
        LEFT JOIN activities a ON a.id = orq.activity_id
        WHERE orq.user_id = $1
        ORDER BY orq.start_date DESC, orq.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(StatusCode::OK, "Overtime requests", rows))
}

/// Deletes one of the user's overtime grants, regardless of status.
#[utoipa::path(
    delete,
    path = "/overtime/{request_id}",
    params(("request_id" = i32, Path, description = "Overtime request ID")),
    responses(
        (status = 200, description = "Overtime request deleted"),
        (status = 404, description = "Overtime request not found or access denied"),
        (status = 500, description = "Database error")
    ),
    tag = "Overtime",
    security(("bearerAuth" = []))
)]
pub async fn delete_overtime_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(request_id): Path<i32>,
) -> Result<ApiResponse<()>, LedgerError> {
    let user_id = claims.user_id()?;

    let deleted = sqlx::query("DELETE FROM overtime_requests WHERE id = $1 AND user_id = $2")
        .bind(request_id)
        .bind(user_id)
        .execute(&pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(LedgerError::NotFoundOrForbidden);
    }

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Overtime request deleted",
        (),
    ))
}

use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(
    paths(create_overtime_request, list_overtime_requests, delete_overtime_request),
    components(schemas(NewOvertimeRequest, OvertimeRequestRow, CreatedId)),
    tags(
        (name = "Overtime", description = "Overtime grant endpoints")
    )
)]
pub struct OvertimeDoc;
