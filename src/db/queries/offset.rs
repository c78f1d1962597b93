// src/db/queries/offset.rs
use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use sqlx::{PgPool, Row};

use crate::api::auth::Claims;
use crate::db::models::offset::{offset_date_is_valid, NewOffsetRequest, OffsetRequestRow};
use crate::db::models::overtime::consume_one_day;
use crate::db::models::CreatedId;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::LedgerError;

/// The slice of a grant row the redemption transaction locks and advances.
#[derive(Debug, sqlx::FromRow)]
struct EligibleGrant {
    id: i32,
    total_days: i32,
    used_days: Option<i32>,
}

/// Creates an offset redemption and consumes one day of the oldest eligible
/// overtime grant for the activity, atomically.
///
/// The grant row is locked with `FOR UPDATE` for the duration of the
/// transaction, and the update re-checks the expected `used_days`, so two
/// racing redemptions can never both consume the last remaining day.
#[utoipa::path(
    post,
    path = "/offset",
    request_body = NewOffsetRequest,
    responses(
        (status = 201, description = "Offset request submitted successfully", body = CreatedId),
        (status = 400, description = "Validation failure, invalid activity, or no available overtime"),
        (status = 500, description = "Database error")
    ),
    tag = "Offset",
    security(("bearerAuth" = []))
)]
pub async fn create_offset_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewOffsetRequest>,
) -> Result<ApiResponse<CreatedId>, LedgerError> {
    let user_id = claims.user_id()?;

    let reason = payload.reason.trim().to_string();
    if reason.is_empty() {
        return Err(LedgerError::Validation("Reason is required".into()));
    }
    if !offset_date_is_valid(payload.offset_date, Utc::now().date_naive()) {
        return Err(LedgerError::Validation(
            "Offset date must be in the future".into(),
        ));
    }

    sqlx::query("SELECT id FROM activities WHERE id = $1")
        .bind(payload.activity_id)
        .fetch_optional(&pool)
        .await?
        .ok_or(LedgerError::InvalidActivity)?;

    let mut tx = pool.begin().await?;

    // First created, first consumed: smallest id among the user's approved
    // grants for this activity that still have capacity.
    let grant = sqlx::query_as::<_, EligibleGrant>(
        r#"
        SELECT id, total_days, used_days
        FROM overtime_requests
        WHERE activity_id = $1
          AND user_id = $2
          AND status = 'approved'
          AND COALESCE(used_days, 0) < total_days
        ORDER BY id ASC
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(payload.activity_id)
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(LedgerError::NoAvailableOvertime)?;

    let (new_used, new_status) =
        consume_one_day(grant.used_days, grant.total_days).ok_or(LedgerError::NoAvailableOvertime)?;

    // Auto-approved: there is no separate review step for redemptions.
    let row = sqlx::query(
        r#"
        INSERT INTO offset_requests
            (user_id, activity_id, offset_date, reason, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'approved', NOW(), NOW())
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(payload.activity_id)
    .bind(payload.offset_date)
    .bind(&reason)
    .fetch_one(&mut *tx)
    .await?;
    let offset_id: i32 = row.try_get("id")?;

    // Conditional on the value read under the lock; unreachable in practice
    // but keeps used_days <= total_days even if isolation assumptions change.
    let updated = sqlx::query(
        r#"
        UPDATE overtime_requests
        SET used_days = $1, status = $2, updated_at = NOW()
        WHERE id = $3 AND COALESCE(used_days, 0) = $4
        "#,
    )
    .bind(new_used)
    .bind(new_status)
    .bind(grant.id)
    .bind(grant.used_days.unwrap_or(0))
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        // Dropping the transaction rolls back the inserted offset row.
        return Err(LedgerError::NoAvailableOvertime);
    }

    tx.commit().await?;

    tracing::info!(
        offset_id,
        grant_id = grant.id,
        new_used,
        "offset redeemed against overtime grant"
    );

    Ok(ApiResponse::success(
        StatusCode::CREATED,
        "Offset request submitted successfully",
        CreatedId { id: offset_id },
    ))
}

/// Lists the user's offset requests, newest offset date first.
#[utoipa::path(
    get,
    path = "/offset",
    responses(
        (status = 200, description = "List of offset requests", body = Vec<OffsetRequestRow>),
        (status = 500, description = "Database error")
    ),
    tag = "Offset",
    security(("bearerAuth" = []))
)]
pub async fn list_offset_requests(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<Vec<OffsetRequestRow>>, LedgerError> {
    let user_id = claims.user_id()?;

    let rows = sqlx::query_as::<_, OffsetRequestRow>(
        r#"
        SELECT orq.id, orq.user_id, orq.activity_id, a.title AS activity_title,
               orq.offset_date, orq.reason, orq.status, orq.created_at
        FROM offset_requests orq
        LEFT JOIN activities a ON a.id = orq.activity_id
        WHERE orq.user_id = $1
        ORDER BY orq.offset_date DESC, orq.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    Ok(ApiResponse::success(StatusCode::OK, "Offset requests", rows))
}

/// Deletes one of the user's offset requests, regardless of status.
///
/// The consuming grant's `used_days` is intentionally left untouched: a
/// redeemed day stays redeemed even if its request row is removed.
#[utoipa::path(
    delete,
    path = "/offset/{request_id}",
    params(("request_id" = i32, Path, description = "Offset request ID")),
    responses(
        (status = 200, description = "Offset request deleted"),
        (status = 404, description = "Offset request not found or access denied"),
        (status = 500, description = "Database error")
    ),
    tag = "Offset",
    security(("bearerAuth" = []))
)]
pub async fn delete_offset_request(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
    Path(request_id): Path<i32>,
) -> Result<ApiResponse<()>, LedgerError> {
    let user_id = claims.user_id()?;

    let deleted = sqlx::query("DELETE FROM offset_requests WHERE id = $1 AND user_id = $2")
        .bind(request_id)
        .bind(user_id)
        .execute(&pool)
        .await?;

    if deleted.rows_affected() == 0 {
        return Err(LedgerError::NotFoundOrForbidden);
    }

    Ok(ApiResponse::success(StatusCode::OK, "Offset request deleted", ()))
}

use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(
    paths(create_offset_request, list_offset_requests, delete_offset_request),
    components(schemas(NewOffsetRequest, OffsetRequestRow, CreatedId)),
    tags(
        (name = "Offset", description = "Offset redemption endpoints")
    )
)]
pub struct OffsetDoc;
