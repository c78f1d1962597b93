// src/db/queries/balance.rs
use axum::{
    extract::{Extension, State},
    http::StatusCode,
};
use sqlx::PgPool;

use crate::api::auth::Claims;
use crate::db::models::balance::{BalanceSummary, GrantBalanceRow};
use crate::db::models::overtime::RequestStatus;
use crate::utils::api_response::ApiResponse;
use crate::utils::error::LedgerError;

/// Aggregate figures for the user's status page. Snapshot reads only; a
/// redemption committing concurrently may or may not be reflected.
#[utoipa::path(
    get,
    path = "/balance",
    responses(
        (status = 200, description = "Balance summary", body = BalanceSummary),
        (status = 500, description = "Database error")
    ),
    tag = "Balance",
    security(("bearerAuth" = []))
)]
pub async fn get_balance(
    State(pool): State<PgPool>,
    Extension(claims): Extension<Claims>,
) -> Result<ApiResponse<BalanceSummary>, LedgerError> {
    let user_id = claims.user_id()?;

    let grants = sqlx::query_as::<_, GrantBalanceRow>(
        "SELECT total_days, used_days, status FROM overtime_requests WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(&pool)
    .await?;

    let offset_statuses: Vec<RequestStatus> =
        sqlx::query_scalar("SELECT status FROM offset_requests WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&pool)
            .await?;

    Ok(ApiResponse::success(
        StatusCode::OK,
        "Balance summary",
        BalanceSummary::compute(&grants, &offset_statuses),
    ))
}

use utoipa::OpenApi;
#[derive(OpenApi)]
#[openapi(
    paths(get_balance),
    components(schemas(BalanceSummary)),
    tags(
        (name = "Balance", description = "Overtime/offset balance figures")
    )
)]
pub struct BalanceDoc;
