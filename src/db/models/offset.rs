// src/db/models/offset.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::overtime::RequestStatus;

/// An offset redemption: one day of leave taken against an activity,
/// consuming one day of the oldest eligible overtime grant. Joined with the
/// activity title for listings.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OffsetRequestRow {
    pub id: i32,
    pub user_id: i32,
    pub activity_id: i32,
    pub activity_title: Option<String>,
    pub offset_date: NaiveDate,
    pub reason: String,
    pub status: RequestStatus,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewOffsetRequest {
    pub activity_id: i32,
    pub offset_date: NaiveDate,
    pub reason: String,
}

/// The offset date must be strictly later than today; a request for today
/// itself is rejected.
pub fn offset_date_is_valid(offset_date: NaiveDate, today: NaiveDate) -> bool {
    offset_date > today
}
