// src/db/models/overtime.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifecycle of an overtime or offset request.
///
/// `Used` only ever applies to overtime grants: it marks an approved grant
/// whose capacity has been fully consumed by redemptions.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type, ToSchema)]
#[sqlx(type_name = "request_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Used,
}

/// An overtime grant joined with its activity title for listings.
/// `start_date`/`end_date` are snapshotted from the activity at creation
/// time and keep their values even if the activity is later edited.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OvertimeRequestRow {
    pub id: i32,
    pub user_id: i32,
    pub activity_id: i32,
    pub activity_title: Option<String>,
    pub total_days: i32,
    pub used_days: Option<i32>,
    pub status: RequestStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewOvertimeRequest {
    pub activity_id: i32,
    /// Number of overtime days claimed. Must be >= 1 and no larger than the
    /// activity's duration in calendar days.
    pub days: i32,
}

/// One redemption step against a grant: advances `used_days` by one and
/// derives the resulting status. Returns `None` when the grant has no
/// capacity left, so a caller can never push `used_days` past `total_days`.
pub fn consume_one_day(used_days: Option<i32>, total_days: i32) -> Option<(i32, RequestStatus)> {
    let used = used_days.unwrap_or(0);
    if used >= total_days {
        return None;
    }
    let new_used = used + 1;
    let status = if new_used == total_days {
        RequestStatus::Used
    } else {
        RequestStatus::Approved
    };
    Some((new_used, status))
}
