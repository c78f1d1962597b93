// src/db/models/activity.rs
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A trackable unit of work with a date span, optionally grouped under a
/// project. Grants and redemptions reference activities by id.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Activity {
    pub id: i32,
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NewActivity {
    pub project_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl Activity {
    /// Maximum overtime days that can be claimed against this activity: its
    /// duration in calendar days, both endpoints included. An activity with
    /// no end date counts as a single day.
    pub fn max_overtime_days(&self) -> i64 {
        max_overtime_days(self.start_date, self.end_date)
    }
}

pub fn max_overtime_days(start_date: NaiveDate, end_date: Option<NaiveDate>) -> i64 {
    match end_date {
        Some(end) => (end - start_date).num_days().max(0) + 1,
        None => 1,
    }
}
