use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod activity;
pub mod balance;
pub mod offset;
pub mod overtime;
pub mod project;
pub mod user;

/// Id payload returned by creation endpoints.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedId {
    pub id: i32,
}
