pub mod activity;
pub mod auth;
pub mod balance;
pub mod health;
pub mod offset;
pub mod overtime;
pub mod project;
