pub mod activity;
pub mod balance;
pub mod offset;
pub mod overtime;
pub mod project;
