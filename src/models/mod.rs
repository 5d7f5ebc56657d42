pub mod activity;
pub mod summary;
pub mod user;
