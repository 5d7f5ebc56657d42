pub mod emissions;
pub mod period;
pub mod summary;
