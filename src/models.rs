pub mod auth;
pub mod catalog;
pub mod fleet;
pub mod operations;
pub mod orders;
