pub mod config;
pub mod match_executor;
