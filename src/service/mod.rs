pub mod accounts;
pub mod config;
