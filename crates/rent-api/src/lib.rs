//! HTTP surface of the rent evaluation service

pub mod api;
pub mod config;
pub mod error;
pub mod payload;

pub use error::{AppError, AppResult};
