// src/utils/mod.rs
pub mod config;
pub mod error;
pub mod logging;
pub mod text_debug;

pub use error::AppError; // Re-export main error type for convenience
