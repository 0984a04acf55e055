//! FitLog Library
//!
//! Food, exercise and custom metric logging with calorie estimation,
//! saved-template suggestions and a small chart language.

pub mod build_info;
pub mod calories;
pub mod chart;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod similarity;
pub mod tools;
