//! EduLearn Backend Library
//!
//! Exposes the router, use cases and storage for the binary and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod store;
pub mod usecase;
