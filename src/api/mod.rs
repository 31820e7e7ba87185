//! HTTP layer for request/response handling.
//!
//! Translates HTTP requests into domain operations and formats responses
//! according to the API contract.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Authentication, rate limiting, and tracing middleware

pub mod dto;
pub mod handlers;
pub mod middleware;
