//! Shared response envelope types for API handlers.
//!
//! All management API responses use a `{ "data": ..., "error": ... }`
//! envelope. Use [`DataResponse`] instead of ad-hoc `serde_json::json!`
//! to get compile-time type safety and consistent serialization. Error
//! bodies are produced by [`AppError`](crate::error::AppError).

use serde::Serialize;

/// Standard `{ "data": T, "error": null }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse::new(items)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
    pub error: Option<String>,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data, error: None }
    }
}
