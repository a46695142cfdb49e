//! Request extractors.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// JSON body extractor whose rejections are reported as `400 {error}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
