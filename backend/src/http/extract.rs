//! Request extractors.

use axum::extract::FromRequest;

use super::error::AppError;

/// JSON body extractor whose rejections render as [`super::error::ApiError`]
/// bodies instead of axum's plain-text responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
