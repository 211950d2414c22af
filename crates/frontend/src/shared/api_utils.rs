//! API utilities for frontend-backend communication
//!
//! Provides helper functions for constructing API URLs and making
//! authenticated JSON requests. Failed calls come back as the decoded
//! [`ApiError`], field messages included.

use contracts::shared::api_error::ApiError;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::system::auth::storage;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/api/transformers/123");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Error of a failed call: the server message, or the HTTP status when the
/// body is not an [`ApiError`]
async fn error_of(response: Response) -> ApiError {
    let status = response.status();
    match response.json::<ApiError>().await {
        Ok(err) if !err.message.is_empty() => err,
        _ => ApiError::new(format!("เกิดข้อผิดพลาดจากเซิร์ฟเวอร์ ({})", status)),
    }
}

fn with_auth(builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
    let token = storage::get_access_token().ok_or_else(|| ApiError::new("กรุณาเข้าสู่ระบบ"))?;
    Ok(builder.header("Authorization", &format!("Bearer {}", token)))
}

/// Send a prepared request; non-2xx answers become the decoded [`ApiError`]
pub async fn dispatch(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ApiError::new(format!("ไม่สามารถเชื่อมต่อเซิร์ฟเวอร์: {}", e)))?;

    if !response.ok() {
        return Err(error_of(response).await);
    }
    Ok(response)
}

/// Same as [`dispatch`] with a JSON body
pub async fn dispatch_json<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<Response, ApiError> {
    let request = builder
        .json(body)
        .map_err(|e| ApiError::new(format!("Failed to serialize request: {}", e)))?;
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::new(format!("ไม่สามารถเชื่อมต่อเซิร์ฟเวอร์: {}", e)))?;

    if !response.ok() {
        return Err(error_of(response).await);
    }
    Ok(response)
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    dispatch(with_auth(builder)?).await
}

async fn send_json<B: Serialize>(builder: RequestBuilder, body: &B) -> Result<Response, ApiError> {
    dispatch_json(with_auth(builder)?, body).await
}

pub async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::new(format!("Failed to parse response: {}", e)))
}

/// Authenticated GET
pub async fn get_json<T: DeserializeOwned>(path: &str) -> Result<T, ApiError> {
    parse(send(Request::get(&api_url(path))).await?).await
}

/// Authenticated POST with a JSON body
pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    parse(send_json(Request::post(&api_url(path)), body).await?).await
}

/// Authenticated PUT with a JSON body
pub async fn put_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> Result<T, ApiError> {
    parse(send_json(Request::put(&api_url(path)), body).await?).await
}

/// Authenticated DELETE
pub async fn delete(path: &str) -> Result<(), ApiError> {
    send(Request::delete(&api_url(path))).await.map(|_| ())
}
