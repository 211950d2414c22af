use contracts::system::auth::{LoginRequest, LoginResponse, SessionInfo};
use gloo_net::http::{Request, RequestBuilder};

use crate::shared::api_utils::{api_url, dispatch, dispatch_json, parse};

fn bearer(builder: RequestBuilder, access_token: &str) -> RequestBuilder {
    builder.header("Authorization", &format!("Bearer {}", access_token))
}

/// Exchange an employee number for a session.
/// The error is the server's message ("รหัสพนักงานไม่ถูกต้อง" and so on).
pub async fn login(employee_no: String) -> Result<LoginResponse, String> {
    let request = LoginRequest { employee_no };
    let response = dispatch_json(Request::post(&api_url("/api/system/auth/login")), &request)
        .await
        .map_err(|e| e.message)?;
    parse(response).await.map_err(|e| e.message)
}

pub async fn logout(access_token: &str) -> Result<(), String> {
    let request = bearer(Request::post(&api_url("/api/system/auth/logout")), access_token);
    dispatch(request).await.map(|_| ()).map_err(|e| e.message)
}

/// Session behind a stored token; fails once the token is revoked or expired
pub async fn get_current_session(access_token: &str) -> Result<SessionInfo, String> {
    let request = bearer(Request::get(&api_url("/api/system/auth/me")), access_token);
    let response = dispatch(request).await.map_err(|e| e.message)?;
    parse(response).await.map_err(|e| e.message)
}
