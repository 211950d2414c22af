use contracts::system::auth::{
    normalize_employee_no, LoginError, LoginRequest, LoginResponse, SessionInfo, TokenClaims,
};

use crate::shared::error::{AppError, AppResult};
use crate::shared::state::AppState;
use crate::system::users::repository as users;

/// Check an employee number and open a session.
///
/// Every attempt waits for the configured login delay first, including
/// attempts that fail.
pub async fn login(state: &AppState, request: LoginRequest) -> AppResult<LoginResponse> {
    let delay = state.config.auth.login_delay_ms;
    if delay > 0 {
        tokio::time::sleep(std::time::Duration::from_millis(delay)).await;
    }

    let employee_no = normalize_employee_no(&request.employee_no)?;

    let Some(user) = users::get_by_login(&state.users, employee_no).await else {
        tracing::warn!("Failed login attempt for employee number {}", employee_no);
        return Err(LoginError::InvalidCredential.into());
    };

    let (access_token, expires_at) = state.jwt.generate_access_token(&user)?;

    let session = SessionInfo {
        user_id: user.id.clone(),
        employee_no: user.login.clone(),
        display_name: user.display_name(),
        permissions: user.permissions.clone(),
        expires_at: expires_at.to_rfc3339(),
    };
    state.sessions.insert(&access_token, session.clone()).await;
    users::update_last_login(&state.users, &user.id).await?;

    tracing::info!("User {} logged in", user.login);
    Ok(LoginResponse {
        access_token,
        session,
    })
}

/// Claims of a live session.
///
/// `permissions` is replaced by the stored user's current set; the signed
/// copy dates from login. Tokens of removed users are rejected.
pub async fn authenticate(state: &AppState, token: &str) -> AppResult<TokenClaims> {
    let mut claims = state
        .jwt
        .validate_token(token)
        .map_err(|_| AppError::unauthenticated())?;

    if state.sessions.get(token).await.is_none() {
        tracing::debug!("Rejected revoked token of user {}", claims.sub);
        return Err(AppError::unauthenticated());
    }

    let Some(user) = users::get_by_id(&state.users, &claims.sub).await else {
        tracing::debug!("Rejected token of removed user {}", claims.sub);
        return Err(AppError::unauthenticated());
    };

    claims.permissions = user.permissions;
    Ok(claims)
}

/// End the session of a token
pub async fn logout(state: &AppState, token: &str) -> bool {
    state.sessions.revoke(token).await
}

/// Session behind a token, with the user's current name and permissions
pub async fn current_session(
    state: &AppState,
    token: &str,
    claims: &TokenClaims,
) -> AppResult<SessionInfo> {
    let mut session = state
        .sessions
        .get(token)
        .await
        .ok_or_else(AppError::unauthenticated)?;

    let user = users::get_by_id(&state.users, &claims.sub)
        .await
        .ok_or_else(AppError::unauthenticated)?;

    session.display_name = user.display_name();
    session.permissions = user.permissions;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::state::test_support;
    use crate::system::initialization;

    fn request(employee_no: &str) -> LoginRequest {
        LoginRequest {
            employee_no: employee_no.into(),
        }
    }

    async fn seeded() -> AppState {
        let state = test_support::state();
        initialization::ensure_admin_user_exists(&state).await.unwrap();
        state
    }

    #[tokio::test]
    async fn test_seeded_credential_logs_in() {
        let state = seeded().await;
        let response = login(&state, request("12345678")).await.unwrap();

        assert_eq!(response.session.employee_no, "12345678");
        assert!(state.sessions.get(&response.access_token).await.is_some());

        let claims = state.jwt.validate_token(&response.access_token).unwrap();
        assert_eq!(claims.sub, response.session.user_id);

        let user = users::get_by_id(&state.users, &claims.sub).await.unwrap();
        assert!(user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_unknown_employee_number_is_rejected() {
        let state = seeded().await;
        let err = login(&state, request("00000000")).await.unwrap_err();
        match err {
            AppError::Unauthorized(message) => assert_eq!(message, "รหัสพนักงานไม่ถูกต้อง"),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_empty_input_has_distinct_message() {
        let state = seeded().await;
        let err = login(&state, request("   ")).await.unwrap_err();
        match err {
            AppError::BadRequest(message) => assert_eq!(message, "กรุณากรอกรหัสพนักงาน"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_waits_for_configured_delay() {
        let mut state = seeded().await;
        let mut config = (*state.config).clone();
        config.auth.login_delay_ms = 50;
        state.config = std::sync::Arc::new(config);

        let started = std::time::Instant::now();
        let _ = login(&state, request("00000000")).await;
        assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_demoted_user_loses_permissions_at_once() {
        use crate::system::auth::extractor::CurrentUser;
        use crate::system::users::service as user_service;
        use contracts::system::permissions::{Permission, PermissionSet};
        use contracts::system::users::{CreateUserDto, UpdateUserDto};

        let state = seeded().await;
        let b = user_service::create(
            &state,
            CreateUserDto {
                login: "22222222".into(),
                firstname: "สมหญิง".into(),
                lastname: "ใจดี".into(),
                permissions: PermissionSet::all(),
            },
        )
        .await
        .unwrap();
        let response = login(&state, request("22222222")).await.unwrap();

        let before = CurrentUser(authenticate(&state, &response.access_token).await.unwrap());
        assert!(before.require(Permission::ManageUsers).is_ok());

        user_service::update(
            &state,
            &b.id,
            UpdateUserDto {
                id: b.id.clone(),
                firstname: "สมหญิง".into(),
                lastname: "ใจดี".into(),
                permissions: PermissionSet::empty(),
            },
        )
        .await
        .unwrap();

        let after = CurrentUser(authenticate(&state, &response.access_token).await.unwrap());
        assert!(after.0.permissions.is_empty());
        assert!(matches!(
            after.require(Permission::ManageUsers),
            Err(AppError::Forbidden)
        ));
        assert!(after.require(Permission::DeleteRecords).is_err());
    }

    #[tokio::test]
    async fn test_deleted_user_token_is_rejected() {
        let state = seeded().await;
        let response = login(&state, request("12345678")).await.unwrap();
        assert!(authenticate(&state, &response.access_token).await.is_ok());

        let claims = state.jwt.validate_token(&response.access_token).unwrap();
        users::delete(&state.users, &claims.sub).await;
        assert!(authenticate(&state, &response.access_token).await.is_err());
        assert!(authenticate(&state, "not-a-token").await.is_err());
    }

    #[tokio::test]
    async fn test_logout_revokes_token() {
        let state = seeded().await;
        let response = login(&state, request(" 12345678 ")).await.unwrap();
        let claims = state.jwt.validate_token(&response.access_token).unwrap();

        let session = current_session(&state, &response.access_token, &claims)
            .await
            .unwrap();
        assert_eq!(session.user_id, response.session.user_id);

        assert!(logout(&state, &response.access_token).await);
        assert!(current_session(&state, &response.access_token, &claims)
            .await
            .is_err());
    }
}
