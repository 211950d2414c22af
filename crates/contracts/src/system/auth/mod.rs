use serde::{Deserialize, Serialize};

use super::permissions::{Permission, PermissionSet};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub employee_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub session: SessionInfo,
}

/// Signed-in user as seen by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub user_id: String,
    pub employee_no: String,
    pub display_name: String,
    pub permissions: PermissionSet,
    /// RFC 3339
    pub expires_at: String,
}

impl SessionInfo {
    pub fn can(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub employee_no: String,
    pub permissions: PermissionSet,
    pub exp: usize,
    pub iat: usize,
    /// Token id, used for revocation on logout
    pub jti: String,
}

impl TokenClaims {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(permission)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    #[error("กรุณากรอกรหัสพนักงาน")]
    Required,
    #[error("รหัสพนักงานไม่ถูกต้อง")]
    InvalidCredential,
}

/// Trimmed employee number, or [`LoginError::Required`] when blank
pub fn normalize_employee_no(input: &str) -> Result<&str, LoginError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        Err(LoginError::Required)
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_employee_no() {
        assert_eq!(normalize_employee_no(" 12345678 "), Ok("12345678"));
        assert_eq!(normalize_employee_no("   "), Err(LoginError::Required));
    }

    #[test]
    fn test_login_messages_are_distinct() {
        assert_eq!(LoginError::Required.to_string(), "กรุณากรอกรหัสพนักงาน");
        assert_eq!(
            LoginError::InvalidCredential.to_string(),
            "รหัสพนักงานไม่ถูกต้อง"
        );
    }
}
