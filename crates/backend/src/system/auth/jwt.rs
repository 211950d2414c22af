use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::system::auth::TokenClaims;
use contracts::system::users::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::shared::config::AuthConfig;

/// Signing secret and token lifetime
#[derive(Clone)]
pub struct JwtKeys {
    secret: String,
    lifetime: chrono::Duration,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtKeys")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl JwtKeys {
    pub fn new(secret: impl Into<String>, lifetime_hours: i64) -> Self {
        Self {
            secret: secret.into(),
            lifetime: chrono::Duration::hours(lifetime_hours),
        }
    }

    /// Keys from configuration; a fresh random secret when none is set
    pub fn from_config(config: &AuthConfig) -> Self {
        let secret = match &config.jwt_secret {
            Some(secret) if !secret.trim().is_empty() => secret.clone(),
            _ => {
                tracing::info!("No jwt_secret configured, generated a random one");
                generate_jwt_secret()
            }
        };
        Self::new(secret, config.token_lifetime_hours)
    }

    /// Generate an access token for the user. Returns the token and its expiry.
    pub fn generate_access_token(&self, user: &User) -> Result<(String, DateTime<Utc>)> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;

        let claims = TokenClaims {
            sub: user.id.clone(),
            employee_no: user.login.clone(),
            permissions: user.permissions.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to encode JWT token")?;

        Ok((token, expires_at))
    }

    /// Validate JWT token and extract claims
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims> {
        let token_data = decode::<TokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .context("Failed to decode JWT token")?;

        Ok(token_data.claims)
    }
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::permissions::{Permission, PermissionSet};
    use contracts::system::users::CreateUserDto;

    fn user() -> User {
        let mut user = User::new_for_insert(&CreateUserDto {
            login: "12345678".into(),
            firstname: "ผู้ดูแล".into(),
            lastname: "ระบบ".into(),
            permissions: [Permission::ManageUsers].into_iter().collect::<PermissionSet>(),
        });
        user.id = "u-1".into();
        user
    }

    #[test]
    fn test_token_round_trip() {
        let keys = JwtKeys::new("secret", 12);
        let (token, expires_at) = keys.generate_access_token(&user()).unwrap();
        let claims = keys.validate_token(&token).unwrap();

        assert_eq!(claims.sub, "u-1");
        assert_eq!(claims.employee_no, "12345678");
        assert!(claims.has(Permission::ManageUsers));
        assert!(!claims.has(Permission::DeleteRecords));
        assert_eq!(claims.exp, expires_at.timestamp() as usize);
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let (token, _) = JwtKeys::new("a", 12).generate_access_token(&user()).unwrap();
        assert!(JwtKeys::new("b", 12).validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = JwtKeys::new("secret", -1);
        let (token, _) = keys.generate_access_token(&user()).unwrap();
        assert!(keys.validate_token(&token).is_err());
    }

    #[test]
    fn test_random_secret_when_unset() {
        let a = generate_jwt_secret();
        let b = generate_jwt_secret();
        assert_ne!(a, b);
        assert_eq!(a.len(), 44);
    }
}
