use chrono::{DateTime, Utc};
use contracts::system::auth::SessionInfo;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Live sessions keyed by the SHA-256 of their access token.
///
/// A token is accepted only while its session is registered, so logout
/// revokes it before its expiry.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, SessionInfo>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, token: &str, session: SessionInfo) {
        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, s| !is_expired(s, now));
        sessions.insert(hash_token(token), session);
    }

    /// Session of a token, if it is live
    pub async fn get(&self, token: &str) -> Option<SessionInfo> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&hash_token(token))
            .filter(|s| !is_expired(s, Utc::now()))
            .cloned()
    }

    /// Remove a token's session; `false` when it was not registered
    pub async fn revoke(&self, token: &str) -> bool {
        self.sessions
            .write()
            .await
            .remove(&hash_token(token))
            .is_some()
    }

    /// Drop every session of a user, e.g. after the user was deleted
    pub async fn revoke_user(&self, user_id: &str) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn is_expired(session: &SessionInfo, now: DateTime<Utc>) -> bool {
    DateTime::parse_from_rfc3339(&session.expires_at)
        .map(|exp| exp.with_timezone(&Utc) <= now)
        .unwrap_or(true)
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::permissions::PermissionSet;

    fn session(user_id: &str, expires_at: DateTime<Utc>) -> SessionInfo {
        SessionInfo {
            user_id: user_id.into(),
            employee_no: "12345678".into(),
            display_name: "ผู้ดูแล ระบบ".into(),
            permissions: PermissionSet::all(),
            expires_at: expires_at.to_rfc3339(),
        }
    }

    #[tokio::test]
    async fn test_revoke_removes_session() {
        let registry = SessionRegistry::new();
        let later = Utc::now() + chrono::Duration::hours(1);
        registry.insert("token-a", session("u1", later)).await;

        assert!(registry.get("token-a").await.is_some());
        assert!(registry.get("token-b").await.is_none());

        assert!(registry.revoke("token-a").await);
        assert!(registry.get("token-a").await.is_none());
        assert!(!registry.revoke("token-a").await);
    }

    #[tokio::test]
    async fn test_expired_sessions_are_ignored_and_purged() {
        let registry = SessionRegistry::new();
        let earlier = Utc::now() - chrono::Duration::minutes(1);
        let later = Utc::now() + chrono::Duration::hours(1);

        registry.insert("old", session("u1", earlier)).await;
        assert!(registry.get("old").await.is_none());

        registry.insert("new", session("u1", later)).await;
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_revoke_user() {
        let registry = SessionRegistry::new();
        let later = Utc::now() + chrono::Duration::hours(1);
        registry.insert("a", session("u1", later)).await;
        registry.insert("b", session("u1", later)).await;
        registry.insert("c", session("u2", later)).await;

        assert_eq!(registry.revoke_user("u1").await, 2);
        assert!(registry.get("c").await.is_some());
    }
}
