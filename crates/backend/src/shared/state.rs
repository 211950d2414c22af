use std::sync::Arc;
use tokio::sync::RwLock;

use contracts::domain::a001_transformer::Transformer;
use contracts::domain::a002_inspection_item::InspectionItem;
use contracts::system::users::User;

use super::config::Config;
use super::data::memory_store::MemoryStore;
use crate::system::auth::jwt::JwtKeys;
use crate::system::auth::sessions::SessionRegistry;

pub type Store<T> = Arc<RwLock<MemoryStore<T>>>;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
    pub sessions: Arc<SessionRegistry>,
    pub users: Store<User>,
    pub transformers: Store<Transformer>,
    pub inspections: Store<InspectionItem>,
}

impl AppState {
    /// Empty stores; seeding is done by `system::initialization`
    pub fn new(config: Config) -> Self {
        let jwt = JwtKeys::from_config(&config.auth);
        Self {
            config: Arc::new(config),
            jwt: Arc::new(jwt),
            sessions: Arc::new(SessionRegistry::new()),
            users: Arc::default(),
            transformers: Arc::default(),
            inspections: Arc::default(),
        }
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// State with no login delay and a fixed secret
    pub fn state() -> AppState {
        let mut config = Config::default();
        config.auth.login_delay_ms = 0;
        config.auth.jwt_secret = Some("test-secret".into());
        config.seed.demo_data = false;
        AppState::new(config)
    }
}
