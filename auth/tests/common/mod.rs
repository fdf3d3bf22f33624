use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use replay_auth::AccessGuard;
use replay_auth::AuthResolver;
use replay_auth::Role;
use replay_auth::StoreError;
use replay_auth::TokenCodec;
use replay_auth::TokenSettings;
use replay_auth::UserId;
use replay_auth::UserRecord;
use replay_auth::UserStore;

pub const TEST_SECRET: &str = "integration_test_secret_at_least_32_bytes";

/// In-memory user table whose rows can change between requests
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn upsert(&self, id: i64, role: Role) {
        let record = UserRecord {
            id: UserId(id),
            email: format!("user{}@replay.test", id),
            name: format!("user{}", id),
            role,
            password_hash: String::new(),
        };
        self.users.write().unwrap().insert(record.id, record);
    }

    pub fn remove(&self, id: i64) {
        self.users.write().unwrap().remove(&UserId(id));
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }
}

/// Wired authorization chain backed by an in-memory store
pub struct TestAuth {
    pub codec: Arc<TokenCodec>,
    pub store: Arc<InMemoryUserStore>,
    pub guard: AccessGuard<InMemoryUserStore>,
}

impl TestAuth {
    pub fn new() -> Self {
        let settings = TokenSettings::new(TEST_SECRET).with_expire_minutes(15);
        let codec = Arc::new(TokenCodec::from_settings(&settings).expect("Failed to build codec"));
        let store = Arc::new(InMemoryUserStore::default());
        let guard = AccessGuard::new(AuthResolver::new(Arc::clone(&codec), Arc::clone(&store)));

        Self {
            codec,
            store,
            guard,
        }
    }

    pub fn bearer_for(&self, id: i64, role: Role) -> String {
        let token = self
            .codec
            .encode_default(UserId(id), role)
            .expect("Failed to issue token");
        format!("Bearer {}", token)
    }
}
