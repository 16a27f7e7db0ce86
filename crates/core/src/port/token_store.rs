// Bot Token Store Port

use crate::error::Result;
use async_trait::async_trait;

/// Persisted transport credential (a single bot token)
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load_token(&self) -> Result<Option<String>>;

    /// Store `token`, replacing any previous one
    async fn save_token(&self, token: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryTokenStore {
        token: Mutex<Option<String>>,
    }

    impl InMemoryTokenStore {
        pub fn new(token: Option<&str>) -> Self {
            Self {
                token: Mutex::new(token.map(str::to_string)),
            }
        }

        pub fn stored(&self) -> Option<String> {
            self.token.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TokenStore for InMemoryTokenStore {
        async fn load_token(&self) -> Result<Option<String>> {
            Ok(self.stored())
        }

        async fn save_token(&self, token: &str) -> Result<()> {
            *self.token.lock().unwrap() = Some(token.to_string());
            Ok(())
        }
    }
}
