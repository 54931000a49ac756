// In-memory bearer-token sessions. Tokens die with the process; restart
// logs everyone out, which is acceptable for a single-node dashboard.

use rand::Rng;
use rand::distr::Alphanumeric;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const TOKEN_LEN: usize = 48;

struct Session {
    user_id: i64,
    expires_at: Instant,
}

pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issue a fresh token for the user.
    pub async fn create(&self, user_id: i64) -> String {
        let token = new_token();
        let session = Session {
            user_id,
            expires_at: Instant::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its user id; expired tokens are dropped on touch.
    pub async fn resolve(&self, token: &str) -> Option<i64> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(s) if s.expires_at > Instant::now() => return Some(s.user_id),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(token);
        None
    }

    pub async fn destroy(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Drop every session of one user (account deletion).
    pub async fn destroy_user(&self, user_id: i64) {
        self.sessions
            .write()
            .await
            .retain(|_, s| s.user_id != user_id);
    }
}

fn new_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_resolve_destroy() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(7).await;
        assert_eq!(store.resolve(&token).await, Some(7));
        store.destroy(&token).await;
        assert_eq!(store.resolve(&token).await, None);
    }

    #[tokio::test]
    async fn unknown_token_does_not_resolve() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert_eq!(store.resolve("nope").await, None);
    }

    #[tokio::test]
    async fn expired_token_is_rejected_and_evicted() {
        let store = SessionStore::new(Duration::ZERO);
        let token = store.create(7).await;
        assert_eq!(store.resolve(&token).await, None);
        assert!(store.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn destroy_user_drops_all_their_tokens() {
        let store = SessionStore::new(Duration::from_secs(60));
        let a = store.create(1).await;
        let b = store.create(1).await;
        let other = store.create(2).await;
        store.destroy_user(1).await;
        assert_eq!(store.resolve(&a).await, None);
        assert_eq!(store.resolve(&b).await, None);
        assert_eq!(store.resolve(&other).await, Some(2));
    }

    #[test]
    fn tokens_are_long_and_unique() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
    }
}
