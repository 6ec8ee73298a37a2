//! Login-link document store abstraction

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::HashMap;
use zay_types::{AuthResult, LoginLink};

/// Narrow interface over the `login_links` collection (document id is the
/// link key).
///
/// `mark_used` must be a conditional update keyed on `is_used == false` so
/// that two devices racing on the same link cannot both win; a plain
/// read-then-write here is a correctness bug, not an acceptable edge case.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn create(&self, link: &LoginLink) -> AuthResult<()>;

    async fn get(&self, link_key: &str) -> AuthResult<Option<LoginLink>>;

    /// Atomically set `is_used = true` (and `used_at`) iff the link exists
    /// and is currently unused. Returns whether this call made the
    /// transition.
    async fn mark_used(&self, link_key: &str) -> AuthResult<bool>;

    /// Deleting a missing document is a no-op.
    async fn delete(&self, link_key: &str) -> AuthResult<()>;
}

/// In-memory repository; the mutex makes `mark_used` a single atomic
/// read-modify-write, matching what a transactional document store provides.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, LoginLink>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, link: &LoginLink) -> AuthResult<()> {
        self.links
            .lock()
            .insert(link.link_key.clone(), link.clone());
        Ok(())
    }

    async fn get(&self, link_key: &str) -> AuthResult<Option<LoginLink>> {
        Ok(self.links.lock().get(link_key).cloned())
    }

    async fn mark_used(&self, link_key: &str) -> AuthResult<bool> {
        let mut links = self.links.lock();
        match links.get_mut(link_key) {
            Some(link) if !link.is_used => {
                link.is_used = true;
                link.used_at = Some(Utc::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, link_key: &str) -> AuthResult<()> {
        self.links.lock().remove(link_key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(key: &str) -> LoginLink {
        let now = Utc::now();
        LoginLink {
            id: key.to_string(),
            ticket_id: "JH13BNK".to_string(),
            target_username: "alice".to_string(),
            link_key: key.to_string(),
            admin_username: "support1".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(24),
            is_used: false,
            used_at: None,
        }
    }

    #[tokio::test]
    async fn test_mark_used_wins_only_once() {
        let repo = InMemoryLinkRepository::new();
        repo.create(&link("k1")).await.unwrap();

        assert!(repo.mark_used("k1").await.unwrap());
        assert!(!repo.mark_used("k1").await.unwrap());

        let stored = repo.get("k1").await.unwrap().unwrap();
        assert!(stored.is_used);
        assert!(stored.used_at.is_some());
    }

    #[tokio::test]
    async fn test_mark_used_missing_link() {
        let repo = InMemoryLinkRepository::new();
        assert!(!repo.mark_used("absent").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let repo = InMemoryLinkRepository::new();
        repo.create(&link("k1")).await.unwrap();
        repo.delete("k1").await.unwrap();
        repo.delete("k1").await.unwrap();
        assert!(repo.get("k1").await.unwrap().is_none());
    }
}
