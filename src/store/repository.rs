//! Repository over a snapshot store.
//!
//! Every mutation runs load -> mutate -> save while holding one async mutex,
//! so concurrent writers are serialized instead of overwriting each other.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use super::{PersistencePolicy, SnapshotStore};
use crate::errors::AppError;
use crate::models::{now_timestamp, Message, NewUser, Snapshot, Stats, User, UserId};

/// Result of inserting a user.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Created(User),
    /// An account with the same email already existed; nothing was written.
    Existing(User),
}

/// Data access for users and messages.
pub struct Repository {
    store: Arc<dyn SnapshotStore>,
    policy: PersistencePolicy,
    write_lock: Mutex<()>,
}

impl Repository {
    pub fn new(store: Arc<dyn SnapshotStore>, policy: PersistencePolicy) -> Self {
        Self {
            store,
            policy,
            write_lock: Mutex::new(()),
        }
    }

    /// Load the current snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.store.load().await
    }

    /// Save under the configured persistence policy.
    async fn persist(&self, snapshot: &Snapshot) -> Result<(), AppError> {
        match self.store.save(snapshot).await {
            Ok(()) => Ok(()),
            Err(e) => match self.policy {
                PersistencePolicy::FailOpen => {
                    tracing::error!("Write failed, continuing without persistence: {}", e);
                    Ok(())
                }
                PersistencePolicy::FailClosed => {
                    tracing::error!("Write failed: {}", e);
                    Err(e)
                }
            },
        }
    }

    /// Run a read-modify-write cycle and persist the result.
    async fn mutate<T>(&self, f: impl FnOnce(&mut Snapshot) -> T) -> Result<T, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.store.load().await;
        let out = f(&mut snapshot);
        self.persist(&snapshot).await?;
        Ok(out)
    }

    // ==================== USER OPERATIONS ====================

    /// List all users in registration order.
    pub async fn list_users(&self) -> Vec<User> {
        self.snapshot().await.users
    }

    /// Find a user by email, ignoring case.
    pub async fn find_user_by_email(&self, email: &str) -> Option<User> {
        find_by_email(&self.snapshot().await, email).cloned()
    }

    /// Append a new user unless the email is already registered.
    pub async fn insert_user(&self, new_user: NewUser) -> Result<InsertOutcome, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut snapshot = self.store.load().await;

        if let Some(existing) = find_by_email(&snapshot, &new_user.email) {
            return Ok(InsertOutcome::Existing(existing.clone()));
        }

        let id = next_user_id(&snapshot, Utc::now().timestamp_millis());
        let user = new_user.into_user(id, now_timestamp());
        snapshot.users.push(user.clone());
        self.persist(&snapshot).await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(InsertOutcome::Created(user))
    }

    /// Hard-delete a user. Returns how many records were removed.
    ///
    /// The snapshot is written back even when nothing matched.
    pub async fn delete_user(&self, id: Option<UserId>) -> Result<usize, AppError> {
        let removed = self
            .mutate(|snapshot| {
                let before = snapshot.users.len();
                snapshot.users.retain(|u| Some(u.id) != id);
                before - snapshot.users.len()
            })
            .await?;

        tracing::info!(user_id = ?id, removed, "admin delete");
        Ok(removed)
    }

    // ==================== MESSAGE OPERATIONS ====================

    /// All messages exchanged between `a` and `b`, in store order.
    pub async fn thread(&self, a: UserId, b: UserId) -> Vec<Message> {
        self.snapshot()
            .await
            .messages
            .into_iter()
            .filter(|m| m.is_between(a, b))
            .collect()
    }

    /// Append a message.
    pub async fn append_message(&self, message: Message) -> Result<Message, AppError> {
        let stored = message.clone();
        self.mutate(move |snapshot| snapshot.messages.push(message))
            .await?;
        Ok(stored)
    }

    // ==================== ADMIN ====================

    /// Aggregate counts.
    pub async fn stats(&self) -> Stats {
        Stats::from_snapshot(&self.snapshot().await)
    }
}

fn find_by_email<'a>(snapshot: &'a Snapshot, email: &str) -> Option<&'a User> {
    let wanted = email.to_lowercase();
    snapshot
        .users
        .iter()
        .find(|u| u.email.to_lowercase() == wanted)
}

/// Timestamp-derived id, bumped past the newest existing id when two
/// registrations land in the same millisecond.
fn next_user_id(snapshot: &Snapshot, now_millis: i64) -> UserId {
    let newest = snapshot.users.iter().map(|u| u.id).max().unwrap_or(0);
    now_millis.max(newest + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl SnapshotStore for BrokenStore {
        async fn load(&self) -> Snapshot {
            Snapshot::default()
        }

        async fn save(&self, _snapshot: &Snapshot) -> Result<(), AppError> {
            Err(AppError::Persistence("medium unavailable".to_string()))
        }
    }

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Ann".to_string(),
            email: email.to_string(),
            age: 25,
            bio: "hi".to_string(),
            gender: "Female".to_string(),
            interested_in: "Everyone".to_string(),
            looking_for: "Dating".to_string(),
            interests: vec!["music".to_string()],
            img: None,
            social_qr: Some("/uploads/qr.png".to_string()),
        }
    }

    fn repo() -> Repository {
        Repository::new(Arc::new(MemoryStore::new()), PersistencePolicy::FailOpen)
    }

    #[tokio::test]
    async fn test_insert_then_existing() {
        let repo = repo();

        let created = match repo.insert_user(new_user("ann@example.com")).await.unwrap() {
            InsertOutcome::Created(user) => user,
            other => panic!("expected created, got {:?}", other),
        };
        assert!(!created.registered_at.is_empty());

        let mut again = new_user("ANN@example.com");
        again.name = "Someone Else".to_string();
        match repo.insert_user(again).await.unwrap() {
            InsertOutcome::Existing(user) => assert_eq!(user, created),
            other => panic!("expected existing, got {:?}", other),
        }

        assert_eq!(repo.list_users().await.len(), 1);
        assert_eq!(
            repo.find_user_by_email("Ann@Example.com").await,
            Some(created.clone())
        );
        assert_eq!(repo.list_users().await, vec![created]);
    }

    #[tokio::test]
    async fn test_ids_are_unique_within_one_millisecond() {
        let repo = repo();
        for i in 0..5 {
            repo.insert_user(new_user(&format!("u{}@example.com", i)))
                .await
                .unwrap();
        }

        let mut ids: Vec<_> = repo.list_users().await.iter().map(|u| u.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_next_user_id() {
        let empty = Snapshot::default();
        assert_eq!(next_user_id(&empty, 1000), 1000);

        let mut snapshot = Snapshot::default();
        snapshot
            .users
            .push(new_user("a@x").into_user(1000, String::new()));
        assert_eq!(next_user_id(&snapshot, 1000), 1001);
        assert_eq!(next_user_id(&snapshot, 5000), 5000);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_are_not_lost() {
        let repo = Arc::new(repo());
        let mut handles = Vec::new();
        for i in 0..20 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.insert_user(new_user(&format!("c{}@example.com", i)))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(repo.list_users().await.len(), 20);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let repo = repo();
        repo.insert_user(new_user("a@example.com")).await.unwrap();

        assert_eq!(repo.delete_user(Some(42)).await.unwrap(), 0);
        assert_eq!(repo.delete_user(None).await.unwrap(), 0);
        assert_eq!(repo.list_users().await.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let repo = repo();
        repo.insert_user(new_user("a@example.com")).await.unwrap();
        let id = repo.list_users().await[0].id;

        assert_eq!(repo.delete_user(Some(id)).await.unwrap(), 1);
        assert!(repo.list_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_thread_filters_both_directions_in_order() {
        let repo = repo();
        for (from, to, text) in [(1, 2, "a"), (2, 1, "b"), (1, 3, "c"), (1, 2, "d")] {
            repo.append_message(Message {
                from,
                to,
                text: text.to_string(),
                timestamp: now_timestamp(),
            })
            .await
            .unwrap();
        }

        let texts: Vec<_> = repo
            .thread(2, 1)
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "d"]);
        assert_eq!(repo.stats().await.total_messages, 4);
    }

    #[tokio::test]
    async fn test_fail_open_swallows_save_errors() {
        let repo = Repository::new(Arc::new(BrokenStore), PersistencePolicy::FailOpen);
        let outcome = repo.insert_user(new_user("a@example.com")).await.unwrap();
        assert!(matches!(outcome, InsertOutcome::Created(_)));
    }

    #[tokio::test]
    async fn test_fail_closed_surfaces_save_errors() {
        let repo = Repository::new(Arc::new(BrokenStore), PersistencePolicy::FailClosed);
        let err = repo.insert_user(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));

        let err = repo.delete_user(Some(1)).await.unwrap_err();
        assert!(matches!(err, AppError::Persistence(_)));
    }
}
