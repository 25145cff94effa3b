//! In-memory stand-in for the user backend.

use super::error::ApiError;
use crate::model::{Role, User, UserCreate, UserId, UserUpdate};
use async_trait::async_trait;
use shell_framework::{DataSource, SourceError};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, instrument};

/// Simulated round-trip times of the mock backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency {
    pub fetch: Duration,
    pub write: Duration,
}

impl Latency {
    /// No delay at all; what tests use.
    pub const NONE: Latency = Latency {
        fetch: Duration::ZERO,
        write: Duration::ZERO,
    };

    /// Half a second to list, 300ms per write.
    pub const REALISTIC: Latency = Latency {
        fetch: Duration::from_millis(500),
        write: Duration::from_millis(300),
    };
}

/// A [`DataSource<User>`] backed by a vector in memory.
///
/// Updates merge the given fields into the stored user, creates assign `max(id) + 1`, and
/// unknown ids fail with [`ApiError::NotFound`].
pub struct MockUserApi {
    users: Mutex<Vec<User>>,
    latency: Latency,
}

impl MockUserApi {
    pub fn new(users: Vec<User>, latency: Latency) -> Self {
        Self {
            users: Mutex::new(users),
            latency,
        }
    }

    /// Five users, `test1`..`test5`, alternating admin and user.
    pub fn seeded(latency: Latency) -> Self {
        let users = (1..=5)
            .map(|n| {
                let role = if n % 2 == 1 { Role::Admin } else { Role::User };
                User::new(n, format!("test{n}"), format!("test{n}@example.com"), role)
            })
            .collect();
        Self::new(users, latency)
    }

    async fn delay(duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }

    fn users(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl DataSource<User> for MockUserApi {
    #[instrument(skip(self))]
    async fn fetch_all(&self) -> Result<Vec<User>, SourceError> {
        Self::delay(self.latency.fetch).await;
        let users = self.users().clone();
        debug!(count = users.len(), "Listing users");
        Ok(users)
    }

    #[instrument(skip(self))]
    async fn update(&self, id: UserId, update: UserUpdate) -> Result<User, SourceError> {
        Self::delay(self.latency.write).await;
        let mut users = self.users();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(ApiError::NotFound(id))?;
        user.apply(update);
        Ok(user.clone())
    }

    #[instrument(skip(self))]
    async fn create(&self, params: UserCreate) -> Result<User, SourceError> {
        Self::delay(self.latency.write).await;
        let mut users = self.users();
        let next = users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let user = User::from_create(UserId(next), params);
        users.push(user.clone());
        debug!(id = %user.id, "Assigned id");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: UserId) -> Result<bool, SourceError> {
        Self::delay(self.latency.write).await;
        let mut users = self.users();
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(ApiError::NotFound(id))?;
        users.remove(index);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_users() {
        let api = MockUserApi::seeded(Latency::NONE);
        let users = api.fetch_all().await.unwrap();
        assert_eq!(users.len(), 5);
        assert_eq!(users[0], User::new(1, "test1", "test1@example.com", Role::Admin));
        assert_eq!(users[1].role, Role::User);
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let api = MockUserApi::new(
            vec![
                User::new(1, "a", "a@x", Role::User),
                User::new(7, "b", "b@x", Role::User),
            ],
            Latency::NONE,
        );
        let params = UserCreate {
            name: "c".into(),
            email: "c@x".into(),
            role: Role::Admin,
        };
        let created = api.create(params.clone()).await.unwrap();
        assert_eq!(created.id, UserId(8));

        let empty = MockUserApi::new(Vec::new(), Latency::NONE);
        assert_eq!(empty.create(params).await.unwrap().id, UserId(1));
    }

    #[tokio::test]
    async fn test_missing_user_is_reported() {
        let api = MockUserApi::seeded(Latency::NONE);
        let err = api.delete(UserId(42)).await.unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        let err = api
            .update(UserId(42), UserUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");
        assert_eq!(api.fetch_all().await.unwrap().len(), 5);
    }
}
