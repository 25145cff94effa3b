use serde::{Deserialize, Serialize};
use shell_framework::StoreEntity;
use std::fmt::Display;

/// Type-safe identifier for Users. Assigned by the data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u32);

impl From<u32> for UserId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Represents a user managed by the shell.
///
/// # Shell Framework
/// This struct implements the [`StoreEntity`] trait, so it can live in the shared
/// [`StoreActor`](shell_framework::StoreActor) and flow through the
/// [`ActionLayer`](shell_framework::ActionLayer).
///
/// See [`impl StoreEntity for User`](#impl-StoreEntity-for-User) for details on:
/// - Creation parameters ([`UserCreate`])
/// - Update parameters ([`UserUpdate`])
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Payload for creating a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Payload for updating an existing user.
/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl User {
    /// Creates a new User instance.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the data source
    /// * `name` - User's display name
    /// * `email` - User's email address
    /// * `role` - Access level
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    pub fn from_create(id: UserId, params: UserCreate) -> Self {
        Self {
            id,
            name: params.name,
            email: params.email,
            role: params.role,
        }
    }

    /// Merges a partial update into this user.
    pub fn apply(&mut self, update: UserUpdate) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(role) = update.role {
            self.role = role;
        }
    }
}

impl StoreEntity for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;

    fn id(&self) -> UserId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_update_keeps_missing_fields() {
        let mut user = User::new(1, "test1", "test1@example.com", Role::Admin);
        user.apply(UserUpdate {
            email: Some("new@example.com".into()),
            ..Default::default()
        });
        assert_eq!(user.name, "test1");
        assert_eq!(user.email, "new@example.com");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn test_wire_format_matches_remote_modules() {
        let user = User::new(2, "test2", "test2@example.com", Role::User);
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 2,
                "name": "test2",
                "email": "test2@example.com",
                "role": "user"
            })
        );

        let update: UserUpdate = serde_json::from_str(r#"{"role":"admin"}"#).unwrap();
        assert_eq!(update.role, Some(Role::Admin));
        assert!(update.name.is_none());
    }
}
