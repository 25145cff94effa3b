//! # Shell Events
//!
//! The fixed vocabulary spoken over the shell's [`EventBus`]. Remote modules publish the
//! request family and listen for the outcome family; the shell does the reverse.
//!
//! | topic | direction |
//! |---|---|
//! | `update-user-request`, `create-user-request` | module → shell |
//! | `delete-user-request`, `fetch-users-request` | module → shell |
//! | `user-updated`, `user-created`, `user-deleted` | shell → modules |
//! | `users-loaded`, `show-notification` | shell → modules |
//!
//! On the wire an event is `{"topic": "<name>", "payload": ...}`.

use crate::model::{User, UserCreate, UserId, UserUpdate};
use serde::{Deserialize, Serialize};
use shell_framework::{BusEvent, EventBus};
use std::fmt::Display;

/// Every event that can travel over the shell bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", content = "payload", rename_all = "kebab-case")]
pub enum ShellEvent {
    UpdateUserRequest { id: UserId, data: UserUpdate },
    CreateUserRequest(UserCreate),
    DeleteUserRequest(UserId),
    FetchUsersRequest,
    /// Carries the partial update that was applied, as requested.
    UserUpdated { id: UserId, data: UserUpdate },
    UserCreated(User),
    UserDeleted { id: UserId },
    UsersLoaded(Vec<User>),
    ShowNotification(Notification),
}

/// Topic of a [`ShellEvent`], one per variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellTopic {
    UpdateUserRequest,
    CreateUserRequest,
    DeleteUserRequest,
    FetchUsersRequest,
    UserUpdated,
    UserCreated,
    UserDeleted,
    UsersLoaded,
    ShowNotification,
}

impl ShellTopic {
    pub fn as_str(self) -> &'static str {
        match self {
            ShellTopic::UpdateUserRequest => "update-user-request",
            ShellTopic::CreateUserRequest => "create-user-request",
            ShellTopic::DeleteUserRequest => "delete-user-request",
            ShellTopic::FetchUsersRequest => "fetch-users-request",
            ShellTopic::UserUpdated => "user-updated",
            ShellTopic::UserCreated => "user-created",
            ShellTopic::UserDeleted => "user-deleted",
            ShellTopic::UsersLoaded => "users-loaded",
            ShellTopic::ShowNotification => "show-notification",
        }
    }
}

impl Display for ShellTopic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BusEvent for ShellEvent {
    type Topic = ShellTopic;

    fn topic(&self) -> ShellTopic {
        match self {
            ShellEvent::UpdateUserRequest { .. } => ShellTopic::UpdateUserRequest,
            ShellEvent::CreateUserRequest(_) => ShellTopic::CreateUserRequest,
            ShellEvent::DeleteUserRequest(_) => ShellTopic::DeleteUserRequest,
            ShellEvent::FetchUsersRequest => ShellTopic::FetchUsersRequest,
            ShellEvent::UserUpdated { .. } => ShellTopic::UserUpdated,
            ShellEvent::UserCreated(_) => ShellTopic::UserCreated,
            ShellEvent::UserDeleted { .. } => ShellTopic::UserDeleted,
            ShellEvent::UsersLoaded(_) => ShellTopic::UsersLoaded,
            ShellEvent::ShowNotification(_) => ShellTopic::ShowNotification,
        }
    }
}

/// The bus specialised to the shell vocabulary.
pub type ShellBus = EventBus<ShellEvent>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    #[default]
    Info,
}

/// A message for the user, rendered by whichever view listens to `show-notification`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }
}

/// Shorthands for the events modules publish most.
#[derive(Clone)]
pub struct EventHelpers {
    bus: ShellBus,
}

impl EventHelpers {
    pub fn new(bus: ShellBus) -> Self {
        Self { bus }
    }

    pub fn request_user_update(&self, id: UserId, data: UserUpdate) -> usize {
        self.bus.publish(ShellEvent::UpdateUserRequest { id, data })
    }

    pub fn request_user_creation(&self, data: UserCreate) -> usize {
        self.bus.publish(ShellEvent::CreateUserRequest(data))
    }

    pub fn request_user_deletion(&self, id: UserId) -> usize {
        self.bus.publish(ShellEvent::DeleteUserRequest(id))
    }

    pub fn request_fetch_users(&self) -> usize {
        self.bus.publish(ShellEvent::FetchUsersRequest)
    }

    pub fn show_notification(&self, message: impl Into<String>, kind: NotificationKind) -> usize {
        self.bus
            .publish(ShellEvent::ShowNotification(Notification::new(message, kind)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_wire_names() {
        let event = ShellEvent::DeleteUserRequest(UserId(2));
        assert_eq!(event.topic().to_string(), "delete-user-request");
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            serde_json::json!({"topic": "delete-user-request", "payload": 2})
        );

        let parsed: ShellEvent = serde_json::from_value(serde_json::json!({
            "topic": "show-notification",
            "payload": {"message": "hi"}
        }))
        .unwrap();
        assert_eq!(
            parsed,
            ShellEvent::ShowNotification(Notification::new("hi", NotificationKind::Info))
        );
        assert_eq!(parsed.topic(), ShellTopic::ShowNotification);
    }

    #[test]
    fn test_helpers_publish_on_their_topic() {
        let bus = ShellBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        for topic in [
            ShellTopic::CreateUserRequest,
            ShellTopic::FetchUsersRequest,
            ShellTopic::ShowNotification,
        ] {
            let seen = Arc::clone(&seen);
            bus.subscribe(topic, move |event: &ShellEvent| {
                seen.lock().unwrap().push(event.clone())
            });
        }

        let helpers = EventHelpers::new(bus.clone());
        let create = UserCreate {
            name: "x".into(),
            email: "x@x".into(),
            role: Role::User,
        };
        assert_eq!(helpers.request_user_creation(create.clone()), 1);
        assert_eq!(helpers.request_fetch_users(), 1);
        assert_eq!(helpers.show_notification("saved", NotificationKind::Success), 1);
        assert_eq!(helpers.request_user_deletion(UserId(1)), 0);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                ShellEvent::CreateUserRequest(create),
                ShellEvent::FetchUsersRequest,
                ShellEvent::ShowNotification(Notification::success("saved")),
            ]
        );
    }
}
