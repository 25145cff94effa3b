use shell_app::config::ShellConfig;
use shell_app::events::{NotificationKind, ShellEvent, ShellTopic};
use shell_app::lifecycle::{ActiveView, BootError, Shell, ShellError};
use shell_app::model::{Role, User, UserCreate, UserId, UserUpdate};
use shell_app::router::{LocalView, Route, Router};
use shell_app::users::{Latency, MockUserApi};
use shell_framework::mock::MockDataSource;
use shell_framework::{ActionKind, FrameworkError, RemoteManifest, StaticLoader};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

// --- Helpers ---

fn manifest(name: &str, entry: &str) -> RemoteManifest {
    RemoteManifest {
        name: name.to_string(),
        exposes: vec![entry.to_string()],
    }
}

fn both_remotes() -> StaticLoader {
    StaticLoader::new()
        .with_manifest(manifest("usersApp", "users"))
        .with_manifest(manifest("editUserApp", "edit-user"))
}

fn user(id: u32) -> User {
    User::new(id, format!("test{id}"), format!("test{id}@example.com"), Role::User)
}

async fn boot(users: Vec<User>) -> Shell {
    Shell::boot(
        &ShellConfig::default(),
        Arc::new(MockUserApi::new(users, Latency::NONE)),
        Arc::new(both_remotes()),
    )
    .await
    .unwrap()
}

/// Forwards every event on `topic` into a channel.
fn collect(shell: &Shell, topic: ShellTopic) -> UnboundedReceiver<ShellEvent> {
    let (tx, rx) = mpsc::unbounded_channel();
    shell.context().bus.subscribe(topic, move |event: &ShellEvent| {
        let _ = tx.send(event.clone());
    });
    rx
}

async fn next(rx: &mut UnboundedReceiver<ShellEvent>) -> ShellEvent {
    tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("bus closed")
}

async fn shutdown(shell: Shell) {
    tokio::time::timeout(Duration::from_secs(1), shell.shutdown())
        .await
        .expect("shutdown hung")
        .unwrap();
}

// --- Boot ---

#[tokio::test]
async fn test_boot_loads_users_without_fetching_remotes() {
    let loader = Arc::new(both_remotes());
    let shell = Shell::boot(
        &ShellConfig::default(),
        Arc::new(MockUserApi::seeded(Latency::NONE)),
        loader.clone(),
    )
    .await
    .unwrap();

    let state = shell.context().store.snapshot();
    assert_eq!(state.entities.len(), 5);
    assert!(!state.is_loading());
    assert_eq!(state.error(ActionKind::Fetch), None);
    assert_eq!(loader.fetch_count(), 0);
    assert!(!shell.registry().is_loaded("usersApp"));

    for topic in [
        ShellTopic::UpdateUserRequest,
        ShellTopic::CreateUserRequest,
        ShellTopic::DeleteUserRequest,
        ShellTopic::FetchUsersRequest,
    ] {
        assert_eq!(shell.context().bus.subscriber_count(topic), 1);
    }

    shutdown(shell).await;
}

#[tokio::test]
async fn test_boot_fails_when_initial_fetch_fails() {
    let mock = Arc::new(MockDataSource::<User>::new());
    mock.expect_fetch_all().return_err("backend down");

    let result = Shell::boot(&ShellConfig::default(), mock.clone(), Arc::new(both_remotes())).await;

    match result {
        Err(BootError::InitialFetch(e)) => assert_eq!(e.to_string(), "backend down"),
        Err(other) => panic!("unexpected boot error: {other}"),
        Ok(_) => panic!("boot should have failed"),
    }
    mock.verify();
}

#[tokio::test]
async fn test_boot_fails_on_unregistered_route() {
    let router = Router::new(vec![
        Route::local("/", "Home", LocalView::Home),
        Route::remote("/admin", "Admin", "adminApp", "admin"),
    ]);

    let result = Shell::boot_with_router(
        &ShellConfig::default(),
        router,
        Arc::new(MockUserApi::seeded(Latency::NONE)),
        Arc::new(both_remotes()),
    )
    .await;

    assert!(matches!(result, Err(BootError::RouteResolution(_))));
}

// --- Request / outcome flows ---

#[tokio::test]
async fn test_create_request_assigns_next_id() {
    let shell = boot(vec![user(1), user(2)]).await;
    let mut created = collect(&shell, ShellTopic::UserCreated);
    let mut notifications = collect(&shell, ShellTopic::ShowNotification);

    shell.context().helpers.request_user_creation(UserCreate {
        name: "x".into(),
        email: "x@x".into(),
        role: Role::User,
    });

    let ShellEvent::UserCreated(new_user) = next(&mut created).await else {
        panic!("expected user-created");
    };
    assert_eq!(new_user, User::new(3, "x", "x@x", Role::User));
    assert_eq!(shell.context().store.snapshot().entities.len(), 3);

    let ShellEvent::ShowNotification(n) = next(&mut notifications).await else {
        panic!("expected show-notification");
    };
    assert_eq!(n.kind, NotificationKind::Success);
    assert_eq!(n.message, "User created successfully");

    shutdown(shell).await;
}

#[tokio::test]
async fn test_delete_request_clears_selection_and_reports_missing_user() {
    let shell = boot(vec![user(1), user(2)]).await;
    let store = shell.context().store.clone();
    store.set_selected(Some(user(2))).await.unwrap();

    let mut deleted = collect(&shell, ShellTopic::UserDeleted);
    let mut notifications = collect(&shell, ShellTopic::ShowNotification);

    shell.context().helpers.request_user_deletion(UserId(2));
    assert_eq!(
        next(&mut deleted).await,
        ShellEvent::UserDeleted { id: UserId(2) }
    );
    let state = store.snapshot();
    assert!(state.selected.is_none());
    assert_eq!(state.entities, vec![user(1)]);

    let ShellEvent::ShowNotification(n) = next(&mut notifications).await else {
        panic!("expected show-notification");
    };
    assert_eq!(n.message, "User deleted successfully");

    shell.context().helpers.request_user_deletion(UserId(2));
    let ShellEvent::ShowNotification(n) = next(&mut notifications).await else {
        panic!("expected show-notification");
    };
    assert_eq!(n.kind, NotificationKind::Error);
    assert_eq!(n.message, "User not found");

    let after = store.snapshot();
    assert_eq!(after.entities, vec![user(1)]);
    assert_eq!(after.error(ActionKind::Delete), Some("User not found"));
    assert!(!after.loading(ActionKind::Delete));
    assert!(deleted.try_recv().is_err());

    drop(store);
    shutdown(shell).await;
}

#[tokio::test]
async fn test_update_request_refreshes_selected_user() {
    let shell = boot(vec![user(1), user(2)]).await;
    let store = shell.context().store.clone();
    store.set_selected(Some(user(1))).await.unwrap();
    let mut updated = collect(&shell, ShellTopic::UserUpdated);

    let change = UserUpdate {
        role: Some(Role::Admin),
        ..Default::default()
    };
    shell
        .context()
        .helpers
        .request_user_update(UserId(1), change.clone());

    // The event echoes the requested change; the store holds the merged record.
    assert_eq!(
        next(&mut updated).await,
        ShellEvent::UserUpdated {
            id: UserId(1),
            data: change,
        }
    );
    let expected = User::new(1, "test1", "test1@example.com", Role::Admin);
    let state = store.snapshot();
    assert_eq!(state.entities[0], expected);
    assert_eq!(state.selected.as_ref(), Some(&expected));

    drop(store);
    shutdown(shell).await;
}

#[tokio::test]
async fn test_fetch_request_broadcasts_users() {
    let shell = boot(vec![user(1), user(2)]).await;
    let mut loaded = collect(&shell, ShellTopic::UsersLoaded);

    shell.context().helpers.request_fetch_users();

    assert_eq!(
        next(&mut loaded).await,
        ShellEvent::UsersLoaded(vec![user(1), user(2)])
    );

    shutdown(shell).await;
}

#[tokio::test]
async fn test_failed_fetch_request_becomes_error_notification() {
    let mock = Arc::new(MockDataSource::<User>::new());
    mock.expect_fetch_all().return_ok(vec![user(1)]);
    mock.expect_fetch_all().return_err("backend down");

    let shell = Shell::boot(&ShellConfig::default(), mock.clone(), Arc::new(both_remotes()))
        .await
        .unwrap();
    let mut loaded = collect(&shell, ShellTopic::UsersLoaded);
    let mut notifications = collect(&shell, ShellTopic::ShowNotification);

    shell.context().helpers.request_fetch_users();

    let ShellEvent::ShowNotification(n) = next(&mut notifications).await else {
        panic!("expected show-notification");
    };
    assert_eq!(n.kind, NotificationKind::Error);
    assert_eq!(n.message, "backend down");
    assert!(loaded.try_recv().is_err());

    let state = shell.context().store.snapshot();
    assert_eq!(state.entities, vec![user(1)]);
    assert_eq!(state.error(ActionKind::Fetch), Some("backend down"));
    assert!(!state.loading(ActionKind::Fetch));

    mock.verify();
    shutdown(shell).await;
}

// --- Navigation ---

#[tokio::test]
async fn test_navigation_loads_each_remote_once() {
    let loader = Arc::new(both_remotes().with_latency(Duration::from_millis(20)));
    let shell = Shell::boot(
        &ShellConfig::default(),
        Arc::new(MockUserApi::seeded(Latency::NONE)),
        loader.clone(),
    )
    .await
    .unwrap();

    let home = shell.navigate("/").await.unwrap();
    assert!(matches!(
        home,
        ActiveView::Local {
            view: LocalView::Home,
            ..
        }
    ));
    assert_eq!(loader.fetch_count(), 0);
    drop(home);

    let (first, second) = tokio::join!(shell.navigate("/users"), shell.navigate("/users"));
    let (first, second) = (first.unwrap(), second.unwrap());
    assert_eq!(loader.fetch_count(), 1);
    let ActiveView::Remote { module, props, .. } = &first else {
        panic!("expected a remote view");
    };
    assert_eq!(module.name(), "usersApp");
    assert_eq!(props.component_key, "users");
    assert_eq!(second.context().store.snapshot().entities.len(), 5);
    drop((first, second));

    shell.navigate("/users").await.unwrap();
    assert_eq!(loader.fetch_count(), 1);
    assert!(shell.registry().is_loaded("usersApp"));
    assert!(!shell.registry().is_loaded("editUserApp"));

    shutdown(shell).await;
}

#[tokio::test]
async fn test_missing_manifest_surfaces_on_navigation_and_retries() {
    let loader = Arc::new(StaticLoader::new().with_manifest(manifest("usersApp", "users")));
    let shell = Shell::boot(
        &ShellConfig::default(),
        Arc::new(MockUserApi::seeded(Latency::NONE)),
        loader.clone(),
    )
    .await
    .unwrap();

    let err = shell.navigate("/edit-user").await.unwrap_err();
    assert!(matches!(
        err,
        ShellError::Framework(FrameworkError::ModuleLoad { ref name, .. }) if name == "editUserApp"
    ));

    loader.insert(manifest("editUserApp", "edit-user"));
    let view = shell.navigate("/edit-user").await.unwrap();
    assert!(matches!(view, ActiveView::Remote { .. }));
    assert_eq!(loader.fetch_count(), 2);
    drop(view);

    shutdown(shell).await;
}

#[tokio::test]
async fn test_unknown_path() {
    let shell = boot(vec![user(1)]).await;

    let err = shell.navigate("/settings").await.unwrap_err();
    assert!(matches!(err, ShellError::RouteNotFound(ref path) if path == "/settings"));

    shutdown(shell).await;
}
