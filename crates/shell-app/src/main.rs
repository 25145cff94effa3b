//! # Shell demo
//!
//! Boots the shell against the mock user backend, walks through the
//! navigation table and a create/delete round over the bus, then shuts down.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=info SHELL_MANIFESTS=http USERSAPP_URL=http://cdn/users cargo run
//! ```

use shell_app::config::ShellConfig;
use shell_app::events::{ShellEvent, ShellTopic};
use shell_app::lifecycle::{setup_tracing, Shell};
use shell_app::model::{Role, UserCreate, UserId};
use shell_app::users::{Latency, MockUserApi};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ShellConfig::from_env();
    let source = Arc::new(MockUserApi::seeded(Latency::REALISTIC));

    let shell = match Shell::boot(&config, source, config.manifests.loader()).await {
        Ok(shell) => shell,
        Err(e) => {
            error!(error = %e, "Failed to boot shell");
            return Err(e.to_string());
        }
    };

    // Print notifications the way a toast component would.
    let (notify_tx, mut notifications) = mpsc::unbounded_channel();
    let bus = shell.context().bus.clone();
    let toast = bus.subscribe(ShellTopic::ShowNotification, move |event: &ShellEvent| {
        if let ShellEvent::ShowNotification(n) = event {
            let _ = notify_tx.send(n.clone());
        }
    });

    for path in ["/", "/users", "/edit-user", "/settings"] {
        match shell.navigate(path).await {
            Ok(view) => info!(path, view = ?view, "Navigated"),
            Err(e) => error!(path, error = %e, "Navigation failed"),
        }
    }

    let helpers = shell.context().helpers.clone();
    async {
        helpers.request_user_creation(UserCreate {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            role: Role::User,
        });
        helpers.request_user_deletion(UserId(2));
        helpers.request_user_deletion(UserId(42));

        for _ in 0..3 {
            if let Some(n) = notifications.recv().await {
                info!(kind = ?n.kind, message = %n.message, "Notification");
            }
        }
    }
    .instrument(tracing::info_span!("user_requests"))
    .await;

    let users = shell.context().store.snapshot();
    info!(count = users.entities.len(), version = users.version, "Final store state");

    bus.unsubscribe(toast);
    drop(helpers);
    drop(bus);
    shell.shutdown().await.map_err(|e| e.to_string())?;

    info!("Application completed successfully");
    Ok(())
}
