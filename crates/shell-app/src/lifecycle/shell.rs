use super::error::{BootError, ShellError};
use crate::config::ShellConfig;
use crate::context::ShellContext;
use crate::events::{EventHelpers, Notification, ShellBus, ShellEvent, ShellTopic};
use crate::i18n::Translator;
use crate::model::User;
use crate::router::{LocalView, RemoteProps, RouteTarget, Router};
use crate::users::{self, UserActions};
use shell_framework::{
    DataSource, FrameworkError, ModuleLoader, ModuleRegistry, RemoteModule, SubscriptionId,
};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, OnceLock};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{error, info, info_span, instrument, warn, Instrument};

/// The composing application.
///
/// `Shell` owns the user store task, the event bus listeners that turn module requests into
/// actions, and the registry of remote modules.
///
/// # Example
///
/// ```ignore
/// let shell = Shell::boot(&ShellConfig::from_env(), source, loader).await?;
///
/// let view = shell.navigate("/users").await?;
/// view.context().helpers.request_fetch_users();
/// drop(view);
///
/// shell.shutdown().await?;
/// ```
pub struct Shell {
    context: ShellContext,
    router: Router,
    registry: Arc<ModuleRegistry>,
    listeners: Vec<SubscriptionId>,
    store_task: JoinHandle<()>,
}

/// What a successful navigation activated. Each view carries its own context clone.
pub enum ActiveView {
    Local {
        view: LocalView,
        context: ShellContext,
    },
    Remote {
        module: Arc<RemoteModule>,
        props: RemoteProps,
        context: ShellContext,
    },
}

impl ActiveView {
    pub fn context(&self) -> &ShellContext {
        match self {
            ActiveView::Local { context, .. } | ActiveView::Remote { context, .. } => context,
        }
    }
}

impl fmt::Debug for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveView::Local { view, .. } => f
                .debug_struct("Local")
                .field("view", view)
                .finish_non_exhaustive(),
            ActiveView::Remote { module, props, .. } => f
                .debug_struct("Remote")
                .field("module", &module.name())
                .field("props", props)
                .finish_non_exhaustive(),
        }
    }
}

impl Shell {
    /// Boots the shell with the default navigation table.
    pub async fn boot(
        config: &ShellConfig,
        source: Arc<dyn DataSource<User>>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Result<Self, BootError> {
        Self::boot_with_router(config, Router::default(), source, loader).await
    }

    /// Runs the boot sequence:
    ///
    /// 1. store and action layer
    /// 2. event bus
    /// 3. request listeners
    /// 4. translator
    /// 5. initial fetch
    /// 6. navigation table checked against the registry
    /// 7. activation
    ///
    /// A failing step tears down what was started and returns the error.
    #[instrument(name = "boot", skip_all)]
    pub async fn boot_with_router(
        config: &ShellConfig,
        router: Router,
        source: Arc<dyn DataSource<User>>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Result<Self, BootError> {
        info!("Starting shell");

        let (store_actor, actions) = users::new(config.store_buffer, source);
        let store_task = tokio::spawn(store_actor.run());
        info!("Store created");

        let bus = ShellBus::new();
        let helpers = EventHelpers::new(bus.clone());
        info!("Event bus created");

        let i18n_slot = Arc::new(OnceLock::new());
        let listeners = Listeners {
            actions: actions.clone(),
            bus: bus.clone(),
            i18n: Arc::clone(&i18n_slot),
            runtime: Handle::current(),
        }
        .register();
        info!(count = listeners.len(), "Request listeners registered");

        let i18n = Arc::new(Translator::default());
        i18n_slot.get_or_init(|| Arc::clone(&i18n));
        info!(locale = i18n.locale(), "Translator created");

        let registry = Arc::new(ModuleRegistry::new(config.registrations(), loader));
        let shell = Self {
            context: ShellContext {
                store: actions.store().clone(),
                actions,
                bus,
                helpers,
                i18n,
            },
            router,
            registry,
            listeners,
            store_task,
        };

        let fetched = shell.context.actions.fetch_all().await;
        if let Err(e) = fetched {
            return Err(shell.abort(BootError::InitialFetch(e)).await);
        }
        info!("Initial data loaded");

        let resolved = shell.router.resolve(&shell.registry);
        if let Err(e) = resolved {
            return Err(shell.abort(e.into()).await);
        }
        info!(modules = ?shell.registry.names(), "Routes resolved");

        info!("Shell activated");
        Ok(shell)
    }

    pub fn context(&self) -> &ShellContext {
        &self.context
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Activates the view behind `path`, loading its remote module on first use.
    #[instrument(skip(self))]
    pub async fn navigate(&self, path: &str) -> Result<ActiveView, ShellError> {
        let route = self
            .router
            .find(path)
            .ok_or_else(|| ShellError::RouteNotFound(path.to_string()))?;

        match &route.target {
            RouteTarget::Local(view) => {
                info!(view = ?view, "Local view activated");
                Ok(ActiveView::Local {
                    view: *view,
                    context: self.context.clone(),
                })
            }
            RouteTarget::Remote {
                app_name,
                component_key,
            } => {
                let module = self.registry.load(app_name).await?;
                if !module.exposes(component_key) {
                    return Err(ShellError::ComponentMissing {
                        app_name: app_name.clone(),
                        component_key: component_key.clone(),
                    });
                }
                info!(%app_name, %component_key, "Remote view activated");
                Ok(ActiveView::Remote {
                    module,
                    props: RemoteProps {
                        app_name: app_name.clone(),
                        component_key: component_key.clone(),
                    },
                    context: self.context.clone(),
                })
            }
        }
    }

    /// Stops the shell.
    ///
    /// Removes the bus listeners, drops the shell's store clients and waits for the store task.
    /// Views still holding a context keep the store alive, so drop them first.
    pub async fn shutdown(self) -> Result<(), ShellError> {
        info!("Shutting down shell...");
        self.teardown().await?;
        info!("Shell shutdown complete.");
        Ok(())
    }

    async fn abort(self, cause: BootError) -> BootError {
        error!(error = %cause, "Boot failed");
        if let Err(e) = self.teardown().await {
            warn!(error = %e, "Teardown after failed boot");
        }
        cause
    }

    async fn teardown(self) -> Result<(), ShellError> {
        let Shell {
            context,
            router: _,
            registry,
            listeners,
            store_task,
        } = self;

        // Listeners hold a bus clone, so the table must be emptied by hand.
        for id in listeners {
            context.bus.unsubscribe(id);
        }
        drop(context);
        drop(registry);

        store_task.await.map_err(|e| {
            error!("Store task failed: {:?}", e);
            ShellError::TaskFailed(e.to_string())
        })
    }
}

/// Bus listeners turning module requests into actions and broadcasting the outcome.
#[derive(Clone)]
struct Listeners {
    actions: UserActions,
    bus: ShellBus,
    /// Filled once the translator exists; messages fall back to their key until then.
    i18n: Arc<OnceLock<Arc<Translator>>>,
    runtime: Handle,
}

impl Listeners {
    fn register(self) -> Vec<SubscriptionId> {
        vec![
            self.listen(ShellTopic::UpdateUserRequest, |this, event| async move {
                let ShellEvent::UpdateUserRequest { id, data } = event else {
                    return;
                };
                match this.actions.update(id, data.clone()).await {
                    Ok(_) => {
                        this.bus.publish(ShellEvent::UserUpdated { id, data });
                        this.notify_success("messages.userUpdated");
                    }
                    Err(e) => this.notify_failure(e),
                }
            }),
            self.listen(ShellTopic::CreateUserRequest, |this, event| async move {
                let ShellEvent::CreateUserRequest(data) = event else {
                    return;
                };
                match this.actions.create(data).await {
                    Ok(user) => {
                        this.bus.publish(ShellEvent::UserCreated(user));
                        this.notify_success("messages.userCreated");
                    }
                    Err(e) => this.notify_failure(e),
                }
            }),
            self.listen(ShellTopic::DeleteUserRequest, |this, event| async move {
                let ShellEvent::DeleteUserRequest(id) = event else {
                    return;
                };
                match this.actions.delete(id).await {
                    Ok(_) => {
                        this.bus.publish(ShellEvent::UserDeleted { id });
                        this.notify_success("messages.userDeleted");
                    }
                    Err(e) => this.notify_failure(e),
                }
            }),
            self.listen(ShellTopic::FetchUsersRequest, |this, _event| async move {
                match this.actions.fetch_all().await {
                    Ok(_) => {
                        let users = this.actions.store().snapshot().entities.clone();
                        this.bus.publish(ShellEvent::UsersLoaded(users));
                    }
                    Err(e) => this.notify_failure(e),
                }
            }),
        ]
    }

    /// Subscribes `handle` to `topic`; every event runs it as its own task.
    fn listen<F, Fut>(&self, topic: ShellTopic, handle: F) -> SubscriptionId
    where
        F: Fn(Listeners, ShellEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let this = self.clone();
        self.bus.subscribe(topic, move |event: &ShellEvent| {
            let task = handle(this.clone(), event.clone());
            this.runtime
                .spawn(task.instrument(info_span!("listener", %topic)));
        })
    }

    fn translate(&self, key: &str) -> String {
        self.i18n
            .get()
            .map_or_else(|| key.to_string(), |i18n| i18n.t(key))
    }

    fn notify_success(&self, key: &str) {
        self.bus.publish(ShellEvent::ShowNotification(Notification::success(
            self.translate(key),
        )));
    }

    fn notify_failure(&self, error: FrameworkError) {
        warn!(error = %error, "Request failed");
        self.bus
            .publish(ShellEvent::ShowNotification(Notification::error(error.to_string())));
    }
}
