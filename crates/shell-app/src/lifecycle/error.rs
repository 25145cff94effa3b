use crate::router::RouteError;
use shell_framework::FrameworkError;
use thiserror::Error;

/// A boot step failed. Nothing was activated.
#[derive(Debug, Error)]
pub enum BootError {
    #[error("initial user fetch failed: {0}")]
    InitialFetch(#[source] FrameworkError),
    #[error("navigation table does not match the registered modules: {0}")]
    RouteResolution(#[from] RouteError),
}

/// Errors of a running shell.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("no route for {0}")]
    RouteNotFound(String),
    #[error("module {app_name} does not expose {component_key}")]
    ComponentMissing {
        app_name: String,
        component_key: String,
    },
    #[error(transparent)]
    Framework(#[from] FrameworkError),
    #[error("store task failed: {0}")]
    TaskFailed(String),
}
