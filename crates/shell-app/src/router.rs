//! Static navigation table.

use serde::{Deserialize, Serialize};
use shell_framework::ModuleRegistry;

/// Views the shell renders itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalView {
    Home,
}

/// What a route renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    Local(LocalView),
    /// A component exposed by a remote module.
    Remote {
        app_name: String,
        component_key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub target: RouteTarget,
}

impl Route {
    pub fn local(path: &str, name: &str, view: LocalView) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            target: RouteTarget::Local(view),
        }
    }

    pub fn remote(path: &str, name: &str, app_name: &str, component_key: &str) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            target: RouteTarget::Remote {
                app_name: app_name.to_string(),
                component_key: component_key.to_string(),
            },
        }
    }
}

/// Props handed to a remote view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteProps {
    pub app_name: String,
    pub component_key: String,
}

/// Why a route cannot be served by the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("route {path} names unregistered module {app_name}")]
    UnregisteredModule { path: String, app_name: String },
    #[error("route {path} needs {component_key}, which {app_name} does not declare")]
    UndeclaredComponent {
        path: String,
        app_name: String,
        component_key: String,
    },
}

#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Exact-path lookup.
    pub fn find(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Checks every remote route against the registry's declarations.
    ///
    /// Only the configuration is consulted; no manifest is fetched.
    pub fn resolve(&self, registry: &ModuleRegistry) -> Result<(), RouteError> {
        for route in &self.routes {
            let RouteTarget::Remote {
                app_name,
                component_key,
            } = &route.target
            else {
                continue;
            };
            let registration =
                registry
                    .registration(app_name)
                    .ok_or_else(|| RouteError::UnregisteredModule {
                        path: route.path.clone(),
                        app_name: app_name.clone(),
                    })?;
            if !registration.exposes.contains(component_key) {
                return Err(RouteError::UndeclaredComponent {
                    path: route.path.clone(),
                    app_name: app_name.clone(),
                    component_key: component_key.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Router {
    /// `/` is the local home page; `/users` and `/edit-user` come from remotes.
    fn default() -> Self {
        Self::new(vec![
            Route::local("/", "Home", LocalView::Home),
            Route::remote("/users", "Users", "usersApp", "users"),
            Route::remote("/edit-user", "EditUser", "editUserApp", "edit-user"),
        ])
    }
}
