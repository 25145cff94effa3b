//! # Module Registry
//!
//! Remote modules are declared up front (name, manifest URL, the entry points the shell expects
//! them to expose) but resolved lazily: nothing is fetched until something asks for the module
//! by name, typically the first navigation to a route that renders it.
//!
//! Each declared module owns an async once-cell. The first [`ModuleRegistry::load`] runs the
//! [`ModuleLoader`]; concurrent callers for the same module wait on that same fetch instead of
//! starting their own, and every later caller gets the cached handle. A failed fetch leaves the
//! cell empty, so the next call tries again.

use crate::error::FrameworkError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

/// A remote module as declared in the shell's configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRegistration {
    pub name: String,
    pub manifest_url: String,
    /// Entry points the shell relies on. Each must appear in the fetched manifest.
    pub exposes: BTreeSet<String>,
}

impl ModuleRegistration {
    pub fn new(
        name: impl Into<String>,
        manifest_url: impl Into<String>,
        exposes: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            manifest_url: manifest_url.into(),
            exposes: exposes.into_iter().map(Into::into).collect(),
        }
    }
}

/// What a remote's build publishes about itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteManifest {
    pub name: String,
    pub exposes: Vec<String>,
}

/// A resolved remote module. Shared by every view that renders it.
#[derive(Debug)]
pub struct RemoteModule {
    pub registration: ModuleRegistration,
    pub manifest: RemoteManifest,
}

impl RemoteModule {
    pub fn name(&self) -> &str {
        &self.registration.name
    }

    pub fn exposes(&self, entry: &str) -> bool {
        self.manifest.exposes.iter().any(|e| e == entry)
    }
}

/// Fetches the manifest of a declared module.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn fetch_manifest(
        &self,
        registration: &ModuleRegistration,
    ) -> Result<RemoteManifest, FrameworkError>;
}

/// Name-keyed, lazily populated cache of remote modules.
pub struct ModuleRegistry {
    registrations: HashMap<String, ModuleRegistration>,
    cells: HashMap<String, Arc<OnceCell<Arc<RemoteModule>>>>,
    loader: Arc<dyn ModuleLoader>,
}

impl ModuleRegistry {
    pub fn new(
        registrations: impl IntoIterator<Item = ModuleRegistration>,
        loader: Arc<dyn ModuleLoader>,
    ) -> Self {
        let registrations: HashMap<String, ModuleRegistration> = registrations
            .into_iter()
            .map(|r| (r.name.clone(), r))
            .collect();
        let cells = registrations
            .keys()
            .map(|name| (name.clone(), Arc::new(OnceCell::new())))
            .collect();
        Self {
            registrations,
            cells,
            loader,
        }
    }

    pub fn registration(&self, name: &str) -> Option<&ModuleRegistration> {
        self.registrations.get(name)
    }

    /// Declared module names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registrations.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.cells.get(name).is_some_and(|cell| cell.initialized())
    }

    /// Resolves a module, fetching its manifest on first use.
    #[instrument(skip(self))]
    pub async fn load(&self, name: &str) -> Result<Arc<RemoteModule>, FrameworkError> {
        let (Some(registration), Some(cell)) = (self.registrations.get(name), self.cells.get(name))
        else {
            warn!(name, "Unknown module");
            return Err(FrameworkError::UnknownModule(name.to_string()));
        };

        let module = cell
            .get_or_try_init(|| async {
                debug!(url = %registration.manifest_url, "Fetching manifest");
                let manifest = self.loader.fetch_manifest(registration).await?;
                validate(registration, &manifest)?;
                info!(name, entries = manifest.exposes.len(), "Module loaded");
                Ok::<_, FrameworkError>(Arc::new(RemoteModule {
                    registration: registration.clone(),
                    manifest,
                }))
            })
            .await
            .inspect_err(|e| warn!(name, error = %e, "Module load failed"))?;

        Ok(Arc::clone(module))
    }
}

fn validate(
    registration: &ModuleRegistration,
    manifest: &RemoteManifest,
) -> Result<(), FrameworkError> {
    if manifest.name != registration.name {
        return Err(FrameworkError::ModuleLoad {
            name: registration.name.clone(),
            reason: format!("manifest describes module {}", manifest.name),
        });
    }
    let missing: Vec<&str> = registration
        .exposes
        .iter()
        .filter(|entry| !manifest.exposes.contains(*entry))
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        return Err(FrameworkError::ModuleLoad {
            name: registration.name.clone(),
            reason: format!("missing exposed entries: {}", missing.join(", ")),
        });
    }
    Ok(())
}
