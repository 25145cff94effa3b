//! Where the shell finds its remote modules.

use shell_framework::{
    HttpManifestLoader, ModuleLoader, ModuleRegistration, RemoteManifest, StaticLoader,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// File every remote serves its entry point from.
pub const REMOTE_ENTRY: &str = "remoteEntry.js";

/// A remote the shell knows about before start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDefinition {
    pub name: &'static str,
    pub default_port: u16,
    pub exposes: &'static [&'static str],
}

/// The two remotes the shell composes.
pub const REMOTES: &[RemoteDefinition] = &[
    RemoteDefinition {
        name: "usersApp",
        default_port: 3001,
        exposes: &["users"],
    },
    RemoteDefinition {
        name: "editUserApp",
        default_port: 3002,
        exposes: &["edit-user"],
    },
];

/// Where manifests come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ManifestSource {
    /// Built-in manifests matching [`REMOTES`]; nothing is fetched.
    #[default]
    Static,
    /// GET each remote's URL.
    Http,
}

/// Resolved remote locations, keyed by module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub remotes: BTreeMap<String, String>,
    /// `SHELL_MANIFESTS=http` switches to [`ManifestSource::Http`].
    pub manifests: ManifestSource,
    /// Capacity of the store actor's request channel.
    pub store_buffer: usize,
}

impl ShellConfig {
    /// Reads `<NAME>_URL` overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves every remote through `lookup`.
    ///
    /// `USERSAPP_URL=https://cdn/users` yields `https://cdn/users/remoteEntry.js`; without an
    /// override the remote is expected on `http://localhost:<default_port>`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let remotes = REMOTES
            .iter()
            .map(|remote| {
                let key = format!("{}_URL", remote.name.to_uppercase());
                let url = match lookup(&key) {
                    Some(base) if !base.is_empty() => format!("{base}/{REMOTE_ENTRY}"),
                    _ => format!("http://localhost:{}/{REMOTE_ENTRY}", remote.default_port),
                };
                (remote.name.to_string(), url)
            })
            .collect();
        let manifests = match lookup("SHELL_MANIFESTS").as_deref() {
            Some("http") => ManifestSource::Http,
            _ => ManifestSource::Static,
        };
        Self {
            remotes,
            manifests,
            store_buffer: 32,
        }
    }

    pub fn remote_url(&self, name: &str) -> Option<&str> {
        self.remotes.get(name).map(String::as_str)
    }

    /// Registrations for the module registry.
    pub fn registrations(&self) -> Vec<ModuleRegistration> {
        REMOTES
            .iter()
            .filter_map(|remote| {
                let url = self.remote_url(remote.name)?;
                Some(ModuleRegistration::new(
                    remote.name,
                    url,
                    remote.exposes.iter().copied(),
                ))
            })
            .collect()
    }
}

impl ManifestSource {
    pub fn loader(self) -> Arc<dyn ModuleLoader> {
        match self {
            ManifestSource::Http => Arc::new(HttpManifestLoader::default()),
            ManifestSource::Static => Arc::new(REMOTES.iter().fold(
                StaticLoader::new(),
                |loader, remote| {
                    loader.with_manifest(RemoteManifest {
                        name: remote.name.to_string(),
                        exposes: remote.exposes.iter().map(|e| e.to_string()).collect(),
                    })
                },
            )),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_point_at_localhost() {
        let config = ShellConfig::default();
        assert_eq!(
            config.remote_url("usersApp"),
            Some("http://localhost:3001/remoteEntry.js")
        );
        assert_eq!(
            config.remote_url("editUserApp"),
            Some("http://localhost:3002/remoteEntry.js")
        );
        assert_eq!(config.manifests, ManifestSource::Static);
    }

    #[test]
    fn test_env_override() {
        let config = ShellConfig::from_lookup(|key| match key {
            "USERSAPP_URL" => Some("https://cdn.example.com/users".to_string()),
            "SHELL_MANIFESTS" => Some("http".to_string()),
            _ => None,
        });
        assert_eq!(
            config.remote_url("usersApp"),
            Some("https://cdn.example.com/users/remoteEntry.js")
        );
        assert_eq!(
            config.remote_url("editUserApp"),
            Some("http://localhost:3002/remoteEntry.js")
        );
        assert_eq!(config.manifests, ManifestSource::Http);
    }

    #[tokio::test]
    async fn test_static_manifests_match_registrations() {
        let config = ShellConfig::default();
        let loader = config.manifests.loader();
        for registration in config.registrations() {
            let manifest = loader.fetch_manifest(&registration).await.unwrap();
            assert_eq!(manifest.name, registration.name);
            assert!(registration
                .exposes
                .iter()
                .all(|entry| manifest.exposes.contains(entry)));
        }
    }

    #[test]
    fn test_registrations_declare_component_keys() {
        let registrations = ShellConfig::default().registrations();
        assert_eq!(registrations.len(), 2);
        let edit = registrations
            .iter()
            .find(|r| r.name == "editUserApp")
            .unwrap();
        assert!(edit.exposes.contains("edit-user"));
        assert_eq!(edit.manifest_url, "http://localhost:3002/remoteEntry.js");
    }
}
