//! # Manifest Loaders
//!
//! [`ModuleLoader`] implementations: one that fetches manifests over HTTP, and one that serves
//! them from memory for demos and tests.

use crate::error::FrameworkError;
use crate::registry::{ModuleLoader, ModuleRegistration, RemoteManifest};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tracing::{debug, instrument};

/// Fetches each module's JSON manifest from its `manifest_url`.
#[derive(Clone, Default)]
pub struct HttpManifestLoader {
    client: reqwest::Client,
}

impl HttpManifestLoader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ModuleLoader for HttpManifestLoader {
    #[instrument(skip(self, registration), fields(name = %registration.name))]
    async fn fetch_manifest(
        &self,
        registration: &ModuleRegistration,
    ) -> Result<RemoteManifest, FrameworkError> {
        let failed = |e: reqwest::Error| FrameworkError::ModuleLoad {
            name: registration.name.clone(),
            reason: e.to_string(),
        };
        debug!(url = %registration.manifest_url, "GET manifest");
        self.client
            .get(&registration.manifest_url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(failed)?
            .json::<RemoteManifest>()
            .await
            .map_err(failed)
    }
}

/// Serves manifests from memory and counts how often it was asked.
#[derive(Default)]
pub struct StaticLoader {
    manifests: RwLock<HashMap<String, RemoteManifest>>,
    latency: Duration,
    fetches: AtomicUsize,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every fetch, to make concurrent loads overlap.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_manifest(self, manifest: RemoteManifest) -> Self {
        self.insert(manifest);
        self
    }

    pub fn insert(&self, manifest: RemoteManifest) {
        self.manifests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(manifest.name.clone(), manifest);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModuleLoader for StaticLoader {
    async fn fetch_manifest(
        &self,
        registration: &ModuleRegistration,
    ) -> Result<RemoteManifest, FrameworkError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.manifests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&registration.name)
            .cloned()
            .ok_or_else(|| FrameworkError::ModuleLoad {
                name: registration.name.clone(),
                reason: format!("{} is unreachable", registration.manifest_url),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers a single HTTP request with `status` and `body`, returning the manifest URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await.unwrap();
            let response = format!(
                "HTTP/1.1 {status}\r\n\
                 Content-Type: application/json\r\n\
                 Content-Length: {}\r\n\
                 Connection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}/remoteEntry.js")
    }

    fn direct() -> HttpManifestLoader {
        HttpManifestLoader::new(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn test_http_loader_parses_manifest() {
        let url = serve_once("200 OK", r#"{"name":"usersApp","exposes":["users"]}"#).await;
        let registration = ModuleRegistration::new("usersApp", url, ["users"]);

        let manifest = direct()
            .fetch_manifest(&registration)
            .await
            .unwrap();
        assert_eq!(
            manifest,
            RemoteManifest {
                name: "usersApp".into(),
                exposes: vec!["users".into()],
            }
        );
    }

    #[tokio::test]
    async fn test_http_loader_rejects_error_status() {
        let url = serve_once("404 Not Found", "{}").await;
        let registration = ModuleRegistration::new("editUserApp", url, ["edit-user"]);

        let err = direct()
            .fetch_manifest(&registration)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FrameworkError::ModuleLoad { ref name, .. } if name == "editUserApp"
        ));
    }

    #[tokio::test]
    async fn test_static_loader_counts_misses() {
        let loader = StaticLoader::new();
        let registration =
            ModuleRegistration::new("usersApp", "http://localhost:3001/remoteEntry.js", ["users"]);

        let err = loader.fetch_manifest(&registration).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load module usersApp: http://localhost:3001/remoteEntry.js is unreachable"
        );
        assert_eq!(loader.fetch_count(), 1);
    }
}
