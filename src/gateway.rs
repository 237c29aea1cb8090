//! Documentation gateway - the thin layer that hands documents to a transport.
//!
//! The gateway holds the current root document behind an [`ArcSwapOption`], so readers
//! always see one complete document while a rebuild swaps in a new one. A failed
//! rebuild leaves the previous document in place.

use crate::config::DocConfig;
use crate::document_builder::{generate, Document};
use crate::error::Result;
use crate::module_tree::{ModuleId, ModuleTree};
use crate::partition::partition;
use crate::type_resolver::TypeRegistry;
use arc_swap::ArcSwapOption;
use log::{debug, error, info};
use std::sync::{Arc, Mutex};

/// What a request path asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocRequest {
    /// `<mount_path>.json`
    Root,
    /// `<mount_path>/<key>.json`
    Resource(String),
    NotFound,
}

/// A response ready to be written by whatever transport serves documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocResponse {
    pub status: u16,
    pub body: String,
}

impl DocResponse {
    fn json(status: u16, body: String) -> Self {
        Self { status, body }
    }

    fn error(status: u16, message: &str) -> Self {
        let body = serde_json::json!({ "error": message }).to_string();
        Self { status, body }
    }
}

/// Serves the root document and its per-resource partitions
pub struct DocGateway {
    mount_path: String,
    current: ArcSwapOption<Document>,
    last_error: Mutex<Option<String>>,
}

impl DocGateway {
    /// Create a gateway serving `<mount_path>.json` and `<mount_path>/<key>.json`.
    ///
    /// A trailing `/` is ignored. Mounted at `/`, the root document is `/.json`.
    pub fn new(mount_path: &str) -> Self {
        Self {
            mount_path: mount_path.trim_end_matches('/').to_string(),
            current: ArcSwapOption::empty(),
            last_error: Mutex::new(None),
        }
    }

    /// Create a gateway at the configured mount path
    pub fn from_config(config: &DocConfig) -> Self {
        Self::new(&config.mount_path)
    }

    /// Replace the served document in one atomic swap
    pub fn publish(&self, document: Document) {
        info!(
            "Publishing document with {} paths at {}.json",
            document.paths.len(),
            self.mount_path
        );
        self.current.store(Some(Arc::new(document)));
        self.set_last_error(None);
    }

    /// Rebuild from declarations and publish the result.
    ///
    /// On failure nothing is published: the previous document keeps being served and
    /// the error is remembered for [`DocGateway::last_error`].
    pub fn rebuild(
        &self,
        tree: &ModuleTree,
        root: ModuleId,
        registry: &TypeRegistry,
        config: &DocConfig,
    ) -> Result<()> {
        match generate(tree, root, registry, config) {
            Ok(document) => {
                self.publish(document);
                Ok(())
            }
            Err(e) => {
                error!("Documentation rebuild failed, keeping previous document: {}", e);
                self.set_last_error(Some(e.to_string()));
                Err(e)
            }
        }
    }

    /// The currently published document, if any
    pub fn root_document(&self) -> Option<Arc<Document>> {
        self.current.load_full()
    }

    /// The partition of the current document for `key`
    pub fn resource_document(&self, key: &str) -> Option<Document> {
        self.root_document().map(|doc| partition(&doc, key))
    }

    /// Message of the most recent failed rebuild, cleared by a successful publish
    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().ok().and_then(|guard| guard.clone())
    }

    fn set_last_error(&self, message: Option<String>) {
        if let Ok(mut guard) = self.last_error.lock() {
            *guard = message;
        }
    }

    /// Classify a request path relative to the mount path
    pub fn route_request(&self, path: &str) -> DocRequest {
        let Some(rest) = path.strip_prefix(self.mount_path.as_str()) else {
            return DocRequest::NotFound;
        };
        if rest == ".json" || (self.mount_path.is_empty() && rest == "/.json") {
            return DocRequest::Root;
        }
        match rest
            .strip_prefix('/')
            .and_then(|r| r.strip_suffix(".json"))
        {
            Some(key) if !key.is_empty() && !key.contains('/') => {
                DocRequest::Resource(key.to_string())
            }
            _ => DocRequest::NotFound,
        }
    }

    /// Answer a documentation request.
    ///
    /// 200 with the JSON document; 404 for an unrelated path or a resource key with
    /// no routes; 500 when no document has been built successfully yet.
    pub fn serve(&self, path: &str) -> DocResponse {
        let request = self.route_request(path);
        debug!("Documentation request {} -> {:?}", path, request);

        let document = match request {
            DocRequest::NotFound => return DocResponse::error(404, "not found"),
            DocRequest::Root | DocRequest::Resource(_) => match self.root_document() {
                Some(document) => document,
                None => {
                    let message = self
                        .last_error()
                        .unwrap_or_else(|| "documentation has not been built".to_string());
                    return DocResponse::error(500, &message);
                }
            },
        };

        let body = match &request {
            DocRequest::Resource(key) => {
                let part = partition(&document, key);
                if part.paths.is_empty() {
                    return DocResponse::error(404, &format!("no resource '{}'", key));
                }
                serde_json::to_string(&part)
            }
            _ => serde_json::to_string(document.as_ref()),
        };

        match body {
            Ok(body) => DocResponse::json(200, body),
            Err(e) => DocResponse::error(500, &e.to_string()),
        }
    }
}
