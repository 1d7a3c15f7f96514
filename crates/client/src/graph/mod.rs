//! Hypermedia navigation
//!
//! The API root is the only URI a client needs to know. It serves a document
//! whose `links` name every top-level resource; [`ResourceGraph`] fetches it on
//! first use, keeps it, and turns link names into [`LinkDescriptor`]s so the
//! server is free to move resources around.
//!
//! The cached copy has no expiry. It stays until [`ResourceGraph::refresh`]
//! swaps in a new one.

mod document;

pub use document::{Document, LinkDescriptor, RootDocument, COLLECTION_SUFFIX};

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ApiError;
use crate::resource::ResourceProxy;
use crate::transport::ApiClient;

/// Lazily fetched, explicitly refreshed view of the root document
///
/// Clones share the cache. The document is held behind an `Arc` that is
/// replaced whole on refresh, so concurrent readers see either the old or the
/// new document, never a mix.
#[derive(Debug, Clone)]
pub struct ResourceGraph {
    client: ApiClient,
    root_path: String,
    cache: Arc<RwLock<Option<Arc<Document>>>>,
}

impl ResourceGraph {
    /// Graph rooted at the client's base URI; nothing is fetched yet
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            root_path: String::new(),
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Graph with the root document already known
    pub fn with_root(client: ApiClient, root: Document) -> Self {
        Self {
            client,
            root_path: String::new(),
            cache: Arc::new(RwLock::new(Some(Arc::new(root)))),
        }
    }

    /// Fetch the root from `path` instead of the base URI itself
    pub fn with_root_path(mut self, path: impl Into<String>) -> Self {
        self.root_path = path.into();
        self
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The cached root document, if it has been fetched
    pub fn cached(&self) -> Option<Arc<Document>> {
        self.cache.read().clone()
    }

    /// The root document, fetched on first call and cached afterwards
    pub async fn root(&self) -> Result<Arc<Document>, ApiError> {
        if let Some(root) = self.cached() {
            return Ok(root);
        }

        let fetched = Arc::new(self.fetch().await?);
        // Another caller may have won the race; keep whichever landed first
        let mut cache = self.cache.write();
        Ok(cache.get_or_insert(fetched).clone())
    }

    /// Fetch the root document again and replace the cached copy
    pub async fn refresh(&self) -> Result<Arc<Document>, ApiError> {
        let fetched = Arc::new(self.fetch().await?);
        *self.cache.write() = Some(fetched.clone());
        Ok(fetched)
    }

    pub async fn resolve(&self, name: &str) -> Result<LinkDescriptor, ApiError> {
        self.root()
            .await?
            .link(name)
            .cloned()
            .ok_or_else(|| ApiError::UnknownLink(name.to_string()))
    }

    /// A handle on the resource behind a root link
    pub async fn proxy(&self, name: &str) -> Result<ResourceProxy, ApiError> {
        let link = self.resolve(name).await?;
        Ok(ResourceProxy::new(self.client.clone(), link))
    }

    async fn fetch(&self) -> Result<Document, ApiError> {
        let response = self.client.get(&self.root_path).await?;
        if !response.is_success() {
            return Err(ApiError::unexpected(
                &self.client.resolve_path(&self.root_path),
                &response,
            ));
        }

        let root = Document::from_slice(response.body())?;
        tracing::debug!(links = root.links().len(), "fetched root document");
        Ok(root)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::Credential;
    use crate::testkit::{FixedClock, MockTransport};
    use crate::transport::Method;
    use http::StatusCode;
    use serde_json::json;

    fn graph() -> (ResourceGraph, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let client = ApiClient::with_transport(
            "https://api.example.com",
            Credential::new("AID123", "SECRET456").unwrap(),
            transport.clone(),
            Arc::new(FixedClock::new(1_700_000_000)),
        )
        .unwrap();
        (ResourceGraph::new(client), transport)
    }

    fn root_json(nodes_uri: &str) -> serde_json::Value {
        json!({
            "links": {
                "nodes_list": { "uri": nodes_uri, "methods": ["GET", "POST"] }
            }
        })
    }

    #[tokio::test]
    async fn test_construction_is_offline() {
        let (graph, transport) = graph();
        assert!(graph.cached().is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_root_is_fetched_once() {
        let (graph, transport) = graph();
        transport.push_json(StatusCode::OK, root_json("/nodes/"));

        let first = graph.root().await.unwrap();
        let second = graph.root().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(transport.calls(), 1);
        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.url.path(), "/");
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        let (graph, transport) = graph();
        transport.push_json(StatusCode::OK, root_json("/nodes/"));

        graph.root().await.unwrap();
        let clone = graph.clone();
        clone.resolve("nodes_list").await.unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_swaps_document() {
        let (graph, transport) = graph();
        transport.push_json(StatusCode::OK, root_json("/nodes/"));
        transport.push_json(StatusCode::OK, root_json("/v2/nodes/"));

        let before = graph.root().await.unwrap();
        let after = graph.refresh().await.unwrap();

        assert_eq!(before.link("nodes_list").unwrap().uri(), "/nodes/");
        assert_eq!(after.link("nodes_list").unwrap().uri(), "/v2/nodes/");
        assert_eq!(
            graph.resolve("nodes_list").await.unwrap().uri(),
            "/v2/nodes/"
        );
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_cache() {
        let (graph, transport) = graph();
        transport.push_json(StatusCode::OK, root_json("/nodes/"));
        transport.push_status(StatusCode::SERVICE_UNAVAILABLE);

        graph.root().await.unwrap();
        assert!(matches!(
            graph.refresh().await,
            Err(ApiError::UnexpectedStatus { .. })
        ));
        assert_eq!(
            graph.resolve("nodes_list").await.unwrap().uri(),
            "/nodes/"
        );
    }

    #[tokio::test]
    async fn test_unknown_link_makes_no_call() {
        let (graph, transport) = graph();
        let graph = ResourceGraph::with_root(
            graph.client().clone(),
            Document::new([LinkDescriptor::by_convention("nodes_list", "/nodes/")]),
        );

        let result = graph.resolve("nonexistent_link").await;
        assert!(matches!(result, Err(ApiError::UnknownLink(name)) if name == "nonexistent_link"));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_root_document() {
        let (graph, transport) = graph();
        transport.push_body(StatusCode::OK, "<html>not json</html>");
        assert!(matches!(graph.root().await, Err(ApiError::Decode(_))));
        assert!(graph.cached().is_none());
    }

    #[tokio::test]
    async fn test_custom_root_path() {
        let (graph, transport) = graph();
        let graph = graph.with_root_path("/api/root");
        transport.push_json(StatusCode::OK, root_json("/api/nodes/"));

        graph.root().await.unwrap();
        assert_eq!(transport.last_request().unwrap().url.path(), "/api/root");
    }
}
