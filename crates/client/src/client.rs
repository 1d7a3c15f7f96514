use std::sync::Arc;
use std::time::Duration;

use crate::crypto::Credential;
use crate::error::ApiError;
use crate::graph::ResourceGraph;
use crate::resource::ResourceProxy;
use crate::transport::{ApiClient, ReqwestTransport, SystemClock};

pub const NODES_LINK: &str = "nodes_list";
pub const NETWORKS_LINK: &str = "networks_list";

/// High-level vCider client
///
/// Composes the signed [`ApiClient`] with a [`ResourceGraph`] over the API
/// root. Construction does not touch the network; the root document is
/// fetched on the first navigation call.
#[derive(Debug, Clone)]
pub struct Client {
    api: ApiClient,
    graph: ResourceGraph,
}

impl Client {
    pub fn new(
        base_uri: &str,
        api_id: impl Into<String>,
        api_secret: impl AsRef<[u8]>,
    ) -> Result<Self, ApiError> {
        Self::with_timeout(base_uri, api_id, api_secret, None)
    }

    pub fn with_timeout(
        base_uri: &str,
        api_id: impl Into<String>,
        api_secret: impl AsRef<[u8]>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let credential = Credential::new(api_id, api_secret)?;
        let transport = ReqwestTransport::new(timeout)?;
        let api = ApiClient::with_transport(
            base_uri,
            credential,
            Arc::new(transport),
            Arc::new(SystemClock),
        )?;
        Ok(Self::from_api(api))
    }

    pub fn from_api(api: ApiClient) -> Self {
        let graph = ResourceGraph::new(api.clone());
        Self { api, graph }
    }

    pub fn from_parts(api: ApiClient, graph: ResourceGraph) -> Self {
        Self { api, graph }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn graph(&self) -> &ResourceGraph {
        &self.graph
    }

    pub async fn nodes(&self) -> Result<ResourceProxy, ApiError> {
        self.graph.proxy(NODES_LINK).await
    }

    pub async fn networks(&self) -> Result<ResourceProxy, ApiError> {
        self.graph.proxy(NETWORKS_LINK).await
    }

    /// Current number of nodes and networks
    ///
    /// These counters live in the root document's volatile section, so the
    /// root is re-fetched.
    pub async fn counts(&self) -> Result<(u64, u64), ApiError> {
        let root = self.graph.refresh().await?;
        let count = |path: &str| {
            root.attribute(path)
                .and_then(|v| v.as_u64())
                .ok_or_else(|| {
                    ApiError::Decode(serde::de::Error::custom(format!(
                        "root document has no numeric {}",
                        path
                    )))
                })
        };
        Ok((count("volatile/num_nodes")?, count("volatile/num_nets")?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use http::StatusCode;
    use serde_json::json;

    use crate::testkit::{FixedClock, MockTransport};
    use crate::transport::Method;

    fn client() -> (Client, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let api = ApiClient::with_transport(
            "https://my.vcider.com/api/",
            Credential::new("AID123", "SECRET456").unwrap(),
            transport.clone(),
            Arc::new(FixedClock::new(1_700_000_000)),
        )
        .unwrap();
        (Client::from_api(api), transport)
    }

    fn root() -> serde_json::Value {
        json!({
            "links": {
                "nodes_list": { "uri": "/api/nodes/" },
                "networks_list": { "uri": "/api/networks/" }
            },
            "volatile": { "num_nodes": 4, "num_nets": 2 }
        })
    }

    #[test]
    fn test_new_is_offline() {
        // Unroutable host: construction must not need it
        Client::new("https://vcider.invalid/api", "AID123", "SECRET456").unwrap();
    }

    #[tokio::test]
    async fn test_shortcuts_resolve_through_root() {
        let (client, transport) = client();
        transport.push_json(StatusCode::OK, root());

        let nodes = client.nodes().await.unwrap();
        let networks = client.networks().await.unwrap();

        assert_eq!(nodes.uri(), "/api/nodes/");
        assert!(nodes.link().allows(Method::Post));
        assert_eq!(networks.uri(), "/api/networks/");
        assert_eq!(transport.calls(), 1);
        assert_eq!(transport.last_request().unwrap().url.path(), "/api/");
    }

    #[tokio::test]
    async fn test_counts_refresh_root() {
        let (client, transport) = client();
        transport.push_json(StatusCode::OK, root());
        transport.push_json(
            StatusCode::OK,
            json!({ "links": {}, "volatile": { "num_nodes": 5, "num_nets": 3 } }),
        );

        client.nodes().await.unwrap();
        assert_eq!(client.counts().await.unwrap(), (5, 3));
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn test_counts_missing_fields() {
        let (client, transport) = client();
        transport.push_json(StatusCode::OK, json!({ "links": {} }));
        assert!(matches!(client.counts().await, Err(ApiError::Decode(_))));
    }
}
