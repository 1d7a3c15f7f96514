//! Resource handles built from links
//!
//! A [`ResourceProxy`] is bound to one [`LinkDescriptor`] and turns
//! list/get/create/update/delete into signed requests against the link's URI.
//! Every operation is checked against the verbs the link advertises before
//! anything is sent.

mod entry;

pub use entry::ListEntry;

use bytes::Bytes;

use crate::error::ApiError;
use crate::graph::{Document, LinkDescriptor};
use crate::transport::{ApiClient, Method, Response};

/// Query flag asking the server to inline each list entry's details
pub const RELATED_QUERY: &str = "_related";

#[derive(Debug, Clone)]
pub struct ResourceProxy {
    client: ApiClient,
    link: LinkDescriptor,
}

impl ResourceProxy {
    pub fn new(client: ApiClient, link: LinkDescriptor) -> Self {
        Self { client, link }
    }

    pub fn link(&self) -> &LinkDescriptor {
        &self.link
    }

    pub fn uri(&self) -> &str {
        self.link.uri()
    }

    /// `<collection-uri>/<id>/`
    ///
    /// Any query string on the collection URI is dropped.
    pub fn item_uri(&self, id: &str) -> Result<String, ApiError> {
        if id.is_empty() || id.contains(['/', '?', '#']) {
            return Err(ApiError::InvalidResourceId(id.to_string()));
        }
        let base = self.link.uri().split('?').next().unwrap_or_default();
        Ok(format!("{}/{}/", base.trim_end_matches('/'), id))
    }

    /// GET the link URI itself
    pub async fn list(&self) -> Result<Response, ApiError> {
        self.check(Method::Get)?;
        self.client.get(self.link.uri()).await
    }

    /// GET the collection and decode its entries
    ///
    /// With `related`, the server includes each entry's details in
    /// [`ListEntry::related`].
    pub async fn entries(&self, related: bool) -> Result<Vec<ListEntry>, ApiError> {
        self.check(Method::Get)?;
        let uri = if related {
            let separator = if self.link.uri().contains('?') { '&' } else { '?' };
            format!("{}{}{}", self.link.uri(), separator, RELATED_QUERY)
        } else {
            self.link.uri().to_string()
        };

        let response = self.client.get(&uri).await?;
        if !response.is_success() {
            return Err(ApiError::unexpected(&uri, &response));
        }
        Ok(response.json()?)
    }

    pub async fn get(&self, id: &str) -> Result<Response, ApiError> {
        self.check(Method::Get)?;
        let uri = self.item_uri(id)?;
        self.client.get(&uri).await
    }

    /// POST a new resource to the collection
    ///
    /// On success the server answers `201 Created` with the new resource in
    /// the `Location` header.
    pub async fn create(&self, attributes: impl Into<Bytes>) -> Result<Response, ApiError> {
        self.check(Method::Post)?;
        self.client.post(self.link.uri(), attributes).await
    }

    pub async fn update(
        &self,
        id: &str,
        attributes: impl Into<Bytes>,
    ) -> Result<Response, ApiError> {
        self.check(Method::Put)?;
        let uri = self.item_uri(id)?;
        self.client.put(&uri, attributes).await
    }

    pub async fn delete(&self, id: &str) -> Result<Response, ApiError> {
        self.check(Method::Delete)?;
        let uri = self.item_uri(id)?;
        self.client.delete(&uri).await
    }

    /// Follow a link published by one item of this collection
    ///
    /// Fetches the item document and returns a proxy for its `name` link, e.g.
    /// the `networks_list` of a node.
    pub async fn related(&self, id: &str, name: &str) -> Result<ResourceProxy, ApiError> {
        let response = self.get(id).await?;
        if !response.is_success() {
            return Err(ApiError::unexpected(&self.item_uri(id)?, &response));
        }

        let item = Document::from_slice(response.body())?;
        let link = item
            .link(name)
            .cloned()
            .ok_or_else(|| ApiError::UnknownLink(name.to_string()))?;
        Ok(ResourceProxy::new(self.client.clone(), link))
    }

    fn check(&self, method: Method) -> Result<(), ApiError> {
        if self.link.allows(method) {
            Ok(())
        } else {
            Err(ApiError::OperationNotSupported {
                method,
                link: self.link.name().to_string(),
            })
        }
    }
}
