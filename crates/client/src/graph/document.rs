use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::transport::Method;

/// Suffix the API uses for collection links (`nodes_list`, `ports_list`, ...)
pub const COLLECTION_SUFFIX: &str = "_list";

/// One navigable relation: a URI plus the verbs valid against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkDescriptor {
    name: String,
    uri: String,
    methods: BTreeSet<Method>,
}

impl LinkDescriptor {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        methods: impl IntoIterator<Item = Method>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            methods: methods.into_iter().collect(),
        }
    }

    /// A link whose verbs follow the naming convention: collections
    /// (`*_list`) take GET and POST, everything else GET, PUT and DELETE
    pub fn by_convention(name: impl Into<String>, uri: impl Into<String>) -> Self {
        let name = name.into();
        let methods = if name.ends_with(COLLECTION_SUFFIX) {
            vec![Method::Get, Method::Post]
        } else {
            vec![Method::Get, Method::Put, Method::Delete]
        };
        Self::new(name, uri, methods)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn methods(&self) -> &BTreeSet<Method> {
        &self.methods
    }

    pub fn allows(&self, method: Method) -> bool {
        self.methods.contains(&method)
    }
}

#[derive(Debug, Deserialize)]
struct RawLink {
    uri: String,
    #[serde(default)]
    methods: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    links: BTreeMap<String, RawLink>,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

/// A self-describing resource document
///
/// The root document and every item document share this shape: a `links`
/// object naming related resources, plus whatever attributes the resource has.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "RawDocument")]
pub struct Document {
    links: BTreeMap<String, LinkDescriptor>,
    attributes: Map<String, Value>,
}

/// The document served at the API root
pub type RootDocument = Document;

impl From<RawDocument> for Document {
    fn from(raw: RawDocument) -> Self {
        let links = raw
            .links
            .into_iter()
            .map(|(name, link)| {
                let descriptor = match link.methods {
                    Some(methods) => {
                        let methods = methods.iter().filter_map(|m| match m.parse::<Method>() {
                            Ok(method) => Some(method),
                            Err(e) => {
                                tracing::debug!(link = %name, "ignoring {}", e);
                                None
                            }
                        });
                        LinkDescriptor::new(name.clone(), link.uri, methods)
                    }
                    None => LinkDescriptor::by_convention(name.clone(), link.uri),
                };
                (name, descriptor)
            })
            .collect();

        Self {
            links,
            attributes: raw.attributes,
        }
    }
}

impl Document {
    pub fn new(links: impl IntoIterator<Item = LinkDescriptor>) -> Self {
        Self {
            links: links
                .into_iter()
                .map(|link| (link.name().to_string(), link))
                .collect(),
            attributes: Map::new(),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    pub fn links(&self) -> &BTreeMap<String, LinkDescriptor> {
        &self.links
    }

    pub fn link(&self, name: &str) -> Option<&LinkDescriptor> {
        self.links.get(name)
    }

    /// Everything in the document besides `links`
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Look up a nested attribute by a `/`-separated path, e.g. `volatile/num_nodes`
    pub fn attribute(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('/');
        let first = self.attributes.get(parts.next()?)?;
        parts.try_fold(first, |value, key| value.get(key))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_methods() {
        let doc: Document = serde_json::from_value(json!({
            "links": {
                "nodes_list": { "uri": "/nodes/", "methods": ["GET", "POST"] }
            }
        }))
        .unwrap();

        let link = doc.link("nodes_list").unwrap();
        assert_eq!(link.uri(), "/nodes/");
        assert!(link.allows(Method::Get));
        assert!(link.allows(Method::Post));
        assert!(!link.allows(Method::Delete));
    }

    #[test]
    fn test_convention_methods() {
        let doc: Document = serde_json::from_value(json!({
            "links": {
                "networks_list": { "uri": "/api/networks/" },
                "server": { "uri": "/api/server_info/" }
            }
        }))
        .unwrap();

        let networks = doc.link("networks_list").unwrap();
        assert_eq!(
            networks.methods(),
            &BTreeSet::from([Method::Get, Method::Post])
        );

        let server = doc.link("server").unwrap();
        assert!(server.allows(Method::Put));
        assert!(server.allows(Method::Delete));
        assert!(!server.allows(Method::Post));
    }

    #[test]
    fn test_unknown_verbs_are_ignored() {
        let doc: Document = serde_json::from_value(json!({
            "links": { "self": { "uri": "/api/nodes/abc/", "methods": ["GET", "PATCH", "head"] } }
        }))
        .unwrap();
        let link = doc.link("self").unwrap();
        assert_eq!(link.methods().len(), 1);
        assert!(link.allows(Method::Get));
    }

    #[test]
    fn test_explicit_empty_methods_allow_nothing() {
        let doc: Document = serde_json::from_value(json!({
            "links": { "frozen_list": { "uri": "/frozen/", "methods": [] } }
        }))
        .unwrap();
        assert!(doc.link("frozen_list").unwrap().methods().is_empty());
    }

    #[test]
    fn test_attributes_are_kept() {
        let doc: Document = serde_json::from_value(json!({
            "links": {},
            "volatile": { "num_nodes": 3, "num_nets": 1 },
            "name": "root"
        }))
        .unwrap();

        assert_eq!(doc.attribute("volatile/num_nodes"), Some(&json!(3)));
        assert_eq!(doc.attribute("name"), Some(&json!("root")));
        assert_eq!(doc.attribute("volatile/missing"), None);
        assert!(!doc.attributes().contains_key("links"));
    }

    #[test]
    fn test_missing_links_is_empty() {
        let doc = Document::from_slice(br#"{"name": "node-1"}"#).unwrap();
        assert!(doc.links().is_empty());
    }

    #[test]
    fn test_link_without_uri_is_an_error() {
        assert!(Document::from_slice(br#"{"links": {"nodes_list": {}}}"#).is_err());
    }
}
