use serde::Deserialize;
use serde_json::Value;

/// One element of a collection document
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListEntry {
    pub uri: String,
    /// Inline details, present when the list was requested with `_related`
    #[serde(rename = "_related", default)]
    pub related: Option<Value>,
}

impl ListEntry {
    /// The resource id: last non-empty segment of the entry's path
    pub fn id(&self) -> Option<&str> {
        self.uri
            .split('?')
            .next()?
            .split('/')
            .filter(|segment| !segment.is_empty())
            .last()
    }
}
