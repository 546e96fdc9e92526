//! Engine configuration.

use serde::Deserialize;

/// Tunables for request resolution and the in-memory store.
///
/// Every field has a default, so partial JSON is fine:
///
/// ```ignore
/// let config = ApiConfig::from_json(r#"{ "default_per_page": 25 }"#)?;
/// assert_eq!(config.version_header, "Accept-Version");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Header the version number is read from, named in error messages.
    pub version_header: String,
    /// Page size for paged index actions when the request gives none.
    pub default_per_page: u64,
    /// Channel capacity of each store actor.
    pub store_buffer: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            version_header: "Accept-Version".to_string(),
            default_per_page: 10,
            store_buffer: 32,
        }
    }
}

impl ApiConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
