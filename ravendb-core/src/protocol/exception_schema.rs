//! The JSON error envelope returned by the server on failure.

use serde::{Deserialize, Deserializer, Serialize};

/// Error body returned by the server for non-2xx responses.
///
/// All fields are optional on the wire; missing or `null` ones deserialize as
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExceptionSchema {
    /// Fully-qualified server exception type name.
    #[serde(rename = "Type", deserialize_with = "nullable_string")]
    pub type_name: String,
    /// Short message.
    #[serde(deserialize_with = "nullable_string")]
    pub message: String,
    /// Detailed error text (usually includes the server stack trace).
    #[serde(deserialize_with = "nullable_string")]
    pub error: String,
    /// URL of the request that failed.
    #[serde(deserialize_with = "nullable_string")]
    pub url: String,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl ExceptionSchema {
    /// Creates a schema from its four fields.
    pub fn new(
        type_name: impl Into<String>,
        message: impl Into<String>,
        error: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            error: error.into(),
            url: url.into(),
        }
    }
}
