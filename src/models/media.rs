use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque reference to a picked image (a URI-like string).
///
/// Never empty: construction rejects blank input, so every `MediaRef` held
/// by the flow is a resolvable reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaRef(String);

impl MediaRef {
    /// Wrap a reference, returning `None` for blank input.
    pub fn new(uri: impl Into<String>) -> Option<Self> {
        let uri = uri.into();
        if uri.trim().is_empty() {
            None
        } else {
            Some(Self(uri))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MediaRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| "media reference must not be empty".to_string())
    }
}

impl From<MediaRef> for String {
    fn from(media: MediaRef) -> Self {
        media.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_blank() {
        assert!(MediaRef::new("").is_none());
        assert!(MediaRef::new("   ").is_none());
        assert_eq!(MediaRef::new("m1").unwrap().as_str(), "m1");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        assert!(serde_json::from_str::<MediaRef>("\"\"").is_err());
        let media: MediaRef = serde_json::from_str("\"file:///a.png\"").unwrap();
        assert_eq!(media.to_string(), "file:///a.png");
    }
}
