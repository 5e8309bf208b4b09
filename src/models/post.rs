use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the post service assigns to a created post
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of a create-post call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub caption: String,
    pub media_url: String,
    pub tags: Vec<String>,
}

/// Text the user is typing on the caption step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionDraft {
    pub caption: String,
    pub location: String,
}

impl CaptionDraft {
    /// Whether the share control is enabled.
    pub fn is_submittable(&self) -> bool {
        !self.caption.trim().is_empty()
    }

    /// Default tags followed by the location, blank entries dropped.
    pub fn tags(&self, default_tags: &[String]) -> Vec<String> {
        default_tags
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.location.as_str()))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_caption_not_submittable() {
        let draft = CaptionDraft {
            caption: "  \n".to_string(),
            location: "Garage".to_string(),
        };
        assert!(!draft.is_submittable());
    }

    #[test]
    fn test_tags_append_location() {
        let draft = CaptionDraft {
            caption: "hello".to_string(),
            location: "Joe's Garage, Leeds".to_string(),
        };
        let defaults = vec!["revdup".to_string(), "car".to_string()];
        assert_eq!(
            draft.tags(&defaults),
            vec!["revdup", "car", "Joe's Garage, Leeds"]
        );
    }

    #[test]
    fn test_tags_drop_blank_location() {
        let draft = CaptionDraft::default();
        let defaults = vec!["revdup".to_string(), "".to_string()];
        assert_eq!(draft.tags(&defaults), vec!["revdup"]);
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = PostRequest {
            caption: "hi".to_string(),
            media_url: "m1".to_string(),
            tags: vec!["car".to_string()],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"caption": "hi", "mediaUrl": "m1", "tags": ["car"]})
        );
    }
}
