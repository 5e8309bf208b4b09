//! Step routes: the string form of each flow step at the navigation boundary.
//!
//! ```text
//! post_pick_media
//! post_filter_edit/{mediaUri}
//! post_caption_details/{mediaUri}/{filterIndex}
//! ```
//!
//! `mediaUri` is percent-encoded into a single segment, `filterIndex` is a
//! decimal integer. Nothing outside this module looks at the raw strings.

use std::fmt;
use std::str::FromStr;

use color_adjust::FilterPreset;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::models::MediaRef;

pub const PICK_MEDIA: &str = "post_pick_media";
pub const FILTER_EDIT: &str = "post_filter_edit";
pub const CAPTION_DETAILS: &str = "post_caption_details";

/// Characters left unescaped in a media segment: ASCII alphanumerics and `.-*_`.
const MEDIA_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'*')
    .remove(b'_');

/// A decoded, typed step address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepRoute {
    PickMedia,
    FilterEdit {
        media: MediaRef,
    },
    CaptionDetails {
        media: MediaRef,
        filter: FilterPreset,
    },
}

/// Why a route string could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("Unknown step route: {0}")]
    UnknownStep(String),

    #[error("Missing media reference")]
    MissingMedia,

    #[error("Malformed media reference: {0}")]
    MalformedMedia(String),

    #[error("Missing filter index")]
    MissingFilterIndex { media: MediaRef },

    #[error("Invalid filter index '{raw}'")]
    InvalidFilterIndex { media: MediaRef, raw: String },
}

impl RouteError {
    /// The step to fall back to when the target cannot be entered.
    ///
    /// Media problems fall back to picking media; filter index problems fall
    /// back to the filter step for the (valid) media.
    pub fn fallback(&self) -> StepRoute {
        match self {
            RouteError::UnknownStep(_)
            | RouteError::MissingMedia
            | RouteError::MalformedMedia(_) => StepRoute::PickMedia,
            RouteError::MissingFilterIndex { media }
            | RouteError::InvalidFilterIndex { media, .. } => StepRoute::FilterEdit {
                media: media.clone(),
            },
        }
    }
}

impl StepRoute {
    pub fn encode(&self) -> String {
        match self {
            StepRoute::PickMedia => PICK_MEDIA.to_string(),
            StepRoute::FilterEdit { media } => {
                format!("{FILTER_EDIT}/{}", encode_media(media))
            }
            StepRoute::CaptionDetails { media, filter } => format!(
                "{CAPTION_DETAILS}/{}/{}",
                encode_media(media),
                filter.index()
            ),
        }
    }

    pub fn decode(route: &str) -> Result<Self, RouteError> {
        let mut parts = route.splitn(2, '/');
        let step = parts.next().unwrap_or_default();
        let rest = parts.next();

        match step {
            PICK_MEDIA if rest.is_none() => Ok(StepRoute::PickMedia),
            FILTER_EDIT => {
                let media = decode_media(rest.unwrap_or_default())?;
                Ok(StepRoute::FilterEdit { media })
            }
            CAPTION_DETAILS => {
                let rest = rest.unwrap_or_default();
                let (media_segment, index_segment) = match rest.split_once('/') {
                    Some((m, i)) => (m, Some(i)),
                    None => (rest, None),
                };
                let media = decode_media(media_segment)?;
                let filter = decode_filter(media.clone(), index_segment)?;
                Ok(StepRoute::CaptionDetails { media, filter })
            }
            _ => Err(RouteError::UnknownStep(route.to_string())),
        }
    }
}

impl fmt::Display for StepRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for StepRoute {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn encode_media(media: &MediaRef) -> String {
    utf8_percent_encode(media.as_str(), MEDIA_SEGMENT).to_string()
}

fn decode_media(segment: &str) -> Result<MediaRef, RouteError> {
    if segment.is_empty() {
        return Err(RouteError::MissingMedia);
    }
    // An encoded segment never carries a raw separator or a dangling escape.
    if segment.contains('/') || has_bad_escape(segment) {
        return Err(RouteError::MalformedMedia(segment.to_string()));
    }
    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|e| RouteError::MalformedMedia(format!("{segment}: {e}")))?;
    MediaRef::new(decoded.into_owned()).ok_or(RouteError::MissingMedia)
}

fn has_bad_escape(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

fn decode_filter(media: MediaRef, segment: Option<&str>) -> Result<FilterPreset, RouteError> {
    let raw = match segment {
        None | Some("") => return Err(RouteError::MissingFilterIndex { media }),
        Some(raw) => raw,
    };
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RouteError::InvalidFilterIndex {
            media,
            raw: raw.to_string(),
        });
    }
    raw.parse::<u32>()
        .ok()
        .and_then(|index| FilterPreset::from_index(index).ok())
        .ok_or_else(|| RouteError::InvalidFilterIndex {
            media,
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn media(s: &str) -> MediaRef {
        MediaRef::new(s).unwrap()
    }

    #[test]
    fn test_encode_pick_media() {
        assert_eq!(StepRoute::PickMedia.encode(), "post_pick_media");
    }

    #[test]
    fn test_encode_filter_edit_escapes_uri() {
        let route = StepRoute::FilterEdit {
            media: media("content://media/external/images/42"),
        };
        assert_eq!(
            route.encode(),
            "post_filter_edit/content%3A%2F%2Fmedia%2Fexternal%2Fimages%2F42"
        );
    }

    #[test]
    fn test_encode_keeps_unreserved() {
        let route = StepRoute::FilterEdit {
            media: media("a.b-c*d_e f"),
        };
        assert_eq!(route.encode(), "post_filter_edit/a.b-c*d_e%20f");
    }

    #[test]
    fn test_encode_caption_details() {
        let route = StepRoute::CaptionDetails {
            media: media("m1"),
            filter: FilterPreset::Muted,
        };
        assert_eq!(route.encode(), "post_caption_details/m1/2");
    }

    #[test]
    fn test_decode_caption_details() {
        let route: StepRoute = "post_caption_details/file%3A%2F%2F%2Fsd%2Fcar.jpg/4"
            .parse()
            .unwrap();
        assert_eq!(
            route,
            StepRoute::CaptionDetails {
                media: media("file:///sd/car.jpg"),
                filter: FilterPreset::Sepia,
            }
        );
    }

    #[test]
    fn test_decode_unicode_media() {
        let original = StepRoute::FilterEdit {
            media: media("file:///Fotos/Käfer 1967.jpg"),
        };
        assert_eq!(StepRoute::decode(&original.encode()).unwrap(), original);
    }

    #[test]
    fn test_decode_missing_media() {
        assert_eq!(
            StepRoute::decode("post_filter_edit/"),
            Err(RouteError::MissingMedia)
        );
        assert_eq!(
            StepRoute::decode("post_filter_edit"),
            Err(RouteError::MissingMedia)
        );
        assert_eq!(
            StepRoute::decode("post_caption_details//1"),
            Err(RouteError::MissingMedia)
        );
    }

    #[test]
    fn test_decode_blank_media_after_decoding() {
        assert_eq!(
            StepRoute::decode("post_filter_edit/%20%20"),
            Err(RouteError::MissingMedia)
        );
    }

    #[test]
    fn test_decode_malformed_media() {
        assert!(matches!(
            StepRoute::decode("post_filter_edit/abc%2"),
            Err(RouteError::MalformedMedia(_))
        ));
        assert!(matches!(
            StepRoute::decode("post_filter_edit/abc%zz"),
            Err(RouteError::MalformedMedia(_))
        ));
        assert!(matches!(
            StepRoute::decode("post_filter_edit/a/b"),
            Err(RouteError::MalformedMedia(_))
        ));
        // Invalid UTF-8 after decoding
        assert!(matches!(
            StepRoute::decode("post_filter_edit/%FF"),
            Err(RouteError::MalformedMedia(_))
        ));
    }

    #[test]
    fn test_decode_filter_index_errors() {
        assert_eq!(
            StepRoute::decode("post_caption_details/m1"),
            Err(RouteError::MissingFilterIndex { media: media("m1") })
        );
        assert_eq!(
            StepRoute::decode("post_caption_details/m1/"),
            Err(RouteError::MissingFilterIndex { media: media("m1") })
        );
        for raw in ["5", "-1", "+2", "two", "2/extra", "99999999999"] {
            assert_eq!(
                StepRoute::decode(&format!("post_caption_details/m1/{raw}")),
                Err(RouteError::InvalidFilterIndex {
                    media: media("m1"),
                    raw: raw.to_string(),
                }),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_decode_unknown_step() {
        assert!(matches!(
            StepRoute::decode("feed"),
            Err(RouteError::UnknownStep(_))
        ));
        assert!(matches!(
            StepRoute::decode("post_pick_media/extra"),
            Err(RouteError::UnknownStep(_))
        ));
    }

    #[test]
    fn test_fallback_targets() {
        assert_eq!(RouteError::MissingMedia.fallback(), StepRoute::PickMedia);
        assert_eq!(
            RouteError::InvalidFilterIndex {
                media: media("m1"),
                raw: "9".to_string()
            }
            .fallback(),
            StepRoute::FilterEdit { media: media("m1") }
        );
    }
}
