//! Video identifier extraction.
//!
//! A video can be referred to by its bare identifier (`dQw4w9WgXcQ`) or by a
//! full locator (`https://www.youtube.com/watch?v=dQw4w9WgXcQ`). Everything
//! here is total: malformed input yields [`VideoId::unknown`], never an error.

use serde::{Serialize, Serializer};
use url::Url;

const UNKNOWN: &str = "unknown";
const MAX_ID_LEN: usize = 64;

/// Bare video identifier, or the "unknown" sentinel.
///
/// The sentinel is stored empty, which the identifier pattern never accepts,
/// so it cannot collide with a real id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    pub fn unknown() -> Self {
        Self(String::new())
    }

    /// Accepts only strings that already satisfy the identifier pattern.
    pub fn from_bare(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        is_bare_id(raw).then(|| Self(raw.to_string()))
    }

    /// UI that depends on the identifier (thumbnails, embeds) treats this as
    /// "no visual available".
    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        if self.is_unknown() {
            UNKNOWN
        } else {
            &self.0
        }
    }

    /// Short locator the service itself emits for search rows.
    pub fn short_locator(&self) -> Option<String> {
        (!self.is_unknown()).then(|| format!("https://youtu.be/{}", self.0))
    }

    pub fn watch_locator(&self) -> Option<String> {
        (!self.is_unknown()).then(|| format!("https://www.youtube.com/watch?v={}", self.0))
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VideoId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 1-64 characters of `[A-Za-z0-9_-]`.
pub fn is_bare_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate.len() <= MAX_ID_LEN
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
}

/// Extract the bare identifier from either a bare id or a locator.
pub fn extract_video_id(reference: &str) -> VideoId {
    let reference = reference.trim();
    if let Some(id) = VideoId::from_bare(reference) {
        return id;
    }

    let parsed = Url::parse(reference).or_else(|_| Url::parse(&format!("https://{reference}")));
    let Ok(url) = parsed else {
        return VideoId::unknown();
    };

    id_from_locator(&url)
        .and_then(|candidate| VideoId::from_bare(&candidate))
        .unwrap_or_else(VideoId::unknown)
}

fn id_from_locator(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.");
    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());

    if host == "youtu.be" {
        return segments.next().map(str::to_string);
    }

    let known_host = host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtube-nocookie.com";
    if !known_host {
        return None;
    }

    match segments.next()? {
        "watch" => url
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        "embed" | "shorts" | "live" | "v" => segments.next().map(str::to_string),
        _ => None,
    }
}

/// Locator form of a reference: locators pass through, bare ids expand to a
/// watch URL, anything else is returned verbatim.
pub fn to_locator(reference: &str) -> String {
    let reference = reference.trim();
    match VideoId::from_bare(reference).and_then(|id| id.watch_locator()) {
        Some(locator) => locator,
        None => reference.to_string(),
    }
}
