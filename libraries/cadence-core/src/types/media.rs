//! Media reference resolution
use serde::{Deserialize, Serialize};

/// Default backend serving uploaded media
pub const DEFAULT_MEDIA_BASE_URL: &str = "http://localhost:5000";

/// Image shown when a track has no cover
pub const DEFAULT_PLACEHOLDER_COVER_URL: &str = "https://via.placeholder.com/150";

/// Turns track media references into URLs the audio element can load
///
/// The backend stores either absolute CDN URLs or paths relative to its
/// upload directory (sometimes with Windows separators). Absolute `http`
/// references pass through; relative ones are joined to `base_url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResolver {
    base_url: String,
    placeholder_cover_url: String,
}

impl MediaResolver {
    /// Create a resolver for the given backend
    pub fn new(base_url: impl Into<String>, placeholder_cover_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            placeholder_cover_url: placeholder_cover_url.into(),
        }
    }

    /// Backend base URL (without trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an audio reference
    ///
    /// Returns `None` for an empty reference; there is nothing to play.
    pub fn audio_url(&self, reference: &str) -> Option<String> {
        if reference.trim().is_empty() {
            return None;
        }
        Some(self.join(reference))
    }

    /// Resolve a cover reference, falling back to the placeholder image
    pub fn cover_url(&self, reference: &str) -> String {
        if reference.trim().is_empty() {
            return self.placeholder_cover_url.clone();
        }
        self.join(reference)
    }

    fn join(&self, reference: &str) -> String {
        if reference.starts_with("http") {
            return reference.to_string();
        }

        let clean = reference.replace('\\', "/");
        let clean = clean.strip_prefix('/').unwrap_or(&clean);
        format!("{}/{}", self.base_url, clean)
    }
}

impl Default for MediaResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MEDIA_BASE_URL, DEFAULT_PLACEHOLDER_COVER_URL)
    }
}
