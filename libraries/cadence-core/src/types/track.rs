//! Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A playable song as delivered by the song backend
///
/// Tracks are immutable once fetched. The playback engine clones them into
/// its queue and history but never edits one.
///
/// The JSON form is camelCase and also accepts the backend's own field names
/// (`_id`, `songUrl`, `imageUrl`, `coverImage`, `duration`), so a song list
/// fetched from the REST API deserializes directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    #[serde(alias = "_id")]
    pub id: TrackId,

    /// Display title
    pub title: String,

    /// Display artist/singer
    #[serde(default)]
    pub artist: String,

    /// Audio media reference (absolute URL or backend-relative path)
    #[serde(alias = "songUrl")]
    pub audio_url: String,

    /// Cover art reference (absolute URL or backend-relative path, may be empty)
    #[serde(default, alias = "imageUrl", alias = "coverImage")]
    pub cover_url: String,

    /// Album name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Movie/soundtrack the song belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<String>,

    /// Duration in seconds, when the backend knows it
    #[serde(default, alias = "duration", skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl Track {
    /// Create a track with the fields the engine requires
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            audio_url: audio_url.into(),
            cover_url: String::new(),
            album: None,
            movie: None,
            duration_secs: None,
        }
    }

    /// Set the cover reference
    #[must_use]
    pub fn with_cover(mut self, cover_url: impl Into<String>) -> Self {
        self.cover_url = cover_url.into();
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_secs = Some(duration.as_secs_f64());
        self
    }

    /// Get the track duration as a Duration
    ///
    /// `None` when unknown or not representable (negative, NaN, infinite or
    /// out of range).
    pub fn duration(&self) -> Option<Duration> {
        self.duration_secs
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }

    /// Identifier equality, the only notion of "same track" the queue uses
    pub fn same_track(&self, other: &Track) -> bool {
        self.id == other.id
    }

    /// Case-insensitive search over title, artist, album and movie
    ///
    /// `term` must already be lowercased.
    fn matches_lowercase(&self, term: &str) -> bool {
        let hit = |field: &str| field.to_lowercase().contains(term);

        hit(&self.title)
            || hit(&self.artist)
            || self.album.as_deref().is_some_and(hit)
            || self.movie.as_deref().is_some_and(hit)
    }
}

/// Apply the library search box to a song list
///
/// Returns the tracks matching `term` in their original order. An empty or
/// whitespace-only term keeps every track. The result is what the UI hands to
/// the engine as the candidate queue.
pub fn filter_tracks(tracks: &[Track], term: &str) -> Vec<Track> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return tracks.to_vec();
    }

    tracks
        .iter()
        .filter(|track| track.matches_lowercase(&term))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<Track> {
        let mut theme = Track::new("3", "Main Theme", "Orchestra", "uploads/theme.mp3");
        theme.movie = Some("Interstellar".to_string());

        vec![
            Track::new("1", "Blinding Lights", "The Weeknd", "uploads/blinding.mp3"),
            Track::new("2", "Levitating", "Dua Lipa", "uploads/levitating.mp3"),
            theme,
        ]
    }

    #[test]
    fn deserializes_backend_song() {
        let json = r#"{
            "_id": "65f1c0ab",
            "title": "Blinding Lights",
            "artist": "The Weeknd",
            "songUrl": "https://cdn.example.com/a.mp3",
            "imageUrl": "https://cdn.example.com/a.jpg",
            "duration": 200,
            "album": "After Hours",
            "createdAt": "2024-01-01T00:00:00Z"
        }"#;

        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.id.as_str(), "65f1c0ab");
        assert_eq!(track.audio_url, "https://cdn.example.com/a.mp3");
        assert_eq!(track.cover_url, "https://cdn.example.com/a.jpg");
        assert_eq!(track.duration(), Some(Duration::from_secs(200)));
        assert_eq!(track.album.as_deref(), Some("After Hours"));
    }

    #[test]
    fn serializes_camel_case_snapshot() {
        let track = Track::new("1", "Song", "Singer", "uploads/song.mp3").with_cover("c.jpg");
        let value = serde_json::to_value(&track).unwrap();

        assert_eq!(value["id"], "1");
        assert_eq!(value["audioUrl"], "uploads/song.mp3");
        assert_eq!(value["coverUrl"], "c.jpg");
        assert!(value.get("album").is_none());

        let back: Track = serde_json::from_value(value).unwrap();
        assert_eq!(back, track);
    }

    #[test]
    fn missing_cover_defaults_to_empty() {
        let track: Track =
            serde_json::from_str(r#"{"id":"1","title":"t","artist":"a","audioUrl":"x.mp3"}"#)
                .unwrap();
        assert!(track.cover_url.is_empty());
        assert_eq!(track.duration(), None);
    }

    #[test]
    fn unusable_duration_is_unknown() {
        for secs in ["1e300", "-5", "2e19"] {
            let json = format!(
                r#"{{"_id":"a","title":"t","songUrl":"a.mp3","duration":{}}}"#,
                secs
            );
            let track: Track = serde_json::from_str(&json).unwrap();
            assert_eq!(track.duration(), None, "duration {}", secs);
        }

        let mut track = Track::new("a", "t", "", "a.mp3");
        track.duration_secs = Some(f64::NAN);
        assert_eq!(track.duration(), None);
        track.duration_secs = Some(f64::INFINITY);
        assert_eq!(track.duration(), None);
    }

    #[test]
    fn same_track_compares_ids_only() {
        let a = Track::new("1", "Song", "Singer", "a.mp3");
        let b = Track::new("1", "Renamed", "Other", "b.mp3");
        let c = Track::new("2", "Song", "Singer", "a.mp3");

        assert!(a.same_track(&b));
        assert!(!a.same_track(&c));
    }

    #[test]
    fn filter_is_case_insensitive() {
        let hits = filter_tracks(&library(), "LIPA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "2");
    }

    #[test]
    fn filter_matches_movie() {
        let hits = filter_tracks(&library(), "interstellar");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id.as_str(), "3");
    }

    #[test]
    fn empty_filter_keeps_order() {
        let hits = filter_tracks(&library(), "   ");
        let ids: Vec<&str> = hits.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }
}
