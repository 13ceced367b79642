//! Song catalog loading
//!
//! The catalog is the song list the backend would return from `GET /songs`.
//! It is read once at startup; the player only ever hands slices of it to
//! the engine.
use crate::error::{PlayerError, Result};
use cadence_core::Track;
use serde::Deserialize;
use std::path::Path;

/// Accepted catalog layouts: a bare array or `{ "songs": [...] }`
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Track>),
    Wrapped { songs: Vec<Track> },
}

/// Parse a catalog from JSON text
pub fn parse_catalog(json: &str) -> Result<Vec<Track>> {
    let catalog: CatalogFile = serde_json::from_str(json)
        .map_err(|e| PlayerError::Catalog(format!("unreadable song list: {}", e)))?;

    let songs = match catalog {
        CatalogFile::List(songs) | CatalogFile::Wrapped { songs } => songs,
    };

    if songs.is_empty() {
        return Err(PlayerError::Catalog("song list is empty".to_string()));
    }

    Ok(songs)
}

/// Read a catalog file
pub fn load_catalog(path: &Path) -> Result<Vec<Track>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| PlayerError::Catalog(format!("{}: {}", path.display(), e)))?;
    let songs = parse_catalog(&json)?;
    tracing::info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

/// Songs available without a catalog file
pub fn demo_catalog() -> Vec<Track> {
    let demo = [
        ("demo-1", "Morning Drive", "The Commuters", "uploads/morning-drive.mp3", 212),
        ("demo-2", "Paper Lanterns", "Mira Hale", "uploads/paper-lanterns.mp3", 187),
        ("demo-3", "Static Bloom", "Northbound", "uploads/static-bloom.mp3", 243),
        ("demo-4", "Low Tide", "Mira Hale", "uploads/low-tide.mp3", 198),
        ("demo-5", "Broken Link", "Nobody", "", 0),
    ];

    demo.into_iter()
        .map(|(id, title, artist, audio, secs)| {
            let track = Track::new(id, title, artist, audio)
                .with_cover(format!("uploads/covers/{}.jpg", id));
            if secs > 0 {
                track.with_duration(std::time::Duration::from_secs(secs))
            } else {
                track
            }
        })
        .collect()
}
