//! Domain types

mod ids;
mod media;
mod track;

pub use ids::TrackId;
pub use media::{MediaResolver, DEFAULT_MEDIA_BASE_URL, DEFAULT_PLACEHOLDER_COVER_URL};
pub use track::{filter_tracks, Track};
