//! Recently-played history through the playback manager
//!
//! Covers the dedup/bound rules and persistence across sessions with both
//! the in-memory and the file-backed store.

use cadence_core::{KeyValueStore, Track};
use cadence_playback::{PlaybackConfig, PlaybackEvent, PlaybackManager};
use cadence_storage::{JsonFileStore, MemoryStore};
use tempfile::TempDir;

fn create_test_track(id: &str) -> Track {
    Track::new(id, format!("Track {}", id), "Test Artist", format!("uploads/{}.mp3", id))
}

fn recent_ids(manager: &PlaybackManager) -> Vec<String> {
    manager
        .recently_played()
        .into_iter()
        .map(|t| t.id.to_string())
        .collect()
}

fn session(store: Box<dyn KeyValueStore>) -> PlaybackManager {
    PlaybackManager::new(PlaybackConfig::default(), store)
}

#[test]
fn replay_moves_track_to_front() {
    let mut manager = session(Box::new(MemoryStore::new()));

    for id in ["A", "B", "A"] {
        manager.set_queue_and_play(create_test_track(id), Vec::new());
    }

    assert_eq!(recent_ids(&manager), vec!["A", "B"]);
}

#[test]
fn keeps_ten_most_recent() {
    let mut manager = session(Box::new(MemoryStore::new()));

    for i in 1..=12 {
        manager.set_queue_and_play(create_test_track(&i.to_string()), Vec::new());
    }

    let expected: Vec<String> = (3..=12).rev().map(|i| i.to_string()).collect();
    assert_eq!(recent_ids(&manager), expected);
}

#[test]
fn transport_does_not_record() {
    let mut manager = session(Box::new(MemoryStore::new()));
    let list: Vec<Track> = ["A", "B", "C"].iter().map(|id| create_test_track(id)).collect();
    manager.set_queue_and_play(list[0].clone(), list);

    manager.play_next(false);
    manager.play_next(true);
    manager.play_prev();

    assert_eq!(recent_ids(&manager), vec!["A"]);
}

#[test]
fn picking_queue_entry_records_it() {
    let mut manager = session(Box::new(MemoryStore::new()));
    let list: Vec<Track> = ["A", "B", "C"].iter().map(|id| create_test_track(id)).collect();
    manager.set_queue_and_play(list[0].clone(), list.clone());
    manager.set_queue_and_play(list[2].clone(), list);
    assert_eq!(recent_ids(&manager), vec!["C", "A"]);

    manager.play_from_queue(0);
    assert_eq!(recent_ids(&manager), vec!["A", "C"]);

    manager.play_from_queue(1);
    assert_eq!(recent_ids(&manager), vec!["B", "A", "C"]);
    assert_eq!(manager.queue().len(), 3);
}

#[test]
fn history_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local-storage.json");

    {
        let mut manager = session(Box::new(JsonFileStore::open(&path).unwrap()));
        manager.set_queue_and_play(create_test_track("A"), Vec::new());
        manager.set_queue_and_play(create_test_track("B"), Vec::new());
    }

    let manager = session(Box::new(JsonFileStore::open(&path).unwrap()));
    assert_eq!(recent_ids(&manager), vec!["B", "A"]);
}

#[test]
fn corrupt_history_starts_empty_and_is_removed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local-storage.json");

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        store
            .set("recentlyPlayed", "[{\"id\": \"A\", \"tit".to_string())
            .unwrap();
        store.set("theme", "dark".to_string()).unwrap();
    }

    let manager = session(Box::new(JsonFileStore::open(&path).unwrap()));
    assert!(manager.recently_played().is_empty());
    drop(manager);

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get("recentlyPlayed"), None);
    // Unrelated keys are untouched
    assert_eq!(store.get("theme").as_deref(), Some("dark"));
}

#[test]
fn backend_shaped_snapshots_load() {
    let raw = r#"[
        {"_id": "65f1", "title": "Kesariya", "singer": "Arijit", "artist": "Arijit Singh",
         "songUrl": "uploads\\kesariya.mp3", "coverImage": "uploads/k.jpg"},
        null
    ]"#;
    let store = MemoryStore::with_entries([("recentlyPlayed", raw)]);

    let manager = session(Box::new(store));
    let recent = manager.recently_played();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id.as_str(), "65f1");
    assert_eq!(recent[0].audio_url, "uploads\\kesariya.mp3");
}

#[test]
fn custom_key_and_bound() {
    let config = PlaybackConfig {
        history_key: "recent".to_string(),
        history_size: 2,
        ..PlaybackConfig::default()
    };
    let mut manager = PlaybackManager::new(config, Box::new(MemoryStore::new()));

    for id in ["A", "B", "C"] {
        manager.set_queue_and_play(create_test_track(id), Vec::new());
    }
    assert_eq!(recent_ids(&manager), vec!["C", "B"]);
}

#[test]
fn clear_history_persists_empty_list() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("local-storage.json");

    let mut manager = session(Box::new(JsonFileStore::open(&path).unwrap()));
    manager.set_queue_and_play(create_test_track("A"), Vec::new());
    manager.drain_events();

    manager.clear_history();
    assert!(manager.recently_played().is_empty());
    assert_eq!(
        manager.drain_events(),
        vec![PlaybackEvent::HistoryChanged { length: 0 }]
    );

    let store = JsonFileStore::open(&path).unwrap();
    assert_eq!(store.get("recentlyPlayed").as_deref(), Some("[]"));
}
