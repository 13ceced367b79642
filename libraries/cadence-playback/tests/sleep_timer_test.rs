//! Sleep timer through the playback manager
//!
//! Runs on a paused tokio clock so minutes pass instantly.

use cadence_core::Track;
use cadence_playback::{PlaybackConfig, PlaybackEvent, PlaybackManager};
use cadence_storage::MemoryStore;
use std::time::Duration;

const MINUTE: Duration = Duration::from_secs(60);

fn playing_manager() -> PlaybackManager {
    let mut manager = PlaybackManager::new(PlaybackConfig::default(), Box::new(MemoryStore::new()));
    let list: Vec<Track> = ["A", "B"]
        .iter()
        .map(|id| Track::new(*id, format!("Track {}", id), "Test Artist", format!("{}.mp3", id)))
        .collect();
    manager.set_queue_and_play(list[0].clone(), list);
    manager
}

/// Let the clock run forward, then apply whatever arrived
async fn advance(manager: &mut PlaybackManager, by: Duration) {
    tokio::time::sleep(by).await;
    manager.process_pending_messages();
}

#[tokio::test(start_paused = true)]
async fn timer_pauses_without_clearing_track() {
    let mut manager = playing_manager();
    manager.start_sleep_timer(Some(15));
    assert_eq!(manager.sleep_timer_minutes(), Some(15));

    advance(&mut manager, 14 * MINUTE).await;
    assert!(manager.is_playing());

    advance(&mut manager, 2 * MINUTE).await;
    assert!(!manager.is_playing());
    assert_eq!(manager.sleep_timer_minutes(), None);
    assert_eq!(manager.current_track().map(|t| t.id.as_str()), Some("A"));
    assert_eq!(manager.queue().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn rearming_keeps_single_pending_timer() {
    let mut manager = playing_manager();
    manager.start_sleep_timer(Some(15));
    manager.start_sleep_timer(Some(30));

    // The 15 minute timer was cancelled
    advance(&mut manager, 16 * MINUTE).await;
    assert!(manager.is_playing());
    assert_eq!(manager.sleep_timer_minutes(), Some(30));

    advance(&mut manager, 15 * MINUTE).await;
    assert!(!manager.is_playing());
    assert_eq!(manager.sleep_timer_minutes(), None);
}

#[tokio::test(start_paused = true)]
async fn cancel_with_none_or_zero() {
    let mut manager = playing_manager();

    manager.start_sleep_timer(Some(15));
    manager.start_sleep_timer(None);
    assert_eq!(manager.sleep_timer_minutes(), None);

    manager.start_sleep_timer(Some(15));
    manager.start_sleep_timer(Some(0));
    assert_eq!(manager.sleep_timer_minutes(), None);

    advance(&mut manager, 20 * MINUTE).await;
    assert!(manager.is_playing());
}

#[tokio::test(start_paused = true)]
async fn cycle_walks_presets() {
    let mut manager = playing_manager();

    let mut seen = Vec::new();
    for _ in 0..4 {
        manager.cycle_sleep_timer();
        seen.push(manager.sleep_timer_minutes());
    }
    assert_eq!(seen, vec![Some(15), Some(30), Some(60), None]);

    let events: Vec<PlaybackEvent> = manager
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlaybackEvent::SleepTimerChanged { .. }))
        .collect();
    assert_eq!(events.len(), 4);
}

#[tokio::test(start_paused = true)]
async fn expiry_while_paused_keeps_paused() {
    let mut manager = playing_manager();
    manager.start_sleep_timer(Some(15));
    manager.toggle_play_pause();

    advance(&mut manager, 16 * MINUTE).await;
    assert!(!manager.is_playing());
    assert_eq!(manager.sleep_timer_minutes(), None);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_timer() {
    let mut manager = playing_manager();
    manager.start_sleep_timer(Some(15));
    manager.shutdown();

    advance(&mut manager, 20 * MINUTE).await;
    assert!(manager.is_playing());
}

#[tokio::test(start_paused = true)]
async fn host_loop_receives_expiry() {
    let mut manager = playing_manager();
    let mut inbox = manager.take_message_receiver().unwrap();

    manager.start_sleep_timer(Some(1));
    let message = inbox.recv().await.unwrap();
    manager.handle_message(message);

    assert!(!manager.is_playing());
    assert_eq!(manager.sleep_timer_minutes(), None);
}
