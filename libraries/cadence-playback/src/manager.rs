//! Playback manager - core orchestration
//!
//! Owns the current track, the queue, the transport flags, the sleep timer
//! and the recently-played history. Every public operation is synchronous
//! and runs to completion; deferred input (audio callbacks, timer expiry)
//! arrives as `EngineMessage`s and is applied one at a time.

use crate::{
    events::{PlaybackEvent, PLAYBACK_FAILED_NOTICE},
    history::HistoryRecorder,
    output::{AudioEvent, AudioOutput, EngineMessage, LoadRequest},
    queue::Queue,
    shortcuts::{KeyPress, Shortcut},
    shuffle::{pick_shuffle_index, IndexSource, RandomIndexSource},
    sleep_timer::{next_preset, SleepTimer},
    types::{PlaybackConfig, RepeatMode},
    volume::Volume,
};
use cadence_core::{KeyValueStore, MediaResolver, Track};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Main playback manager
///
/// Constructed once per session and torn down with [`shutdown`] (or by
/// dropping it). Invariant: `is_playing()` implies `current_track()` is set.
///
/// [`shutdown`]: PlaybackManager::shutdown
pub struct PlaybackManager {
    // Selection
    current_track: Option<Track>,
    queue: Queue,
    is_playing: bool,
    shuffle: bool,
    repeat: RepeatMode,

    // Progress as last reported by the output
    position: Duration,
    duration: Option<Duration>,

    volume: Volume,
    history: HistoryRecorder,

    sleep_timer: SleepTimer,
    sleep_timer_presets: Vec<u32>,

    index_source: Box<dyn IndexSource>,
    media: MediaResolver,
    output: Option<Box<dyn AudioOutput>>,
    // Bumped on every load; callbacks from older loads are dropped
    load_generation: u64,

    // Inbox for deferred input
    message_tx: UnboundedSender<EngineMessage>,
    message_rx: Option<UnboundedReceiver<EngineMessage>>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlaybackManager {
    /// Create new playback manager with an entropy-seeded shuffle source
    ///
    /// The recently-played list is loaded from `store` right away.
    pub fn new(config: PlaybackConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_index_source(config, store, Box::new(RandomIndexSource::from_entropy()))
    }

    /// Create new playback manager drawing shuffle indices from `index_source`
    pub fn with_index_source(
        config: PlaybackConfig,
        store: Box<dyn KeyValueStore>,
        index_source: Box<dyn IndexSource>,
    ) -> Self {
        let history = HistoryRecorder::load(store, config.history_key.as_str(), config.history_size);
        let (message_tx, message_rx) = mpsc::unbounded_channel();

        tracing::debug!(
            "Playback manager created (shuffle: {}, repeat: {:?}, {} recently played)",
            config.shuffle,
            config.repeat,
            history.list().len()
        );

        Self {
            current_track: None,
            queue: Queue::new(),
            is_playing: false,
            shuffle: config.shuffle,
            repeat: config.repeat,
            position: Duration::ZERO,
            duration: None,
            volume: Volume::new(config.volume),
            history,
            sleep_timer: SleepTimer::new(),
            media: config.media_resolver(),
            sleep_timer_presets: config.sleep_timer_presets,
            index_source,
            output: None,
            load_generation: 0,
            message_tx,
            message_rx: Some(message_rx),
            pending_events: Vec::new(),
        }
    }

    // ===== Audio Output =====

    /// Connect the media element
    ///
    /// Replaces (and detaches) any previous output. The new output receives
    /// the current volume and loop flag, and the current track if one is set.
    pub fn attach_output(&mut self, output: Box<dyn AudioOutput>) {
        self.detach_output();

        let request = self.next_load_request();
        let output = self.output.insert(output);
        output.set_volume(self.volume.level());
        output.set_loop(self.repeat.loops_track());

        if let Some(request) = request {
            output.load(&request);
            if self.is_playing {
                output.play();
            }
        }
    }

    /// Disconnect the media element; it stops delivering callbacks
    pub fn detach_output(&mut self) {
        if let Some(mut output) = self.output.take() {
            output.detach();
        }
    }

    /// Sender for audio callbacks
    ///
    /// Outputs hold a clone and report `EngineMessage::Audio` through it.
    pub fn message_sender(&self) -> UnboundedSender<EngineMessage> {
        self.message_tx.clone()
    }

    /// Hand the inbox to the host event loop
    ///
    /// The host then feeds every received message to [`handle_message`].
    /// Returns `None` once taken.
    ///
    /// [`handle_message`]: PlaybackManager::handle_message
    pub fn take_message_receiver(&mut self) -> Option<UnboundedReceiver<EngineMessage>> {
        self.message_rx.take()
    }

    /// Apply every message already waiting in the inbox
    ///
    /// Does nothing after the receiver has been taken. Returns the number
    /// of messages handled.
    pub fn process_pending_messages(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let Some(rx) = self.message_rx.as_mut() else {
                break;
            };
            let Ok(message) = rx.try_recv() else {
                break;
            };
            self.handle_message(message);
            handled += 1;
        }
        handled
    }

    /// Generation of the most recent load sent to the output
    pub fn load_generation(&self) -> u64 {
        self.load_generation
    }

    /// Apply one deferred message
    ///
    /// Audio callbacks from a superseded load are ignored.
    pub fn handle_message(&mut self, message: EngineMessage) {
        match message {
            EngineMessage::Audio { generation, event } => {
                if generation != self.load_generation {
                    tracing::debug!(
                        "Ignoring {:?} from superseded load (generation {}, current {})",
                        event,
                        generation,
                        self.load_generation
                    );
                    return;
                }
                self.handle_audio_event(event);
            }
            EngineMessage::SleepTimerElapsed { generation } => {
                if !self.sleep_timer.expire(generation) {
                    tracing::debug!("Ignoring stale sleep timer (generation {})", generation);
                    return;
                }
                tracing::info!("Sleep timer elapsed, pausing playback");
                self.set_playing(false);
                self.emit_sleep_timer_changed();
            }
        }
    }

    fn handle_audio_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::TimeUpdate { position } => {
                self.position = position;
                self.emit_position_update();
            }
            AudioEvent::LoadedMetadata { duration } => {
                self.duration = Some(duration);
                self.emit_position_update();
            }
            AudioEvent::Ended => self.play_next(true),
            AudioEvent::Error { message } => {
                tracing::warn!(
                    "Audio output failed for {:?}: {}",
                    self.current_track.as_ref().map(|t| t.id.as_str()),
                    message
                );
                self.apply_playing(false);
                self.pending_events.push(PlaybackEvent::PlaybackFailed {
                    track_id: self.current_track.as_ref().map(|t| t.id.clone()),
                    message: PLAYBACK_FAILED_NOTICE.to_string(),
                });
            }
            AudioEvent::Play => {
                if self.current_track.is_some() {
                    self.apply_playing(true);
                }
            }
            AudioEvent::Pause => self.apply_playing(false),
        }
    }

    // ===== Queue =====

    /// Start playing `track` with `list` as the new queue
    ///
    /// An empty `list` queues just `track`. The list is taken verbatim, even
    /// if it does not contain `track`. The track is recorded as recently
    /// played.
    pub fn set_queue_and_play(&mut self, track: Track, list: Vec<Track>) {
        let tracks = if list.is_empty() {
            vec![track.clone()]
        } else {
            list
        };
        self.queue.replace(tracks);
        self.emit_queue_changed();

        self.history.record(&track);
        self.pending_events.push(PlaybackEvent::HistoryChanged {
            length: self.history.list().len(),
        });

        self.change_track(track);
        self.set_playing(true);
    }

    /// Replay the queue entry at `index`, keeping the queue
    ///
    /// Out-of-range indices are ignored.
    pub fn play_from_queue(&mut self, index: usize) {
        let Some(track) = self.queue.get(index).cloned() else {
            return;
        };
        let list = self.queue.as_slice().to_vec();
        self.set_queue_and_play(track, list);
    }

    /// Queued tracks in playback order
    pub fn queue(&self) -> &[Track] {
        self.queue.as_slice()
    }

    /// Queue position of the current track
    pub fn queue_position(&self) -> Option<usize> {
        self.current_track
            .as_ref()
            .and_then(|current| self.queue.position_of(&current.id))
    }

    /// Whether `track` is the current track (queue highlight)
    pub fn is_current(&self, track: &Track) -> bool {
        self.current_track
            .as_ref()
            .is_some_and(|current| current.same_track(track))
    }

    // ===== Playback Control =====

    /// Flip between playing and paused; ignored with nothing loaded
    pub fn toggle_play_pause(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.set_playing(!self.is_playing);
    }

    /// Advance to the next track
    ///
    /// `is_auto_advance` is `true` only when the output reported the end of
    /// the track. An automatic advance past the last entry with repeat off
    /// stops instead of wrapping; a manual skip always wraps.
    pub fn play_next(&mut self, is_auto_advance: bool) {
        let len = self.queue.len();
        if len == 0 {
            return;
        }

        let current = self.queue_position();
        let next = if self.shuffle {
            pick_shuffle_index(self.index_source.as_mut(), len, current)
        } else {
            if is_auto_advance && self.repeat == RepeatMode::Off && current == Some(len - 1) {
                tracing::debug!("Reached end of queue, stopping");
                self.set_playing(false);
                return;
            }
            current.map_or(0, |index| (index + 1) % len)
        };

        self.jump_to(next);
    }

    /// Go back to the previous track, wrapping to the end of the queue
    pub fn play_prev(&mut self) {
        let len = self.queue.len();
        if len == 0 {
            return;
        }

        // An unqueued current track counts as index -1
        let prev = self
            .queue_position()
            .map_or(2 * len - 2, |index| index + len - 1)
            % len;

        self.jump_to(prev);
    }

    /// Apply a keyboard shortcut
    pub fn apply_shortcut(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::TogglePlayPause => self.toggle_play_pause(),
            Shortcut::Next => self.play_next(false),
            Shortcut::Previous => self.play_prev(),
        }
    }

    /// Handle a key press from the page
    ///
    /// Returns `true` if the key was bound (the page should then suppress
    /// its default action).
    pub fn handle_key(&mut self, press: &KeyPress) -> bool {
        match Shortcut::from_key(press) {
            Some(shortcut) => {
                self.apply_shortcut(shortcut);
                true
            }
            None => false,
        }
    }

    /// Jump to a position in the current track
    ///
    /// Clamped to the known duration; ignored with nothing loaded.
    pub fn seek(&mut self, position: Duration) {
        if self.current_track.is_none() {
            return;
        }

        let position = match self.duration {
            Some(duration) => position.min(duration),
            None => position,
        };

        self.position = position;
        if let Some(output) = self.output.as_mut() {
            output.seek(position);
        }
        self.emit_position_update();
    }

    // ===== Shuffle & Repeat =====

    /// Flip shuffle; the queue order is left alone
    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        tracing::debug!("Shuffle {}", if self.shuffle { "on" } else { "off" });
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle,
        });
    }

    /// Cycle repeat: Off → All → One → Off
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycle();
        if let Some(output) = self.output.as_mut() {
            output.set_loop(self.repeat.loops_track());
        }
        tracing::debug!("Repeat mode: {:?}", self.repeat);
        self.pending_events
            .push(PlaybackEvent::RepeatChanged { mode: self.repeat });
    }

    // ===== Volume =====

    /// Set volume level (0.0-1.0, clamped)
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_volume();
    }

    /// Mute, or restore the level from before muting
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    fn apply_volume(&mut self) {
        if let Some(output) = self.output.as_mut() {
            output.set_volume(self.volume.level());
        }
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    // ===== Sleep Timer =====

    /// Arm the sleep timer, replacing any pending one
    ///
    /// `None` or zero minutes just cancels. When the timer fires playback is
    /// paused; the current track and queue stay as they are.
    pub fn start_sleep_timer(&mut self, minutes: Option<u32>) {
        match minutes.filter(|&m| m > 0) {
            Some(minutes) => {
                self.sleep_timer.arm(minutes, self.message_tx.clone());
            }
            None => self.sleep_timer.cancel(),
        }
        self.emit_sleep_timer_changed();
    }

    /// Advance the sleep timer button through its presets
    pub fn cycle_sleep_timer(&mut self) {
        let next = next_preset(self.sleep_timer.minutes(), &self.sleep_timer_presets);
        self.start_sleep_timer(next);
    }

    // ===== History =====

    /// Empty the recently-played list
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.pending_events
            .push(PlaybackEvent::HistoryChanged { length: 0 });
    }

    /// Recently played tracks, most recent first
    pub fn recently_played(&self) -> Vec<&Track> {
        self.history.list().get_all()
    }

    // ===== State Queries =====

    /// Track currently selected
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Whether playback is active
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Whether shuffle is on
    pub fn is_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Minutes of the armed sleep timer
    pub fn sleep_timer_minutes(&self) -> Option<u32> {
        self.sleep_timer.minutes()
    }

    /// Volume level (0.0-1.0)
    pub fn volume(&self) -> f32 {
        self.volume.level()
    }

    /// Whether the volume is zero
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Playback position in the current track
    pub fn position(&self) -> Duration {
        self.position
    }

    /// Duration of the current track, once known
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Resolved cover image of the current track
    pub fn current_cover_url(&self) -> Option<String> {
        self.current_track
            .as_ref()
            .map(|track| self.media.cover_url(&track.cover_url))
    }

    /// Resolved audio URL of the current track
    pub fn current_audio_url(&self) -> Option<String> {
        self.current_track
            .as_ref()
            .and_then(|track| self.media.audio_url(&track.audio_url))
    }

    // ===== Lifecycle =====

    /// Tear the session down
    ///
    /// Cancels the sleep timer, detaches the output and closes the inbox so
    /// nothing fires afterwards. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.sleep_timer.cancel();
        self.detach_output();
        if let Some(rx) = self.message_rx.as_mut() {
            rx.close();
        }
        tracing::debug!("Playback manager shut down");
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events that have been emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn jump_to(&mut self, index: usize) {
        let Some(track) = self.queue.get(index).cloned() else {
            return;
        };
        self.change_track(track);
        self.set_playing(true);
    }

    /// Make `track` current and load it into the output
    fn change_track(&mut self, track: Track) {
        let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());
        tracing::debug!("Now playing: {} ({})", track.title, track.id);

        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        self.position = Duration::ZERO;
        self.duration = track.duration();
        self.current_track = Some(track);

        if let Some(request) = self.next_load_request() {
            if let Some(output) = self.output.as_mut() {
                output.load(&request);
            }
        }
    }

    /// Load request for the current track under a fresh generation
    fn next_load_request(&mut self) -> Option<LoadRequest> {
        let track = self.current_track.as_ref()?;
        self.load_generation += 1;
        Some(LoadRequest {
            generation: self.load_generation,
            track_id: track.id.clone(),
            url: self.media.audio_url(&track.audio_url),
            duration_hint: track.duration(),
            looping: self.repeat.loops_track(),
        })
    }

    /// Change the playing flag on request of the engine and drive the output
    fn set_playing(&mut self, playing: bool) {
        if playing && self.current_track.is_none() {
            return;
        }

        if let Some(output) = self.output.as_mut() {
            if playing {
                output.play();
            } else {
                output.pause();
            }
        }
        self.apply_playing(playing);
    }

    /// Mirror a playing flag reported by the output
    fn apply_playing(&mut self, playing: bool) {
        if self.is_playing == playing {
            return;
        }
        self.is_playing = playing;
        self.pending_events
            .push(PlaybackEvent::StateChanged { is_playing: playing });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_sleep_timer_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::SleepTimerChanged {
            minutes: self.sleep_timer.minutes(),
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_ms: self.position.as_millis() as u64,
            duration_ms: self.duration.unwrap_or_default().as_millis() as u64,
        });
    }
}

impl Drop for PlaybackManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for PlaybackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackManager")
            .field("current_track", &self.current_track.as_ref().map(|t| &t.id))
            .field("is_playing", &self.is_playing)
            .field("queue_len", &self.queue.len())
            .field("shuffle", &self.shuffle)
            .field("repeat", &self.repeat)
            .field("sleep_timer", &self.sleep_timer.minutes())
            .finish_non_exhaustive()
    }
}
