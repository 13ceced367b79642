//! Interactive session
//!
//! Ties the catalog, the engine, and the prompt together. Each command is
//! applied to the engine and answered with plain text; engine events are
//! rendered separately so the same wording appears whether a change came
//! from the prompt, the output, or the sleep timer.

use crate::commands::{Command, SleepArg};
use cadence_core::{filter_tracks, Track};
use cadence_playback::{
    format_time, KeyPress, PlaybackEvent, PlaybackManager, RepeatMode,
};
use std::fmt::Write;

/// What the prompt loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Session {
    manager: PlaybackManager,
    catalog: Vec<Track>,
    /// Last listing, the candidate queue for `play`
    visible: Vec<Track>,
}

impl Session {
    pub fn new(manager: PlaybackManager, catalog: Vec<Track>) -> Self {
        Self {
            manager,
            visible: catalog.clone(),
            catalog,
        }
    }

    pub fn manager(&self) -> &PlaybackManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut PlaybackManager {
        &mut self.manager
    }

    /// Apply one command
    pub fn execute(&mut self, command: Command) -> Reply {
        let text = match command {
            Command::List { filter } => {
                self.visible = filter_tracks(&self.catalog, &filter);
                if self.visible.is_empty() {
                    format!("no songs match {:?}", filter)
                } else {
                    self.render_list(&self.visible)
                }
            }
            Command::Play { index } => match self.visible.get(index).cloned() {
                Some(track) => {
                    self.manager.set_queue_and_play(track, self.visible.clone());
                    String::new()
                }
                None => format!("no song {} in the last list", index + 1),
            },
            Command::Jump { index } => {
                if index < self.manager.queue().len() {
                    self.manager.play_from_queue(index);
                    String::new()
                } else {
                    format!("no entry {} in the queue", index + 1)
                }
            }
            Command::TogglePlayPause => {
                if self.manager.current_track().is_none() {
                    "nothing to play yet".to_string()
                } else {
                    self.manager.toggle_play_pause();
                    String::new()
                }
            }
            Command::Next => {
                self.manager.play_next(false);
                String::new()
            }
            Command::Prev => {
                self.manager.play_prev();
                String::new()
            }
            Command::Shuffle => {
                self.manager.toggle_shuffle();
                String::new()
            }
            Command::Repeat => {
                self.manager.toggle_repeat();
                String::new()
            }
            Command::Sleep { minutes } => {
                match minutes {
                    None => self.manager.cycle_sleep_timer(),
                    Some(SleepArg::Off) => self.manager.start_sleep_timer(None),
                    Some(SleepArg::Minutes(m)) => self.manager.start_sleep_timer(Some(m)),
                }
                String::new()
            }
            Command::Seek { position } => {
                self.manager.seek(position);
                String::new()
            }
            Command::Volume { percent } => {
                self.manager.set_volume(f32::from(percent) / 100.0);
                String::new()
            }
            Command::Mute => {
                self.manager.toggle_mute();
                String::new()
            }
            Command::Key { code, ctrl, meta } => {
                let press = KeyPress {
                    code: Some(code),
                    ctrl,
                    meta,
                    in_text_field: false,
                };
                if self.manager.handle_key(&press) {
                    String::new()
                } else {
                    "key not bound".to_string()
                }
            }
            Command::Queue => self.render_queue(),
            Command::Recent => {
                let recent: Vec<Track> = self
                    .manager
                    .recently_played()
                    .into_iter()
                    .cloned()
                    .collect();
                if recent.is_empty() {
                    "nothing played yet".to_string()
                } else {
                    self.render_list(&recent)
                }
            }
            Command::ClearRecent => {
                self.manager.clear_history();
                String::new()
            }
            Command::Status => self.status(),
            Command::Help => crate::commands::HELP.to_string(),
            Command::Quit => return Reply::Quit,
        };
        Reply::Text(text)
    }

    /// One-line summary of the player bar
    pub fn status(&self) -> String {
        let manager = &self.manager;
        let Some(track) = manager.current_track() else {
            return "stopped, nothing selected".to_string();
        };

        let mut line = format!(
            "{} {} - {} [{} / {}]",
            if manager.is_playing() { "▶" } else { "⏸" },
            track.title,
            track.artist,
            format_time(manager.position()),
            manager.duration().map_or_else(|| "0:00".to_string(), format_time),
        );

        let _ = write!(line, " vol {:.0}%", manager.volume() * 100.0);
        if manager.is_shuffle() {
            line.push_str(" shuffle");
        }
        match manager.repeat_mode() {
            RepeatMode::Off => {}
            RepeatMode::All => line.push_str(" repeat"),
            RepeatMode::One => line.push_str(" repeat-one"),
        }
        if let Some(minutes) = manager.sleep_timer_minutes() {
            let _ = write!(line, " sleep {}m", minutes);
        }
        line
    }

    /// Render an engine event, `None` for events not worth a line
    pub fn describe(&self, event: &PlaybackEvent) -> Option<String> {
        let text = match event {
            PlaybackEvent::TrackChanged { track_id, .. } => {
                let track = self
                    .manager
                    .queue()
                    .iter()
                    .find(|t| &t.id == track_id)
                    .or_else(|| self.manager.current_track())?;
                format!("now playing: {} - {}", track.title, track.artist)
            }
            PlaybackEvent::StateChanged { is_playing } => {
                let state = if *is_playing { "playing" } else { "paused" };
                state.to_string()
            }
            PlaybackEvent::ShuffleChanged { enabled } => {
                format!("shuffle {}", if *enabled { "on" } else { "off" })
            }
            PlaybackEvent::RepeatChanged { mode } => format!("repeat {:?}", mode).to_lowercase(),
            PlaybackEvent::SleepTimerChanged { minutes } => match minutes {
                Some(minutes) => format!("sleep timer: {} min", minutes),
                None => "sleep timer off".to_string(),
            },
            PlaybackEvent::VolumeChanged { level, is_muted } => {
                if *is_muted {
                    "muted".to_string()
                } else {
                    format!("volume {:.0}%", level * 100.0)
                }
            }
            PlaybackEvent::PlaybackFailed { message, .. } => format!("error: {}", message),
            PlaybackEvent::HistoryChanged { .. }
            | PlaybackEvent::QueueChanged { .. }
            | PlaybackEvent::PositionUpdate { .. } => return None,
        };
        Some(text)
    }

    /// Drain engine events into display lines
    pub fn drain_messages(&mut self) -> Vec<String> {
        let events = self.manager.drain_events();
        events.iter().filter_map(|e| self.describe(e)).collect()
    }

    fn render_list(&self, tracks: &[Track]) -> String {
        let mut out = String::new();
        for (i, track) in tracks.iter().enumerate() {
            let marker = if self.manager.is_current(track) { '*' } else { ' ' };
            let _ = writeln!(out, "{}{:>3}. {} - {}", marker, i + 1, track.title, track.artist);
        }
        out.trim_end().to_string()
    }

    fn render_queue(&self) -> String {
        let queue = self.manager.queue();
        if queue.is_empty() {
            return "queue is empty".to_string();
        }
        self.render_list(queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::demo_catalog;
    use cadence_playback::PlaybackConfig;
    use cadence_storage::MemoryStore;

    fn session() -> Session {
        let manager = PlaybackManager::new(PlaybackConfig::default(), Box::new(MemoryStore::new()));
        Session::new(manager, demo_catalog())
    }

    fn run(session: &mut Session, line: &str) -> Reply {
        let command = Command::parse(line).unwrap().unwrap();
        session.execute(command)
    }

    #[test]
    fn play_queues_filtered_listing() {
        let mut session = session();
        run(&mut session, "list mira");
        run(&mut session, "play 2");

        let manager = session.manager();
        assert_eq!(manager.queue().len(), 2);
        assert_eq!(manager.current_track().unwrap().title, "Low Tide");
        assert!(manager.is_playing());
    }

    #[test]
    fn play_out_of_range_explains() {
        let mut session = session();
        let reply = run(&mut session, "play 99");
        assert_eq!(reply, Reply::Text("no song 99 in the last list".to_string()));
    }

    #[test]
    fn events_render_as_lines() {
        let mut session = session();
        run(&mut session, "play 1");
        run(&mut session, "shuffle");

        let lines = session.drain_messages();
        assert!(lines.contains(&"now playing: Morning Drive - The Commuters".to_string()));
        assert!(lines.contains(&"playing".to_string()));
        assert!(lines.contains(&"shuffle on".to_string()));
    }

    #[test]
    fn status_shows_flags() {
        let mut session = session();
        assert_eq!(session.status(), "stopped, nothing selected");

        run(&mut session, "play 1");
        run(&mut session, "repeat");
        run(&mut session, "volume 50");
        let status = session.status();
        assert!(status.contains("Morning Drive"));
        assert!(status.contains("3:32"));
        assert!(status.contains("vol 50%"));
        assert!(status.contains(" repeat"));
    }

    #[test]
    fn queue_marks_current() {
        let mut session = session();
        run(&mut session, "play 3");
        let Reply::Text(text) = run(&mut session, "queue") else {
            panic!("expected text");
        };
        assert!(text.lines().nth(2).unwrap().starts_with('*'));
    }

    #[test]
    fn quit_ends_session() {
        let mut session = session();
        assert_eq!(run(&mut session, "quit"), Reply::Quit);
    }
}
