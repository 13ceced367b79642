//! Simulated media element
//!
//! Stands in for the browser `<audio>` element: it never decodes anything,
//! it just moves a playhead on a tokio interval and reports back the same
//! callbacks a real element would.

use crate::config::SimulationSettings;
use cadence_playback::{AudioEvent, AudioOutput, EngineMessage, LoadRequest};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Playhead {
    loaded: bool,
    position: Duration,
    duration: Duration,
    looping: bool,
}

/// `AudioOutput` driven by a timer instead of a decoder
pub struct SimulatedOutput {
    events: Option<UnboundedSender<EngineMessage>>,
    playhead: Arc<Mutex<Playhead>>,
    volume: f32,
    tick: Duration,
    step: Duration,
    default_duration: Duration,
    /// Generation of the loaded source, echoed on every callback
    generation: u64,
    ticker: Option<JoinHandle<()>>,
}

impl SimulatedOutput {
    pub fn new(events: UnboundedSender<EngineMessage>, settings: &SimulationSettings) -> Self {
        Self {
            events: Some(events),
            playhead: Arc::new(Mutex::new(Playhead::default())),
            volume: 1.0,
            tick: settings.tick(),
            step: settings.media_step(),
            default_duration: settings.default_track_duration(),
            generation: 0,
            ticker: None,
        }
    }

    /// Last volume set by the engine
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether the playhead is currently advancing
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn send(&self, event: AudioEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(EngineMessage::audio(self.generation, event));
        }
    }

    fn with_playhead<R>(&self, f: impl FnOnce(&mut Playhead) -> R) -> Option<R> {
        self.playhead.lock().ok().map(|mut head| f(&mut head))
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    fn start_ticker(&mut self) {
        if self.is_running() {
            return;
        }
        let Some(events) = self.events.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, simulated output cannot advance");
            return;
        };

        let playhead = Arc::clone(&self.playhead);
        let (tick, step, generation) = (self.tick, self.step, self.generation);

        self.ticker = Some(runtime.spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // The first tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                let (position, ended) = {
                    let Ok(mut head) = playhead.lock() else {
                        break;
                    };
                    head.position += step;
                    if head.position < head.duration {
                        (head.position, false)
                    } else if head.looping {
                        head.position = Duration::ZERO;
                        (Duration::ZERO, false)
                    } else {
                        head.position = head.duration;
                        (head.duration, true)
                    }
                };

                let update = EngineMessage::audio(generation, AudioEvent::TimeUpdate { position });
                if events.send(update).is_err() {
                    break;
                }
                if ended {
                    let _ = events.send(EngineMessage::audio(generation, AudioEvent::Ended));
                    break;
                }
            }
        }));
    }
}

impl AudioOutput for SimulatedOutput {
    fn load(&mut self, request: &LoadRequest) {
        self.stop_ticker();
        self.generation = request.generation;

        let Some(url) = &request.url else {
            self.with_playhead(|head| *head = Playhead::default());
            self.send(AudioEvent::Error {
                message: format!("no audio source for track {}", request.track_id),
            });
            return;
        };

        let duration = request.duration_hint.unwrap_or(self.default_duration);
        self.with_playhead(|head| {
            *head = Playhead {
                loaded: true,
                position: Duration::ZERO,
                duration,
                looping: request.looping,
            };
        });

        tracing::debug!("Loaded {}", url);
        self.send(AudioEvent::LoadedMetadata { duration });
    }

    fn play(&mut self) {
        if !self.with_playhead(|head| head.loaded).unwrap_or(false) {
            return;
        }
        self.start_ticker();
        self.send(AudioEvent::Play);
    }

    fn pause(&mut self) {
        let was_running = self.is_running();
        self.stop_ticker();
        if was_running {
            self.send(AudioEvent::Pause);
        }
    }

    fn seek(&mut self, position: Duration) {
        let position = self.with_playhead(|head| {
            head.position = position.min(head.duration);
            head.position
        });
        if let Some(position) = position {
            self.send(AudioEvent::TimeUpdate { position });
        }
    }

    fn set_volume(&mut self, level: f32) {
        self.volume = level;
    }

    fn set_loop(&mut self, looping: bool) {
        self.with_playhead(|head| head.looping = looping);
    }

    fn detach(&mut self) {
        self.stop_ticker();
        self.events = None;
    }
}

impl Drop for SimulatedOutput {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::TrackId;
    use tokio::sync::mpsc;

    fn settings() -> SimulationSettings {
        SimulationSettings {
            tick_ms: 1000,
            speed: 1.0,
            default_track_secs: 3,
        }
    }

    fn request(url: Option<&str>, looping: bool) -> LoadRequest {
        LoadRequest {
            generation: 1,
            track_id: TrackId::new("t"),
            url: url.map(str::to_string),
            duration_hint: None,
            looping,
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<EngineMessage>) -> Vec<AudioEvent> {
        let mut events = Vec::new();
        while let Ok(EngineMessage::Audio { event, .. }) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn plays_to_the_end() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut output = SimulatedOutput::new(tx, &settings());

        output.load(&request(Some("http://localhost:5000/a.mp3"), false));
        output.play();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let events = drain(&mut rx);
        assert_eq!(
            events.first(),
            Some(&AudioEvent::LoadedMetadata {
                duration: Duration::from_secs(3)
            })
        );
        assert_eq!(events.last(), Some(&AudioEvent::Ended));
        assert!(!output.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn looping_never_ends() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut output = SimulatedOutput::new(tx, &settings());

        output.load(&request(Some("http://localhost:5000/a.mp3"), true));
        output.play();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(!drain(&mut rx).contains(&AudioEvent::Ended));
        assert!(output.is_running());
    }

    #[tokio::test]
    async fn missing_url_reports_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut output = SimulatedOutput::new(tx, &settings());

        output.load(&request(None, false));
        output.play();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], AudioEvent::Error { .. }));
        assert!(!output.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_playhead() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut output = SimulatedOutput::new(tx, &settings());

        output.load(&request(Some("http://localhost:5000/a.mp3"), false));
        output.play();
        output.pause();
        drain(&mut rx);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn callbacks_carry_load_generation() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut output = SimulatedOutput::new(tx, &settings());

        output.load(&request(Some("http://localhost:5000/a.mp3"), false));
        output.play();
        output.load(&LoadRequest {
            generation: 2,
            ..request(Some("http://localhost:5000/b.mp3"), false)
        });
        output.play();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let mut generations = Vec::new();
        while let Ok(EngineMessage::Audio { generation, .. }) = rx.try_recv() {
            generations.push(generation);
        }
        // LoadedMetadata + Play for each load, then ticks for the second only
        assert_eq!(generations, vec![1, 1, 2, 2, 2]);
    }

    #[tokio::test]
    async fn detached_output_is_silent() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut output = SimulatedOutput::new(tx, &settings());

        output.detach();
        output.load(&request(None, false));
        assert!(drain(&mut rx).is_empty());
    }
}
