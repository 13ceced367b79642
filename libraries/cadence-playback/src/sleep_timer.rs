//! Sleep timer
//!
//! A one-shot countdown that pauses playback. At most one timer is pending:
//! arming aborts the previous task and bumps the generation, so an expiry
//! that was already in flight is recognised as stale and ignored.

use crate::output::EngineMessage;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Single-flight sleep timer
#[derive(Debug, Default)]
pub struct SleepTimer {
    /// Armed minutes (cleared on cancel and expiry)
    minutes: Option<u32>,

    /// Identifies the most recently armed timer
    generation: u64,

    /// Countdown task
    task: Option<JoinHandle<()>>,
}

impl SleepTimer {
    /// Create a disarmed timer
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm for `minutes`, replacing any pending timer
    ///
    /// On expiry `EngineMessage::SleepTimerElapsed` is sent on `tx`. Needs a
    /// running tokio runtime; without one nothing is armed and `false` is
    /// returned.
    pub fn arm(&mut self, minutes: u32, tx: UnboundedSender<EngineMessage>) -> bool {
        self.arm_for(minutes, Duration::from_secs(u64::from(minutes) * 60), tx)
    }

    fn arm_for(&mut self, minutes: u32, after: Duration, tx: UnboundedSender<EngineMessage>) -> bool {
        self.cancel();

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("No async runtime, sleep timer of {} min not armed", minutes);
            return false;
        };

        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;

        self.task = Some(runtime.spawn(async move {
            tokio::time::sleep(after).await;
            let _ = tx.send(EngineMessage::SleepTimerElapsed { generation });
        }));
        self.minutes = Some(minutes);

        tracing::debug!("Sleep timer armed: {} min (generation {})", minutes, generation);
        true
    }

    /// Abort the pending timer, if any
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.minutes = None;
    }

    /// Consume an expiry notification
    ///
    /// Returns `true` if `generation` belongs to the armed timer, which is
    /// then cleared. Stale or duplicate notifications return `false`.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.minutes.is_none() || generation != self.generation {
            return false;
        }
        self.task = None;
        self.minutes = None;
        true
    }

    /// Armed minutes
    pub fn minutes(&self) -> Option<u32> {
        self.minutes
    }

    /// Whether a timer is armed and has not expired yet
    pub fn is_armed(&self) -> bool {
        self.minutes.is_some()
    }

    /// Generation of the most recently armed timer
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for SleepTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Next value of the sleep timer button: none → first preset → … → none
///
/// A current value that is not a preset cycles back to none.
pub fn next_preset(current: Option<u32>, presets: &[u32]) -> Option<u32> {
    match current {
        None => presets.first().copied(),
        Some(minutes) => presets
            .iter()
            .position(|&p| p == minutes)
            .and_then(|i| presets.get(i + 1))
            .copied(),
    }
}
