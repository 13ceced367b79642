//! Volume control
//!
//! Linear 0.0-1.0 level as understood by the audio element, with mute
//! implemented as "level 0, remember what to go back to".

/// Volume controller
///
/// Muting sets the level to zero; unmuting restores the last non-zero level
/// the user picked (full volume if there never was one).
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Level restored by unmute
    restore_level: f32,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `level` - Initial volume (clamped to 0.0-1.0, default: 1.0)
    pub fn new(level: f32) -> Self {
        let level = clamp_level(level);
        Self {
            level,
            restore_level: if level > 0.0 { level } else { 1.0 },
        }
    }

    /// Set volume level (0.0-1.0)
    ///
    /// Any non-zero level becomes the unmute target.
    pub fn set_level(&mut self, level: f32) {
        self.level = clamp_level(level);
        if self.level > 0.0 {
            self.restore_level = self.level;
        }
    }

    /// Get current volume level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        if self.level > 0.0 {
            self.level = 0.0;
        } else {
            self.level = self.restore_level;
        }
    }

    /// Check if muted (level is zero)
    pub fn is_muted(&self) -> bool {
        self.level == 0.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn clamp_level(level: f32) -> f32 {
    if level.is_nan() {
        return 0.0;
    }
    level.clamp(0.0, 1.0)
}
