//! Entry fade for the strip preview
//!
//! The preview fades in when the strip first gets photos. Only the
//! on-screen preview fades; exports are always taken at full opacity.

use iced::time::Instant;
use std::time::Duration;

pub const FADE_DURATION: Duration = Duration::from_millis(600);

#[derive(Debug, Clone, Copy)]
pub struct FadeIn {
    started: Option<Instant>,
    duration: Duration,
}

impl Default for FadeIn {
    fn default() -> Self {
        Self::new(FADE_DURATION)
    }
}

impl FadeIn {
    pub fn new(duration: Duration) -> Self {
        Self {
            started: None,
            duration,
        }
    }

    /// Restart the fade from fully transparent
    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    /// Opacity at `now`: 0.0 at the start, 1.0 once finished or never started
    pub fn opacity(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return 1.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }

        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Whether frames are still needed to finish the fade
    pub fn is_running(&self, now: Instant) -> bool {
        self.opacity(now) < 1.0
    }
}
