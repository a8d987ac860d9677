//! Black overlay that fades out after a block transition.

use crate::constants::TRANSITION_FADE_MS;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransitionFade {
    started_at: Option<u64>,
}

impl TransitionFade {
    pub fn start(&mut self, now_ms: u64) {
        self.started_at = Some(now_ms);
    }

    pub fn is_active(&self, now_ms: u64) -> bool {
        self.alpha(now_ms) > 0
    }

    /// Overlay alpha: 255 on the transition frame, falling linearly to 0
    pub fn alpha(&self, now_ms: u64) -> u8 {
        let Some(start) = self.started_at else {
            return 0;
        };
        let elapsed = now_ms.saturating_sub(start) as f32;
        let remaining = (1.0 - elapsed / TRANSITION_FADE_MS).clamp(0.0, 1.0);
        (255.0 * remaining).round() as u8
    }
}
