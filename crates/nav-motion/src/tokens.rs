//! Motion tokens for Waypoint
//!
//! Durations, easing curves and transform magnitudes shared by navigation
//! transitions and the predictive-back preview.

use crate::easing::Easing;

// =============================================================================
// Duration Tokens
// =============================================================================

/// Animation durations in milliseconds
pub mod duration {
    /// Instant (no animation)
    pub const INSTANT: u64 = 0;
    /// Extra fast
    pub const EXTRA_FAST: u64 = 50;
    /// Fast
    pub const FAST: u64 = 100;
    /// Normal
    pub const NORMAL: u64 = 150;
    /// Moderate
    pub const MODERATE: u64 = 200;
    /// Slow
    pub const SLOW: u64 = 300;
    /// Extra slow
    pub const EXTRA_SLOW: u64 = 500;

    /// Content arriving on screen (push)
    pub const ENTER: u64 = SLOW;
    /// Content leaving the screen (pop, settle)
    pub const EXIT: u64 = NORMAL;
    /// Dragged screen returning to rest after a cancelled back gesture
    pub const ROLLBACK: u64 = FAST;
}

// =============================================================================
// Easing Tokens
// =============================================================================

/// Easing curves
pub mod easing {
    use super::Easing;

    /// Default easing
    pub const DEFAULT: Easing = Easing::cubic_bezier(0.17, 0.73, 0.14, 1.0);
    /// Linear
    pub const LINEAR: Easing = Easing::Linear;
    /// Ease in (accelerate)
    pub const EASE_IN: Easing = Easing::cubic_bezier(0.4, 0.0, 1.0, 1.0);
    /// Ease out (decelerate)
    pub const EASE_OUT: Easing = Easing::cubic_bezier(0.0, 0.0, 0.2, 1.0);
    /// Ease in-out
    pub const EASE_IN_OUT: Easing = Easing::cubic_bezier(0.4, 0.0, 0.2, 1.0);

    /// Entering content settles gently
    pub const ENTER: Easing = EASE_OUT;
    /// Exiting content leaves quickly
    pub const EXIT: Easing = EASE_IN;
}

// =============================================================================
// Transform Tokens
// =============================================================================

/// Transform magnitudes (translations are fractions of the container width)
pub mod transform {
    /// Scale an entering screen starts from
    pub const ENTER_SCALE: f32 = 0.9;
    /// Scale an exiting screen ends at
    pub const EXIT_SCALE: f32 = 0.9;
    /// Horizontal distance travelled by entering and exiting screens
    pub const SLIDE_FRACTION: f32 = 0.5;
    /// Scale of the top screen at full predictive-back progress
    pub const PEEK_SCALE: f32 = 0.9;
    /// Trailing-edge shift of the top screen at full predictive-back progress
    pub const PEEK_TRANSLATE: f32 = 0.1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_scale() {
        assert!(duration::INSTANT < duration::EXTRA_FAST);
        assert!(duration::EXTRA_FAST < duration::FAST);
        assert!(duration::FAST < duration::NORMAL);
        assert!(duration::NORMAL < duration::MODERATE);
        assert!(duration::MODERATE < duration::SLOW);
        assert!(duration::SLOW < duration::EXTRA_SLOW);
    }

    #[test]
    fn test_enter_is_twice_exit() {
        assert_eq!(duration::ENTER, duration::EXIT * 2);
        assert!(duration::ROLLBACK < duration::EXIT);
    }

    #[test]
    fn test_easing_css() {
        assert_eq!(easing::EASE_OUT.css(), "cubic-bezier(0, 0, 0.2, 1)");
        assert_eq!(easing::EASE_IN.css(), "cubic-bezier(0.4, 0, 1, 1)");
        assert_eq!(easing::LINEAR.css(), "linear");
    }

    #[test]
    fn test_transform_magnitudes() {
        assert!(transform::ENTER_SCALE < 1.0 && transform::ENTER_SCALE >= 0.85);
        assert!(transform::PEEK_TRANSLATE < transform::SLIDE_FRACTION);
    }
}
