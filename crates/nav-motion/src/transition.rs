//! Transition planning
//!
//! Picks duration, easing and enter/exit transforms for a navigation
//! transition from its direction and the reduce-motion flag.
//!
//! Entering content uses the long, decelerating profile. Exiting or
//! reversing content uses the short, accelerating one.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::easing::Easing;
use crate::preference::MotionPreference;
use crate::tokens;
use crate::transform::{Transform, TransformRange};

/// Motion configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// Entering scale outside (0, 1]
    #[error("enterScale must be in (0, 1], got {0}")]
    EnterScale(f32),

    /// Exiting scale outside (0, 1]
    #[error("exitScale must be in (0, 1], got {0}")]
    ExitScale(f32),

    /// Peek scale outside (0, 1]
    #[error("peekScale must be in (0, 1], got {0}")]
    PeekScale(f32),

    /// Slide fraction outside [0, 1]
    #[error("slideFraction must be in [0, 1], got {0}")]
    SlideFraction(f32),

    /// Peek translation outside [0, 1]
    #[error("peekTranslate must be in [0, 1], got {0}")]
    PeekTranslate(f32),
}

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Push or replace: new content arrives on top
    Forward,
    /// Pop: the top content leaves and reveals the one beneath
    Backward,
}

/// Concrete animation values for one transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPlan {
    /// Direction this plan was made for
    pub direction: Direction,
    /// Total duration
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Timing curve
    pub easing: Easing,
    /// Transform range for the screen becoming current
    pub enter: TransformRange,
    /// Transform range for the screen losing current status
    pub exit: TransformRange,
}

impl TransitionPlan {
    /// A plan that does nothing (zero duration, identity transforms)
    pub fn instant(direction: Direction) -> Self {
        Self {
            direction,
            duration: Duration::ZERO,
            easing: Easing::Linear,
            enter: TransformRange::IDENTITY,
            exit: TransformRange::IDENTITY,
        }
    }

    /// Check whether this plan animates anything
    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Enter transform at linear progress `t`
    pub fn enter_at(&self, t: f32) -> Transform {
        self.enter.at(self.easing.evaluate(t))
    }

    /// Exit transform at linear progress `t`
    pub fn exit_at(&self, t: f32) -> Transform {
        self.exit.at(self.easing.evaluate(t))
    }
}

/// A single-layer animation plan (predictive-back settle and rollback)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerPlan {
    /// Total duration
    pub duration: Duration,
    /// Timing curve
    pub easing: Easing,
    /// Transform range of the layer
    pub range: TransformRange,
}

// =============================================================================
// Configuration
// =============================================================================

/// Motion configuration; defaults come from [`tokens`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionConfig {
    /// Entering-content duration in milliseconds
    pub enter_duration_ms: u64,
    /// Exiting-content duration in milliseconds
    pub exit_duration_ms: u64,
    /// Predictive-back rollback duration in milliseconds
    pub rollback_duration_ms: u64,
    /// Entering-content curve
    pub enter_easing: Easing,
    /// Exiting-content curve
    pub exit_easing: Easing,
    /// Scale an entering screen starts from
    pub enter_scale: f32,
    /// Scale an exiting screen ends at
    pub exit_scale: f32,
    /// Horizontal travel of entering/exiting screens (fraction of width)
    pub slide_fraction: f32,
    /// Scale of the top screen at full back-gesture progress
    pub peek_scale: f32,
    /// Trailing-edge shift of the top screen at full back-gesture progress
    pub peek_translate: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            enter_duration_ms: tokens::duration::ENTER,
            exit_duration_ms: tokens::duration::EXIT,
            rollback_duration_ms: tokens::duration::ROLLBACK,
            enter_easing: tokens::easing::ENTER,
            exit_easing: tokens::easing::EXIT,
            enter_scale: tokens::transform::ENTER_SCALE,
            exit_scale: tokens::transform::EXIT_SCALE,
            slide_fraction: tokens::transform::SLIDE_FRACTION,
            peek_scale: tokens::transform::PEEK_SCALE,
            peek_translate: tokens::transform::PEEK_TRANSLATE,
        }
    }
}

impl MotionConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entering-content duration
    pub fn enter_duration(mut self, duration: Duration) -> Self {
        self.enter_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the exiting-content duration
    pub fn exit_duration(mut self, duration: Duration) -> Self {
        self.exit_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the predictive-back rollback duration
    pub fn rollback_duration(mut self, duration: Duration) -> Self {
        self.rollback_duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the entering scale (clamped to [0.5, 1.0])
    pub fn enter_scale(mut self, scale: f32) -> Self {
        self.enter_scale = scale.clamp(0.5, 1.0);
        self
    }

    /// Set the exiting scale (clamped to [0.5, 1.0])
    pub fn exit_scale(mut self, scale: f32) -> Self {
        self.exit_scale = scale.clamp(0.5, 1.0);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), MotionError> {
        let scale_ok = |v: f32| v > 0.0 && v <= 1.0;
        let fraction_ok = |v: f32| (0.0..=1.0).contains(&v);

        if !scale_ok(self.enter_scale) {
            return Err(MotionError::EnterScale(self.enter_scale));
        }
        if !scale_ok(self.exit_scale) {
            return Err(MotionError::ExitScale(self.exit_scale));
        }
        if !scale_ok(self.peek_scale) {
            return Err(MotionError::PeekScale(self.peek_scale));
        }
        if !fraction_ok(self.slide_fraction) {
            return Err(MotionError::SlideFraction(self.slide_fraction));
        }
        if !fraction_ok(self.peek_translate) {
            return Err(MotionError::PeekTranslate(self.peek_translate));
        }
        Ok(())
    }
}

// =============================================================================
// Planner
// =============================================================================

/// Computes transition plans
///
/// The planner holds no motion state: callers pass the reduce-motion flag
/// (or a [`MotionPreference`] that is read exactly once) for every plan.
#[derive(Debug, Clone, Default)]
pub struct TransitionPlanner {
    config: MotionConfig,
}

impl TransitionPlanner {
    /// Create a planner
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Plan a navigation transition
    pub fn plan(&self, direction: Direction, reduce_motion: bool) -> TransitionPlan {
        if reduce_motion {
            return TransitionPlan::instant(direction);
        }

        let c = &self.config;
        match direction {
            Direction::Forward => TransitionPlan {
                direction,
                duration: Duration::from_millis(c.enter_duration_ms),
                easing: c.enter_easing,
                enter: TransformRange::new(
                    Transform::new(-c.slide_fraction, c.enter_scale, 0.0),
                    Transform::IDENTITY,
                ),
                // Covered screen stays where it is
                exit: TransformRange::IDENTITY,
            },
            Direction::Backward => TransitionPlan {
                direction,
                duration: Duration::from_millis(c.exit_duration_ms),
                easing: c.exit_easing,
                // Revealed screen is already at rest beneath
                enter: TransformRange::IDENTITY,
                exit: TransformRange::new(Transform::IDENTITY, self.exited()),
            },
        }
    }

    /// Plan a transition, reading the preference exactly once
    pub fn plan_for(&self, direction: Direction, motion: &dyn MotionPreference) -> TransitionPlan {
        self.plan(direction, motion.reduce_motion())
    }

    /// Top-screen transform while a back gesture is at `progress`
    pub fn peek_transform(&self, progress: f32) -> Transform {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let c = &self.config;
        Transform::lerp(
            Transform::IDENTITY,
            Transform::new(c.peek_translate, c.peek_scale, 1.0),
            p,
        )
    }

    /// Animate a released back gesture from `from` to fully exited
    pub fn settle_plan(&self, from: Transform, reduce_motion: bool) -> LayerPlan {
        if reduce_motion {
            return LayerPlan {
                duration: Duration::ZERO,
                easing: Easing::Linear,
                range: TransformRange::new(from, self.exited()),
            };
        }
        LayerPlan {
            duration: Duration::from_millis(self.config.exit_duration_ms),
            easing: self.config.exit_easing,
            range: TransformRange::new(from, self.exited()),
        }
    }

    /// Animate a cancelled back gesture from `from` back to rest
    pub fn rollback_plan(&self, from: Transform, reduce_motion: bool) -> LayerPlan {
        if reduce_motion {
            return LayerPlan {
                duration: Duration::ZERO,
                easing: Easing::Linear,
                range: TransformRange::IDENTITY,
            };
        }
        LayerPlan {
            duration: Duration::from_millis(self.config.rollback_duration_ms),
            easing: self.config.enter_easing,
            range: TransformRange::new(from, Transform::IDENTITY),
        }
    }

    fn exited(&self) -> Transform {
        let c = &self.config;
        Transform::new(c.slide_fraction, c.exit_scale, 0.0)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preference::MockMotionPreference;

    #[test]
    fn test_forward_plan() {
        let plan = TransitionPlanner::default().plan(Direction::Forward, false);
        assert_eq!(plan.duration, Duration::from_millis(300));
        assert_eq!(plan.easing, tokens::easing::EASE_OUT);

        // Incoming starts at the leading edge, faded out and scaled down
        let start = plan.enter_at(0.0);
        assert!(start.translate_x < 0.0);
        assert_eq!(start.alpha, 0.0);
        assert!((start.scale - 0.9).abs() < 1e-6);
        assert_eq!(plan.enter_at(1.0), Transform::IDENTITY);

        // Outgoing is simply covered
        assert!(plan.exit.is_identity());
    }

    #[test]
    fn test_backward_plan() {
        let plan = TransitionPlanner::default().plan(Direction::Backward, false);
        assert_eq!(plan.duration, Duration::from_millis(150));
        assert_eq!(plan.easing, tokens::easing::EASE_IN);

        let end = plan.exit_at(1.0);
        assert!(end.translate_x > 0.0);
        assert_eq!(end.alpha, 0.0);
        assert!(end.scale < 1.0);
        assert_eq!(plan.exit_at(0.0), Transform::IDENTITY);
        assert!(plan.enter.is_identity());
    }

    #[test]
    fn test_enter_is_longer_than_exit() {
        let planner = TransitionPlanner::default();
        let forward = planner.plan(Direction::Forward, false);
        let backward = planner.plan(Direction::Backward, false);
        assert_eq!(forward.duration, backward.duration * 2);
    }

    #[test]
    fn test_reduce_motion_collapses_plan() {
        let planner = TransitionPlanner::default();
        for direction in [Direction::Forward, Direction::Backward] {
            let plan = planner.plan(direction, true);
            assert!(plan.is_instant());
            assert!(plan.enter.is_identity());
            assert!(plan.exit.is_identity());
            assert_eq!(plan.direction, direction);
        }
    }

    #[test]
    fn test_preference_read_once_per_plan() {
        let mut motion = MockMotionPreference::new();
        let mut seq = mockall::Sequence::new();
        motion
            .expect_reduce_motion()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(false);
        motion
            .expect_reduce_motion()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(true);

        let planner = TransitionPlanner::default();
        assert!(!planner.plan_for(Direction::Forward, &motion).is_instant());
        assert!(planner.plan_for(Direction::Forward, &motion).is_instant());
    }

    #[test]
    fn test_peek_transform() {
        let planner = TransitionPlanner::default();
        assert_eq!(planner.peek_transform(0.0), Transform::IDENTITY);

        let full = planner.peek_transform(1.0);
        assert!((full.scale - 0.9).abs() < 1e-6);
        assert!((full.translate_x - 0.1).abs() < 1e-6);
        assert_eq!(full.alpha, 1.0);

        assert_eq!(planner.peek_transform(3.0), full);
        assert_eq!(planner.peek_transform(f32::NAN), Transform::IDENTITY);

        let half = planner.peek_transform(0.5);
        assert!(half.scale > full.scale && half.scale < 1.0);
    }

    #[test]
    fn test_settle_and_rollback_plans() {
        let planner = TransitionPlanner::default();
        let from = planner.peek_transform(0.7);

        let settle = planner.settle_plan(from, false);
        assert_eq!(settle.range.from, from);
        assert_eq!(settle.range.to.alpha, 0.0);
        assert_eq!(settle.duration, Duration::from_millis(150));

        let rollback = planner.rollback_plan(from, false);
        assert_eq!(rollback.range.to, Transform::IDENTITY);
        assert!(rollback.duration < settle.duration);

        assert!(planner.settle_plan(from, true).duration.is_zero());
        assert!(planner.rollback_plan(from, true).range.is_identity());
    }

    #[test]
    fn test_config_validation() {
        assert!(MotionConfig::default().validate().is_ok());

        let config = MotionConfig {
            peek_scale: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(MotionError::PeekScale(0.0)));

        let config = MotionConfig {
            slide_fraction: 1.5,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(MotionError::SlideFraction(1.5)));
        assert!(config.validate().unwrap_err().to_string().contains("slideFraction"));
    }

    #[test]
    fn test_oversized_duration_saturates() {
        let config = MotionConfig::new().enter_duration(Duration::MAX);
        assert_eq!(config.enter_duration_ms, u64::MAX);

        let config = MotionConfig::new().exit_duration(Duration::from_millis(80));
        assert_eq!(config.exit_duration_ms, 80);
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: MotionConfig = serde_json::from_str(r#"{"enterDurationMs": 400}"#).unwrap();
        assert_eq!(config.enter_duration_ms, 400);
        assert_eq!(config.exit_duration_ms, tokens::duration::EXIT);
    }

    #[test]
    fn test_plan_serialization() {
        let plan = TransitionPlanner::default().plan(Direction::Forward, false);
        let json = serde_json::to_value(plan).unwrap();
        assert_eq!(json["duration"], 300);
        assert_eq!(json["direction"], "forward");
    }
}
