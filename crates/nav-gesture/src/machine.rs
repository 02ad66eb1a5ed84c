//! Predictive-back driver
//!
//! Feeds inputs through [`transition`] and runs the resulting effects
//! against a [`BackTarget`]. The only effect that touches the back-stack is
//! [`BackEffect::CommitPop`], so a gesture released below the threshold or
//! cancelled never reaches the target's `pop`.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use nav_core::Navigator;

use crate::state::{transition, BackContext, BackEffect, BackInput, BackState, GestureEvent};

/// Gesture configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GestureError {
    /// Threshold outside (0, 1]
    #[error("Commit threshold must be in (0, 1], got {0}")]
    InvalidThreshold(f32),
}

/// Result type for gesture configuration
pub type Result<T> = std::result::Result<T, GestureError>;

/// Predictive-back configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GestureConfig {
    /// Release progress at or above which the pop is committed
    pub commit_threshold: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            commit_threshold: 0.5,
        }
    }
}

impl GestureConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the commit threshold
    pub fn commit_threshold(mut self, threshold: f32) -> Self {
        self.commit_threshold = threshold;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let t = self.commit_threshold;
        if t > 0.0 && t <= 1.0 {
            Ok(())
        } else {
            Err(GestureError::InvalidThreshold(t))
        }
    }
}

/// What a back gesture acts on
#[cfg_attr(test, mockall::automock)]
pub trait BackTarget {
    /// Whether there is a screen to go back to
    fn can_go_back(&self) -> bool;

    /// Remove the top screen; returns false at root
    fn pop(&mut self) -> bool;
}

impl BackTarget for Navigator {
    fn can_go_back(&self) -> bool {
        Navigator::can_go_back(self)
    }

    fn pop(&mut self) -> bool {
        Navigator::pop(self)
    }
}

/// Result of feeding one input to the driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    /// States entered, in order
    pub visited: Vec<BackState>,
    /// Effects run, in order
    pub effects: Vec<BackEffect>,
    /// Whether the target was popped during this step
    pub popped: bool,
}

impl Step {
    /// Check whether any effect matching `predicate` was run
    pub fn has(&self, predicate: impl Fn(&BackEffect) -> bool) -> bool {
        self.effects.iter().any(predicate)
    }

    /// Check whether a pop was committed
    pub fn committed(&self) -> bool {
        self.has(|e| matches!(e, BackEffect::CommitPop { .. }))
    }
}

/// Drives the predictive-back lifecycle
#[derive(Debug, Clone, Default)]
pub struct PredictiveBack {
    state: BackState,
    config: GestureConfig,
}

impl PredictiveBack {
    /// Create an idle driver
    pub fn new(config: GestureConfig) -> Self {
        Self {
            state: BackState::Idle,
            config,
        }
    }

    /// Current state
    pub fn state(&self) -> BackState {
        self.state
    }

    /// Active configuration
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Check whether a gesture is dragging or settling
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Check whether a committed pop is pending
    pub fn is_settling(&self) -> bool {
        matches!(self.state, BackState::Settling { .. })
    }

    /// Feed a platform gesture event
    pub fn handle(&mut self, event: GestureEvent, target: &mut dyn BackTarget) -> Step {
        self.run(BackInput::Gesture(event), target)
    }

    /// Report that the settle animation reached its end
    pub fn settle_finished(&mut self, target: &mut dyn BackTarget) -> Step {
        self.run(BackInput::SettleFinished, target)
    }

    /// Drop any gesture without touching the target
    pub fn reset(&mut self) {
        if self.state != BackState::Idle {
            tracing::debug!(from = %self.state, "predictive back reset");
        }
        self.state = BackState::Idle;
    }

    fn run(&mut self, input: BackInput, target: &mut dyn BackTarget) -> Step {
        let mut step = Step::default();
        let mut inputs = VecDeque::from([input]);

        while let Some(input) = inputs.pop_front() {
            let ctx = BackContext {
                can_go_back: target.can_go_back(),
                commit_threshold: self.config.commit_threshold,
            };
            let (next, effect) = transition(self.state, input, &ctx);
            if next != self.state {
                tracing::debug!(from = %self.state, to = %next, ?effect, "predictive back");
            }
            self.state = next;
            step.visited.push(next);
            step.effects.push(effect);

            if let BackEffect::CommitPop { restart } = effect {
                step.popped |= target.pop();
                inputs.push_back(BackInput::Acknowledge);
                if restart {
                    inputs.push_back(BackInput::Gesture(GestureEvent::Start));
                }
            }
        }

        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nav_core::RouteValue;

    fn two_deep() -> Navigator {
        let mut nav = Navigator::new(RouteValue::new("list"));
        nav.push(RouteValue::new("detail").with_param("id", 25));
        nav
    }

    fn drag_to(back: &mut PredictiveBack, target: &mut dyn BackTarget, progress: f32) {
        back.handle(GestureEvent::Start, target);
        back.handle(GestureEvent::Move { progress }, target);
    }

    #[test]
    fn test_config_validation() {
        assert!(GestureConfig::default().validate().is_ok());
        assert!(GestureConfig::new().commit_threshold(1.0).validate().is_ok());
        assert_eq!(
            GestureConfig::new().commit_threshold(0.0).validate(),
            Err(GestureError::InvalidThreshold(0.0))
        );
        assert!(GestureConfig::new().commit_threshold(1.5).validate().is_err());
        assert!(GestureConfig::new().commit_threshold(f32::NAN).validate().is_err());
    }

    #[test]
    fn test_below_threshold_never_pops() {
        let mut target = MockBackTarget::new();
        target.expect_can_go_back().return_const(true);
        target.expect_pop().never();

        let mut back = PredictiveBack::default();
        drag_to(&mut back, &mut target, 0.3);
        let step = back.handle(GestureEvent::Release, &mut target);

        assert_eq!(step.visited, vec![BackState::Idle]);
        assert_eq!(step.effects, vec![BackEffect::Rollback { from_progress: 0.3 }]);
        assert!(!step.popped);
    }

    #[test]
    fn test_above_threshold_pops_once_after_settle() {
        let mut target = MockBackTarget::new();
        target.expect_can_go_back().return_const(true);
        target.expect_pop().times(1).return_const(true);

        let mut back = PredictiveBack::default();
        drag_to(&mut back, &mut target, 0.7);

        let released = back.handle(GestureEvent::Release, &mut target);
        assert_eq!(released.visited, vec![BackState::Settling { released_at: 0.7 }]);
        assert!(!released.popped);

        let settled = back.settle_finished(&mut target);
        assert_eq!(settled.visited, vec![BackState::Completed, BackState::Idle]);
        assert!(settled.popped);

        // A late completion is ignored
        let late = back.settle_finished(&mut target);
        assert!(!late.popped);
        assert_eq!(back.state(), BackState::Idle);
    }

    #[test]
    fn test_start_refused_at_root() {
        let mut nav = Navigator::new(RouteValue::new("list"));
        let mut back = PredictiveBack::default();
        let step = back.handle(GestureEvent::Start, &mut nav);
        assert_eq!(step.effects, vec![BackEffect::Refused]);
        assert_eq!(back.state(), BackState::Idle);
    }

    #[test]
    fn test_with_navigator() {
        let mut nav = two_deep();
        let mut back = PredictiveBack::new(GestureConfig::default());

        drag_to(&mut back, &mut nav, 0.7);
        back.handle(GestureEvent::Release, &mut nav);
        assert_eq!(nav.depth(), 2);

        back.settle_finished(&mut nav);
        assert_eq!(nav.snapshot(), vec![RouteValue::new("list")]);
    }

    #[test]
    fn test_start_during_settle_commits_then_restarts() {
        let mut nav = two_deep();
        nav.push(RouteValue::new("settings"));
        let mut back = PredictiveBack::default();

        drag_to(&mut back, &mut nav, 0.9);
        back.handle(GestureEvent::Release, &mut nav);

        let step = back.handle(GestureEvent::Start, &mut nav);
        assert!(step.popped);
        assert_eq!(
            step.visited,
            vec![
                BackState::Completed,
                BackState::Idle,
                BackState::Dragging { progress: 0.0 }
            ]
        );
        assert_eq!(nav.depth(), 2);
        assert!(back.is_active());
    }

    #[test]
    fn test_start_during_settle_at_new_root_is_refused() {
        let mut nav = two_deep();
        let mut back = PredictiveBack::default();

        drag_to(&mut back, &mut nav, 0.9);
        back.handle(GestureEvent::Release, &mut nav);
        let step = back.handle(GestureEvent::Start, &mut nav);

        assert!(step.popped);
        assert_eq!(step.effects.last(), Some(&BackEffect::Refused));
        assert_eq!(back.state(), BackState::Idle);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_reset_drops_settle_without_pop() {
        let mut target = MockBackTarget::new();
        target.expect_can_go_back().return_const(true);
        target.expect_pop().never();

        let mut back = PredictiveBack::default();
        drag_to(&mut back, &mut target, 0.9);
        back.handle(GestureEvent::Release, &mut target);
        back.reset();

        assert_eq!(back.state(), BackState::Idle);
        assert!(!back.settle_finished(&mut target).popped);
    }
}
