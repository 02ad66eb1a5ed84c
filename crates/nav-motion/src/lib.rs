//! Motion for Waypoint navigation
//!
//! This crate turns navigation events into animation values:
//! - Motion tokens (durations, easing curves, transform magnitudes)
//! - Cubic-bezier easing evaluation
//! - The transition planner (forward, backward, predictive-back peek)
//! - The reduce-motion preference and its publishers
//! - A per-layer animator with superseding restarts
//!
//! # Example
//!
//! ```rust
//! use nav_motion::{Direction, TransitionPlanner};
//!
//! let planner = TransitionPlanner::default();
//! let push = planner.plan(Direction::Forward, false);
//! let pop = planner.plan(Direction::Backward, false);
//! assert!(push.duration > pop.duration);
//! assert!(planner.plan(Direction::Forward, true).is_instant());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod animator;
pub mod easing;
pub mod preference;
pub mod tokens;
pub mod transform;
pub mod transition;

pub use animator::{AnimationTicket, Animator, Finished, TransformAnimation};
pub use easing::Easing;
pub use preference::{MotionPreference, MotionSource, MotionSwitch};
pub use transform::{Transform, TransformRange};
pub use transition::{
    Direction, LayerPlan, MotionConfig, MotionError, TransitionPlan, TransitionPlanner,
};
