//! Predictive back for Waypoint
//!
//! An interactive back gesture previews the previous screen before the user
//! commits. This crate holds the gesture lifecycle:
//! - `state`: the closed state enum and its pure transition function
//! - `machine`: the driver that applies effects to a [`BackTarget`]
//!
//! # Example
//!
//! ```rust
//! use nav_core::{Navigator, RouteValue};
//! use nav_gesture::{GestureConfig, GestureEvent, PredictiveBack};
//!
//! let mut nav = Navigator::new(RouteValue::new("list"));
//! nav.push(RouteValue::new("detail").with_param("id", 25));
//!
//! let mut back = PredictiveBack::new(GestureConfig::default());
//! back.handle(GestureEvent::Start, &mut nav);
//! back.handle(GestureEvent::Move { progress: 0.7 }, &mut nav);
//! back.handle(GestureEvent::Release, &mut nav);
//! assert_eq!(nav.depth(), 2); // still settling
//!
//! back.settle_finished(&mut nav);
//! assert_eq!(nav.depth(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod machine;
pub mod state;

pub use machine::{BackTarget, GestureConfig, GestureError, PredictiveBack, Step};
pub use state::{transition, BackContext, BackEffect, BackInput, BackState, GestureEvent};
