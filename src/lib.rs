//! Waypoint - navigation back-stack and predictive back
//!
//! The navigation shell of a single-window application: a back-stack of
//! route values, a registry mapping routes to screens, direction-aware
//! transitions that honour the reduce-motion preference, an interactive back
//! gesture that previews the previous screen before committing, and deep
//! links that rebuild the stack.
//!
//! The pieces live in their own crates and are re-exported here:
//! - `nav-core`: routes, back-stack, navigator, registry, deep links
//! - `nav-motion`: tokens, easing, transition planner, animator
//! - `nav-gesture`: predictive-back state machine
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use waypoint::{GestureEvent, RouteValue, ShellBuilder};
//!
//! let mut host = ShellBuilder::new(RouteValue::new("list"))
//!     .register("catalog", "list", |_| "List".to_string())
//!     .register("catalog", "detail", |_| "Detail".to_string())
//!     .build()
//!     .unwrap();
//!
//! host.push(RouteValue::new("detail").with_param("id", 25));
//! host.tick(Duration::from_millis(300));
//!
//! host.handle_gesture(GestureEvent::Start);
//! host.handle_gesture(GestureEvent::Move { progress: 0.7 });
//! host.handle_gesture(GestureEvent::Release);
//! host.tick(Duration::from_millis(150));
//!
//! assert_eq!(host.snapshot(), vec![RouteValue::new("list")]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod builder;
pub mod config;
pub mod frame;
pub mod host;

pub use builder::{ShellBuilder, ShellError};
pub use config::{ConfigError, ShellConfig};
pub use frame::{Frame, Layer};
pub use host::{BackOutcome, FallbackReason, LinkOutcome, NavigationHost, RequestOutcome};

pub use nav_core::{
    DeepLinkConfig, DeepLinkError, EntryKey, FeatureModule, NavOp, Navigator, NavigatorReader,
    RegistryError, RouteRegistration, RouteRegistry, RouteValue, StackSnapshot,
};
pub use nav_gesture::{BackState, GestureConfig, GestureEvent};
pub use nav_motion::{
    Direction, Easing, MotionConfig, MotionError, MotionPreference, MotionSource, MotionSwitch,
    Transform,
};
