//! Navigation core for Waypoint
//!
//! This crate owns the navigation history of the application shell:
//! - Route values (tag plus parameters, compared structurally)
//! - The back-stack and its pure navigation operations
//! - The navigator, the single writer of the back-stack
//! - The route registry that maps tags to screen render functions
//! - Deep-link resolution into route lists
//!
//! # Example
//!
//! ```rust
//! use nav_core::{Navigator, RouteValue};
//!
//! let mut nav = Navigator::new(RouteValue::new("list"));
//! nav.push(RouteValue::new("detail").with_param("id", 25));
//! assert_eq!(nav.current(), RouteValue::new("detail").with_param("id", 25));
//! assert!(nav.pop());
//! assert!(!nav.pop()); // at root
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod deep_link;
pub mod navigator;
pub mod registry;
pub mod route;
pub mod stack;

pub use deep_link::{DeepLinkConfig, DeepLinkError, DeepLinkResolver, LinkParams};
pub use navigator::{Navigator, NavigatorReader};
pub use registry::{
    FeatureModule, RegistryBuilder, RegistryError, RenderFn, RouteRegistration, RouteRegistry,
};
pub use route::{ParamValue, RouteParams, RouteTag, RouteValue};
pub use stack::{BackStack, EntryKey, NavOp, NavOutcome, StackEntry, StackSnapshot};
