//! Shell builder
//!
//! Startup composition: collects feature modules, the start route, seed
//! routes, deep-link patterns and the motion preference, validates
//! everything once and produces a [`NavigationHost`].

use std::sync::Arc;
use thiserror::Error;

use nav_core::deep_link::LinkBuilder;
use nav_core::{
    DeepLinkResolver, FeatureModule, LinkParams, Navigator, RegistryBuilder, RegistryError,
    RouteValue,
};
use nav_gesture::PredictiveBack;
use nav_motion::{MotionPreference, MotionSource, TransitionPlanner};

use crate::config::{ConfigError, ShellConfig};
use crate::host::NavigationHost;

/// Startup errors
#[derive(Error, Debug)]
pub enum ShellError {
    /// Configuration rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Route registration incomplete or conflicting
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Result type for shell construction
pub type Result<T> = std::result::Result<T, ShellError>;

/// Builds a [`NavigationHost`]
///
/// # Example
///
/// ```rust
/// use waypoint::{RouteValue, ShellBuilder};
///
/// let host = ShellBuilder::new(RouteValue::new("list"))
///     .register("catalog", "list", |_| "List".to_string())
///     .register("catalog", "detail", |r| format!("Detail {:?}", r.int_param("id")))
///     .build()
///     .unwrap();
///
/// assert_eq!(host.depth(), 1);
/// ```
pub struct ShellBuilder<R> {
    start: RouteValue,
    seed: Vec<RouteValue>,
    config: ShellConfig,
    registry: RegistryBuilder<R>,
    links: Vec<(String, LinkBuilder)>,
    motion: Box<dyn MotionPreference>,
}

impl<R> ShellBuilder<R> {
    /// Start building a shell whose stack begins at `start`
    pub fn new(start: RouteValue) -> Self {
        Self {
            start,
            seed: Vec::new(),
            config: ShellConfig::default(),
            registry: RegistryBuilder::new(),
            links: Vec::new(),
            motion: Box::new(MotionSource::default()),
        }
    }

    /// Seed the initial stack (e.g. from a restored snapshot)
    pub fn seed(mut self, routes: impl IntoIterator<Item = RouteValue>) -> Self {
        self.seed = routes.into_iter().collect();
        self
    }

    /// Use a configuration
    pub fn config(mut self, config: ShellConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a screen on behalf of `module`
    pub fn register<F>(mut self, module: impl Into<String>, tag: &str, render: F) -> Self
    where
        F: Fn(&RouteValue) -> R + Send + Sync + 'static,
    {
        self.registry = self.registry.register(module, tag, render);
        self
    }

    /// Register every screen of a feature module
    pub fn module(mut self, module: &dyn FeatureModule<R>) -> Self {
        self.registry = self.registry.module(module);
        self
    }

    /// Add a deep-link pattern (`/segment/:param`)
    pub fn link<F>(mut self, pattern: &str, builder: F) -> Self
    where
        F: Fn(&LinkParams) -> Option<Vec<RouteValue>> + Send + Sync + 'static,
    {
        self.links.push((pattern.to_string(), Box::new(builder)));
        self
    }

    /// Where to read the reduce-motion flag from
    pub fn motion(mut self, motion: impl MotionPreference + 'static) -> Self {
        self.motion = Box::new(motion);
        self
    }

    /// Validate everything and build the host
    pub fn build(self) -> Result<NavigationHost<R>> {
        let ShellBuilder {
            start,
            seed,
            config,
            registry,
            links,
            motion,
        } = self;

        config.validate()?;

        let registry = registry
            .require(start.tag().clone())
            .require_routes(&seed)
            .build()?;

        let resolver = links
            .into_iter()
            .fold(DeepLinkResolver::new(config.deep_link.clone()), |r, (pattern, builder)| {
                r.route(&pattern, builder)
            });

        let navigator = Navigator::seeded(start, seed);

        tracing::info!(
            screens = registry.len(),
            links = resolver.pattern_count(),
            depth = navigator.depth(),
            current = %navigator.current(),
            "navigation shell ready"
        );

        Ok(NavigationHost::new(
            navigator,
            Arc::new(registry),
            TransitionPlanner::new(config.motion),
            motion,
            PredictiveBack::new(config.gesture),
            resolver,
        ))
    }
}
