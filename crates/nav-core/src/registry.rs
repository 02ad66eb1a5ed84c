//! Route registry
//!
//! Feature modules contribute `(tag, render function)` pairs at startup.
//! The [`RegistryBuilder`] is the single composition point: it checks for
//! tag collisions and for required tags that nobody registered, then freezes
//! everything into an immutable [`RouteRegistry`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::route::{RouteTag, RouteValue};

/// Registry configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two modules registered the same tag
    #[error("Route tag '{tag}' registered by both '{first}' and '{second}'")]
    DuplicateTag {
        /// The colliding tag
        tag: RouteTag,
        /// Module that registered it first
        first: String,
        /// Module that registered it again
        second: String,
    },

    /// No module registered a renderer for a tag that must be reachable
    #[error("No renderer registered for route tag '{tag}'")]
    UnregisteredTag {
        /// The missing tag
        tag: RouteTag,
    },
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Render function contributed by a feature module
pub type RenderFn<R> = Arc<dyn Fn(&RouteValue) -> R + Send + Sync>;

/// One `(tag, renderer)` pair
pub struct RouteRegistration<R> {
    tag: RouteTag,
    render: RenderFn<R>,
}

impl<R> RouteRegistration<R> {
    /// Create a registration
    pub fn new<F>(tag: impl Into<RouteTag>, render: F) -> Self
    where
        F: Fn(&RouteValue) -> R + Send + Sync + 'static,
    {
        Self {
            tag: tag.into(),
            render: Arc::new(render),
        }
    }

    /// The registered tag
    pub fn tag(&self) -> &RouteTag {
        &self.tag
    }
}

impl<R> fmt::Debug for RouteRegistration<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistration")
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// A feature module that contributes screens
pub trait FeatureModule<R> {
    /// Module name, used in diagnostics
    fn name(&self) -> &str;

    /// The routes this module can render
    fn routes(&self) -> Vec<RouteRegistration<R>>;
}

/// Collects registrations from feature modules at startup
pub struct RegistryBuilder<R> {
    registrations: Vec<(String, RouteRegistration<R>)>,
    required: BTreeSet<RouteTag>,
}

impl<R> Default for RegistryBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> RegistryBuilder<R> {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            registrations: Vec::new(),
            required: BTreeSet::new(),
        }
    }

    /// Register a single renderer on behalf of `module`
    pub fn register<F>(mut self, module: impl Into<String>, tag: impl Into<RouteTag>, render: F) -> Self
    where
        F: Fn(&RouteValue) -> R + Send + Sync + 'static,
    {
        self.registrations
            .push((module.into(), RouteRegistration::new(tag, render)));
        self
    }

    /// Add every route a feature module contributes
    pub fn module(mut self, module: &dyn FeatureModule<R>) -> Self {
        let name = module.name().to_string();
        for registration in module.routes() {
            self.registrations.push((name.clone(), registration));
        }
        self
    }

    /// Require a tag to be resolvable once the registry is built
    pub fn require(mut self, tag: impl Into<RouteTag>) -> Self {
        self.required.insert(tag.into());
        self
    }

    /// Require every tag used by the given routes
    pub fn require_routes<'a>(mut self, routes: impl IntoIterator<Item = &'a RouteValue>) -> Self {
        self.required
            .extend(routes.into_iter().map(|r| r.tag().clone()));
        self
    }

    /// Validate and index all registrations
    pub fn build(self) -> Result<RouteRegistry<R>> {
        let mut renderers: HashMap<RouteTag, Registered<R>> =
            HashMap::with_capacity(self.registrations.len());

        for (module, registration) in self.registrations {
            if let Some(existing) = renderers.get(&registration.tag) {
                return Err(RegistryError::DuplicateTag {
                    tag: registration.tag,
                    first: existing.module.clone(),
                    second: module,
                });
            }
            renderers.insert(
                registration.tag,
                Registered {
                    module,
                    render: registration.render,
                },
            );
        }

        if let Some(tag) = self
            .required
            .into_iter()
            .find(|tag| !renderers.contains_key(tag))
        {
            return Err(RegistryError::UnregisteredTag { tag });
        }

        tracing::info!(routes = renderers.len(), "route registry built");
        Ok(RouteRegistry { renderers })
    }
}

struct Registered<R> {
    module: String,
    render: RenderFn<R>,
}

/// Immutable tag → renderer index
pub struct RouteRegistry<R> {
    renderers: HashMap<RouteTag, Registered<R>>,
}

impl<R> RouteRegistry<R> {
    /// Start building a registry
    pub fn builder() -> RegistryBuilder<R> {
        RegistryBuilder::new()
    }

    /// Look up the renderer for a route
    pub fn resolve(&self, route: &RouteValue) -> Result<&RenderFn<R>> {
        self.renderers
            .get(route.tag())
            .map(|r| &r.render)
            .ok_or_else(|| RegistryError::UnregisteredTag {
                tag: route.tag().clone(),
            })
    }

    /// Render a route
    pub fn render(&self, route: &RouteValue) -> Result<R> {
        self.resolve(route).map(|render| render(route))
    }

    /// Check whether a tag has a renderer
    pub fn contains(&self, tag: &RouteTag) -> bool {
        self.renderers.contains_key(tag)
    }

    /// Name of the module that registered a tag
    pub fn module_of(&self, tag: &RouteTag) -> Option<&str> {
        self.renderers.get(tag).map(|r| r.module.as_str())
    }

    /// All registered tags, sorted
    pub fn tags(&self) -> Vec<&RouteTag> {
        let mut tags: Vec<_> = self.renderers.keys().collect();
        tags.sort();
        tags
    }

    /// Number of registered tags
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl<R> fmt::Debug for RouteRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistry")
            .field("tags", &self.tags())
            .finish()
    }
}
