//! Frame output
//!
//! What the host application draws on one frame: the visible screens,
//! bottom-to-top, each with the transform it should be drawn at.

use nav_core::{EntryKey, RouteValue};
use nav_motion::Transform;

/// One screen to draw
#[derive(Debug, Clone, PartialEq)]
pub struct Layer<R> {
    /// Stack-local identity of the visual element
    pub key: EntryKey,
    /// Route the screen was rendered from
    pub route: RouteValue,
    /// Where and how to draw it
    pub transform: Transform,
    /// Output of the screen's render function
    pub content: R,
}

/// Screens visible on one frame, bottom-to-top
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<R> {
    /// Layers, bottom first
    pub layers: Vec<Layer<R>>,
}

impl<R> Frame<R> {
    /// The layer drawn on top
    pub fn top(&self) -> Option<&Layer<R>> {
        self.layers.last()
    }

    /// Number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Check whether every layer is at rest
    pub fn is_at_rest(&self) -> bool {
        self.layers.len() == 1 && self.layers.iter().all(|l| l.transform.is_identity())
    }

    /// Routes of every layer, bottom first
    pub fn routes(&self) -> Vec<&RouteValue> {
        self.layers.iter().map(|l| &l.route).collect()
    }

    /// Layer for `key`, if visible
    pub fn layer(&self, key: EntryKey) -> Option<&Layer<R>> {
        self.layers.iter().find(|l| l.key == key)
    }
}
