//! Screen transforms
//!
//! A transform positions one screen layer: a horizontal offset expressed as a
//! fraction of the container width, a uniform scale, and an opacity.

use serde::{Deserialize, Serialize};

/// Geometric and opacity transform for one screen layer
///
/// `translate_x` is negative toward the leading edge and positive toward the
/// trailing edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    /// Horizontal offset as a fraction of container width
    pub translate_x: f32,
    /// Uniform scale (1.0 = natural size)
    pub scale: f32,
    /// Opacity in [0, 1]
    pub alpha: f32,
}

impl Transform {
    /// Natural position, size and opacity
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        scale: 1.0,
        alpha: 1.0,
    };

    /// Create a transform
    pub const fn new(translate_x: f32, scale: f32, alpha: f32) -> Self {
        Self {
            translate_x,
            scale,
            alpha,
        }
    }

    /// Check whether this is the identity transform
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Linear interpolation between two transforms
    ///
    /// `t` is not clamped so overshooting curves pass through; alpha always is.
    pub fn lerp(from: Transform, to: Transform, t: f32) -> Transform {
        Transform {
            translate_x: from.translate_x + (to.translate_x - from.translate_x) * t,
            scale: from.scale + (to.scale - from.scale) * t,
            alpha: (from.alpha + (to.alpha - from.alpha) * t).clamp(0.0, 1.0),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Start and end transforms of one animated layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRange {
    /// Transform at progress 0
    pub from: Transform,
    /// Transform at progress 1
    pub to: Transform,
}

impl TransformRange {
    /// Range that leaves the layer untouched
    pub const IDENTITY: TransformRange = TransformRange {
        from: Transform::IDENTITY,
        to: Transform::IDENTITY,
    };

    /// Create a range
    pub const fn new(from: Transform, to: Transform) -> Self {
        Self { from, to }
    }

    /// Transform at eased progress `t`
    pub fn at(&self, t: f32) -> Transform {
        Transform::lerp(self.from, self.to, t)
    }

    /// Check whether both ends are identity
    pub fn is_identity(&self) -> bool {
        self.from.is_identity() && self.to.is_identity()
    }
}

impl Default for TransformRange {
    fn default() -> Self {
        Self::IDENTITY
    }
}
