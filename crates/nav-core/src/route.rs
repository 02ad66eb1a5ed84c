//! Route values
//!
//! A route value names a navigable destination: a stable tag plus an ordered
//! set of scalar parameters. Route values are the only thing the navigator,
//! the registry and screens exchange, so equality is purely structural.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Route Tags
// =============================================================================

/// Stable discriminator for a kind of destination (e.g. `"list"`, `"detail"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTag(String);

impl RouteTag {
    /// Create a new tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Get the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteTag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

impl From<String> for RouteTag {
    fn from(tag: String) -> Self {
        Self(tag)
    }
}

impl fmt::Display for RouteTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Route Parameters
// =============================================================================

/// A single route parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer parameter (ids, indices)
    Int(i64),
    /// Boolean flag
    Bool(bool),
    /// Free-form text
    Text(String),
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(n) => write!(f, "{}", n),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parameters for a route, ordered by name so equality ignores insertion order
pub type RouteParams = BTreeMap<String, ParamValue>;

// =============================================================================
// Route Value
// =============================================================================

/// An immutable destination: tag plus parameters
///
/// Two route values are equal iff their tags and parameters are equal.
///
/// # Example
///
/// ```rust
/// use nav_core::route::RouteValue;
///
/// let detail = RouteValue::new("detail").with_param("id", 25);
/// assert_eq!(detail.tag().as_str(), "detail");
/// assert_eq!(detail.int_param("id"), Some(25));
/// assert_eq!(detail, RouteValue::new("detail").with_param("id", 25));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RouteValue {
    tag: RouteTag,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    params: RouteParams,
}

impl RouteValue {
    /// Create a route with no parameters
    pub fn new(tag: impl Into<RouteTag>) -> Self {
        Self {
            tag: tag.into(),
            params: RouteParams::new(),
        }
    }

    /// Create a route from a tag and an existing parameter map
    pub fn with_params(tag: impl Into<RouteTag>, params: RouteParams) -> Self {
        Self {
            tag: tag.into(),
            params,
        }
    }

    /// Return a copy of this route with one more parameter
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// The route tag
    pub fn tag(&self) -> &RouteTag {
        &self.tag
    }

    /// All parameters
    pub fn params(&self) -> &RouteParams {
        &self.params
    }

    /// Look up a parameter by name
    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    /// Look up an integer parameter
    pub fn int_param(&self, name: &str) -> Option<i64> {
        match self.params.get(name)? {
            ParamValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Look up a text parameter
    pub fn text_param(&self, name: &str) -> Option<&str> {
        match self.params.get(name)? {
            ParamValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Look up a boolean parameter
    pub fn bool_param(&self, name: &str) -> Option<bool> {
        match self.params.get(name)? {
            ParamValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Check whether this route carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tag.as_str() == tag
    }
}

impl fmt::Display for RouteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if !self.params.is_empty() {
            f.write_str("{")?;
            for (i, (name, value)) in self.params.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{}={}", name, value)?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
