//! Deep-link resolution
//!
//! Parses an external URI into the list of route values that should sit on
//! top of the start route. Patterns use `/segment/:param` syntax; query
//! parameters are merged into the captured parameters.
//!
//! A failed resolution is never fatal: the caller falls back to the start
//! route.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::route::RouteValue;

/// Deep-link parse failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeepLinkError {
    /// The URI was empty
    #[error("Empty deep link")]
    Empty,

    /// The URI scheme is not accepted
    #[error("Unsupported deep link scheme: {0}")]
    UnsupportedScheme(String),

    /// The URI host is not accepted
    #[error("Unknown deep link host: {0}")]
    UnknownHost(String),

    /// A path segment or query value was not valid percent-encoding
    #[error("Invalid percent-encoding in deep link: {0}")]
    InvalidEncoding(String),

    /// No pattern matched the path
    #[error("No route matches deep link path: {0}")]
    NoMatch(String),
}

/// Result type for deep-link resolution
pub type Result<T> = std::result::Result<T, DeepLinkError>;

/// Which URIs the resolver accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DeepLinkConfig {
    /// Accepted schemes (lowercase); empty accepts any
    #[serde(default)]
    pub schemes: Vec<String>,
    /// Accepted hosts (lowercase); empty accepts any
    #[serde(default)]
    pub hosts: Vec<String>,
}

impl DeepLinkConfig {
    /// Create a configuration accepting any scheme and host
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a scheme
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.schemes.push(scheme.into().to_ascii_lowercase());
        self
    }

    /// Accept a host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.hosts.push(host.into().to_ascii_lowercase());
        self
    }
}

// =============================================================================
// Link Parameters
// =============================================================================

/// Parameters captured from a deep link (path captures and query values)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkParams {
    values: HashMap<String, String>,
}

impl LinkParams {
    /// Get a raw parameter
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Get a parameter parsed as an integer
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name)?.parse().ok()
    }

    /// Get a parameter parsed as a boolean (`true`/`false`/`1`/`0`)
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    fn insert(&mut self, name: String, value: String) {
        self.values.insert(name, value);
    }
}

/// Builds the route list for a matched pattern
pub type LinkBuilder = Box<dyn Fn(&LinkParams) -> Option<Vec<RouteValue>> + Send + Sync>;

/// Segment type in a pattern
#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    /// Literal segment
    Literal(String),
    /// Parameter segment
    Param(String),
}

/// Route pattern for matching
struct LinkPattern {
    /// Pattern segments
    segments: Vec<PatternSegment>,
    /// Route builder
    builder: LinkBuilder,
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves deep-link URIs to route lists
pub struct DeepLinkResolver {
    config: DeepLinkConfig,
    patterns: Vec<LinkPattern>,
}

impl Default for DeepLinkResolver {
    fn default() -> Self {
        Self::new(DeepLinkConfig::default())
    }
}

impl DeepLinkResolver {
    /// Create a resolver with no patterns
    pub fn new(config: DeepLinkConfig) -> Self {
        Self {
            config,
            patterns: Vec::new(),
        }
    }

    /// Add a route pattern
    ///
    /// Patterns are tried in registration order; the first pattern whose
    /// builder returns `Some` wins.
    pub fn route<F>(mut self, pattern: &str, builder: F) -> Self
    where
        F: Fn(&LinkParams) -> Option<Vec<RouteValue>> + Send + Sync + 'static,
    {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    PatternSegment::Param(param.to_string())
                } else {
                    PatternSegment::Literal(s.to_string())
                }
            })
            .collect();

        self.patterns.push(LinkPattern {
            segments,
            builder: Box::new(builder),
        });
        self
    }

    /// Number of registered patterns
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Resolve a URI to the routes that should follow the start route
    pub fn resolve(&self, uri: &str) -> Result<Vec<RouteValue>> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(DeepLinkError::Empty);
        }

        // Fragments never affect routing
        let uri = uri.split_once('#').map_or(uri, |(before, _)| before);

        let path_and_query = match uri.split_once("://") {
            Some((scheme, rest)) => {
                self.check_scheme(scheme)?;
                let (authority, path) = match rest.find(['/', '?']) {
                    Some(idx) => (&rest[..idx], &rest[idx..]),
                    None => (rest, ""),
                };
                self.check_host(authority)?;
                path
            }
            None => uri,
        };

        let (pathname, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };

        let path_segments: Vec<&str> = pathname.split('/').filter(|s| !s.is_empty()).collect();

        for pattern in &self.patterns {
            if let Some(params) = match_pattern(&pattern.segments, &path_segments, query)? {
                if let Some(routes) = (pattern.builder)(&params) {
                    return Ok(routes);
                }
            }
        }

        Err(DeepLinkError::NoMatch(pathname.to_string()))
    }

    fn check_scheme(&self, scheme: &str) -> Result<()> {
        let scheme = scheme.to_ascii_lowercase();
        if scheme.is_empty()
            || (!self.config.schemes.is_empty() && !self.config.schemes.contains(&scheme))
        {
            return Err(DeepLinkError::UnsupportedScheme(scheme));
        }
        Ok(())
    }

    fn check_host(&self, authority: &str) -> Result<()> {
        // Drop userinfo and port
        let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
        let host = host.split_once(':').map_or(host, |(h, _)| h);
        let host = host.to_ascii_lowercase();
        if !self.config.hosts.is_empty() && !self.config.hosts.contains(&host) {
            return Err(DeepLinkError::UnknownHost(host));
        }
        Ok(())
    }
}

impl fmt::Debug for DeepLinkResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepLinkResolver")
            .field("config", &self.config)
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

/// Match a pattern against path segments
fn match_pattern(
    pattern: &[PatternSegment],
    path: &[&str],
    query: Option<&str>,
) -> Result<Option<LinkParams>> {
    if pattern.len() != path.len() {
        return Ok(None);
    }

    let mut params = LinkParams::default();

    for (segment, actual) in pattern.iter().zip(path.iter()) {
        match segment {
            PatternSegment::Literal(expected) => {
                if expected != actual {
                    return Ok(None);
                }
            }
            PatternSegment::Param(name) => {
                params.insert(name.clone(), decode(actual)?);
            }
        }
    }

    parse_query(query, &mut params)?;
    Ok(Some(params))
}

/// Parse query string into params; path captures win over query keys
fn parse_query(query: Option<&str>, params: &mut LinkParams) -> Result<()> {
    let Some(query) = query else {
        return Ok(());
    };
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_query(key)?;
        if params.get(&key).is_none() {
            params.insert(key, decode_query(value)?);
        }
    }
    Ok(())
}

/// Percent-decode a path segment; `+` is literal here
fn decode(raw: &str) -> Result<String> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|_| DeepLinkError::InvalidEncoding(raw.to_string()))
}

/// Decode a form-encoded query component, where `+` means space
fn decode_query(raw: &str) -> Result<String> {
    decode(&raw.replace('+', " "))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> DeepLinkResolver {
        DeepLinkResolver::new(DeepLinkConfig::new().scheme("waypoint").scheme("https").host("app.example.com"))
            .route("/list", |_| Some(vec![RouteValue::new("list")]))
            .route("/detail/:id", |params| {
                Some(vec![RouteValue::new("detail").with_param("id", params.int("id")?)])
            })
            .route("/detail/:id/settings", |params| {
                Some(vec![
                    RouteValue::new("detail").with_param("id", params.int("id")?),
                    RouteValue::new("settings"),
                ])
            })
            .route("/search", |params| {
                let query = params.get("q")?;
                Some(vec![RouteValue::new("search").with_param("q", query)])
            })
            .route("/search/:q", |params| {
                let query = params.get("q")?;
                Some(vec![RouteValue::new("search").with_param("q", query)])
            })
    }

    #[test]
    fn test_resolve_bare_path() {
        let routes = resolver().resolve("/detail/25").unwrap();
        assert_eq!(routes, vec![RouteValue::new("detail").with_param("id", 25)]);
    }

    #[test]
    fn test_resolve_absolute_uri() {
        let routes = resolver()
            .resolve("https://app.example.com/detail/25/settings")
            .unwrap();
        assert_eq!(
            routes,
            vec![
                RouteValue::new("detail").with_param("id", 25),
                RouteValue::new("settings")
            ]
        );
    }

    #[test]
    fn test_scheme_and_host_case_insensitive() {
        let routes = resolver().resolve("WAYPOINT://App.Example.com/list").unwrap();
        assert_eq!(routes, vec![RouteValue::new("list")]);
    }

    #[test]
    fn test_query_and_encoding() {
        let routes = resolver()
            .resolve("waypoint://app.example.com/search?q=hello%20world&ignored=1#top")
            .unwrap();
        assert_eq!(
            routes,
            vec![RouteValue::new("search").with_param("q", "hello world")]
        );
    }

    #[test]
    fn test_plus_is_literal_in_path() {
        let routes = resolver().resolve("/search/c++").unwrap();
        assert_eq!(routes, vec![RouteValue::new("search").with_param("q", "c++")]);

        let routes = resolver().resolve("/search/c%2B%2B").unwrap();
        assert_eq!(routes[0].text_param("q"), Some("c++"));
    }

    #[test]
    fn test_plus_is_space_in_query() {
        let routes = resolver().resolve("/search?q=c+plus%2Bplus").unwrap();
        assert_eq!(routes, vec![RouteValue::new("search").with_param("q", "c plus+plus")]);
    }

    #[test]
    fn test_unsupported_scheme() {
        assert_eq!(
            resolver().resolve("ftp://app.example.com/list"),
            Err(DeepLinkError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_unknown_host() {
        assert_eq!(
            resolver().resolve("https://evil.example.org:8443/list"),
            Err(DeepLinkError::UnknownHost("evil.example.org".to_string()))
        );
    }

    #[test]
    fn test_builder_rejection_falls_through_to_no_match() {
        // Non-numeric id makes the detail builder return None
        assert_eq!(
            resolver().resolve("/detail/abc"),
            Err(DeepLinkError::NoMatch("/detail/abc".to_string()))
        );
    }

    #[test]
    fn test_empty_and_unknown() {
        assert_eq!(resolver().resolve("   "), Err(DeepLinkError::Empty));
        assert!(matches!(
            resolver().resolve("/nonexistent/path"),
            Err(DeepLinkError::NoMatch(_))
        ));
    }

    #[test]
    fn test_invalid_encoding() {
        assert!(matches!(
            resolver().resolve("/detail/%FF%FE"),
            Err(DeepLinkError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_any_scheme_when_unconfigured() {
        let resolver =
            DeepLinkResolver::default().route("/list", |_| Some(vec![RouteValue::new("list")]));
        assert!(resolver.resolve("custom://anything/list").is_ok());
        assert_eq!(resolver.pattern_count(), 1);
    }
}
