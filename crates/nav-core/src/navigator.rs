//! Navigator
//!
//! The navigator owns the process-wide back-stack. It is the only writer;
//! every other component reads through a [`NavigatorReader`].

use parking_lot::RwLock;
use std::sync::Arc;

use crate::route::RouteValue;
use crate::stack::{BackStack, EntryKey, NavOp, NavOutcome, StackEntry, StackSnapshot};

/// Owner of the back-stack
///
/// Reads always reflect the last completed mutation.
///
/// # Example
///
/// ```rust
/// use nav_core::navigator::Navigator;
/// use nav_core::route::RouteValue;
///
/// let mut nav = Navigator::new(RouteValue::new("list"));
/// nav.push(RouteValue::new("detail").with_param("id", 25));
/// assert_eq!(nav.depth(), 2);
/// assert!(nav.pop());
/// assert!(!nav.pop());
/// ```
#[derive(Debug)]
pub struct Navigator {
    start: RouteValue,
    stack: Arc<RwLock<BackStack>>,
}

impl Navigator {
    /// Create a navigator whose stack holds only the start route
    pub fn new(start: RouteValue) -> Self {
        Self::seeded(start, Vec::new())
    }

    /// Create a navigator from a seed list (e.g. a restored snapshot)
    pub fn seeded(start: RouteValue, seed: impl IntoIterator<Item = RouteValue>) -> Self {
        let stack = BackStack::seeded(start.clone(), seed);
        tracing::debug!(depth = stack.depth(), current = %stack.current(), "navigator created");
        Self {
            start,
            stack: Arc::new(RwLock::new(stack)),
        }
    }

    /// Create a navigator from a persisted snapshot
    pub fn restore(start: RouteValue, snapshot: StackSnapshot) -> Self {
        Self::seeded(start, snapshot.routes)
    }

    /// Apply a navigation operation
    pub fn apply(&mut self, op: &NavOp) -> NavOutcome {
        let mut stack = self.stack.write();
        let outcome = op.apply_in_place(&mut stack);
        tracing::debug!(
            op = %op,
            changed = outcome.changed(),
            depth = stack.depth(),
            current = %stack.current(),
            "navigation applied"
        );
        outcome
    }

    /// Push a route onto the stack
    pub fn push(&mut self, route: RouteValue) -> EntryKey {
        match self.apply(&NavOp::Push(route)) {
            NavOutcome::Pushed { key } => key,
            _ => self.current_key(),
        }
    }

    /// Pop the top route (returns true if popped, false if at root)
    pub fn pop(&mut self) -> bool {
        self.apply(&NavOp::Pop).changed()
    }

    /// Pop back to the last occurrence of `route`
    ///
    /// Returns true if the stack changed.
    pub fn pop_to(&mut self, route: RouteValue, inclusive: bool) -> bool {
        self.apply(&NavOp::PopTo { route, inclusive }).changed()
    }

    /// Pop to root
    pub fn pop_to_root(&mut self) -> bool {
        let root = self.stack.read().root().clone();
        self.pop_to(root, false)
    }

    /// Replace the top route
    pub fn replace(&mut self, route: RouteValue) -> EntryKey {
        match self.apply(&NavOp::Replace(route)) {
            NavOutcome::Replaced { key, .. } | NavOutcome::Pushed { key } => key,
            _ => self.current_key(),
        }
    }

    /// Reset to a fresh `[start]` stack and push each route in order
    ///
    /// A leading route equal to the start route is not pushed twice.
    pub fn replay(&mut self, routes: impl IntoIterator<Item = RouteValue>) {
        let mut stack = BackStack::new(self.start.clone());
        let mut routes = routes.into_iter().peekable();
        if routes.peek() == Some(&self.start) {
            routes.next();
        }
        for route in routes {
            NavOp::Push(route).apply_in_place(&mut stack);
        }
        tracing::debug!(depth = stack.depth(), current = %stack.current(), "navigator replayed");
        *self.stack.write() = stack;
    }

    /// Reset to the start route only
    pub fn reset(&mut self) {
        self.replay(Vec::new());
    }

    /// The start route this navigator falls back to
    pub fn start_route(&self) -> &RouteValue {
        &self.start
    }

    /// Get the current (top) route
    pub fn current(&self) -> RouteValue {
        self.stack.read().current().clone()
    }

    /// Key of the current (top) entry
    pub fn current_key(&self) -> EntryKey {
        self.stack.read().current_entry().key
    }

    /// Copy of the current (top) entry
    pub fn current_entry(&self) -> StackEntry {
        self.stack.read().current_entry().clone()
    }

    /// Copy of the entry directly beneath the top, if any
    pub fn beneath_entry(&self) -> Option<StackEntry> {
        self.stack.read().beneath_entry().cloned()
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.stack.read().depth()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.stack.read().can_go_back()
    }

    /// Full stack snapshot, oldest first
    pub fn snapshot(&self) -> Vec<RouteValue> {
        self.stack.read().routes()
    }

    /// Serializable snapshot for a persistence collaborator
    pub fn stack_snapshot(&self) -> StackSnapshot {
        self.stack.read().snapshot()
    }

    /// Copy of all entries, bottom to top
    pub fn entries(&self) -> Vec<StackEntry> {
        self.stack.read().entries().to_vec()
    }

    /// Copy of the whole stack
    pub fn stack(&self) -> BackStack {
        self.stack.read().clone()
    }

    /// Read-only handle sharing this navigator's stack
    pub fn reader(&self) -> NavigatorReader {
        NavigatorReader {
            stack: Arc::clone(&self.stack),
        }
    }
}

/// Read-only view of the navigator's stack
#[derive(Debug, Clone)]
pub struct NavigatorReader {
    stack: Arc<RwLock<BackStack>>,
}

impl NavigatorReader {
    /// Get the current (top) route
    pub fn current(&self) -> RouteValue {
        self.stack.read().current().clone()
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.stack.read().depth()
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.stack.read().can_go_back()
    }

    /// Full stack snapshot, oldest first
    pub fn snapshot(&self) -> Vec<RouteValue> {
        self.stack.read().routes()
    }
}
