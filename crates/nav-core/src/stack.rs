//! Back-stack and navigation operations
//!
//! The back-stack is an oldest-first list of entries that is never empty.
//! Every navigation operation is a pure function from one stack to another,
//! which is what the [`Navigator`](crate::navigator::Navigator) applies.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::route::RouteValue;

// =============================================================================
// Stack Entries
// =============================================================================

/// Identity of one stack entry, used to target animations at its screen
///
/// Keys are assigned by the stack in increasing order and are never reused
/// within one stack's lifetime. They do not take part in route equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(u64);

impl EntryKey {
    /// Raw key value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A back-stack entry
#[derive(Debug, Clone, PartialEq)]
pub struct StackEntry {
    /// The route
    pub route: RouteValue,
    /// Unique key for this entry
    pub key: EntryKey,
}

// =============================================================================
// Back Stack
// =============================================================================

/// Ordered navigation history, oldest first, never empty
#[derive(Debug, Clone, PartialEq)]
pub struct BackStack {
    /// Stack entries (bottom to top)
    entries: Vec<StackEntry>,
    /// Next key to hand out
    next_key: u64,
}

impl BackStack {
    /// Create a stack holding only the start route
    pub fn new(start: RouteValue) -> Self {
        let mut stack = Self {
            entries: Vec::with_capacity(4),
            next_key: 0,
        };
        stack.append(start);
        stack
    }

    /// Create a stack from a seed list, oldest first
    ///
    /// An empty seed falls back to `[start]`.
    pub fn seeded(start: RouteValue, seed: impl IntoIterator<Item = RouteValue>) -> Self {
        let mut seed = seed.into_iter();
        let Some(first) = seed.next() else {
            return Self::new(start);
        };
        let mut stack = Self::new(first);
        for route in seed {
            stack.append(route);
        }
        stack
    }

    fn append(&mut self, route: RouteValue) -> EntryKey {
        let key = EntryKey(self.next_key);
        self.next_key += 1;
        self.entries.push(StackEntry { route, key });
        key
    }

    /// The current (top) route
    pub fn current(&self) -> &RouteValue {
        &self.current_entry().route
    }

    /// The current (top) entry
    pub fn current_entry(&self) -> &StackEntry {
        // Every constructor pushes an entry and no operation removes the last one.
        &self.entries[self.entries.len() - 1]
    }

    /// The entry directly beneath the top, if any
    pub fn beneath_entry(&self) -> Option<&StackEntry> {
        self.entries.len().checked_sub(2).map(|i| &self.entries[i])
    }

    /// The bottom entry
    pub fn root(&self) -> &RouteValue {
        &self.entries[0].route
    }

    /// Stack depth (always at least 1)
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Check if a pop would change the stack
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// All entries, bottom to top
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// Route values, bottom to top
    pub fn routes(&self) -> Vec<RouteValue> {
        self.entries.iter().map(|e| e.route.clone()).collect()
    }

    /// Index of the last entry equal to `route`
    pub fn last_index_of(&self, route: &RouteValue) -> Option<usize> {
        self.entries.iter().rposition(|e| &e.route == route)
    }

    /// Capture a serializable snapshot of the routes
    pub fn snapshot(&self) -> StackSnapshot {
        StackSnapshot {
            routes: self.routes(),
        }
    }
}

// =============================================================================
// Navigation Operations
// =============================================================================

/// A navigation request
#[derive(Debug, Clone, PartialEq)]
pub enum NavOp {
    /// Append a route
    Push(RouteValue),
    /// Remove the top route unless it is the only one
    Pop,
    /// Truncate back to the last occurrence of a route
    PopTo {
        /// Route to search for
        route: RouteValue,
        /// Also remove the matched entry
        inclusive: bool,
    },
    /// Swap the top route for another
    Replace(RouteValue),
}

/// What an operation did to the stack
#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    /// A new entry was appended
    Pushed {
        /// Key of the new top entry
        key: EntryKey,
    },
    /// Entries were removed from the top (oldest removed first)
    Popped {
        /// Removed entries, bottom to top
        removed: Vec<StackEntry>,
    },
    /// The top entry was swapped
    Replaced {
        /// The entry that was removed
        removed: StackEntry,
        /// Key of the new top entry
        key: EntryKey,
    },
    /// The request was a defined no-op
    Unchanged,
}

impl NavOutcome {
    /// Check whether the stack changed
    pub fn changed(&self) -> bool {
        !matches!(self, NavOutcome::Unchanged)
    }
}

impl NavOp {
    /// Apply this operation to a stack, returning the new stack
    ///
    /// This never fails: invalid requests yield an unchanged copy of the
    /// stack and [`NavOutcome::Unchanged`].
    pub fn apply(&self, stack: &BackStack) -> (BackStack, NavOutcome) {
        let mut next = stack.clone();
        let outcome = self.apply_in_place(&mut next);
        (next, outcome)
    }

    pub(crate) fn apply_in_place(&self, stack: &mut BackStack) -> NavOutcome {
        match self {
            NavOp::Push(route) => {
                let key = stack.append(route.clone());
                NavOutcome::Pushed { key }
            }
            NavOp::Pop => {
                if stack.entries.len() > 1 {
                    let removed = stack.entries.split_off(stack.entries.len() - 1);
                    NavOutcome::Popped { removed }
                } else {
                    NavOutcome::Unchanged
                }
            }
            NavOp::PopTo { route, inclusive } => {
                let Some(index) = stack.last_index_of(route) else {
                    return NavOutcome::Unchanged;
                };
                let keep = if *inclusive { index } else { index + 1 };
                // Inclusive pop-to of the bottom entry keeps the bottom entry.
                let keep = keep.max(1);
                if keep >= stack.entries.len() {
                    return NavOutcome::Unchanged;
                }
                let removed = stack.entries.split_off(keep);
                NavOutcome::Popped { removed }
            }
            NavOp::Replace(route) => {
                let removed = stack.entries.pop();
                let key = stack.append(route.clone());
                match removed {
                    Some(removed) => NavOutcome::Replaced { removed, key },
                    None => NavOutcome::Pushed { key },
                }
            }
        }
    }
}

impl fmt::Display for NavOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavOp::Push(route) => write!(f, "push({})", route),
            NavOp::Pop => f.write_str("pop()"),
            NavOp::PopTo { route, inclusive } => {
                write!(f, "popTo({}, inclusive={})", route, inclusive)
            }
            NavOp::Replace(route) => write!(f, "replace({})", route),
        }
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Opaque, serializable copy of a back-stack's routes
///
/// A platform persistence collaborator stores this and hands it back as the
/// seed of a new stack after process restoration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSnapshot {
    /// Routes, oldest first
    pub routes: Vec<RouteValue>,
}

impl StackSnapshot {
    /// The last route in the snapshot
    pub fn last_route(&self) -> Option<&RouteValue> {
        self.routes.last()
    }
}

// =============================================================================
// Tests
// =============================================================================
