//! Navigation host
//!
//! The composition point the application talks to. It owns the navigator,
//! the route registry, the transition planner, the predictive-back driver
//! and the animator, and turns taps, gesture samples, deep links and frame
//! ticks into a [`Frame`] of layers to draw.
//!
//! Ordering rules:
//! - Navigation requests are applied in arrival order.
//! - A request that arrives while a released back gesture is settling is
//!   queued and applied right after the gesture's pop.
//! - A request that arrives while a back gesture is still dragging cancels
//!   the gesture first (no pop, dragged screen rolls back) and is then
//!   applied. A request that would not change the stack leaves the gesture
//!   alone.
//! - A new animation on a screen supersedes the old one; superseded
//!   animations never report completion.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use nav_core::{
    DeepLinkError, DeepLinkResolver, EntryKey, NavOp, NavOutcome, Navigator, NavigatorReader,
    RouteRegistry, RouteTag, RouteValue, StackEntry,
};
use nav_gesture::{BackEffect, BackState, GestureEvent, PredictiveBack, Step};
use nav_motion::{
    AnimationTicket, Animator, Direction, MotionPreference, Transform, TransformAnimation,
    TransitionPlanner,
};

use crate::frame::{Frame, Layer};

/// Result of a programmatic navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The stack changed and a transition started
    Applied,
    /// The request was a defined no-op
    Unchanged,
    /// Held until the settling back gesture commits
    Queued,
    /// The route tag has no renderer
    Rejected,
}

/// Result of a system back press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackOutcome {
    /// The top screen was removed
    Popped,
    /// Nothing to go back to; the platform may close the app
    AtRoot,
    /// Will be applied after the settling back gesture commits
    Deferred,
}

/// Why a deep link fell back to the start route
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The URI could not be resolved
    Unresolved(DeepLinkError),
    /// The URI resolved to a route nobody renders
    Unregistered(RouteTag),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Unresolved(err) => write!(f, "{}", err),
            FallbackReason::Unregistered(tag) => write!(f, "unregistered route tag '{}'", tag),
        }
    }
}

/// Result of opening a deep link
#[derive(Debug, Clone, PartialEq)]
pub enum LinkOutcome {
    /// The link's routes were replayed onto a fresh stack
    Applied {
        /// Resulting stack depth
        depth: usize,
    },
    /// The stack was reset to the start route
    FellBack(FallbackReason),
}

/// What is drawn besides the current screen
#[derive(Debug, Clone)]
enum Overlay {
    /// Programmatic transition; `other` is the screen losing current status
    Transition {
        direction: Direction,
        other: StackEntry,
    },
    /// Back gesture preview over the screen beneath, including its settle
    /// and rollback animations
    Preview { top: EntryKey },
}

/// Navigation shell host
pub struct NavigationHost<R> {
    navigator: Navigator,
    registry: Arc<RouteRegistry<R>>,
    planner: TransitionPlanner,
    motion: Box<dyn MotionPreference>,
    back: PredictiveBack,
    animator: Animator<EntryKey>,
    links: DeepLinkResolver,
    pending: VecDeque<NavOp>,
    overlay: Option<Overlay>,
    settle: Option<AnimationTicket>,
}

impl<R> NavigationHost<R> {
    pub(crate) fn new(
        navigator: Navigator,
        registry: Arc<RouteRegistry<R>>,
        planner: TransitionPlanner,
        motion: Box<dyn MotionPreference>,
        back: PredictiveBack,
        links: DeepLinkResolver,
    ) -> Self {
        Self {
            navigator,
            registry,
            planner,
            motion,
            back,
            animator: Animator::new(),
            links,
            pending: VecDeque::new(),
            overlay: None,
            settle: None,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The navigator (read-only)
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// A cloneable read handle on the back-stack
    pub fn reader(&self) -> NavigatorReader {
        self.navigator.reader()
    }

    /// The route registry
    pub fn registry(&self) -> &Arc<RouteRegistry<R>> {
        &self.registry
    }

    /// Current (top) route
    pub fn current(&self) -> RouteValue {
        self.navigator.current()
    }

    /// Back-stack depth
    pub fn depth(&self) -> usize {
        self.navigator.depth()
    }

    /// Back-stack routes, oldest first
    pub fn snapshot(&self) -> Vec<RouteValue> {
        self.navigator.snapshot()
    }

    /// Predictive-back state
    pub fn gesture_state(&self) -> BackState {
        self.back.state()
    }

    /// Check whether any screen is animating
    pub fn is_animating(&self) -> bool {
        !self.animator.is_idle()
    }

    /// Number of requests waiting for a settle to finish
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    // =========================================================================
    // Programmatic navigation
    // =========================================================================

    /// Push a route
    pub fn push(&mut self, route: RouteValue) -> RequestOutcome {
        self.request(NavOp::Push(route))
    }

    /// Pop the top route
    pub fn pop(&mut self) -> RequestOutcome {
        self.request(NavOp::Pop)
    }

    /// Pop back to the last occurrence of `route`
    pub fn pop_to(&mut self, route: RouteValue, inclusive: bool) -> RequestOutcome {
        self.request(NavOp::PopTo { route, inclusive })
    }

    /// Replace the top route
    pub fn replace(&mut self, route: RouteValue) -> RequestOutcome {
        self.request(NavOp::Replace(route))
    }

    /// System back press
    pub fn back(&mut self) -> BackOutcome {
        if self.back.is_settling() {
            self.pending.push_back(NavOp::Pop);
            tracing::debug!(pending = self.pending.len(), "back deferred until settle");
            return BackOutcome::Deferred;
        }
        match self.request(NavOp::Pop) {
            RequestOutcome::Applied => BackOutcome::Popped,
            _ => BackOutcome::AtRoot,
        }
    }

    /// Apply a navigation request, honouring the ordering rules
    pub fn request(&mut self, op: NavOp) -> RequestOutcome {
        if let NavOp::Push(route) | NavOp::Replace(route) = &op {
            if !self.registry.contains(route.tag()) {
                tracing::warn!(%route, "navigation rejected: no renderer for route");
                return RequestOutcome::Rejected;
            }
        }

        if self.back.is_settling() {
            tracing::debug!(op = %op, "navigation queued behind settling back gesture");
            self.pending.push_back(op);
            return RequestOutcome::Queued;
        }

        if matches!(self.back.state(), BackState::Dragging { .. }) {
            let (_, dry_run) = op.apply(&self.navigator.stack());
            if !dry_run.changed() {
                tracing::debug!(op = %op, "no-op navigation left back gesture in place");
                return RequestOutcome::Unchanged;
            }
            tracing::debug!(op = %op, "back gesture cancelled by navigation request");
            let step = self.back.handle(GestureEvent::Cancel, &mut self.navigator);
            self.run_effects(&step);
        }

        let outcome = self.apply_now(&op);
        self.pump();
        outcome
    }

    // =========================================================================
    // Gestures, deep links and time
    // =========================================================================

    /// Feed a predictive-back gesture event
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Step {
        let step = self.back.handle(event, &mut self.navigator);
        self.run_effects(&step);
        self.pump();
        step
    }

    /// Open a deep link
    ///
    /// On success the stack becomes `[start, ..routes]` without animation.
    /// On any failure it becomes `[start]`.
    pub fn deep_link(&mut self, uri: &str) -> LinkOutcome {
        let outcome = match self.links.resolve(uri) {
            Ok(routes) => match routes.iter().find(|r| !self.registry.contains(r.tag())) {
                Some(route) => Err(FallbackReason::Unregistered(route.tag().clone())),
                None => Ok(routes),
            },
            Err(err) => Err(FallbackReason::Unresolved(err)),
        };

        self.interrupt();
        match outcome {
            Ok(routes) => {
                self.navigator.replay(routes);
                tracing::info!(uri, depth = self.navigator.depth(), "deep link opened");
                LinkOutcome::Applied {
                    depth: self.navigator.depth(),
                }
            }
            Err(reason) => {
                self.navigator.reset();
                tracing::warn!(uri, %reason, "deep link fell back to start route");
                LinkOutcome::FellBack(reason)
            }
        }
    }

    /// Advance animations by `dt`
    pub fn tick(&mut self, dt: Duration) {
        let mut finished = self.animator.tick(dt);
        while !finished.is_empty() {
            for done in finished {
                if self.settle == Some(done.ticket) {
                    self.settle = None;
                    let step = self.back.settle_finished(&mut self.navigator);
                    self.run_effects(&step);
                }
            }
            // A commit may have started instant transitions
            finished = self.animator.tick(Duration::ZERO);
        }
        self.retire_overlay();
    }

    // =========================================================================
    // Frame output
    // =========================================================================

    /// Screens to draw this frame, bottom-to-top
    pub fn frame(&self) -> Frame<R> {
        let current = self.navigator.current_entry();
        let entries: Vec<StackEntry> = match &self.overlay {
            None => vec![current],
            Some(Overlay::Transition { direction, other }) => match direction {
                Direction::Forward => vec![other.clone(), current],
                Direction::Backward => vec![current, other.clone()],
            },
            Some(Overlay::Preview { top }) if *top == current.key => {
                match self.navigator.beneath_entry() {
                    Some(beneath) => vec![beneath, current],
                    None => vec![current],
                }
            }
            Some(Overlay::Preview { .. }) => vec![current],
        };

        Frame {
            layers: entries.into_iter().filter_map(|e| self.layer(e)).collect(),
        }
    }

    fn layer(&self, entry: StackEntry) -> Option<Layer<R>> {
        let transform = self.transform_of(entry.key);
        match self.registry.render(&entry.route) {
            Ok(content) => Some(Layer {
                key: entry.key,
                route: entry.route,
                transform,
                content,
            }),
            Err(err) => {
                tracing::error!(route = %entry.route, error = %err, "screen render failed");
                None
            }
        }
    }

    fn transform_of(&self, key: EntryKey) -> Transform {
        if let (Some(Overlay::Preview { top }), BackState::Dragging { progress }) =
            (&self.overlay, self.back.state())
        {
            if *top == key {
                return self.planner.peek_transform(progress);
            }
        }
        self.animator.transform(&key).unwrap_or(Transform::IDENTITY)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn apply_now(&mut self, op: &NavOp) -> RequestOutcome {
        let previous = self.navigator.current_entry();
        match self.navigator.apply(op) {
            NavOutcome::Pushed { .. } => self.begin_transition(Direction::Forward, previous),
            NavOutcome::Replaced { removed, .. } => {
                self.begin_transition(Direction::Forward, removed)
            }
            NavOutcome::Popped { mut removed } => match removed.pop() {
                Some(top) => self.begin_transition(Direction::Backward, top),
                None => return RequestOutcome::Unchanged,
            },
            NavOutcome::Unchanged => return RequestOutcome::Unchanged,
        }
        RequestOutcome::Applied
    }

    fn begin_transition(&mut self, direction: Direction, other: StackEntry) {
        // The outgoing screen leaves from wherever it is currently drawn
        let held = self.animator.transform(&other.key);
        self.animator.clear();
        self.settle = None;

        let plan = self.planner.plan_for(direction, &*self.motion);
        let mut exit = plan.exit;
        if let Some(from) = held {
            exit.from = from;
        }
        let current = self.navigator.current_key();
        self.animator.start(current, TransformAnimation::enter(&plan));
        self.animator
            .start(other.key, TransformAnimation::new(exit, plan.duration, plan.easing));
        self.overlay = Some(Overlay::Transition { direction, other });
    }

    fn run_effects(&mut self, step: &Step) {
        for effect in &step.effects {
            match *effect {
                BackEffect::BeginPreview => {
                    self.animator.clear();
                    self.settle = None;
                    self.overlay = Some(Overlay::Preview {
                        top: self.navigator.current_key(),
                    });
                }
                BackEffect::Settle { from_progress } => {
                    let top = self.preview_top();
                    let from = self.planner.peek_transform(from_progress);
                    let plan = self.planner.settle_plan(from, self.motion.reduce_motion());
                    self.settle = Some(self.animator.start(top, plan.into()));
                }
                BackEffect::Rollback { from_progress } => {
                    let top = self.preview_top();
                    let from = self.planner.peek_transform(from_progress);
                    let plan = self.planner.rollback_plan(from, self.motion.reduce_motion());
                    self.animator.start(top, plan.into());
                }
                BackEffect::CommitPop { .. } => {
                    if let Some(Overlay::Preview { top }) = self.overlay.take() {
                        self.animator.cancel(&top);
                    }
                    self.settle = None;
                    self.drain_pending();
                }
                BackEffect::Refused => {
                    tracing::debug!("back gesture refused at root");
                }
                BackEffect::UpdatePreview { .. } | BackEffect::None | BackEffect::Ignored => {}
            }
        }
    }

    fn preview_top(&self) -> EntryKey {
        match &self.overlay {
            Some(Overlay::Preview { top }) => *top,
            _ => self.navigator.current_key(),
        }
    }

    fn drain_pending(&mut self) {
        while let Some(op) = self.pending.pop_front() {
            tracing::debug!(op = %op, "applying queued navigation");
            self.apply_now(&op);
        }
    }

    /// Drop gestures, animations and queued requests
    fn interrupt(&mut self) {
        self.back.reset();
        self.animator.clear();
        self.pending.clear();
        self.overlay = None;
        self.settle = None;
    }

    /// Let zero-length animations finish within the causing event
    fn pump(&mut self) {
        self.tick(Duration::ZERO);
    }

    fn retire_overlay(&mut self) {
        let done = match &self.overlay {
            Some(Overlay::Transition { other, .. }) => {
                !self.animator.is_animating(&other.key)
                    && !self.animator.is_animating(&self.navigator.current_key())
            }
            Some(Overlay::Preview { top }) => {
                !self.back.is_active() && !self.animator.is_animating(top)
            }
            None => false,
        };
        if done {
            self.overlay = None;
        }
    }
}

impl<R> fmt::Debug for NavigationHost<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationHost")
            .field("depth", &self.navigator.depth())
            .field("current", &self.navigator.current())
            .field("gesture", &self.back.state())
            .field("animating", &self.animator.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
