//! Per-layer animation driver
//!
//! Runs at most one transform animation per layer key. Starting a new
//! animation for a key supersedes the old one; every start gets a fresh
//! [`AnimationTicket`] so completions of superseded animations can be told
//! apart from the current one.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use crate::easing::Easing;
use crate::transform::{Transform, TransformRange};
use crate::transition::{LayerPlan, TransitionPlan};

/// A single transform animation driven by elapsed time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformAnimation {
    range: TransformRange,
    duration: Duration,
    easing: Easing,
    elapsed: Duration,
}

impl TransformAnimation {
    /// Create an animation
    pub fn new(range: TransformRange, duration: Duration, easing: Easing) -> Self {
        Self {
            range,
            duration,
            easing,
            elapsed: Duration::ZERO,
        }
    }

    /// Animation for the entering layer of a transition plan
    pub fn enter(plan: &TransitionPlan) -> Self {
        Self::new(plan.enter, plan.duration, plan.easing)
    }

    /// Animation for the exiting layer of a transition plan
    pub fn exit(plan: &TransitionPlan) -> Self {
        Self::new(plan.exit, plan.duration, plan.easing)
    }

    /// Advance by `dt`
    pub fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
    }

    /// Linear progress in [0, 1]; zero-length animations are always done
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Check whether the animation reached its end
    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Current transform
    pub fn value(&self) -> Transform {
        self.range.at(self.easing.evaluate(self.progress()))
    }

    /// Total duration
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl From<LayerPlan> for TransformAnimation {
    fn from(plan: LayerPlan) -> Self {
        Self::new(plan.range, plan.duration, plan.easing)
    }
}

/// Identifies one started animation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationTicket(u64);

impl AnimationTicket {
    /// Generation number
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// An animation that reached its end during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct Finished<K> {
    /// Layer the animation ran on
    pub key: K,
    /// Ticket returned when the animation started
    pub ticket: AnimationTicket,
    /// Final transform
    pub value: Transform,
}

#[derive(Debug, Clone)]
struct Running {
    ticket: AnimationTicket,
    animation: TransformAnimation,
}

/// Drives one animation per layer key
#[derive(Debug, Clone)]
pub struct Animator<K> {
    running: HashMap<K, Running>,
    generation: u64,
}

impl<K> Default for Animator<K> {
    fn default() -> Self {
        Self {
            running: HashMap::new(),
            generation: 0,
        }
    }
}

impl<K> Animator<K>
where
    K: Eq + Hash + Clone + std::fmt::Debug,
{
    /// Create an idle animator
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `animation` on `key`, superseding anything already running there
    pub fn start(&mut self, key: K, animation: TransformAnimation) -> AnimationTicket {
        self.generation += 1;
        let ticket = AnimationTicket(self.generation);
        if let Some(previous) = self.running.insert(key.clone(), Running { ticket, animation }) {
            tracing::trace!(
                key = ?key,
                superseded = previous.ticket.0,
                ticket = ticket.0,
                "animation superseded"
            );
        }
        ticket
    }

    /// Stop the animation on `key`, returning the transform it had reached
    pub fn cancel(&mut self, key: &K) -> Option<Transform> {
        self.running.remove(key).map(|r| r.animation.value())
    }

    /// Stop everything
    pub fn clear(&mut self) {
        self.running.clear();
    }

    /// Current transform of `key`, if animating
    pub fn transform(&self, key: &K) -> Option<Transform> {
        self.running.get(key).map(|r| r.animation.value())
    }

    /// Ticket of the animation running on `key`
    pub fn ticket(&self, key: &K) -> Option<AnimationTicket> {
        self.running.get(key).map(|r| r.ticket)
    }

    /// Check whether `key` is animating
    pub fn is_animating(&self, key: &K) -> bool {
        self.running.contains_key(key)
    }

    /// Check whether nothing is animating
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Number of running animations
    pub fn len(&self) -> usize {
        self.running.len()
    }

    /// Check whether no animation is running
    pub fn is_empty(&self) -> bool {
        self.running.is_empty()
    }

    /// Advance every animation by `dt` and collect the ones that finished
    ///
    /// Zero-length animations finish on the first tick, including `tick(ZERO)`.
    /// Results are ordered by start order.
    pub fn tick(&mut self, dt: Duration) -> Vec<Finished<K>> {
        let mut finished = Vec::new();
        for (key, running) in self.running.iter_mut() {
            running.animation.tick(dt);
            if running.animation.is_complete() {
                finished.push(Finished {
                    key: key.clone(),
                    ticket: running.ticket,
                    value: running.animation.value(),
                });
            }
        }
        for done in &finished {
            self.running.remove(&done.key);
        }
        finished.sort_by_key(|f| f.ticket);
        finished
    }
}
