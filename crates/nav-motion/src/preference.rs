//! Reduced-motion preference
//!
//! The platform owns the "reduce motion" setting and may flip it at any
//! time. Consumers read it once per transition through
//! [`MotionPreference::reduce_motion`] and never cache the answer.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Source of the system-wide reduce-motion flag
#[cfg_attr(test, mockall::automock)]
pub trait MotionPreference: Send + Sync {
    /// Current reduce-motion state
    fn reduce_motion(&self) -> bool;
}

/// Ready-made preference sources
#[derive(Clone)]
pub enum MotionSource {
    /// A fixed value
    Fixed(bool),
    /// Latest value published on a watch channel
    Watch(watch::Receiver<bool>),
    /// A probe queried on every read
    Probe(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl MotionSource {
    /// Always report `reduce`
    pub fn fixed(reduce: bool) -> Self {
        MotionSource::Fixed(reduce)
    }

    /// Query `probe` on every read
    pub fn probe<F>(probe: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        MotionSource::Probe(Arc::new(probe))
    }
}

impl Default for MotionSource {
    fn default() -> Self {
        MotionSource::Fixed(false)
    }
}

impl MotionPreference for MotionSource {
    fn reduce_motion(&self) -> bool {
        match self {
            MotionSource::Fixed(reduce) => *reduce,
            MotionSource::Watch(rx) => *rx.borrow(),
            MotionSource::Probe(probe) => probe(),
        }
    }
}

impl fmt::Debug for MotionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionSource::Fixed(reduce) => f.debug_tuple("Fixed").field(reduce).finish(),
            MotionSource::Watch(rx) => f.debug_tuple("Watch").field(&*rx.borrow()).finish(),
            MotionSource::Probe(_) => f.write_str("Probe"),
        }
    }
}

/// Platform-side publisher of the reduce-motion flag
///
/// # Example
///
/// ```rust
/// use nav_motion::preference::{MotionPreference, MotionSwitch};
///
/// let switch = MotionSwitch::new(false);
/// let source = switch.source();
/// assert!(!source.reduce_motion());
///
/// switch.set(true);
/// assert!(source.reduce_motion());
/// ```
#[derive(Debug)]
pub struct MotionSwitch {
    tx: watch::Sender<bool>,
}

impl MotionSwitch {
    /// Create a switch with an initial value
    pub fn new(reduce: bool) -> Self {
        let (tx, _) = watch::channel(reduce);
        Self { tx }
    }

    /// Publish a new value
    pub fn set(&self, reduce: bool) {
        self.tx.send_if_modified(|current| {
            if *current == reduce {
                false
            } else {
                *current = reduce;
                tracing::debug!(reduce_motion = reduce, "motion preference changed");
                true
            }
        });
    }

    /// Current value
    pub fn get(&self) -> bool {
        *self.tx.borrow()
    }

    /// A reader that always sees the latest published value
    pub fn source(&self) -> MotionSource {
        MotionSource::Watch(self.tx.subscribe())
    }
}

impl Default for MotionSwitch {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_fixed_source() {
        assert!(MotionSource::fixed(true).reduce_motion());
        assert!(!MotionSource::default().reduce_motion());
    }

    #[test]
    fn test_probe_is_read_every_time() {
        let flag = Arc::new(AtomicBool::new(false));
        let probe_flag = Arc::clone(&flag);
        let source = MotionSource::probe(move || probe_flag.load(Ordering::SeqCst));

        assert!(!source.reduce_motion());
        flag.store(true, Ordering::SeqCst);
        assert!(source.reduce_motion());
    }

    #[test]
    fn test_switch_publishes_to_all_sources() {
        let switch = MotionSwitch::new(false);
        let a = switch.source();
        let b = switch.source();

        switch.set(true);
        assert!(a.reduce_motion());
        assert!(b.reduce_motion());
        assert!(switch.get());

        switch.set(false);
        assert!(!a.reduce_motion());
    }

    #[tokio::test]
    async fn test_switch_updated_from_another_task() {
        let switch = Arc::new(MotionSwitch::new(false));
        let source = switch.source();

        let publisher = Arc::clone(&switch);
        tokio::spawn(async move {
            publisher.set(true);
        })
        .await
        .unwrap();

        assert!(source.reduce_motion());
    }

    #[test]
    fn test_mock_preference() {
        let mut mock = MockMotionPreference::new();
        mock.expect_reduce_motion().times(2).return_const(true);
        assert!(mock.reduce_motion());
        assert!(mock.reduce_motion());
    }
}
