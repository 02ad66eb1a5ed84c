//! Predictive-back states and transitions
//!
//! The lifecycle of one back gesture as a closed enum, plus the pure
//! transition function that moves between states. Nothing here touches the
//! back-stack; a transition only names the side effect the caller must run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw gesture input from the platform
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum GestureEvent {
    /// Edge swipe began
    Start,
    /// New progress sample (fraction of the completion distance)
    Move {
        /// Progress sample, clamped to [0, 1] on entry
        progress: f32,
    },
    /// Finger lifted
    Release,
    /// Platform aborted the gesture
    Cancel,
}

/// Input to the transition function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackInput {
    /// A platform gesture event
    Gesture(GestureEvent),
    /// The settle animation reached its end
    SettleFinished,
    /// The committed pop has been observed; return to rest
    Acknowledge,
}

impl From<GestureEvent> for BackInput {
    fn from(event: GestureEvent) -> Self {
        BackInput::Gesture(event)
    }
}

/// Lifecycle of a single back gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BackState {
    /// No gesture in progress
    #[default]
    Idle,
    /// Gesture active
    Dragging {
        /// Fraction of the completion distance, in [0, 1]
        progress: f32,
    },
    /// Released past the threshold; animating toward completion.
    /// The back-stack has not been touched yet.
    Settling {
        /// Progress at release
        released_at: f32,
    },
    /// Pop issued; followed immediately by `Idle`
    Completed,
}

impl BackState {
    /// Check whether the preview (two screens) should be rendered
    pub fn is_active(&self) -> bool {
        matches!(self, BackState::Dragging { .. } | BackState::Settling { .. })
    }

    /// Drag progress, if dragging
    pub fn progress(&self) -> Option<f32> {
        match self {
            BackState::Dragging { progress } => Some(*progress),
            _ => None,
        }
    }
}

impl fmt::Display for BackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackState::Idle => write!(f, "idle"),
            BackState::Dragging { progress } => write!(f, "dragging({:.2})", progress),
            BackState::Settling { released_at } => write!(f, "settling({:.2})", released_at),
            BackState::Completed => write!(f, "completed"),
        }
    }
}

/// Side effect requested by a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackEffect {
    /// Nothing to do
    None,
    /// Show the screen beneath and start previewing
    BeginPreview,
    /// Move the preview to a new progress
    UpdatePreview {
        /// Clamped progress
        progress: f32,
    },
    /// Animate the top screen out from the given progress
    Settle {
        /// Progress at release
        from_progress: f32,
    },
    /// Animate the top screen back to rest from the given progress
    Rollback {
        /// Progress at release or cancel
        from_progress: f32,
    },
    /// Pop the back-stack now
    CommitPop {
        /// Start a new gesture right after the pop
        restart: bool,
    },
    /// Gesture start refused because the stack cannot go back
    Refused,
    /// Input has no meaning in the current state
    Ignored,
}

/// Facts the transition function needs about the outside world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackContext {
    /// Whether the back-stack holds more than one entry
    pub can_go_back: bool,
    /// Release progress at or above which the pop is committed
    pub commit_threshold: f32,
}

fn sanitize(progress: f32) -> f32 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Compute the next state and the effect to run
pub fn transition(state: BackState, input: BackInput, ctx: &BackContext) -> (BackState, BackEffect) {
    use BackInput::{Acknowledge, Gesture, SettleFinished};
    use GestureEvent::{Cancel, Move, Release, Start};

    match (state, input) {
        (BackState::Idle, Gesture(Start)) | (BackState::Dragging { .. }, Gesture(Start)) => {
            if ctx.can_go_back {
                (BackState::Dragging { progress: 0.0 }, BackEffect::BeginPreview)
            } else {
                (BackState::Idle, BackEffect::Refused)
            }
        }
        (BackState::Idle, _) => (BackState::Idle, BackEffect::Ignored),

        (BackState::Dragging { .. }, Gesture(Move { progress })) => {
            let progress = sanitize(progress);
            (
                BackState::Dragging { progress },
                BackEffect::UpdatePreview { progress },
            )
        }
        (BackState::Dragging { progress }, Gesture(Release)) => {
            if progress >= ctx.commit_threshold {
                (
                    BackState::Settling {
                        released_at: progress,
                    },
                    BackEffect::Settle {
                        from_progress: progress,
                    },
                )
            } else {
                (
                    BackState::Idle,
                    BackEffect::Rollback {
                        from_progress: progress,
                    },
                )
            }
        }
        (BackState::Dragging { progress }, Gesture(Cancel)) => (
            BackState::Idle,
            BackEffect::Rollback {
                from_progress: progress,
            },
        ),
        (BackState::Dragging { .. }, SettleFinished | Acknowledge) => (state, BackEffect::Ignored),

        (BackState::Settling { .. }, SettleFinished) => {
            (BackState::Completed, BackEffect::CommitPop { restart: false })
        }
        // A new gesture cannot wait for the settle; the decided pop happens first
        (BackState::Settling { .. }, Gesture(Start)) => {
            (BackState::Completed, BackEffect::CommitPop { restart: true })
        }
        (BackState::Settling { .. }, Gesture(Move { .. } | Release | Cancel) | Acknowledge) => {
            (state, BackEffect::Ignored)
        }

        (BackState::Completed, Acknowledge) => (BackState::Idle, BackEffect::None),
        (BackState::Completed, _) => (state, BackEffect::Ignored),
    }
}
