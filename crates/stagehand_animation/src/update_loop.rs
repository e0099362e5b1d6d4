//! Per-frame update loop subscriptions.
//!
//! A [`DisplayLink`] owns one subscription per running animation group and
//! advances them once per frame. The group keeps an [`UpdateLoopToken`] that
//! shares the subscription's state.
//!
//! # Cancellation
//!
//! [`UpdateLoopToken::cancel`] only flags the shared state. The link drops the
//! subscription on its next [`DisplayLink::tick`]; callers never wait for it.
//!
//! ```rust,ignore
//! let mut link = DisplayLink::new();
//! let token = link.subscribe(0.5);
//!
//! link.tick(0.25);
//! assert_eq!(token.phase(), LoopPhase::Running);
//!
//! let finished = link.tick(0.25);
//! assert_eq!(finished.as_slice(), &[token.key()]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    pub struct LoopKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopPhase {
    Running,
    Finished,
    Cancelled,
}

#[derive(Debug)]
struct LoopState {
    elapsed: f32,
    phase: LoopPhase,
}

#[derive(Debug)]
struct Subscription {
    state: Arc<Mutex<LoopState>>,
    duration: f32,
}

/// Shared view of one update loop subscription.
#[derive(Debug, Clone)]
pub struct UpdateLoopToken {
    key: LoopKey,
    state: Arc<Mutex<LoopState>>,
}

impl UpdateLoopToken {
    #[inline]
    #[must_use]
    pub fn key(&self) -> LoopKey {
        self.key
    }

    #[must_use]
    pub fn phase(&self) -> LoopPhase {
        self.state.lock().phase
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase() == LoopPhase::Running
    }

    /// Flags the loop as cancelled. Returns false if it had already ended.
    pub fn cancel(&self) -> bool {
        let mut state = self.state.lock();
        if state.phase == LoopPhase::Running {
            state.phase = LoopPhase::Cancelled;
            true
        } else {
            false
        }
    }
}

/// Frame-driven subscription table.
#[derive(Debug, Default)]
pub struct DisplayLink {
    subscriptions: SlotMap<LoopKey, Subscription>,
}

impl DisplayLink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a loop that finishes once `duration` seconds have elapsed.
    pub fn subscribe(&mut self, duration: f32) -> UpdateLoopToken {
        let state = Arc::new(Mutex::new(LoopState {
            elapsed: 0.0,
            phase: LoopPhase::Running,
        }));
        let key = self.subscriptions.insert(Subscription {
            state: Arc::clone(&state),
            duration: duration.max(0.0),
        });
        log::trace!("Update loop {key:?} subscribed for {duration}s");
        UpdateLoopToken { key, state }
    }

    /// Advances every running loop by `dt` seconds.
    ///
    /// Cancelled subscriptions are pruned. Returns the keys of loops that
    /// completed during this frame.
    pub fn tick(&mut self, dt: f32) -> SmallVec<[LoopKey; 8]> {
        let mut finished = SmallVec::new();
        self.subscriptions.retain(|key, sub| {
            let mut state = sub.state.lock();
            match state.phase {
                LoopPhase::Cancelled | LoopPhase::Finished => false,
                LoopPhase::Running => {
                    state.elapsed += dt;
                    if state.elapsed >= sub.duration {
                        state.elapsed = sub.duration;
                        state.phase = LoopPhase::Finished;
                        finished.push(key);
                        false
                    } else {
                        true
                    }
                }
            }
        });

        finished
    }

    /// Number of subscriptions still held, including cancelled ones not yet pruned.
    #[inline]
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// True while `key` is still held, including a cancelled loop not yet pruned.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: LoopKey) -> bool {
        self.subscriptions.contains_key(key)
    }
}
