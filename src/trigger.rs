//! Trigger state machine.
//!
//! This is the center of the application: it owns the trigger binding and the
//! recorder state, and is the sole writer of both. It consumes normalized
//! events one at a time and reports the transitions the caller must act on;
//! it performs no I/O itself.
//!
//! The binding starts empty unless codes were supplied on the command line.
//! The first event observed while the binding is empty becomes the permanent
//! trigger; that event never affects recording state. With lock mode enabled,
//! holding control while pressing the trigger toggles a lock that keeps
//! recording across releases.

use std::collections::HashSet;

use log::debug;

use crate::event::{Direction, EventKind, NormalizedEvent};

/// Codes treated as the lock modifier. Modifier events never count as
/// trigger events, even when a modifier code is itself the bound trigger.
pub const MODIFIER_CODES: [&str; 2] = ["controlleft", "controlright"];

/// An externally visible state change decided by [`TriggerMachine::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The first observed event was captured as the trigger binding.
    Bound { kind: EventKind, code: String },
    /// Recording started; the caller unmutes the eligible sources.
    Start,
    /// Recording stopped; the caller mutes the eligible sources.
    Stop,
}

#[derive(Debug)]
pub struct TriggerMachine {
    binding: HashSet<String>,
    recording: bool,
    modifier_held: bool,
    locked: bool,
    lock_mode: bool,
}

impl TriggerMachine {
    /// Creates a machine, optionally pre-seeded with trigger codes.
    ///
    /// A non-empty seed skips the auto-bind step entirely.
    pub fn new<I>(codes: I, lock_mode: bool) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            binding: codes.into_iter().collect(),
            recording: false,
            modifier_held: false,
            locked: false,
            lock_mode,
        }
    }

    pub fn binding(&self) -> &HashSet<String> {
        &self.binding
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Processes one event and returns the transition it caused, if any.
    ///
    /// The step order is fixed: auto-bind, modifier tracking, trigger
    /// filter, lock flip, recording transition. The lock flip happens before
    /// the recording transition of the same event, so a ctrl+trigger press
    /// that engages the lock also starts recording in one pass, while a
    /// ctrl+trigger press that releases the lock leaves recording running
    /// until the next genuine release.
    pub fn handle(&mut self, event: &NormalizedEvent) -> Option<Transition> {
        // First event ever seen becomes the permanent trigger.
        if self.binding.is_empty() {
            self.binding.insert(event.code.clone());
            return Some(Transition::Bound {
                kind: event.kind,
                code: event.code.clone(),
            });
        }

        if self.lock_mode && MODIFIER_CODES.contains(&event.code.as_str()) {
            self.modifier_held = event.direction == Direction::Down;
            debug!("Modifier held: {}", self.modifier_held);
            return None;
        }

        if !self.binding.contains(&event.code) {
            return None;
        }

        if self.lock_mode && self.modifier_held && event.direction == Direction::Down {
            self.locked = !self.locked;
            debug!("Lock toggled: {}", self.locked);
        }

        if !self.recording && (event.direction == Direction::Down || self.locked) {
            self.recording = true;
            Some(Transition::Start)
        } else if self.recording && event.direction == Direction::Up && !self.locked {
            self.recording = false;
            Some(Transition::Stop)
        } else {
            None
        }
    }
}
