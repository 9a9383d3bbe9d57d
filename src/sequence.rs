//! Sequence-affinity checks for single-sequence state
//!
//! Per-tab state is mutated from one logical sequence only. The checker binds
//! to the thread that first uses it and asserts in debug builds when touched
//! from anywhere else.

use std::thread::{self, ThreadId};

/// Binds mutating entry points to one thread
#[derive(Debug, Clone, Default)]
pub struct SequenceChecker {
    owner: Option<ThreadId>,
}

impl SequenceChecker {
    /// Checker bound to the current thread
    pub fn new() -> Self {
        Self {
            owner: Some(thread::current().id()),
        }
    }

    /// Whether the caller runs on the bound sequence
    ///
    /// An unbound checker binds to the caller.
    pub fn called_on_valid_sequence(&mut self) -> bool {
        let current = thread::current().id();
        *self.owner.get_or_insert(current) == current
    }

    /// Debug assertion wrapper around [`Self::called_on_valid_sequence`]
    pub fn check(&mut self) {
        let valid = self.called_on_valid_sequence();
        debug_assert!(valid, "state mutated from the wrong sequence");
    }

    /// Forget the bound thread so the next caller rebinds
    pub fn detach(&mut self) {
        self.owner = None;
    }
}
