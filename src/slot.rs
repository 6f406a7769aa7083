//! Stale-response guarding.
//!
//! Each logical request slot (the list page, the dependent options, a detail
//! dialog) hands out a [`Ticket`] per request. A response is applied only
//! while its ticket is still the most recently issued one for that slot, so
//! an older request that resolves late never overwrites newer state.

use crate::error::ApiError;
use tracing::debug;

/// Proof that a request was issued for `key` as the slot's `seq`-th request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    seq: u64,
    key: K,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug)]
pub struct Slot<K> {
    issued: u64,
    current: Option<K>,
}

impl<K> Default for Slot<K> {
    fn default() -> Self {
        Self {
            issued: 0,
            current: None,
        }
    }
}

impl<K: Clone + PartialEq> Slot<K> {
    pub fn issue(&mut self, key: K) -> Ticket<K> {
        self.issued += 1;
        self.current = Some(key.clone());
        Ticket {
            seq: self.issued,
            key,
        }
    }

    /// Makes every outstanding ticket stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.issued += 1;
        self.current = None;
    }

    pub fn is_current(&self, ticket: &Ticket<K>) -> bool {
        ticket.seq == self.issued && self.current.as_ref() == Some(&ticket.key)
    }

    pub fn current(&self) -> Option<&K> {
        self.current.as_ref()
    }
}

/// Lifecycle of one loadable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// What [`Loadable::apply`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Stored,
    Failed,
    Stale,
}

/// A value fetched through a [`Slot`]. Failures keep the previous value.
#[derive(Debug)]
pub struct Loadable<K, V> {
    slot: Slot<K>,
    value: Option<V>,
    phase: Phase,
    error: Option<String>,
}

impl<K, V> Default for Loadable<K, V> {
    fn default() -> Self {
        Self {
            slot: Slot::default(),
            value: None,
            phase: Phase::Idle,
            error: None,
        }
    }
}

impl<K: Clone + PartialEq, V> Loadable<K, V> {
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.phase = Phase::Loading;
        self.slot.issue(key)
    }

    pub fn apply(&mut self, ticket: &Ticket<K>, outcome: Result<V, ApiError>) -> Applied {
        if !self.slot.is_current(ticket) {
            debug!(seq = ticket.seq, "Discarding stale response");
            return Applied::Stale;
        }
        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
                self.phase = Phase::Loaded;
                Applied::Stored
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.phase = Phase::Error;
                Applied::Failed
            }
        }
    }

    /// Drops the value and any in-flight request.
    pub fn reset(&mut self) {
        self.slot.invalidate();
        self.value = None;
        self.error = None;
        self.phase = Phase::Idle;
    }

    pub fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Key of the most recently issued request.
    pub fn current_key(&self) -> Option<&K> {
        self.slot.current()
    }
}
