//! Strictly increasing request nonces
//!
//! A nonce is the current millisecond timestamp followed by a 4-digit,
//! zero-padded per-millisecond counter, e.g. `1616492376594` + `0007`.
//! Numerically that is `millis * 10_000 + counter`, which keeps decimal
//! order and numeric order identical as long as the digit count is fixed.
//!
//! At most [`MAX_PER_MILLISECOND`] nonces fit in one millisecond. Rather than
//! widening the counter (which would break the fixed width), the generator
//! borrows the next millisecond once the counter is exhausted. The recorded
//! timestamp therefore may run slightly ahead of the wall clock under extreme
//! load, and never moves backwards when the wall clock does.

use parking_lot::Mutex;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of decimal digits reserved for the per-millisecond counter
pub const COUNTER_WIDTH: usize = 4;

/// Number of nonces that fit in one millisecond (`10^COUNTER_WIDTH`)
pub const MAX_PER_MILLISECOND: u64 = 10_000;

/// A single request nonce
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce(u64);

impl Nonce {
    fn from_parts(millis: u64, counter: u64) -> Self {
        debug_assert!(counter < MAX_PER_MILLISECOND);
        Self(millis * MAX_PER_MILLISECOND + counter)
    }

    /// Numeric value of the nonce
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Millisecond component
    pub fn millis(&self) -> u64 {
        self.0 / MAX_PER_MILLISECOND
    }

    /// Per-millisecond counter component
    pub fn counter(&self) -> u64 {
        self.0 % MAX_PER_MILLISECOND
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            self.millis(),
            self.counter(),
            width = COUNTER_WIDTH
        )
    }
}

#[derive(Debug, Default)]
struct NonceState {
    last_millis: u64,
    counter: u64,
}

/// Generator for strictly increasing nonces
///
/// One generator belongs to one client instance (one API key). All calls
/// issued through that client share it; the internal lock serializes them so
/// no two callers can observe the same or a smaller value.
#[derive(Debug, Default)]
pub struct NonceGenerator {
    state: Mutex<NonceState>,
}

impl NonceGenerator {
    /// Create a new generator
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate the next nonce from the wall clock
    pub fn generate(&self) -> Nonce {
        self.generate_at(now_millis())
    }

    /// Generate the next nonce as if the clock read `now_millis`
    pub fn generate_at(&self, now_millis: u64) -> Nonce {
        let mut state = self.state.lock();

        if now_millis > state.last_millis {
            state.last_millis = now_millis;
            state.counter = 0;
        } else {
            state.counter += 1;
            if state.counter == MAX_PER_MILLISECOND {
                tracing::trace!(
                    millis = state.last_millis,
                    "Nonce counter exhausted, advancing to next millisecond"
                );
                state.last_millis += 1;
                state.counter = 0;
            }
        }

        Nonce::from_parts(state.last_millis, state.counter)
    }
}

fn now_millis() -> u64 {
    // A clock set before the epoch collapses to 0; the generator then keeps
    // counting from its last recorded timestamp.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
