/// Request generation tracking.
///
/// Queries are not cancellable, so two searches started back to back can
/// complete in either order. Each query takes a `QueryTicket` when it starts;
/// only the result carrying the most recently issued ticket is kept, and a
/// slower, older response is dropped instead of overwriting a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Opaque, monotonically increasing query generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Issues tickets. Thread-safe.
#[derive(Debug, Default)]
pub struct QueryGenerations {
    latest: AtomicU64,
}

impl QueryGenerations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation; every earlier ticket becomes stale.
    pub fn begin(&self) -> QueryTicket {
        QueryTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no ticket has been issued after `ticket`.
    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Holds the value produced by the most recent query generation.
#[derive(Debug, Default)]
pub struct LatestResult<T> {
    generations: QueryGenerations,
    slot: Mutex<Option<(QueryTicket, T)>>,
}

impl<T: Clone> LatestResult<T> {
    pub fn new() -> Self {
        Self {
            generations: QueryGenerations::new(),
            slot: Mutex::new(None),
        }
    }

    pub fn begin(&self) -> QueryTicket {
        self.generations.begin()
    }

    /// Stores `value` if `ticket` is still the latest generation.
    ///
    /// Returns whether the value was kept.
    pub fn offer(&self, ticket: QueryTicket, value: T) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.generations.is_current(&ticket) {
            return false;
        }
        if let Some((held, _)) = slot.as_ref() {
            if *held > ticket {
                return false;
            }
        }
        *slot = Some((ticket, value));
        true
    }

    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        slot.as_ref().map(|(_, value)| value.clone())
    }

    pub fn is_current(&self, ticket: &QueryTicket) -> bool {
        self.generations.is_current(ticket)
    }
}
