//! Conversation identifier type and allocation.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a conversation.
///
/// The value is a millisecond clock reading taken at creation, so identifiers
/// are ordered by creation time. Allocation goes through
/// [`ConversationIdAllocator`], which guarantees strict ordering even when
/// two conversations are created within the same millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationId(i64);

impl ConversationId {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the underlying millisecond clock reading.
    pub fn as_millis(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Allocates conversation identifiers from the wall clock.
///
/// Identifiers must be unique and strictly ordered relative to prior
/// allocations, so when the clock has not advanced since the last allocation
/// the allocator steps one past the previous value.
#[derive(Debug, Default)]
pub struct ConversationIdAllocator {
    last: i64,
}

impl ConversationIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator that will never hand out an id at or below any
    /// of the given existing ids.
    pub fn seeded(existing: impl IntoIterator<Item = ConversationId>) -> Self {
        let last = existing
            .into_iter()
            .map(|id| id.as_millis())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    /// Allocates the next identifier.
    pub fn allocate(&mut self) -> ConversationId {
        let now = Utc::now().timestamp_millis();
        let next = now.max(self.last + 1);
        self.last = next;
        ConversationId(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_strictly_increasing() {
        let mut allocator = ConversationIdAllocator::new();
        let mut previous = allocator.allocate();
        // Well beyond what a single millisecond can absorb.
        for _ in 0..1000 {
            let next = allocator.allocate();
            assert!(next > previous);
            previous = next;
        }
    }

    #[test]
    fn test_seeded_allocator_steps_past_existing_ids() {
        let far_future = ConversationId::from_millis(i64::MAX - 10);
        let mut allocator = ConversationIdAllocator::seeded([
            ConversationId::from_millis(100),
            far_future,
            ConversationId::from_millis(42),
        ]);
        assert!(allocator.allocate() > far_future);
    }

    #[test]
    fn test_display_is_plain_millis() {
        assert_eq!(ConversationId::from_millis(1700000000000).to_string(), "1700000000000");
    }
}
