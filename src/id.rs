//! Component identities.
//!
//! Every [`Handle`](crate::component::Handle) receives a [`ComponentId`] when it is created. The
//! identity is the decimal form of a counter value: unique for the allocator's lifetime, handed
//! out in allocation order and never reused.

use core::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};
use std::sync::OnceLock;

/// Opaque identity of a component instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(String);

impl ComponentId {
    /// Returns the identity as it appears in the marker attribute.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ComponentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Monotonic identity source.
///
/// The process-wide allocator is [`IdAllocator::global`]; separate allocators can be injected
/// with [`Handle::with_allocator`](crate::component::Handle::with_allocator).
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator whose first identity is `"0"`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU64::new(0),
        }
    }

    /// Returns the allocator shared by the whole process. It is never reset.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<IdAllocator> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Hands out the next identity.
    pub fn next_id(&self) -> ComponentId {
        ComponentId(self.next.fetch_add(1, Ordering::Relaxed).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_follow_allocation_order() {
        let allocator = IdAllocator::new();
        let ids: Vec<_> = (0..3).map(|_| allocator.next_id()).collect();
        assert_eq!(
            ids.iter().map(ComponentId::as_str).collect::<Vec<_>>(),
            ["0", "1", "2"]
        );
    }

    #[test]
    fn global_allocator_never_repeats() {
        let a = IdAllocator::global().next_id();
        let b = IdAllocator::global().next_id();
        assert_ne!(a, b);
    }
}
