//! Object identities and the allocators that hand them out.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a game object, structure, or the player.
///
/// Always positive; unique among the live objects of one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Uid(u64);

impl Uid {
    pub const FIRST: Uid = Uid(1);

    /// `None` for zero, which is never a valid identity.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Accept an identity as read from the document; rejects non-positive values.
    pub fn from_wire(value: i64) -> Option<Self> {
        u64::try_from(value).ok().and_then(Self::new)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh identities.
///
/// `observe` must be called for every identity that enters a world from
/// outside (decoded documents), so that later `issue` calls never collide.
pub trait UidSource {
    fn issue(&mut self) -> Uid;
    fn observe(&mut self, uid: Uid);
}

/// Monotonic single-owner allocator. Each world carries its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidAllocator {
    next: u64,
}

impl UidAllocator {
    pub fn new() -> Self {
        Self::starting_at(Uid::FIRST)
    }

    pub fn starting_at(first: Uid) -> Self {
        Self { next: first.get() }
    }

    /// The identity the next `issue` call will return.
    pub fn peek(&self) -> Uid {
        Uid(self.next)
    }
}

impl Default for UidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl UidSource for UidAllocator {
    fn issue(&mut self) -> Uid {
        let uid = Uid(self.next);
        self.next += 1;
        uid
    }

    fn observe(&mut self, uid: Uid) {
        self.next = self.next.max(uid.get() + 1);
    }
}

/// Allocator that can be shared between threads constructing objects for
/// the same world. Implements [`UidSource`] through a shared reference.
#[derive(Debug)]
pub struct SharedUidAllocator {
    next: AtomicU64,
}

impl SharedUidAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(Uid::FIRST.get()),
        }
    }

    pub fn issue(&self) -> Uid {
        Uid(self.next.fetch_add(1, Ordering::Relaxed))
    }

    pub fn observe(&self, uid: Uid) {
        self.next.fetch_max(uid.get() + 1, Ordering::Relaxed);
    }

    pub fn peek(&self) -> Uid {
        Uid(self.next.load(Ordering::Relaxed))
    }
}

impl Default for SharedUidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl UidSource for &SharedUidAllocator {
    fn issue(&mut self) -> Uid {
        SharedUidAllocator::issue(*self)
    }

    fn observe(&mut self, uid: Uid) {
        SharedUidAllocator::observe(*self, uid)
    }
}
