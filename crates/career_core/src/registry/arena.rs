//! Session-scoped arenas.
//!
//! Every [`World`](crate::world::World) owns one arena per entity type. A
//! handle remembers the session it was issued by, so a handle kept across a
//! regeneration simply stops resolving instead of pointing at whatever now
//! lives at the same index.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_SESSION: AtomicU32 = AtomicU32::new(1);

/// Process-unique id of one generation of registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u32);

impl SessionId {
    pub fn fresh() -> Self {
        SessionId(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

pub struct Handle<T> {
    index: u32,
    session: SessionId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    fn new(index: u32, session: SessionId) -> Self {
        Self { index, session, _marker: PhantomData }
    }

    /// Position in insertion order (0-based).
    pub fn index(&self) -> usize {
        self.index as usize
    }

    pub fn session(&self) -> SessionId {
        self.session
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.session == other.session
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
        self.session.hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}@{})", self.index, self.session.0)
    }
}

/// Append-only store; entities are never removed during a session.
pub struct Arena<T> {
    items: Vec<T>,
    session: SessionId,
}

impl<T> Arena<T> {
    pub fn new(session: SessionId) -> Self {
        Self { items: Vec::new(), session }
    }

    pub fn insert(&mut self, item: T) -> Handle<T> {
        let index = self.items.len() as u32;
        self.items.push(item);
        Handle::new(index, self.session)
    }

    /// Handle of the next insertion, for entities that must know their own id.
    pub fn next_handle(&self) -> Handle<T> {
        Handle::new(self.items.len() as u32, self.session)
    }

    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        if handle.session != self.session {
            return None;
        }
        self.items.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        if handle.session != self.session {
            return None;
        }
        self.items.get_mut(handle.index())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn handles(&self) -> impl Iterator<Item = Handle<T>> + '_ {
        (0..self.items.len() as u32).map(move |i| Handle::new(i, self.session))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(move |(i, item)| (Handle::new(i as u32, self.session), item))
    }

    pub fn values(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("session", &self.session)
            .field("len", &self.items.len())
            .finish()
    }
}
