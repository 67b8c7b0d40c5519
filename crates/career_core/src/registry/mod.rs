//! Entity storage: session-checked arenas plus O(1) alias lookup.

pub mod alias;
pub mod arena;

pub use alias::AliasIndex;
pub use arena::{Arena, Handle, SessionId};
