//! # closet-store
//!
//! The Closet record store and its durable key-value backing.
//!
//! [`Wardrobe`] is the authoritative in-process copy of both collections.
//! It is opened from a [`KeyValueStore`] (SQLite on disk, or memory for
//! tests), writes through on every mutation, and is flushed on close.

pub mod ids;
pub mod settings;
pub mod storage;
pub mod wardrobe;

pub use settings::Settings;
pub use storage::{KeyValueStore, MemoryStorage, SqliteStorage};
pub use wardrobe::{LoadSource, Wardrobe};
