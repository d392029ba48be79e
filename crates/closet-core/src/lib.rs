//! # closet-core
//!
//! Core record types, seed data, and read models for the Closet wardrobe
//! tracker.
//!
//! This crate defines the types shared by every other Closet crate:
//! - [`Piece`] and [`Outfit`]: the two record collections
//! - [`WearLog`]: append-only wear events
//! - [`Season`] and [`Provider`]: closed enums with string forms
//! - Drafts and validation ([`PieceDraft`], [`OutfitDraft`], [`AnalysisResult`])
//! - Error hierarchy ([`ClosetError`], [`ValidationError`])
//! - Collection encoding ([`codec`]), starter data ([`seed`]), and read
//!   models ([`stats`], [`search`])

pub mod codec;
pub mod draft;
pub mod error;
pub mod item;
pub mod provider;
pub mod search;
pub mod season;
pub mod seed;
pub mod stats;
pub mod wear;

pub use draft::{parse_tags, AnalysisResult, OutfitDraft, PieceDraft};
pub use error::{ClosetError, Result, ValidationError};
pub use item::{Outfit, Piece};
pub use provider::Provider;
pub use season::Season;
pub use wear::{ItemKind, WearLog};
