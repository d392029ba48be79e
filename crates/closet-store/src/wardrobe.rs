//! The record store: pieces and outfits held in memory and mirrored to
//! key-value storage after every change.

use chrono::Utc;

use closet_core::codec::{decode_collection, encode_collection};
use closet_core::error::Result;
use closet_core::seed::{initial_outfits, initial_pieces};
use closet_core::{ItemKind, Outfit, OutfitDraft, Piece, PieceDraft, WearLog};

use crate::ids::{IdGenerator, OUTFIT_PREFIX, PIECE_PREFIX, WEAR_PREFIX};
use crate::storage::{KeyValueStore, OUTFITS_KEY, PIECES_KEY};

/// Where the collections came from when the store was opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Both collections were read from storage.
    Stored,
    /// At least one key was missing and its collection was seeded.
    Seeded,
    /// Stored data failed to parse; both collections were seeded.
    Recovered,
}

/// Owns both collections and the storage they are mirrored to.
///
/// Every mutation writes the affected collection(s) before updating memory,
/// so a failed write leaves the store exactly as it was.
pub struct Wardrobe<S: KeyValueStore> {
    storage: S,
    pieces: Vec<Piece>,
    outfits: Vec<Outfit>,
    ids: IdGenerator,
    source: LoadSource,
}

impl<S: KeyValueStore> Wardrobe<S> {
    /// Load both collections from `storage`, seeding whatever is missing
    /// or unreadable. Seeded or recovered collections are written back
    /// before returning, so storage always matches memory.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the backend cannot be read, or if seeded
    /// data cannot be written back.
    pub fn open(storage: S) -> Result<Self> {
        let stored_pieces = storage.get(PIECES_KEY)?;
        let stored_outfits = storage.get(OUTFITS_KEY)?;
        let seeded = stored_pieces.is_none() || stored_outfits.is_none();

        let decoded = decode_or_seed(stored_pieces.as_deref(), initial_pieces).and_then(
            |pieces| {
                decode_or_seed(stored_outfits.as_deref(), initial_outfits)
                    .map(|outfits| (pieces, outfits))
            },
        );

        let (pieces, outfits, source) = match decoded {
            Ok((pieces, outfits)) if seeded => (pieces, outfits, LoadSource::Seeded),
            Ok((pieces, outfits)) => (pieces, outfits, LoadSource::Stored),
            Err(err) => {
                tracing::warn!(error = %err, "stored wardrobe is unreadable, using seed data");
                (initial_pieces(), initial_outfits(), LoadSource::Recovered)
            }
        };

        tracing::info!(
            pieces = pieces.len(),
            outfits = outfits.len(),
            source = ?source,
            "wardrobe loaded"
        );

        let mut wardrobe = Self {
            storage,
            pieces,
            outfits,
            ids: IdGenerator::new(),
            source,
        };
        if source != LoadSource::Stored {
            wardrobe.flush()?;
        }
        Ok(wardrobe)
    }

    #[must_use]
    pub fn load_source(&self) -> LoadSource {
        self.source
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[must_use]
    pub fn outfits(&self) -> &[Outfit] {
        &self.outfits
    }

    pub(crate) fn storage(&self) -> &S {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    // === Pieces ===

    /// Create a piece from `draft` with a fresh id, the current time as
    /// `created_at`, and an empty wear history. Performs no validation;
    /// see [`PieceDraft::validate`].
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be written.
    pub fn add_piece(&mut self, draft: PieceDraft, images: Vec<String>) -> Result<Piece> {
        let pieces = &self.pieces;
        let id = self
            .ids
            .next(PIECE_PREFIX, |id| pieces.iter().any(|p| p.id == id));
        let piece = Piece {
            id,
            title: draft.title,
            brand: draft.brand,
            color: draft.color,
            size: draft.size,
            season: draft.season,
            style: draft.style,
            tags: draft.tags,
            images,
            wear_history: Vec::new(),
            created_at: Utc::now(),
        };

        let mut next = self.pieces.clone();
        next.push(piece.clone());
        self.commit(Some(next), None)?;
        tracing::debug!(id = %piece.id, "piece added");
        Ok(piece)
    }

    /// Replace the stored piece with the same id. Returns `false` (and
    /// writes nothing) if no such piece exists.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be written.
    pub fn update_piece(&mut self, piece: Piece) -> Result<bool> {
        let Some(pos) = self.pieces.iter().position(|p| p.id == piece.id) else {
            return Ok(false);
        };
        let mut next = self.pieces.clone();
        next[pos] = piece;
        self.commit(Some(next), None)?;
        Ok(true)
    }

    /// Remove a piece and strip its id from every outfit.
    ///
    /// The outfit cascade runs even when the piece itself is already gone,
    /// so dangling references are cleaned up. Returns whether a piece was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collections cannot be written.
    pub fn delete_piece(&mut self, piece_id: &str) -> Result<bool> {
        let removed = self.pieces.iter().any(|p| p.id == piece_id);
        let referenced = self.outfits.iter().any(|o| o.contains_piece(piece_id));
        if !removed && !referenced {
            return Ok(false);
        }

        let pieces: Option<Vec<Piece>> = removed.then(|| {
            self.pieces
                .iter()
                .filter(|p| p.id != piece_id)
                .cloned()
                .collect()
        });
        let outfits: Option<Vec<Outfit>> = referenced.then(|| {
            self.outfits
                .iter()
                .cloned()
                .map(|mut o| {
                    o.piece_ids.retain(|id| id != piece_id);
                    o
                })
                .collect()
        });

        self.commit(pieces, outfits)?;
        tracing::debug!(id = piece_id, cascaded = referenced, "piece deleted");
        Ok(removed)
    }

    #[must_use]
    pub fn piece(&self, id: &str) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    // === Outfits ===

    /// Create an outfit from `draft`. Piece ids are stored as given.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be written.
    pub fn add_outfit(&mut self, draft: OutfitDraft, images: Vec<String>) -> Result<Outfit> {
        let outfits = &self.outfits;
        let id = self
            .ids
            .next(OUTFIT_PREFIX, |id| outfits.iter().any(|o| o.id == id));
        let outfit = Outfit {
            id,
            title: draft.title,
            piece_ids: draft.piece_ids,
            tags: draft.tags,
            images,
            wear_history: Vec::new(),
            notes: draft.notes,
            created_at: Utc::now(),
        };

        let mut next = self.outfits.clone();
        next.push(outfit.clone());
        self.commit(None, Some(next))?;
        tracing::debug!(id = %outfit.id, "outfit added");
        Ok(outfit)
    }

    /// Replace the stored outfit with the same id; `false` if absent.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be written.
    pub fn update_outfit(&mut self, outfit: Outfit) -> Result<bool> {
        let Some(pos) = self.outfits.iter().position(|o| o.id == outfit.id) else {
            return Ok(false);
        };
        let mut next = self.outfits.clone();
        next[pos] = outfit;
        self.commit(None, Some(next))?;
        Ok(true)
    }

    /// Remove an outfit. Its pieces are untouched.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collection cannot be written.
    pub fn delete_outfit(&mut self, outfit_id: &str) -> Result<bool> {
        if !self.outfits.iter().any(|o| o.id == outfit_id) {
            return Ok(false);
        }
        let next: Vec<Outfit> = self
            .outfits
            .iter()
            .filter(|o| o.id != outfit_id)
            .cloned()
            .collect();
        self.commit(None, Some(next))?;
        tracing::debug!(id = outfit_id, "outfit deleted");
        Ok(true)
    }

    #[must_use]
    pub fn outfit(&self, id: &str) -> Option<&Outfit> {
        self.outfits.iter().find(|o| o.id == id)
    }

    /// The pieces an outfit references, in order, skipping ids that no
    /// longer resolve.
    #[must_use]
    pub fn outfit_pieces(&self, outfit: &Outfit) -> Vec<&Piece> {
        outfit
            .piece_ids
            .iter()
            .filter_map(|id| self.piece(id))
            .collect()
    }

    /// Which collection holds `id`, pieces checked first.
    #[must_use]
    pub fn kind_of(&self, id: &str) -> Option<ItemKind> {
        if self.piece(id).is_some() {
            Some(ItemKind::Piece)
        } else if self.outfit(id).is_some() {
            Some(ItemKind::Outfit)
        } else {
            None
        }
    }

    // === Wear logging ===

    /// Record that an item was worn now.
    ///
    /// For a piece the log goes to that piece only. For an outfit the same
    /// log (same id and date) goes to the outfit and to every piece in its
    /// `piece_ids` at the time of the call. Returns `None` without writing
    /// if `item_id` is not in the collection named by `kind`.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the collections cannot be written.
    pub fn log_wear(
        &mut self,
        item_id: &str,
        kind: ItemKind,
        notes: Option<String>,
    ) -> Result<Option<WearLog>> {
        let exists = match kind {
            ItemKind::Piece => self.piece(item_id).is_some(),
            ItemKind::Outfit => self.outfit(item_id).is_some(),
        };
        if !exists {
            return Ok(None);
        }

        let log = WearLog {
            id: self.ids.next(WEAR_PREFIX, |_| false),
            date: Utc::now(),
            notes,
        };

        match kind {
            ItemKind::Piece => {
                let next = self.pieces_with_log(|p| p.id == item_id, &log);
                self.commit(Some(next), None)?;
            }
            ItemKind::Outfit => {
                let members = self
                    .outfit(item_id)
                    .map(|o| o.piece_ids.clone())
                    .unwrap_or_default();
                let outfits: Vec<Outfit> = self
                    .outfits
                    .iter()
                    .cloned()
                    .map(|mut o| {
                        if o.id == item_id {
                            o.wear_history.push(log.clone());
                        }
                        o
                    })
                    .collect();
                let pieces = self.pieces_with_log(|p| members.contains(&p.id), &log);
                self.commit(Some(pieces), Some(outfits))?;
            }
        }

        tracing::debug!(id = item_id, kind = %kind, wear = %log.id, "wear logged");
        Ok(Some(log))
    }

    fn pieces_with_log(&self, wears: impl Fn(&Piece) -> bool, log: &WearLog) -> Vec<Piece> {
        self.pieces
            .iter()
            .cloned()
            .map(|mut p| {
                if wears(&p) {
                    p.wear_history.push(log.clone());
                }
                p
            })
            .collect()
    }

    // === Persistence ===

    /// Write both collections to storage.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the write fails.
    pub fn flush(&mut self) -> Result<()> {
        let pieces = encode_collection(&self.pieces)?;
        let outfits = encode_collection(&self.outfits)?;
        self.storage
            .put_many(&[(PIECES_KEY, pieces.as_str()), (OUTFITS_KEY, outfits.as_str())])
    }

    /// Flush and hand the storage back.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the final flush fails.
    pub fn close(mut self) -> Result<S> {
        self.flush()?;
        Ok(self.storage)
    }

    /// Persist the replacement collections, then swap them in.
    fn commit(&mut self, pieces: Option<Vec<Piece>>, outfits: Option<Vec<Outfit>>) -> Result<()> {
        let pieces_json = pieces.as_deref().map(encode_collection).transpose()?;
        let outfits_json = outfits.as_deref().map(encode_collection).transpose()?;

        let mut entries: Vec<(&str, &str)> = Vec::with_capacity(2);
        if let Some(json) = &pieces_json {
            entries.push((PIECES_KEY, json.as_str()));
        }
        if let Some(json) = &outfits_json {
            entries.push((OUTFITS_KEY, json.as_str()));
        }
        self.storage.put_many(&entries)?;
        tracing::debug!(keys = entries.len(), "collections persisted");

        if let Some(pieces) = pieces {
            self.pieces = pieces;
        }
        if let Some(outfits) = outfits {
            self.outfits = outfits;
        }
        Ok(())
    }
}

fn decode_or_seed<T: serde::de::DeserializeOwned>(
    stored: Option<&str>,
    seed: fn() -> Vec<T>,
) -> Result<Vec<T>> {
    match stored {
        Some(text) => decode_collection(text),
        None => Ok(seed()),
    }
}

impl<S: KeyValueStore> std::fmt::Debug for Wardrobe<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wardrobe")
            .field("pieces", &self.pieces.len())
            .field("outfits", &self.outfits.len())
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
