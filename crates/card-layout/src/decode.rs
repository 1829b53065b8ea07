//! Image decoding and request sequencing
//!
//! Decoding runs off the caller's thread. Several decodes may be in flight
//! for the same slot; only the most recently *started* one may be applied.
//! [`DecodeTracker`] hands out sequence-numbered tickets and answers whether
//! a completed ticket is still current.

use crate::types::{LayoutError, Result, Side};
use std::collections::HashMap;
use std::sync::Arc;

/// A decoded image: the original encoded bytes plus natural pixel dimensions
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageAsset {
    data: Arc<[u8]>,
    width: u32,
    height: u32,
}

impl ImageAsset {
    pub fn new(data: impl Into<Arc<[u8]>>, width: u32, height: u32) -> Self {
        Self {
            data: data.into(),
            width,
            height,
        }
    }

    /// Encoded bytes as uploaded (PNG, JPEG, ...)
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// `width / height`, or `None` for a degenerate image
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }
}

/// Decode uploaded bytes into an [`ImageAsset`].
pub async fn decode_image(bytes: Vec<u8>) -> Result<ImageAsset> {
    // Image decoding is CPU-bound, spawn blocking
    tokio::task::spawn_blocking(move || decode_image_sync(bytes)).await?
}

/// Blocking variant of [`decode_image`].
pub fn decode_image_sync(bytes: Vec<u8>) -> Result<ImageAsset> {
    let decoded =
        image::load_from_memory(&bytes).map_err(|e| LayoutError::Decode(e.to_string()))?;
    let (width, height) = (decoded.width(), decoded.height());
    if width == 0 || height == 0 {
        return Err(LayoutError::Decode("image has no pixels".to_string()));
    }
    Ok(ImageAsset::new(bytes, width, height))
}

// =============================================================================
// Sequencing
// =============================================================================

/// The slot a decoded image is destined for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecodeTarget {
    /// Card background image of a template side
    Background { side: Side },
    /// Pre-attached template image of an image region
    TemplateImage { side: Side, index: usize },
    /// Per-card image value
    CardImage {
        card: usize,
        side: Side,
        index: usize,
    },
}

/// Receipt for a started decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeTicket {
    pub target: DecodeTarget,
    pub sequence: u64,
}

/// Tracks the latest started decode per target
#[derive(Debug, Default, Clone)]
pub struct DecodeTracker {
    next_sequence: u64,
    latest: HashMap<DecodeTarget, u64>,
}

impl DecodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a decode for `target`, superseding any earlier one
    pub fn begin(&mut self, target: DecodeTarget) -> DecodeTicket {
        self.next_sequence += 1;
        self.latest.insert(target, self.next_sequence);
        DecodeTicket {
            target,
            sequence: self.next_sequence,
        }
    }

    pub fn is_current(&self, ticket: &DecodeTicket) -> bool {
        self.latest.get(&ticket.target) == Some(&ticket.sequence)
    }

    /// Consume a completed ticket. Returns `true` if its result should be applied.
    pub fn settle(&mut self, ticket: &DecodeTicket) -> bool {
        if self.is_current(ticket) {
            self.latest.remove(&ticket.target);
            true
        } else {
            false
        }
    }

    /// Number of decodes still awaited
    pub fn pending(&self) -> usize {
        self.latest.len()
    }

    /// Forget all pending decodes; their completions will be discarded
    pub fn clear(&mut self) {
        self.latest.clear();
    }
}

// =============================================================================
// Tests
// =============================================================================
