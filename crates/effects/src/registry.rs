//! Keyed storage of live animations.
//!
//! [`AnimationRegistry`] is plain storage. Teardown (overlay detach and
//! telemetry purge) lives on the scheduler, which is the only caller allowed
//! to remove entries.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use glint_primitives::{AnchorId, Rect, Size, SurfaceId};
use smallvec::SmallVec;

use crate::host::OverlayHandle;
use crate::key::{AnimationKey, ReactionValue};

/// One live animation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecord {
	pub key: AnimationKey,
	/// Weak handle to the host-owned overlay.
	pub overlay: OverlayHandle,
	pub sequence_index: u32,
	pub anchor: AnchorId,
	pub emoji: Option<String>,
	pub reaction: Option<ReactionValue>,
	pub mirrored: bool,
	pub surface: SurfaceId,
	/// Source rectangle relative to the anchor's frame.
	pub frame: Rect,
	pub size: Size,
}

/// Records for one anchor. Inline capacity matches the default per-anchor cap.
pub type AnchorRecords<'a> = SmallVec<[&'a AnimationRecord; 5]>;

/// Map from [`AnimationKey`] to [`AnimationRecord`].
#[derive(Debug, Default)]
pub struct AnimationRegistry {
	records: HashMap<AnimationKey, AnimationRecord>,
}

impl AnimationRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts `record` under its key.
	///
	/// Returns the record back if the key is already present; the existing
	/// entry is left untouched.
	pub fn insert(&mut self, record: AnimationRecord) -> Result<(), AnimationRecord> {
		match self.records.entry(record.key.clone()) {
			Entry::Occupied(_) => Err(record),
			Entry::Vacant(slot) => {
				slot.insert(record);
				Ok(())
			}
		}
	}

	pub fn remove(&mut self, key: &AnimationKey) -> Option<AnimationRecord> {
		self.records.remove(key)
	}

	pub fn get(&self, key: &AnimationKey) -> Option<&AnimationRecord> {
		self.records.get(key)
	}

	pub fn contains(&self, key: &AnimationKey) -> bool {
		self.records.contains_key(key)
	}

	/// Linear scan; live records per anchor are capped.
	pub fn records_for(&self, anchor: AnchorId) -> AnchorRecords<'_> {
		self.records.values().filter(|record| record.anchor == anchor).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = &AnimationRecord> {
		self.records.values()
	}

	pub fn keys(&self) -> impl Iterator<Item = &AnimationKey> {
		self.records.keys()
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}
}
