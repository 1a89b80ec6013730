//! In-memory list host with a slab-backed overlay arena.

use std::time::Duration;

use glint_effects::{
	AnchorId, AnchorView, Asset, CompletionNotifier, EffectHost, LayoutTransition, OverlayHandle, OverlaySpec, Rect, Renderer,
};
use slab::Slab;
use tracing::trace;

pub const ROW_HEIGHT: f32 = 72.0;
pub const ROW_WIDTH: f32 = 360.0;
pub const VISIBLE_ROWS: usize = 6;

struct SimOverlay {
	generation: u32,
	frame: Rect,
	remaining: Duration,
	notifier: CompletionNotifier,
}

/// A vertical list of anchors, scrolled one row at a time.
pub struct SimHost {
	rows: Vec<String>,
	top: usize,
	overlays: Slab<SimOverlay>,
	next_generation: u32,
	lifetime: Duration,
	pub attached: usize,
	pub evicted: usize,
	pub completed: usize,
	pub alternate: usize,
}

impl SimHost {
	pub fn new(rows: Vec<String>, lifetime: Duration) -> Self {
		Self {
			rows,
			top: 0,
			overlays: Slab::new(),
			next_generation: 0,
			lifetime,
			attached: 0,
			evicted: 0,
			completed: 0,
			alternate: 0,
		}
	}

	pub fn content(&self, anchor: AnchorId) -> Option<&str> {
		self.rows.get(anchor.0 as usize).map(String::as_str)
	}

	/// Anchors currently inside the viewport, top first.
	pub fn visible_anchors(&self) -> impl Iterator<Item = AnchorId> + '_ {
		(0..VISIBLE_ROWS.min(self.rows.len())).map(|offset| AnchorId(((self.top + offset) % self.rows.len()) as u64))
	}

	/// Scrolls by one row, wrapping at the end of the list.
	pub fn scroll(&mut self) {
		if !self.rows.is_empty() {
			self.top = (self.top + 1) % self.rows.len();
		}
	}

	/// Ages every overlay by `elapsed` and reports the ones that ran out.
	pub fn advance(&mut self, elapsed: Duration) {
		for (_, overlay) in self.overlays.iter_mut() {
			if overlay.remaining.is_zero() {
				continue;
			}
			overlay.remaining = overlay.remaining.saturating_sub(elapsed);
			if overlay.remaining.is_zero() {
				overlay.notifier.finish();
			}
		}
	}

	pub fn live_overlays(&self) -> usize {
		self.overlays.len()
	}

	fn row_of(&self, anchor: AnchorId) -> Option<usize> {
		let index = anchor.0 as usize;
		(index < self.rows.len()).then(|| (index + self.rows.len() - self.top) % self.rows.len())
	}

	fn overlay_mut(&mut self, handle: OverlayHandle) -> Option<&mut SimOverlay> {
		self.overlays
			.get_mut(handle.index as usize)
			.filter(|overlay| overlay.generation == handle.generation)
	}
}

impl EffectHost for SimHost {
	fn resolve_anchor_view(&self, anchor: AnchorId) -> Option<AnchorView> {
		let row = self.row_of(anchor)?;
		let frame = Rect::new(0.0, row as f32 * ROW_HEIGHT, ROW_WIDTH, ROW_HEIGHT);
		let viewport = Rect::new(0.0, 0.0, ROW_WIDTH, VISIBLE_ROWS as f32 * ROW_HEIGHT);
		Some(AnchorView {
			content: self.rows[anchor.0 as usize].clone(),
			frame,
			visible: frame.intersection(viewport),
		})
	}

	fn attach_overlay(&mut self, spec: OverlaySpec, asset: Asset, notifier: CompletionNotifier) -> Option<OverlayHandle> {
		let index = u32::try_from(self.overlays.vacant_key()).ok()?;
		let generation = self.next_generation;
		self.next_generation = self.next_generation.wrapping_add(1);
		if asset.renderer == Renderer::Alternate {
			self.alternate += 1;
		}
		self.overlays.insert(SimOverlay {
			generation,
			frame: spec.frame,
			remaining: self.lifetime,
			notifier,
		});
		self.attached += 1;
		trace!(index, anchor = %spec.key.anchor, asset = %asset.id, "sim.attach");
		Some(OverlayHandle { index, generation })
	}

	fn position_overlay(&mut self, handle: OverlayHandle, frame: Rect) {
		if let Some(overlay) = self.overlay_mut(handle) {
			overlay.frame = frame;
		}
	}

	fn detach_overlay(&mut self, handle: OverlayHandle, animated: bool) {
		if self.overlay_mut(handle).is_none() {
			return;
		}
		let overlay = self.overlays.remove(handle.index as usize);
		if animated {
			self.evicted += 1;
		} else {
			self.completed += 1;
		}
		trace!(index = handle.index, animated, y = overlay.frame.y, "sim.detach");
	}

	fn layout_overlay(&mut self, _handle: OverlayHandle, _bounds: Rect, _transition: LayoutTransition) {}
}
