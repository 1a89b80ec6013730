//! Viewport tracking: reposition live overlays on scroll and evict the ones
//! whose anchor left the visible area.

use glint_primitives::{LayoutTransition, Rect};
use tracing::debug;

use super::EffectScheduler;
use crate::host::EffectHost;
use crate::key::AnimationKey;
use crate::placement;

impl<H: EffectHost> EffectScheduler<H> {
	/// Runs one viewport pass. Call on every scroll or layout tick.
	///
	/// Positions are pushed while scanning; evictions are collected and applied
	/// afterwards through [`Self::unregister`], so the registry is never
	/// mutated mid-scan. In-flight fetches for anchors that are gone are
	/// cancelled as well.
	pub fn on_viewport_changed(&mut self) {
		let mut evicted: Vec<AnimationKey> = Vec::new();
		for record in self.registry.iter() {
			let view = self.host.resolve_anchor_view(record.anchor);
			match view {
				Some(view) if view.is_visible() => {
					let frame = placement::overlay_frame(view.frame, record.frame, record.size, &record.key.mode, record.mirrored, &self.config);
					self.host.position_overlay(record.overlay, frame);
				}
				_ => evicted.push(record.key.clone()),
			}
		}

		let host = &self.host;
		let cancelled = self
			.fetches
			.cancel_where(|(anchor, _)| !host.resolve_anchor_view(*anchor).is_some_and(|view| view.is_visible()));

		let evictions = evicted.len();
		for key in &evicted {
			self.unregister(key, true);
		}
		if evictions > 0 || cancelled > 0 {
			debug!(evictions, cancelled, live = self.registry.len(), "effects.evict");
		}
	}

	/// Pushes new container bounds to every live overlay. Registry membership
	/// is unchanged.
	pub fn update_overlay_layout(&mut self, bounds: Rect, transition: LayoutTransition) {
		for record in self.registry.iter() {
			self.host.layout_overlay(record.overlay, bounds, transition);
		}
	}
}
