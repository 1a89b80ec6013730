//! Host-surface seam: anchor lookup and the overlay attach/detach primitive.

use glint_primitives::{AnchorId, LayoutTransition, Rect, Size, SurfaceId};

use crate::asset::Asset;
use crate::key::AnimationKey;
use crate::msg::CompletionNotifier;

/// Snapshot of an anchor's currently rendered view.
///
/// Both rectangles are in overlay coordinate space.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorView {
	/// Text the anchor currently renders (an emoji, for sticker-like anchors).
	pub content: String,
	/// Full on-screen frame of the anchor.
	pub frame: Rect,
	/// Part of `frame` inside the list's visible bounds. Empty once scrolled out.
	pub visible: Rect,
}

impl AnchorView {
	/// Returns true if the anchor has a non-degenerate visible area.
	pub fn is_visible(&self) -> bool {
		!self.visible.is_empty()
	}
}

/// Weak reference to an overlay living in the host's arena.
///
/// The host owns overlay lifetimes. Once a slot is reused the generation no
/// longer matches and the handle refers to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle {
	pub index: u32,
	pub generation: u32,
}

/// Everything the host needs to build and place a new overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlaySpec {
	pub key: AnimationKey,
	pub surface: SurfaceId,
	/// Initial overlay frame in overlay space.
	pub frame: Rect,
	pub size: Size,
	pub mirrored: bool,
}

/// The host view an [`EffectScheduler`](crate::EffectScheduler) draws into.
///
/// All calls happen on the scheduler's serialized queue.
pub trait EffectHost {
	/// Returns the anchor's rendered view, or `None` if it is not on screen.
	fn resolve_anchor_view(&self, anchor: AnchorId) -> Option<AnchorView>;

	/// Creates a self-driving overlay on `spec.surface`.
	///
	/// The overlay must call [`CompletionNotifier::finish`] when its animation
	/// ends. Returns `None` if the surface cannot host it.
	fn attach_overlay(&mut self, spec: OverlaySpec, asset: Asset, notifier: CompletionNotifier) -> Option<OverlayHandle>;

	/// Moves a live overlay. Unknown handles are ignored.
	fn position_overlay(&mut self, handle: OverlayHandle, frame: Rect);

	/// Removes an overlay from its surface. Unknown handles are ignored.
	fn detach_overlay(&mut self, handle: OverlayHandle, animated: bool);

	/// Applies new container bounds to a live overlay.
	fn layout_overlay(&mut self, handle: OverlayHandle, bounds: Rect, transition: LayoutTransition);
}
