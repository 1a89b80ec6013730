//! Message bus carrying asynchronous completions back onto the scheduler's
//! serialized queue.
//!
//! ```text
//! fetch task ────────┐
//!                    ├──► EffectMsg ──► drain_messages() ──► registry update
//! overlay finished ──┘
//! ```

use glint_primitives::{AnchorId, Rect, Size, SurfaceId};
use tokio::sync::mpsc;

use crate::asset::{Asset, AssetError};
use crate::key::{AnimationKey, AnimationMode, ReactionValue};

/// Channel sender for fetch tasks and overlays.
pub type MsgSender = mpsc::UnboundedSender<EffectMsg>;

/// Channel receiver owned by the scheduler.
pub type MsgReceiver = mpsc::UnboundedReceiver<EffectMsg>;

/// Creates a new message channel pair.
pub fn channel() -> (MsgSender, MsgReceiver) {
	mpsc::unbounded_channel()
}

/// Request parameters carried across the fetch until registration.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAdmission {
	pub anchor: AnchorId,
	pub mode: AnimationMode,
	pub incoming: bool,
	pub emoji: Option<String>,
	pub reaction: Option<ReactionValue>,
	pub sequence_index: u32,
	pub mirrored: bool,
	/// Overlay size.
	pub size: Size,
	/// Source rectangle relative to the anchor's frame.
	pub frame: Rect,
	pub surface: SurfaceId,
}

/// Result of one fetch task, stamped with the generation it was issued under.
#[derive(Debug)]
pub struct FetchOutcome {
	pub generation: u64,
	pub admission: PendingAdmission,
	pub result: Result<Asset, AssetError>,
}

/// Top-level message applied by the scheduler.
#[derive(Debug)]
pub enum EffectMsg {
	/// A fetch task finished (successfully or not).
	AssetResolved(FetchOutcome),
	/// An overlay finished its animation on its own.
	OverlayFinished(AnimationKey),
}

/// Handed to each overlay so it can report natural completion.
///
/// Cloneable and `Send`, so overlays may run on another execution context.
/// Finishing after the animation was already torn down is harmless.
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
	key: AnimationKey,
	tx: MsgSender,
}

impl CompletionNotifier {
	pub(crate) fn new(key: AnimationKey, tx: MsgSender) -> Self {
		Self { key, tx }
	}

	/// Key of the animation this notifier belongs to.
	pub fn key(&self) -> &AnimationKey {
		&self.key
	}

	/// Posts completion to the scheduler.
	pub fn finish(&self) {
		let _ = self.tx.send(EffectMsg::OverlayFinished(self.key.clone()));
	}
}
