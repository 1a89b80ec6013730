//! Admission control: eligibility, per-anchor rate limits and cancellable
//! asset fetches.

use std::sync::Arc;

use glint_primitives::{AnchorId, Rect, Size, SurfaceId};
use glint_worker::TaskClass;
use tokio::time::Instant;
use tracing::{debug, trace};

use super::EffectScheduler;
use crate::asset::{Asset, AssetRequest, resolve_with_fallback};
use crate::host::{AnchorView, EffectHost, OverlaySpec};
use crate::key::{AnimationKey, AnimationMode, ReactionValue};
use crate::msg::{CompletionNotifier, EffectMsg, FetchOutcome, PendingAdmission};
use crate::placement;
use crate::registry::AnimationRecord;

/// Plain emoji screen effect.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectRequest {
	pub anchor: AnchorId,
	/// Must match the anchor's rendered content.
	pub emoji: String,
	pub sequence_index: u32,
	pub mirrored: bool,
	pub incoming: bool,
	pub size: Size,
	/// Source rectangle relative to the anchor.
	pub frame: Rect,
	pub surface: SurfaceId,
}

/// Premium effect whose asset is looked up from the anchor itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumEffectRequest {
	pub anchor: AnchorId,
	pub mirrored: bool,
	pub incoming: bool,
	/// Source rectangle relative to the anchor; the overlay is this size
	/// scaled by the configured premium factor.
	pub frame: Rect,
	pub surface: SurfaceId,
}

/// Reaction burst.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionRequest {
	pub value: ReactionValue,
	pub sequence_index: u32,
	pub anchor: AnchorId,
	pub size: Size,
	pub frame: Rect,
	pub surface: SurfaceId,
}

/// Why a request was dropped. These are normal-path outcomes, not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
	/// The anchor has no on-screen view, or it is scrolled out.
	AnchorNotRenderable,
	/// The anchor no longer renders the requested content.
	ContentMismatch,
	/// The anchor already has the maximum number of live animations.
	CapReached,
	/// The anchor's latest admission is too recent.
	Throttled,
	/// No async runtime is available to run the fetch.
	NoRuntime,
}

/// Immediate result of a request.
///
/// `Pending` means a fetch was started; the animation appears once it
/// resolves, unless it is superseded, cancelled or fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
	Pending,
	Rejected(RejectReason),
}

impl Admission {
	pub const fn is_pending(&self) -> bool {
		matches!(self, Self::Pending)
	}
}

impl<H: EffectHost> EffectScheduler<H> {
	/// Requests a plain emoji effect on `request.anchor`.
	pub fn request_effect(&mut self, request: EffectRequest) -> Admission {
		let anchor = request.anchor;
		let view = match self.eligible_view(anchor) {
			Ok(view) => view,
			Err(reason) => return reject(anchor, reason),
		};
		if view.content != request.emoji {
			return reject(anchor, RejectReason::ContentMismatch);
		}

		let asset = AssetRequest::Emoji(request.emoji.clone());
		let admission = PendingAdmission {
			anchor,
			mode: AnimationMode::Effect { premium: false },
			incoming: request.incoming,
			emoji: Some(request.emoji),
			reaction: None,
			sequence_index: request.sequence_index,
			mirrored: request.mirrored,
			size: request.size,
			frame: request.frame,
			surface: request.surface,
		};
		self.admit(admission, asset)
	}

	/// Requests the premium effect attached to the anchor's content.
	pub fn request_premium_effect(&mut self, request: PremiumEffectRequest) -> Admission {
		let anchor = request.anchor;
		if let Err(reason) = self.eligible_view(anchor) {
			return reject(anchor, reason);
		}

		let admission = PendingAdmission {
			anchor,
			mode: AnimationMode::Effect { premium: true },
			incoming: request.incoming,
			emoji: None,
			reaction: None,
			sequence_index: 0,
			mirrored: request.mirrored,
			size: request.frame.size().scale(self.config.premium_scale),
			frame: request.frame,
			surface: request.surface,
		};
		self.admit(admission, AssetRequest::Premium(anchor))
	}

	/// Requests a reaction animation.
	pub fn request_reaction(&mut self, request: ReactionRequest) -> Admission {
		let anchor = request.anchor;
		if let Err(reason) = self.eligible_view(anchor) {
			return reject(anchor, reason);
		}

		let asset = AssetRequest::Reaction(request.value.clone());
		let admission = PendingAdmission {
			anchor,
			mode: AnimationMode::Reaction(request.value.clone()),
			incoming: false,
			emoji: None,
			reaction: Some(request.value),
			sequence_index: request.sequence_index,
			mirrored: false,
			size: request.size,
			frame: request.frame,
			surface: request.surface,
		};
		self.admit(admission, asset)
	}

	fn eligible_view(&self, anchor: AnchorId) -> Result<AnchorView, RejectReason> {
		match self.host.resolve_anchor_view(anchor) {
			Some(view) if view.is_visible() => Ok(view),
			_ => Err(RejectReason::AnchorNotRenderable),
		}
	}

	/// Per-anchor cap and minimum inter-arrival check against live records.
	fn rate_limit(&self, anchor: AnchorId, now: Instant) -> Result<(), RejectReason> {
		let on_air = self.registry.records_for(anchor);
		if on_air.len() >= self.config.max_per_anchor {
			return Err(RejectReason::CapReached);
		}
		if let Some(latest) = on_air.iter().map(|record| record.key.admitted_at).max()
			&& now.saturating_duration_since(latest) < self.config.min_interval()
		{
			return Err(RejectReason::Throttled);
		}
		Ok(())
	}

	/// Rate-limits, then starts a fetch that supersedes any in-flight fetch of
	/// the same kind for the anchor.
	fn admit(&mut self, admission: PendingAdmission, request: AssetRequest) -> Admission {
		let anchor = admission.anchor;
		if let Err(reason) = self.rate_limit(anchor, Instant::now()) {
			return reject(anchor, reason);
		}

		let slot = (anchor, admission.mode.fetch_kind());
		let token = self.fetches.issue(slot);
		let generation = token.generation();
		let class = if admission.incoming { TaskClass::Background } else { TaskClass::Interactive };
		let assets = Arc::clone(&self.assets);
		let tx = self.msg_tx.clone();

		let spawned = glint_worker::spawn(class, async move {
			let result = tokio::select! {
				biased;
				_ = token.cancelled() => return,
				result = resolve_with_fallback(assets.as_ref(), request) => result,
			};
			let _ = tx.send(EffectMsg::AssetResolved(FetchOutcome { generation, admission, result }));
		});
		if spawned.is_none() {
			self.fetches.cancel(&slot);
			return reject(anchor, RejectReason::NoRuntime);
		}

		debug!(%anchor, generation, kind = ?slot.1, "effects.fetch.start");
		Admission::Pending
	}

	/// Applies a finished fetch if its generation is still current.
	pub(super) fn apply_fetch_outcome(&mut self, outcome: FetchOutcome) {
		let FetchOutcome { generation, admission, result } = outcome;
		let anchor = admission.anchor;
		let slot = (anchor, admission.mode.fetch_kind());
		if !self.fetches.complete(&slot, generation) {
			trace!(%anchor, generation, "effects.fetch.stale");
			return;
		}

		match result {
			Ok(asset) => self.attach_resolved(admission, asset),
			Err(err) => debug!(%anchor, error = %err, "effects.fetch.failed"),
		}
	}

	/// Re-validates the anchor, attaches an overlay and registers it.
	fn attach_resolved(&mut self, admission: PendingAdmission, asset: Asset) {
		let now = Instant::now();
		let anchor = admission.anchor;
		let view = match self.eligible_view(anchor) {
			Ok(view) => view,
			Err(reason) => {
				reject(anchor, reason);
				return;
			}
		};
		if admission.mode == (AnimationMode::Effect { premium: false }) && admission.emoji.as_deref() != Some(view.content.as_str()) {
			reject(anchor, RejectReason::ContentMismatch);
			return;
		}
		if let Err(reason) = self.rate_limit(anchor, now) {
			reject(anchor, reason);
			return;
		}

		let key = AnimationKey {
			anchor,
			admitted_at: now,
			incoming: admission.incoming,
			mode: admission.mode.clone(),
		};
		if self.registry.contains(&key) {
			trace!(%anchor, "effects.register.duplicate");
			return;
		}

		let emoji = admission
			.emoji
			.or_else(|| admission.mode.is_premium().then(|| view.content.clone()));
		let frame = placement::overlay_frame(view.frame, admission.frame, admission.size, &admission.mode, admission.mirrored, &self.config);
		let spec = OverlaySpec {
			key: key.clone(),
			surface: admission.surface,
			frame,
			size: admission.size,
			mirrored: admission.mirrored,
		};
		let notifier = CompletionNotifier::new(key.clone(), self.msg_tx.clone());
		let Some(overlay) = self.host.attach_overlay(spec, asset, notifier) else {
			debug!(%anchor, surface = %admission.surface, "effects.attach.failed");
			return;
		};

		self.register(
			AnimationRecord {
				key,
				overlay,
				sequence_index: admission.sequence_index,
				anchor,
				emoji,
				reaction: admission.reaction,
				mirrored: admission.mirrored,
				surface: admission.surface,
				frame: admission.frame,
				size: admission.size,
			},
			now,
		);
	}
}

fn reject(anchor: AnchorId, reason: RejectReason) -> Admission {
	trace!(%anchor, ?reason, "effects.reject");
	Admission::Rejected(reason)
}
