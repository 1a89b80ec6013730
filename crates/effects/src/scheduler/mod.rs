//! The effect scheduler.
//!
//! # Design
//!
//! [`EffectScheduler`] is single-threaded and cooperative. Registry mutation,
//! admission bookkeeping, viewport passes and timer firings all happen through
//! `&mut self` on the host's own loop. The only true suspension point is asset
//! resolution: fetches run as spawned tasks and post their result back as an
//! [`EffectMsg`], which the host applies with [`EffectScheduler::drain_messages`]
//! (or [`EffectScheduler::pump`] / [`EffectScheduler::tick`]).
//!
//! Responsibilities are split across submodules operating on the one shared
//! registry:
//!
//! * `admission`: eligibility, rate limits, cancellable fetches, registration
//! * `lifecycle`: the single teardown path ([`EffectScheduler::unregister`])
//! * `viewport`: repositioning and eviction on scroll
//!
//! # Cancellation
//!
//! Each `(anchor, fetch kind)` pair owns one generation token. A newer request
//! cancels the older fetch, and a completion whose generation is no longer
//! current is dropped before it can register anything.

mod admission;
mod lifecycle;
mod viewport;

use std::sync::Arc;

use glint_primitives::AnchorId;
use glint_worker::TokenSlots;
use tokio::time::Instant;
use tracing::trace;

pub use self::admission::{Admission, EffectRequest, PremiumEffectRequest, ReactionRequest, RejectReason};
use crate::asset::AssetResolver;
use crate::config::EffectConfig;
use crate::host::EffectHost;
use crate::key::{AnimationKey, FetchKind};
use crate::msg::{self, EffectMsg, MsgReceiver, MsgSender};
use crate::registry::{AnchorRecords, AnimationRecord, AnimationRegistry};
use crate::report::ActivityReporter;
use crate::telemetry::{FlushStats, TelemetryBatcher};

/// Schedules short-lived animations anchored to list items.
pub struct EffectScheduler<H: EffectHost> {
	config: EffectConfig,
	host: H,
	assets: Arc<dyn AssetResolver>,
	reporter: Arc<dyn ActivityReporter>,
	registry: AnimationRegistry,
	telemetry: TelemetryBatcher,
	fetches: TokenSlots<(AnchorId, FetchKind)>,
	msg_tx: MsgSender,
	msg_rx: MsgReceiver,
}

impl<H: EffectHost> std::fmt::Debug for EffectScheduler<H> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EffectScheduler")
			.field("config", &self.config)
			.field("registry", &self.registry)
			.field("telemetry", &self.telemetry)
			.field("in_flight_fetches", &self.fetches.len())
			.finish()
	}
}

impl<H: EffectHost> EffectScheduler<H> {
	pub fn new(config: EffectConfig, host: H, assets: Arc<dyn AssetResolver>, reporter: Arc<dyn ActivityReporter>) -> Self {
		let (msg_tx, msg_rx) = msg::channel();
		let telemetry = TelemetryBatcher::new(config.outbound_debounce(), config.inbound_debounce());
		Self {
			config,
			host,
			assets,
			reporter,
			registry: AnimationRegistry::new(),
			telemetry,
			fetches: TokenSlots::new(),
			msg_tx,
			msg_rx,
		}
	}

	pub fn config(&self) -> &EffectConfig {
		&self.config
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	/// Sender for hosts that forward completions from elsewhere.
	pub fn msg_sender(&self) -> MsgSender {
		self.msg_tx.clone()
	}

	pub fn lookup(&self, key: &AnimationKey) -> Option<&AnimationRecord> {
		self.registry.get(key)
	}

	pub fn records_for(&self, anchor: AnchorId) -> AnchorRecords<'_> {
		self.registry.records_for(anchor)
	}

	pub fn records(&self) -> impl Iterator<Item = &AnimationRecord> {
		self.registry.iter()
	}

	pub fn len(&self) -> usize {
		self.registry.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registry.is_empty()
	}

	pub fn outbound_len(&self) -> usize {
		self.telemetry.outbound_len()
	}

	pub fn inbound_len(&self) -> usize {
		self.telemetry.inbound_len()
	}

	/// Returns true if a queued telemetry entry still references `key`.
	pub fn is_queued_for_report(&self, key: &AnimationKey) -> bool {
		self.telemetry.references(key)
	}

	pub fn in_flight_fetches(&self) -> usize {
		self.fetches.len()
	}

	/// Earliest pending debounce deadline.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.telemetry.next_deadline()
	}

	/// Applies every queued message without waiting. Returns how many were applied.
	pub fn drain_messages(&mut self) -> usize {
		let mut applied = 0;
		while let Ok(msg) = self.msg_rx.try_recv() {
			self.apply(msg);
			applied += 1;
		}
		applied
	}

	/// Fires every debounce deadline at or before `now`.
	pub fn fire_due_timers(&mut self, now: Instant) -> FlushStats {
		self.telemetry.fire_due(now, self.reporter.as_ref())
	}

	/// Drains messages, then fires due timers.
	pub fn pump(&mut self) -> FlushStats {
		self.drain_messages();
		self.fire_due_timers(Instant::now())
	}

	/// Waits for the next message or debounce deadline and processes it.
	pub async fn tick(&mut self) {
		let deadline = self.next_deadline();
		let sleep = async move {
			match deadline {
				Some(deadline) => tokio::time::sleep_until(deadline).await,
				None => std::future::pending().await,
			}
		};

		tokio::select! {
			biased;
			msg = self.msg_rx.recv() => {
				if let Some(msg) = msg {
					self.apply(msg);
					self.drain_messages();
				}
			}
			_ = sleep => {
				self.fire_due_timers(Instant::now());
			}
		}
	}

	fn apply(&mut self, msg: EffectMsg) {
		match msg {
			EffectMsg::AssetResolved(outcome) => self.apply_fetch_outcome(outcome),
			EffectMsg::OverlayFinished(key) => {
				if !self.unregister(&key, false) {
					trace!(anchor = %key.anchor, "effects.finish.stale");
				}
			}
		}
	}
}
