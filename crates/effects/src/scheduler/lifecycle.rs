//! Registration and the single teardown path.

use tokio::time::Instant;
use tracing::{debug, trace};

use super::EffectScheduler;
use crate::host::EffectHost;
use crate::key::AnimationKey;
use crate::registry::AnimationRecord;

impl<H: EffectHost> EffectScheduler<H> {
	/// Inserts a freshly attached record and queues its telemetry.
	///
	/// A duplicate key is a no-op for the registry; the overlay that came with
	/// the duplicate is detached so it cannot outlive its record.
	pub(super) fn register(&mut self, record: AnimationRecord, now: Instant) -> bool {
		let key = record.key.clone();
		if let Err(duplicate) = self.registry.insert(record) {
			trace!(anchor = %duplicate.anchor, "effects.register.duplicate");
			self.host.detach_overlay(duplicate.overlay, false);
			return false;
		}

		if key.mode.is_effect()
			&& let Some(record) = self.registry.get(&key)
		{
			self.telemetry.enqueue(record, now);
		}
		debug!(
			anchor = %key.anchor,
			incoming = key.incoming,
			mode = ?key.mode,
			live = self.registry.len(),
			"effects.register"
		);
		true
	}

	/// Removes `key`, detaches its overlay and purges its queued telemetry.
	///
	/// Idempotent: natural completion, eviction and [`Self::remove_all`] may
	/// all race to tear down the same key. Returns false if it was absent.
	pub fn unregister(&mut self, key: &AnimationKey, animated: bool) -> bool {
		let Some(record) = self.registry.remove(key) else {
			return false;
		};
		let purged = self.telemetry.purge(key);
		self.host.detach_overlay(record.overlay, animated);
		debug!(anchor = %key.anchor, animated, purged, live = self.registry.len(), "effects.unregister");
		true
	}

	/// Tears down every animation without transition, cancels in-flight
	/// fetches and disarms all telemetry timers.
	pub fn remove_all(&mut self) {
		let keys: Vec<AnimationKey> = self.registry.keys().cloned().collect();
		let removed = keys.len();
		for key in &keys {
			self.unregister(key, false);
		}
		let cancelled = self.fetches.cancel_all();
		self.telemetry.clear();
		debug!(removed, cancelled, "effects.remove_all");
	}
}
