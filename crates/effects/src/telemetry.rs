//! Debounced telemetry for admitted effects.
//!
//! Two independent pipelines share one shape:
//!
//! * **Outbound** (local user triggered): one deadline per anchor, armed on
//!   the first enqueue and not extended by later ones. When it fires, every
//!   queued entry for that anchor becomes one [`InteractionReport`].
//! * **Inbound** (remote triggered): one global deadline. When it fires, one
//!   "seen" event is emitted per distinct anchor and the queue is cleared.
//!
//! Deadlines are plain [`Instant`]s fired by [`TelemetryBatcher::fire_due`],
//! so the scheduler's loop decides when time advances.

use std::collections::HashMap;
use std::time::Duration;

use glint_primitives::AnchorId;
use tokio::time::Instant;
use tracing::debug;

use crate::key::AnimationKey;
use crate::registry::AnimationRecord;
use crate::report::{ActivityReporter, InteractionFrame, InteractionReport};

/// A queued telemetry entry for one live animation.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReport {
	pub key: AnimationKey,
	pub sequence_index: u32,
	pub content: String,
	pub enqueued_at: Instant,
}

/// Counts from one [`TelemetryBatcher::fire_due`] call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushStats {
	pub interaction_reports: usize,
	pub seen_reports: usize,
	/// Deadlines that fired with nothing left to report.
	pub empty_fires: usize,
}

/// Outbound and inbound report queues with their debounce deadlines.
#[derive(Debug)]
pub struct TelemetryBatcher {
	outbound: Vec<PendingReport>,
	inbound: Vec<PendingReport>,
	outbound_deadlines: HashMap<AnchorId, Instant>,
	inbound_deadline: Option<Instant>,
	outbound_debounce: Duration,
	inbound_debounce: Duration,
}

impl TelemetryBatcher {
	pub fn new(outbound_debounce: Duration, inbound_debounce: Duration) -> Self {
		Self {
			outbound: Vec::new(),
			inbound: Vec::new(),
			outbound_deadlines: HashMap::new(),
			inbound_deadline: None,
			outbound_debounce,
			inbound_debounce,
		}
	}

	/// Queues `record` for reporting. Records without content are skipped.
	pub fn enqueue(&mut self, record: &AnimationRecord, now: Instant) {
		let Some(content) = record.emoji.clone() else {
			return;
		};
		let entry = PendingReport {
			key: record.key.clone(),
			sequence_index: record.sequence_index,
			content,
			enqueued_at: now,
		};
		if record.key.incoming {
			self.inbound.push(entry);
			self.inbound_deadline.get_or_insert(now + self.inbound_debounce);
		} else {
			self.outbound.push(entry);
			self.outbound_deadlines
				.entry(record.key.anchor)
				.or_insert(now + self.outbound_debounce);
		}
	}

	/// Drops every entry referencing `key` from both queues.
	pub fn purge(&mut self, key: &AnimationKey) -> usize {
		let before = self.outbound.len() + self.inbound.len();
		self.outbound.retain(|entry| &entry.key != key);
		self.inbound.retain(|entry| &entry.key != key);
		before - self.outbound.len() - self.inbound.len()
	}

	/// Fires every deadline at or before `now`.
	pub fn fire_due(&mut self, now: Instant, reporter: &dyn ActivityReporter) -> FlushStats {
		let mut stats = FlushStats::default();

		let mut due: Vec<(Instant, AnchorId)> = self
			.outbound_deadlines
			.iter()
			.filter(|(_, deadline)| **deadline <= now)
			.map(|(anchor, deadline)| (*deadline, *anchor))
			.collect();
		due.sort_unstable();

		for (_, anchor) in due {
			self.outbound_deadlines.remove(&anchor);
			match self.take_outbound(anchor) {
				Some(report) => {
					debug!(%anchor, animations = report.animations.len(), "effects.flush.outbound");
					reporter.report_interaction(anchor, report);
					stats.interaction_reports += 1;
				}
				None => stats.empty_fires += 1,
			}
		}

		if self.inbound_deadline.is_some_and(|deadline| deadline <= now) {
			self.inbound_deadline = None;
			let queued = std::mem::take(&mut self.inbound);
			if queued.is_empty() {
				stats.empty_fires += 1;
			}
			let mut seen: Vec<AnchorId> = Vec::new();
			for entry in queued {
				if seen.contains(&entry.key.anchor) {
					continue;
				}
				seen.push(entry.key.anchor);
				debug!(anchor = %entry.key.anchor, "effects.flush.inbound");
				reporter.report_seen(entry.key.anchor, &entry.content);
				stats.seen_reports += 1;
			}
		}

		stats
	}

	/// Removes all outbound entries for `anchor` and folds them into a report.
	fn take_outbound(&mut self, anchor: AnchorId) -> Option<InteractionReport> {
		let (mut batch, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.outbound)
			.into_iter()
			.partition(|entry| entry.key.anchor == anchor);
		self.outbound = rest;

		batch.sort_by_key(|entry| entry.enqueued_at);
		let earliest = batch.first()?;
		let start = earliest.enqueued_at;
		let content = earliest.content.clone();
		let animations = batch
			.iter()
			.map(|entry| InteractionFrame {
				sequence_index: entry.sequence_index,
				offset: entry.enqueued_at.saturating_duration_since(start),
			})
			.collect();

		Some(InteractionReport { anchor, content, animations })
	}

	/// Earliest armed deadline, if any.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.outbound_deadlines
			.values()
			.copied()
			.chain(self.inbound_deadline)
			.min()
	}

	/// Empties both queues and disarms every deadline.
	pub fn clear(&mut self) {
		self.outbound.clear();
		self.inbound.clear();
		self.outbound_deadlines.clear();
		self.inbound_deadline = None;
	}

	pub fn outbound_len(&self) -> usize {
		self.outbound.len()
	}

	pub fn inbound_len(&self) -> usize {
		self.inbound.len()
	}

	/// Returns true if any queued entry references `key`.
	pub fn references(&self, key: &AnimationKey) -> bool {
		self.outbound.iter().chain(&self.inbound).any(|entry| &entry.key == key)
	}
}
