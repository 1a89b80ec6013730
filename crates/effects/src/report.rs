//! Reporting boundary for interaction and "seen" telemetry.

use std::time::Duration;

use glint_primitives::AnchorId;

/// One animation inside a batched interaction report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractionFrame {
	pub sequence_index: u32,
	/// Time since the earliest animation in the batch.
	pub offset: Duration,
}

/// Coalesced burst of locally triggered animations on one anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionReport {
	pub anchor: AnchorId,
	/// Anchor content of the earliest animation in the batch.
	pub content: String,
	/// Sorted by ascending `offset`.
	pub animations: Vec<InteractionFrame>,
}

/// Remote activity-reporting API. Calls are fire-and-forget.
pub trait ActivityReporter: Send + Sync + 'static {
	fn report_interaction(&self, anchor: AnchorId, report: InteractionReport);

	fn report_seen(&self, anchor: AnchorId, content: &str);
}
