//! Simulated asset store and activity reporter.

use std::time::Duration;

use async_trait::async_trait;
use glint_effects::{
	ActivityReporter, AnchorId, Asset, AssetError, AssetRequest, AssetResolver, InteractionReport, ReactionValue,
};
use parking_lot::Mutex;
use tracing::info;

/// Resolves every request after a short delay, except the listed emoji.
pub struct SimResolver {
	pub latency: Duration,
	pub failing: Vec<String>,
}

impl SimResolver {
	fn fails(&self, request: &AssetRequest) -> bool {
		match request {
			AssetRequest::Emoji(emoji) | AssetRequest::Reaction(ReactionValue::Builtin(emoji)) => self.failing.contains(emoji),
			// Custom reactions never have a primary asset here, only a fallback.
			AssetRequest::Reaction(ReactionValue::Custom(_)) => true,
			AssetRequest::Premium(_) | AssetRequest::ReactionFallback(_) => false,
		}
	}
}

#[async_trait]
impl AssetResolver for SimResolver {
	async fn resolve(&self, request: AssetRequest) -> Result<Asset, AssetError> {
		tokio::time::sleep(self.latency).await;
		if self.fails(&request) {
			return Err(AssetError::Unavailable);
		}
		Ok(Asset::new(format!("{request:?}"), Vec::new()))
	}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ReportCounts {
	pub interactions: usize,
	pub animations: usize,
	pub seen: usize,
}

/// Logs every report and keeps running totals.
#[derive(Default)]
pub struct LoggingReporter {
	counts: Mutex<ReportCounts>,
}

impl LoggingReporter {
	pub fn counts(&self) -> ReportCounts {
		*self.counts.lock()
	}
}

impl ActivityReporter for LoggingReporter {
	fn report_interaction(&self, anchor: AnchorId, report: InteractionReport) {
		let offsets: Vec<u128> = report.animations.iter().map(|frame| frame.offset.as_millis()).collect();
		info!(%anchor, content = %report.content, ?offsets, "sim.report.interaction");
		let mut counts = self.counts.lock();
		counts.interactions += 1;
		counts.animations += report.animations.len();
	}

	fn report_seen(&self, anchor: AnchorId, content: &str) {
		info!(%anchor, content, "sim.report.seen");
		self.counts.lock().seen += 1;
	}
}
