//! Glint simulator.
//!
//! Scrolls an in-memory list one row per tick while firing a mix of effect,
//! premium and reaction requests at whatever is on screen, then prints what
//! the scheduler admitted, evicted and reported.

mod host;
mod services;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use glint_effects::{
	Admission, AnchorId, EffectConfig, EffectRequest, EffectScheduler, PremiumEffectRequest, ReactionRequest, ReactionValue, Rect,
	RejectReason, Size, SurfaceId,
};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::host::SimHost;
use crate::services::{LoggingReporter, SimResolver};

const TICK: Duration = Duration::from_millis(250);
const OVERLAY_LIFETIME: Duration = Duration::from_millis(1200);
const FETCH_LATENCY: Duration = Duration::from_millis(40);
const ROW_SOURCE_X: f32 = host::ROW_WIDTH - 64.0;
const CONTENT: [&str; 6] = ["🎉", "👍", "🔥", "❤", "😂", "🦄"];

/// Simulator command line arguments.
#[derive(Parser, Debug)]
#[command(name = "glint-sim")]
#[command(about = "Drive the effect scheduler against a simulated scrolling list")]
struct Args {
	/// Scheduler config (TOML)
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Number of list rows
	#[arg(long, default_value_t = 24)]
	anchors: usize,

	/// Number of requests spread over the run
	#[arg(long, default_value_t = 60)]
	requests: usize,

	/// Run length in seconds
	#[arg(long, default_value_t = 8)]
	seconds: u64,

	/// Emoji whose assets fail to resolve
	#[arg(long = "fail", value_name = "EMOJI")]
	fail: Vec<String>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[derive(Debug, Default)]
struct Tally {
	pending: usize,
	rejected: HashMap<RejectReason, usize>,
}

impl Tally {
	fn record(&mut self, admission: Admission) {
		match admission {
			Admission::Pending => self.pending += 1,
			Admission::Rejected(reason) => *self.rejected.entry(reason).or_default() += 1,
		}
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	let subscriber = tracing_subscriber::fmt()
		.with_max_level(if args.verbose {
			tracing::Level::DEBUG
		} else {
			tracing::Level::INFO
		})
		.finish();
	tracing::subscriber::set_global_default(subscriber)?;

	let config = match &args.config {
		Some(path) => EffectConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => EffectConfig::default(),
	};
	anyhow::ensure!(args.anchors > 0, "--anchors must be at least 1");
	info!(?config, anchors = args.anchors, requests = args.requests, "sim.start");

	let rows = (0..args.anchors).map(|row| CONTENT[row % CONTENT.len()].to_string()).collect();
	let resolver = Arc::new(SimResolver {
		latency: FETCH_LATENCY,
		failing: args.fail.clone(),
	});
	let reporter = Arc::new(LoggingReporter::default());
	let mut scheduler = EffectScheduler::new(config, SimHost::new(rows, OVERLAY_LIFETIME), resolver, reporter.clone());

	let ticks = (Duration::from_secs(args.seconds).as_millis() / TICK.as_millis()).max(1) as usize;
	let mut tally = Tally::default();
	let mut issued = 0;
	let mut frame = tokio::time::interval(TICK);
	let end = Instant::now() + TICK * ticks as u32;

	let mut tick = 0;
	while Instant::now() < end {
		tokio::select! {
			_ = frame.tick() => {
				scheduler.host_mut().advance(TICK);
				scheduler.host_mut().scroll();
				scheduler.on_viewport_changed();

				let due = (tick + 1) * args.requests / ticks;
				while issued < due {
					let admission = issue(&mut scheduler, issued);
					debug!(request = issued, ?admission, "sim.request");
					tally.record(admission);
					issued += 1;
				}

				scheduler.pump();
				tick += 1;
			}
			_ = scheduler.tick() => {}
		}
	}

	let live = scheduler.len();
	scheduler.remove_all();
	let counts = reporter.counts();
	let host = scheduler.host();

	println!("requests     {issued}");
	println!("pending      {}", tally.pending);
	let mut rejected: Vec<_> = tally.rejected.iter().collect();
	rejected.sort_by_key(|(reason, _)| format!("{reason:?}"));
	for (reason, count) in rejected {
		println!("  rejected   {count} {reason:?}");
	}
	println!("attached     {} ({} alternate)", host.attached, host.alternate);
	println!("completed    {}", host.completed);
	println!("evicted      {}", host.evicted);
	println!("live at end  {live}");
	println!("reports      {} interactions ({} animations), {} seen", counts.interactions, counts.animations, counts.seen);
	debug_assert_eq!(host.live_overlays(), 0);

	Ok(())
}

/// Fires request number `n` at one of the visible rows.
fn issue(scheduler: &mut EffectScheduler<SimHost>, n: usize) -> Admission {
	let visible: Vec<AnchorId> = scheduler.host().visible_anchors().collect();
	let anchor = visible[(n * 7) % visible.len()];
	let content = scheduler.host().content(anchor).unwrap_or_default().to_string();
	let source = Rect::new(ROW_SOURCE_X, 16.0, 40.0, 40.0);
	let sequence_index = (n % 4) as u32;

	match n % 5 {
		0 | 1 => scheduler.request_effect(EffectRequest {
			anchor,
			emoji: content,
			sequence_index,
			mirrored: n % 2 == 1,
			incoming: n % 5 == 1,
			size: Size::new(180.0, 180.0),
			frame: source,
			surface: SurfaceId(0),
		}),
		2 => scheduler.request_premium_effect(PremiumEffectRequest {
			anchor,
			mirrored: false,
			incoming: false,
			frame: source,
			surface: SurfaceId(0),
		}),
		3 => scheduler.request_reaction(ReactionRequest {
			value: ReactionValue::Builtin(content),
			sequence_index,
			anchor,
			size: Size::new(96.0, 96.0),
			frame: source,
			surface: SurfaceId(1),
		}),
		_ => scheduler.request_reaction(ReactionRequest {
			value: ReactionValue::Custom(n as u64),
			sequence_index,
			anchor,
			size: Size::new(96.0, 96.0),
			frame: source,
			surface: SurfaceId(1),
		}),
	}
}
