use glint_effects::msg::{FetchOutcome, PendingAdmission};
use glint_effects::{
	Admission, AnchorId, AnimationMode, Asset, AssetRequest, EffectMsg, PremiumEffectRequest, ReactionRequest, ReactionValue, Rect,
	RejectReason, Renderer, Size, SurfaceId,
};
use pretty_assertions::assert_eq;

use crate::common::{effect, harness, ms, settle, settle_for};

fn reaction(anchor: u64, value: ReactionValue) -> ReactionRequest {
	ReactionRequest {
		value,
		sequence_index: 0,
		anchor: AnchorId(anchor),
		size: Size::new(90.0, 90.0),
		frame: Rect::new(10.0, 50.0, 24.0, 24.0),
		surface: SurfaceId(1),
	}
}

#[tokio::test(start_paused = true)]
async fn admitted_effect_attaches_after_fetch() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);

	assert_eq!(h.scheduler.request_effect(effect(1, "🎉", 0)), Admission::Pending);
	assert_eq!(h.scheduler.in_flight_fetches(), 1);
	assert!(h.scheduler.is_empty());

	settle(&mut h.scheduler).await;

	assert_eq!(h.scheduler.len(), 1);
	assert_eq!(h.scheduler.in_flight_fetches(), 0);
	assert_eq!(*h.resolver.requests.lock(), vec![AssetRequest::Emoji("🎉".into())]);
	let overlay = h.scheduler.host().overlay_for(1).expect("overlay attached");
	assert_eq!(overlay.spec.key.mode, AnimationMode::Effect { premium: false });
	assert_eq!(overlay.asset.renderer, Renderer::Primary);
	assert_eq!(h.scheduler.outbound_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn content_mismatch_is_rejected_without_fetch() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "👍", 0);

	assert_eq!(h.scheduler.request_effect(effect(1, "🎉", 0)), Admission::Rejected(RejectReason::ContentMismatch));
	settle(&mut h.scheduler).await;

	assert!(h.scheduler.is_empty());
	assert!(h.resolver.requests.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn missing_or_hidden_anchor_is_not_renderable() {
	let mut h = harness();
	assert_eq!(
		h.scheduler.request_effect(effect(1, "🎉", 0)),
		Admission::Rejected(RejectReason::AnchorNotRenderable)
	);

	h.scheduler.host_mut().show(2, "🎉", 3);
	h.scheduler.host_mut().scroll_out(2);
	assert_eq!(
		h.scheduler.request_reaction(reaction(2, ReactionValue::Builtin("❤".into()))),
		Admission::Rejected(RejectReason::AnchorNotRenderable)
	);
	assert_eq!(h.scheduler.in_flight_fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn second_request_within_interval_is_throttled() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle(&mut h.scheduler).await;
	tokio::time::advance(ms(100)).await;

	assert_eq!(h.scheduler.request_effect(effect(1, "🎉", 1)), Admission::Rejected(RejectReason::Throttled));

	tokio::time::advance(ms(150)).await;
	assert!(h.scheduler.request_effect(effect(1, "🎉", 1)).is_pending());
	settle(&mut h.scheduler).await;
	assert_eq!(h.scheduler.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn cap_limits_live_animations_per_anchor() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);

	for index in 0..5 {
		assert!(h.scheduler.request_effect(effect(1, "🎉", index)).is_pending());
		settle(&mut h.scheduler).await;
		tokio::time::advance(ms(250)).await;
	}
	assert_eq!(h.scheduler.records_for(AnchorId(1)).len(), 5);
	assert_eq!(h.scheduler.request_effect(effect(1, "🎉", 5)), Admission::Rejected(RejectReason::CapReached));

	h.scheduler.host_mut().show(2, "🎉", 1);
	assert!(h.scheduler.request_effect(effect(2, "🎉", 0)).is_pending());
}

#[tokio::test(start_paused = true)]
async fn newer_request_supersedes_in_flight_fetch() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	assert!(h.scheduler.request_effect(effect(1, "🎉", 1)).is_pending());
	assert_eq!(h.scheduler.in_flight_fetches(), 1);

	settle(&mut h.scheduler).await;

	let records = h.scheduler.records_for(AnchorId(1));
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].sequence_index, 1);
	assert_eq!(h.resolver.requests.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn stale_generation_outcome_is_ignored() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle(&mut h.scheduler).await;
	tokio::time::advance(ms(500)).await;

	let admission = PendingAdmission {
		anchor: AnchorId(1),
		mode: AnimationMode::Effect { premium: false },
		incoming: false,
		emoji: Some("🎉".into()),
		reaction: None,
		sequence_index: 9,
		mirrored: false,
		size: Size::new(160.0, 160.0),
		frame: Rect::new(0.0, 0.0, 40.0, 40.0),
		surface: SurfaceId(0),
	};
	let sender = h.scheduler.msg_sender();
	sender
		.send(EffectMsg::AssetResolved(FetchOutcome {
			generation: 0,
			admission,
			result: Ok(Asset::new("late", b"x".to_vec())),
		}))
		.expect("scheduler alive");

	assert_eq!(h.scheduler.drain_messages(), 1);
	assert_eq!(h.scheduler.len(), 1);
	assert!(h.scheduler.records().all(|record| record.sequence_index == 0));
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_is_absorbed() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	h.resolver.fail(AssetRequest::Emoji("🎉".into()));

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle(&mut h.scheduler).await;

	assert!(h.scheduler.is_empty());
	assert_eq!(h.scheduler.in_flight_fetches(), 0);
	assert!(h.scheduler.host().overlays.is_empty());
	assert_eq!(h.scheduler.outbound_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn custom_reaction_falls_back_to_alternate_renderer() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	h.resolver.fail(AssetRequest::Reaction(ReactionValue::Custom(7)));

	assert!(h.scheduler.request_reaction(reaction(1, ReactionValue::Custom(7))).is_pending());
	settle(&mut h.scheduler).await;

	assert_eq!(
		*h.resolver.requests.lock(),
		vec![
			AssetRequest::Reaction(ReactionValue::Custom(7)),
			AssetRequest::ReactionFallback(ReactionValue::Custom(7)),
		]
	);
	let overlay = h.scheduler.host().overlay_for(1).expect("fallback overlay");
	assert_eq!(overlay.asset.renderer, Renderer::Alternate);
	assert!(!overlay.spec.mirrored);
	assert_eq!(h.scheduler.outbound_len(), 0);
	assert_eq!(h.scheduler.inbound_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn builtin_reaction_without_asset_is_dropped() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	h.resolver.fail(AssetRequest::Reaction(ReactionValue::Builtin("❤".into())));

	assert!(
		h.scheduler
			.request_reaction(reaction(1, ReactionValue::Builtin("❤".into())))
			.is_pending()
	);
	settle(&mut h.scheduler).await;

	assert!(h.scheduler.is_empty());
	assert_eq!(h.resolver.requests.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn premium_effect_uses_anchor_content_and_scaled_size() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🦄", 0);

	let request = PremiumEffectRequest {
		anchor: AnchorId(1),
		mirrored: true,
		incoming: false,
		frame: Rect::new(20.0, 10.0, 100.0, 60.0),
		surface: SurfaceId(2),
	};
	assert!(h.scheduler.request_premium_effect(request).is_pending());
	settle(&mut h.scheduler).await;

	assert_eq!(*h.resolver.requests.lock(), vec![AssetRequest::Premium(AnchorId(1))]);
	let records = h.scheduler.records_for(AnchorId(1));
	assert_eq!(records.len(), 1);
	assert_eq!(records[0].emoji.as_deref(), Some("🦄"));
	assert_eq!(records[0].size, Size::new(150.0, 90.0));
	assert_eq!(records[0].surface, SurfaceId(2));
	assert_eq!(h.scheduler.outbound_len(), 1);
}

#[tokio::test(start_paused = true)]
async fn content_change_during_fetch_drops_result() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	h.scheduler.host_mut().set_content(1, "👍");
	settle(&mut h.scheduler).await;

	assert!(h.scheduler.is_empty());
	assert!(h.scheduler.host().overlays.is_empty());
}

#[tokio::test(start_paused = true)]
async fn refused_attach_registers_nothing() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	h.scheduler.host_mut().refuse_attach = true;

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle(&mut h.scheduler).await;

	assert!(h.scheduler.is_empty());
	assert_eq!(h.scheduler.outbound_len(), 0);
	assert_eq!(h.scheduler.next_deadline(), None);
}

#[tokio::test(start_paused = true)]
async fn effect_and_reaction_fetch_lanes_are_independent() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	assert!(
		h.scheduler
			.request_reaction(reaction(1, ReactionValue::Builtin("❤".into())))
			.is_pending()
	);
	assert_eq!(h.scheduler.in_flight_fetches(), 2);

	settle(&mut h.scheduler).await;

	// Both landed at the same instant; the interval is re-checked on registration.
	assert_eq!(h.scheduler.len(), 1);
	assert_eq!(h.scheduler.in_flight_fetches(), 0);
}

#[tokio::test(start_paused = true)]
async fn interval_counts_from_registration_not_request() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	h.resolver.set_delay(ms(50));

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle_for(&mut h.scheduler, ms(60)).await;
	assert_eq!(h.scheduler.len(), 1);

	tokio::time::advance(ms(150)).await;
	assert_eq!(
		h.scheduler.request_reaction(reaction(1, ReactionValue::Builtin("❤".into()))),
		Admission::Rejected(RejectReason::Throttled)
	);

	tokio::time::advance(ms(60)).await;
	assert!(
		h.scheduler
			.request_reaction(reaction(1, ReactionValue::Builtin("❤".into())))
			.is_pending()
	);
	settle_for(&mut h.scheduler, ms(60)).await;
	assert_eq!(h.scheduler.len(), 2);
}
