use glint_effects::AnchorId;
use pretty_assertions::assert_eq;

use crate::common::{effect, harness, incoming_effect, ms, settle};

#[tokio::test(start_paused = true)]
async fn natural_completion_unregisters_without_transition() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle(&mut h.scheduler).await;

	let (handle, notifier) = {
		let (handle, overlay) = h.scheduler.host().overlays.iter().next().expect("overlay");
		(*handle, overlay.notifier.clone())
	};
	let key = notifier.key().clone();
	assert!(h.scheduler.lookup(&key).is_some());

	notifier.finish();
	notifier.finish();
	assert_eq!(h.scheduler.drain_messages(), 2);

	assert!(h.scheduler.lookup(&key).is_none());
	assert!(!h.scheduler.is_queued_for_report(&key));
	assert_eq!(h.scheduler.host().detached, vec![(handle, false)]);
}

#[tokio::test(start_paused = true)]
async fn tick_applies_completion_messages() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());

	h.scheduler.tick().await;
	assert_eq!(h.scheduler.len(), 1);

	let notifier = h.scheduler.host().overlay_for(1).expect("overlay").notifier.clone();
	notifier.finish();
	h.scheduler.tick().await;
	assert!(h.scheduler.is_empty());
}

#[tokio::test(start_paused = true)]
async fn unregister_is_idempotent() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	settle(&mut h.scheduler).await;

	let key = h.scheduler.records().next().expect("record").key.clone();
	assert!(h.scheduler.unregister(&key, true));
	assert!(!h.scheduler.unregister(&key, false));
	assert_eq!(h.scheduler.host().detached.len(), 1);
	assert!(h.scheduler.host().detached[0].1);
	assert_eq!(h.scheduler.outbound_len(), 0);
}

#[tokio::test(start_paused = true)]
async fn remove_all_tears_everything_down() {
	let mut h = harness();
	h.scheduler.host_mut().show(1, "🎉", 0);
	h.scheduler.host_mut().show(2, "👍", 1);
	h.scheduler.host_mut().show(3, "🔥", 2);

	assert!(h.scheduler.request_effect(effect(1, "🎉", 0)).is_pending());
	assert!(h.scheduler.request_effect(incoming_effect(2, "👍", 0)).is_pending());
	settle(&mut h.scheduler).await;
	assert_eq!(h.scheduler.len(), 2);

	h.resolver.set_delay(ms(100));
	assert!(h.scheduler.request_effect(effect(3, "🔥", 0)).is_pending());
	assert_eq!(h.scheduler.in_flight_fetches(), 1);

	h.scheduler.remove_all();

	assert!(h.scheduler.is_empty());
	assert_eq!(h.scheduler.in_flight_fetches(), 0);
	assert_eq!(h.scheduler.outbound_len(), 0);
	assert_eq!(h.scheduler.inbound_len(), 0);
	assert_eq!(h.scheduler.next_deadline(), None);
	assert!(h.scheduler.host().overlays.is_empty());
	assert!(h.scheduler.host().detached.iter().all(|(_, animated)| !animated));

	tokio::time::advance(ms(2000)).await;
	h.scheduler.pump();
	assert!(h.scheduler.records_for(AnchorId(3)).is_empty());
	assert!(h.reporter.interactions.lock().is_empty());
	assert!(h.reporter.seen.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_scheduler_cancels_fetches() {
	let h = harness();
	let mut scheduler = h.scheduler;
	scheduler.host_mut().show(1, "🎉", 0);
	h.resolver.set_delay(ms(100));
	assert!(scheduler.request_effect(effect(1, "🎉", 0)).is_pending());

	drop(scheduler);
	tokio::time::sleep(ms(200)).await;

	assert_eq!(h.resolver.requests.lock().len(), 0);
}
