use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;

/// Monotonic generation clock for fetch lifecycles.
#[derive(Debug, Default, Clone)]
pub struct GenerationClock {
	next: Arc<AtomicU64>,
}

impl GenerationClock {
	/// Creates a new generation clock starting at generation 1.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the next generation ID.
	pub fn next(&self) -> u64 {
		self.next.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
	}
}

/// Generation-scoped cancellation token for one fetch.
#[derive(Debug, Clone)]
pub struct GenerationToken {
	generation: u64,
	cancel: CancellationToken,
}

impl GenerationToken {
	/// Creates a new generation token.
	pub fn new(generation: u64, cancel: CancellationToken) -> Self {
		Self { generation, cancel }
	}

	/// Returns generation ID.
	pub const fn generation(&self) -> u64 {
		self.generation
	}

	/// Returns true when cancellation is requested.
	pub fn is_cancelled(&self) -> bool {
		self.cancel.is_cancelled()
	}

	/// Requests cancellation.
	pub fn cancel(&self) {
		self.cancel.cancel();
	}

	/// Future resolving when cancellation is requested.
	pub async fn cancelled(&self) {
		self.cancel.cancelled().await;
	}
}

/// At most one live [`GenerationToken`] per key.
///
/// Issuing a token for a key cancels the token previously issued for it. A
/// completing task proves it is still current by presenting its generation to
/// [`TokenSlots::complete`]; superseded or cancelled generations are refused.
#[derive(Debug)]
pub struct TokenSlots<K> {
	clock: GenerationClock,
	live: HashMap<K, GenerationToken>,
}

impl<K> Default for TokenSlots<K> {
	fn default() -> Self {
		Self {
			clock: GenerationClock::new(),
			live: HashMap::new(),
		}
	}
}

impl<K> TokenSlots<K>
where
	K: Eq + Hash + Clone,
{
	/// Creates an empty slot map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues a fresh token for `key`, cancelling any token it replaces.
	pub fn issue(&mut self, key: K) -> GenerationToken {
		let token = GenerationToken::new(self.clock.next(), CancellationToken::new());
		if let Some(previous) = self.live.insert(key, token.clone()) {
			previous.cancel();
		}
		token
	}

	/// Returns true if `generation` is the live generation for `key`.
	pub fn is_current(&self, key: &K, generation: u64) -> bool {
		self.live
			.get(key)
			.is_some_and(|token| token.generation() == generation && !token.is_cancelled())
	}

	/// Releases the slot for `key` if `generation` is still current.
	///
	/// Returns false for stale generations, leaving the slot untouched.
	pub fn complete(&mut self, key: &K, generation: u64) -> bool {
		if !self.is_current(key, generation) {
			return false;
		}
		self.live.remove(key);
		true
	}

	/// Cancels and releases the slot for `key`.
	pub fn cancel(&mut self, key: &K) -> bool {
		match self.live.remove(key) {
			Some(token) => {
				token.cancel();
				true
			}
			None => false,
		}
	}

	/// Cancels and releases every slot whose key matches `pred`.
	pub fn cancel_where(&mut self, mut pred: impl FnMut(&K) -> bool) -> usize {
		let mut cancelled = 0;
		self.live.retain(|key, token| {
			if pred(key) {
				token.cancel();
				cancelled += 1;
				false
			} else {
				true
			}
		});
		cancelled
	}

	/// Cancels and releases every slot.
	pub fn cancel_all(&mut self) -> usize {
		let count = self.live.len();
		for (_, token) in self.live.drain() {
			token.cancel();
		}
		count
	}

	/// Number of live slots.
	pub fn len(&self) -> usize {
		self.live.len()
	}

	/// Returns true if no slot is live.
	pub fn is_empty(&self) -> bool {
		self.live.is_empty()
	}

	/// Iterates over keys with a live token.
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.live.keys()
	}
}

impl<K> Drop for TokenSlots<K> {
	fn drop(&mut self) {
		for token in self.live.values() {
			token.cancel();
		}
	}
}
