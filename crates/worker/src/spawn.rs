use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;

use crate::TaskClass;

fn runtime_handle() -> Option<Handle> {
	if let Ok(handle) = Handle::try_current() {
		return Some(handle);
	}

	static FALLBACK_RT: OnceLock<Option<Runtime>> = OnceLock::new();
	FALLBACK_RT
		.get_or_init(|| {
			Builder::new_multi_thread()
				.enable_time()
				.worker_threads(1)
				.thread_name("glint-worker-fallback")
				.build()
				.map_err(|err| tracing::error!(error = %err, "worker.fallback_runtime.failed"))
				.ok()
		})
		.as_ref()
		.map(|runtime| runtime.handle().clone())
}

/// Spawns an async task tagged with `class`.
///
/// Uses the current Tokio runtime when there is one. Returns `None` only when
/// no runtime is active and the fallback runtime could not be built.
pub fn spawn<F>(class: TaskClass, fut: F) -> Option<JoinHandle<F::Output>>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!(worker_class = class.as_str(), "worker.spawn");
	runtime_handle().map(|handle| handle.spawn(fut))
}
