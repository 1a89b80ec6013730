//! Asset resolution seam.

use async_trait::async_trait;
use bytes::Bytes;
use glint_primitives::AnchorId;
use thiserror::Error;

use crate::key::ReactionValue;

/// Which rendering path an asset is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Renderer {
	#[default]
	Primary,
	/// Alternate path used when a custom reaction has no primary asset.
	Alternate,
}

/// A renderable, already-fetched animation asset.
///
/// Opaque to the scheduler; handed unchanged to the overlay host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
	pub id: String,
	pub data: Bytes,
	pub renderer: Renderer,
}

impl Asset {
	pub fn new(id: impl Into<String>, data: impl Into<Bytes>) -> Self {
		Self {
			id: id.into(),
			data: data.into(),
			renderer: Renderer::Primary,
		}
	}

	#[must_use]
	pub fn with_renderer(mut self, renderer: Renderer) -> Self {
		self.renderer = renderer;
		self
	}
}

/// Descriptor of the asset a request needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRequest {
	/// Screen effect for an emoji.
	Emoji(String),
	/// Premium effect attached to the anchor's own content.
	Premium(AnchorId),
	/// Reaction animation.
	Reaction(ReactionValue),
	/// Alternate-renderer source for a reaction without a primary asset.
	ReactionFallback(ReactionValue),
}

/// Asset resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
	#[error("no asset available")]
	Unavailable,
	#[error("asset fetch failed: {0}")]
	Fetch(String),
}

/// Storage/network layer that turns a request into a renderable asset.
///
/// The scheduler cancels a fetch by dropping its future, so implementations
/// need no cancellation handling of their own.
#[async_trait]
pub trait AssetResolver: Send + Sync + 'static {
	async fn resolve(&self, request: AssetRequest) -> Result<Asset, AssetError>;
}

/// Resolves `request`, retrying custom reactions through the alternate
/// renderer when their primary asset cannot be produced.
pub(crate) async fn resolve_with_fallback(resolver: &dyn AssetResolver, request: AssetRequest) -> Result<Asset, AssetError> {
	let fallback = match &request {
		AssetRequest::Reaction(value @ ReactionValue::Custom(_)) => Some(value.clone()),
		_ => None,
	};
	match resolver.resolve(request).await {
		Ok(asset) => Ok(asset),
		Err(err) => {
			let Some(value) = fallback else {
				return Err(err);
			};
			tracing::trace!(error = %err, ?value, "effects.fetch.fallback");
			let asset = resolver.resolve(AssetRequest::ReactionFallback(value)).await?;
			Ok(asset.with_renderer(Renderer::Alternate))
		}
	}
}
