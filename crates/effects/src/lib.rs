#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Ephemeral visual-effect scheduling for scrolling lists.
//!
//! [`EffectScheduler`] runs many short-lived reaction and emoji-effect
//! animations anchored to list items. It
//!
//! - admits requests subject to content checks and per-anchor rate limits,
//! - resolves assets asynchronously with at most one fetch per anchor and kind,
//! - keeps overlays positioned as the list scrolls and evicts them once their
//!   anchor leaves the screen,
//! - batches interaction and "seen" telemetry behind debounce timers.
//!
//! The host supplies the collaborators through [`EffectHost`],
//! [`AssetResolver`] and [`ActivityReporter`].

/// Asset descriptors and the resolver seam.
pub mod asset;
/// TOML-loadable tuning knobs.
pub mod config;
/// Host-surface seam.
pub mod host;
pub mod key;
/// Completion message bus.
pub mod msg;
mod placement;
/// Live animation storage.
pub mod registry;
/// Reporting boundary.
pub mod report;
mod scheduler;
/// Debounced telemetry queues.
pub mod telemetry;

pub use asset::{Asset, AssetError, AssetRequest, AssetResolver, Renderer};
pub use config::{ConfigError, EffectConfig};
pub use glint_primitives::{AnchorId, LayoutTransition, Point, Rect, Size, SurfaceId};
pub use host::{AnchorView, EffectHost, OverlayHandle, OverlaySpec};
pub use key::{AnimationKey, AnimationMode, FetchKind, ReactionValue};
pub use msg::{CompletionNotifier, EffectMsg, MsgSender};
pub use placement::overlay_frame;
pub use registry::{AnimationRecord, AnimationRegistry};
pub use report::{ActivityReporter, InteractionFrame, InteractionReport};
pub use scheduler::{Admission, EffectRequest, EffectScheduler, PremiumEffectRequest, ReactionRequest, RejectReason};
pub use telemetry::{FlushStats, PendingReport, TelemetryBatcher};
