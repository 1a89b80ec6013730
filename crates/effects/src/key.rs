//! Registry keys.

use glint_primitives::AnchorId;
use tokio::time::Instant;

/// Reaction payload an animation renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReactionValue {
	/// A stock emoji reaction.
	Builtin(String),
	/// A custom emoji reaction, by file id.
	Custom(u64),
}

/// What kind of animation a key refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnimationMode {
	/// Full-screen emoji effect; `premium` effects come from the anchor itself.
	Effect { premium: bool },
	/// Reaction burst.
	Reaction(ReactionValue),
}

impl AnimationMode {
	/// Fetch slot this mode competes for.
	pub const fn fetch_kind(&self) -> FetchKind {
		match self {
			Self::Effect { .. } => FetchKind::Effect,
			Self::Reaction(_) => FetchKind::Reaction,
		}
	}

	pub const fn is_effect(&self) -> bool {
		matches!(self, Self::Effect { .. })
	}

	pub const fn is_premium(&self) -> bool {
		matches!(self, Self::Effect { premium: true })
	}
}

/// Independent in-flight fetch lanes per anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
	Effect,
	Reaction,
}

/// Primary key of one admitted animation.
///
/// Two animations on the same anchor differ by admission time and mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AnimationKey {
	pub anchor: AnchorId,
	pub admitted_at: Instant,
	pub incoming: bool,
	pub mode: AnimationMode,
}
