use std::time::Duration;

/// Timing curve for an animated layout change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Curve {
	Linear,
	#[default]
	EaseInOut,
	Spring,
}

/// How a bounds change is applied to live overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutTransition {
	/// Jump to the new bounds.
	#[default]
	Immediate,
	/// Interpolate to the new bounds.
	Animated { duration: Duration, curve: Curve },
}

impl LayoutTransition {
	/// Shorthand for an ease-in-out transition of `duration`.
	pub const fn animated(duration: Duration) -> Self {
		Self::Animated { duration, curve: Curve::EaseInOut }
	}

	/// Returns true if the change should be interpolated.
	pub const fn is_animated(&self) -> bool {
		matches!(self, Self::Animated { duration, .. } if !duration.is_zero())
	}
}
