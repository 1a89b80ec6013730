use glint_primitives::{Point, Rect, Size};

use crate::config::EffectConfig;
use crate::key::AnimationMode;

/// Computes an overlay frame from its anchor's on-screen frame.
///
/// `source` is relative to `anchor`. The overlay is centred on the source
/// centre shifted by the per-mode offset; `mirrored` flips the x offset.
pub fn overlay_frame(anchor: Rect, source: Rect, size: Size, mode: &AnimationMode, mirrored: bool, config: &EffectConfig) -> Rect {
	let center = source.center().translate(anchor.x, anchor.y);
	let offset = mode_offset(mode, config);
	let dx = if mirrored { -offset.x } else { offset.x };
	Rect::from_center(center.translate(dx, offset.y), size)
}

fn mode_offset(mode: &AnimationMode, config: &EffectConfig) -> Point {
	match mode {
		AnimationMode::Effect { .. } => config.effect_offset,
		AnimationMode::Reaction(_) => config.reaction_offset,
	}
}
