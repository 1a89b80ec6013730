//! Core types shared between the effect scheduler and its hosts: overlay
//! geometry, layout transitions and identifiers.

/// Points, sizes and rectangles in overlay space.
pub mod geometry;
/// Identifier newtypes for anchors and surfaces.
pub mod ids;
/// Layout transition descriptors.
pub mod transition;

pub use geometry::{Point, Rect, Size};
pub use ids::{AnchorId, SurfaceId};
pub use transition::{Curve, LayoutTransition};
