//! Abstract geometry types for overlay placement.
//!
//! Coordinates are logical points in the overlay layer's space. Hosts map
//! their native view rectangles into this space before handing them to the
//! scheduler, so nothing here depends on a UI toolkit.

use serde::{Deserialize, Serialize};

/// A point in overlay space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
	pub x: f32,
	pub y: f32,
}

impl Point {
	/// Creates a new point.
	pub const fn new(x: f32, y: f32) -> Self {
		Self { x, y }
	}

	/// Returns this point moved by `(dx, dy)`.
	pub const fn translate(self, dx: f32, dy: f32) -> Self {
		Self::new(self.x + dx, self.y + dy)
	}
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
	pub width: f32,
	pub height: f32,
}

impl Size {
	/// Creates a new size.
	pub const fn new(width: f32, height: f32) -> Self {
		Self { width, height }
	}

	/// Returns both dimensions multiplied by `factor`.
	pub const fn scale(self, factor: f32) -> Self {
		Self::new(self.width * factor, self.height * factor)
	}
}

/// A rectangle with origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
	pub x: f32,
	pub y: f32,
	pub width: f32,
	pub height: f32,
}

impl Rect {
	/// Creates a new rectangle. Negative dimensions clamp to zero.
	pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
		Self {
			x,
			y,
			width: width.max(0.0),
			height: height.max(0.0),
		}
	}

	/// Creates a rectangle of `size` centred on `center`.
	pub const fn from_center(center: Point, size: Size) -> Self {
		Self::new(center.x - size.width / 2.0, center.y - size.height / 2.0, size.width, size.height)
	}

	/// Returns the origin corner.
	pub const fn origin(&self) -> Point {
		Point::new(self.x, self.y)
	}

	/// Returns the size.
	pub const fn size(&self) -> Size {
		Size::new(self.width, self.height)
	}

	/// Returns the centre point.
	pub const fn center(&self) -> Point {
		Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
	}

	/// Returns the area of the rectangle.
	pub const fn area(&self) -> f32 {
		self.width * self.height
	}

	/// Returns true if the rectangle has zero area.
	pub const fn is_empty(&self) -> bool {
		self.width <= 0.0 || self.height <= 0.0
	}

	/// Returns the right edge x coordinate (exclusive).
	pub const fn right(&self) -> f32 {
		self.x + self.width
	}

	/// Returns the bottom edge y coordinate (exclusive).
	pub const fn bottom(&self) -> f32 {
		self.y + self.height
	}

	/// Returns this rectangle moved by `(dx, dy)`.
	pub const fn translate(self, dx: f32, dy: f32) -> Self {
		Self::new(self.x + dx, self.y + dy, self.width, self.height)
	}

	/// Returns the intersection of two rectangles, or an empty rectangle when
	/// they do not overlap.
	pub fn intersection(&self, other: Self) -> Self {
		let x1 = self.x.max(other.x);
		let y1 = self.y.max(other.y);
		let x2 = self.right().min(other.right());
		let y2 = self.bottom().min(other.bottom());

		if x1 >= x2 || y1 >= y2 {
			Self::default()
		} else {
			Self::new(x1, y1, x2 - x1, y2 - y1)
		}
	}
}
