//! Integer vectors and the fixed-point coordinate spaces.
//!
//! Three spaces are in play:
//!   - **full**: sub-pixel positions, 256 units per pixel (actor `pos`, velocity bias)
//!   - **real**: pixels (collision rectangles, spatial index)
//!   - **tile**: map cells, `TILE_WIDTH` × `TILE_HEIGHT` pixels each

use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use super::tile::{TILE_HEIGHT, TILE_WIDTH};

/// Bits of sub-pixel precision in full coordinates.
pub const FULL_SHIFT: i32 = 8;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Vec2i { x, y }
    }

    pub fn full_to_real(self) -> Self {
        Vec2i::new(self.x >> FULL_SHIFT, self.y >> FULL_SHIFT)
    }

    pub fn real_to_full(self) -> Self {
        Vec2i::new(self.x << FULL_SHIFT, self.y << FULL_SHIFT)
    }

    /// Tile containing this real position.
    pub fn real_to_tile(self) -> Self {
        Vec2i::new(self.x.div_euclid(TILE_WIDTH), self.y.div_euclid(TILE_HEIGHT))
    }

    pub fn scale(self, s: i32) -> Self {
        Vec2i::new(self.x * s, self.y * s)
    }

    pub fn scale_div(self, d: i32) -> Self {
        Vec2i::new(self.x / d, self.y / d)
    }

    pub fn is_zero(self) -> bool {
        self == Vec2i::ZERO
    }

    /// Rescale to length `len`, rounding each component.
    /// The zero vector stays zero.
    pub fn with_length(self, len: i32) -> Self {
        if self.is_zero() { return self; }
        let (x, y) = (self.x as f64, self.y as f64);
        let mag = (x * x + y * y).sqrt();
        Vec2i::new(
            (x / mag * len as f64).round() as i32,
            (y / mag * len as f64).round() as i32,
        )
    }
}

impl Add for Vec2i {
    type Output = Vec2i;
    fn add(self, o: Vec2i) -> Vec2i { Vec2i::new(self.x + o.x, self.y + o.y) }
}

impl AddAssign for Vec2i {
    fn add_assign(&mut self, o: Vec2i) { self.x += o.x; self.y += o.y; }
}

impl Sub for Vec2i {
    type Output = Vec2i;
    fn sub(self, o: Vec2i) -> Vec2i { Vec2i::new(self.x - o.x, self.y - o.y) }
}

impl SubAssign for Vec2i {
    fn sub_assign(&mut self, o: Vec2i) { self.x -= o.x; self.y -= o.y; }
}

impl Neg for Vec2i {
    type Output = Vec2i;
    fn neg(self) -> Vec2i { Vec2i::new(-self.x, -self.y) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_real_conversion_floors() {
        assert_eq!(Vec2i::new(300, 511).full_to_real(), Vec2i::new(1, 1));
        assert_eq!(Vec2i::new(-1, 0).full_to_real(), Vec2i::new(-1, 0));
        assert_eq!(Vec2i::new(3, 4).real_to_full(), Vec2i::new(768, 1024));
    }

    #[test]
    fn real_to_tile_uses_tile_size() {
        assert_eq!(Vec2i::new(15, 11).real_to_tile(), Vec2i::new(0, 0));
        assert_eq!(Vec2i::new(16, 12).real_to_tile(), Vec2i::new(1, 1));
        assert_eq!(Vec2i::new(-1, -1).real_to_tile(), Vec2i::new(-1, -1));
    }

    #[test]
    fn with_length_axis_and_diagonal() {
        assert_eq!(Vec2i::new(5, 0).with_length(18), Vec2i::new(18, 0));
        assert_eq!(Vec2i::new(0, -2).with_length(18), Vec2i::new(0, -18));
        assert_eq!(Vec2i::new(3, 4).with_length(10), Vec2i::new(6, 8));
        assert_eq!(Vec2i::ZERO.with_length(18), Vec2i::ZERO);
    }
}
