use crate::Complex;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in the complex plane.
///
/// Stored as two opposite corners and kept normalized so that
/// `top_left.re <= bottom_right.re` and `top_left.im >= bottom_right.im`.
/// Constructing from any pair of opposite corners, or mutating either corner,
/// re-establishes the invariant; the other two corners are derived.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexRect {
    top_left: Complex,
    bottom_right: Complex,
}

impl ComplexRect {
    pub fn new(c1: Complex, c2: Complex) -> Self {
        Self {
            top_left: Complex::new(c1.re.min(c2.re), c1.im.max(c2.im)),
            bottom_right: Complex::new(c1.re.max(c2.re), c1.im.min(c2.im)),
        }
    }

    pub fn top_left(&self) -> Complex {
        self.top_left
    }

    pub fn bottom_right(&self) -> Complex {
        self.bottom_right
    }

    pub fn bottom_left(&self) -> Complex {
        Complex::new(self.top_left.re, self.bottom_right.im)
    }

    pub fn top_right(&self) -> Complex {
        Complex::new(self.bottom_right.re, self.top_left.im)
    }

    /// Replaces the top-left corner, re-normalizing against the current
    /// bottom-right corner.
    pub fn set_top_left(&mut self, corner: Complex) {
        *self = Self::new(corner, self.bottom_right);
    }

    /// Replaces the bottom-right corner, re-normalizing against the current
    /// top-left corner.
    pub fn set_bottom_right(&mut self, corner: Complex) {
        *self = Self::new(self.top_left, corner);
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.bottom_right.re - self.top_left.re
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.top_left.im - self.bottom_right.im
    }

    pub fn center(&self) -> Complex {
        (self.top_left + self.bottom_right) / 2.0
    }

    /// Shifts both corners by `delta`. Used to pan the visible window.
    pub fn translate(&mut self, delta: Complex) {
        self.top_left += delta;
        self.bottom_right += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_normalizes_corners() {
        // Corners given bottom-left / top-right; must come out normalized.
        let rect = ComplexRect::new(Complex::new(1.0, -1.0), Complex::new(-1.0, 1.0));
        assert_eq!(rect.top_left(), Complex::new(-1.0, 1.0));
        assert_eq!(rect.bottom_right(), Complex::new(1.0, -1.0));
    }

    #[test]
    fn derived_corners_are_consistent() {
        let rect = ComplexRect::new(Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0));
        assert_eq!(rect.bottom_left(), Complex::new(-2.0, -2.0));
        assert_eq!(rect.top_right(), Complex::new(2.0, 2.0));
    }

    #[test]
    fn corner_mutation_renormalizes() {
        let mut rect = ComplexRect::new(Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));

        // Drag top-left past the opposite corner; the rect must stay normalized.
        rect.set_top_left(Complex::new(3.0, -3.0));
        assert_eq!(rect.top_left(), Complex::new(1.0, -1.0));
        assert_eq!(rect.bottom_right(), Complex::new(3.0, -3.0));

        rect.set_bottom_right(Complex::new(0.0, 0.0));
        assert_eq!(rect.top_left(), Complex::new(0.0, 0.0));
        assert_eq!(rect.bottom_right(), Complex::new(1.0, -1.0));
    }

    #[test]
    fn width_and_height() {
        let rect = ComplexRect::new(Complex::new(-1.0, 2.0), Complex::new(3.0, -1.0));
        assert_eq!(rect.width(), 4.0);
        assert_eq!(rect.height(), 3.0);
        assert_eq!(rect.center(), Complex::new(1.0, 0.5));
    }

    #[test]
    fn translate_shifts_both_corners() {
        let mut rect = ComplexRect::new(Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        rect.translate(Complex::new(0.5, -0.25));
        assert_eq!(rect.top_left(), Complex::new(-0.5, 0.75));
        assert_eq!(rect.bottom_right(), Complex::new(1.5, -1.25));
        assert_eq!(rect.width(), 2.0);
        assert_eq!(rect.height(), 2.0);
    }
}
