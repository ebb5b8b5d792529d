//! The fixed view window and its mapping from pixel coordinates to
//! points on the complex plane.  The window covers re ∈ [-2.5, 1.0]
//! and im ∈ [-1.0, 1.0], which frames the whole Mandelbrot set and is
//! symmetric about the real axis; that symmetry is what lets the
//! renderer compute only the top half of the image.  Nothing here is
//! stored per pixel — coordinates are recomputed from the image size
//! on demand.

use num::Complex;

use batch::{F32x8, LANES};

/// Left edge of the view window on the real axis.
pub const RE_MIN: f32 = -2.5;
/// Right edge of the view window on the real axis.
pub const RE_MAX: f32 = 1.0;
/// Bottom edge of the view window on the imaginary axis.
pub const IM_MIN: f32 = -1.0;
/// Top edge of the view window on the imaginary axis.
pub const IM_MAX: f32 = 1.0;

/// Maps pixel coordinates of a `width` x `height` image onto the fixed
/// view window.  Column 0 lands on `RE_MIN` and column `width - 1` on
/// `RE_MAX`; rows map likewise onto the imaginary range.  Row `y` and
/// row `height - 1 - y` map to conjugate points, which is the mirror
/// precondition the renderer relies on.
#[derive(Copy, Clone, Debug)]
pub struct Viewport {
    width: usize,
    height: usize,
}

impl Viewport {
    /// A viewport for an image of the given pixel dimensions.
    pub fn new(width: usize, height: usize) -> Viewport {
        Viewport { width, height }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The real coordinate of pixel column `x`.
    pub fn column_to_re(&self, x: usize) -> f32 {
        RE_MIN + (x as f32 / (self.width as f32 - 1.0)) * (RE_MAX - RE_MIN)
    }

    /// The imaginary coordinate of pixel row `y`.
    pub fn row_to_im(&self, y: usize) -> f32 {
        IM_MIN + (y as f32 / (self.height as f32 - 1.0)) * (IM_MAX - IM_MIN)
    }

    /// The complex-plane point under pixel `(x, y)`.
    pub fn pixel_to_point(&self, x: usize, y: usize) -> Complex<f32> {
        Complex::new(self.column_to_re(x), self.row_to_im(y))
    }

    /// The real coordinates of the eight consecutive columns starting
    /// at `x`, one per lane.  Columns past the right edge still get a
    /// coordinate (beyond `RE_MAX`, escaping immediately); the caller
    /// discards those lanes rather than this function masking them.
    pub fn re_lanes(&self, x: usize) -> F32x8 {
        let mut lanes = [0.0_f32; LANES];
        for (lane, slot) in lanes.iter_mut().enumerate() {
            *slot = self.column_to_re(x + lane);
        }
        F32x8::new(lanes)
    }
}
