// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The heat gradient and the per-frame palette derived from it.
//!
//! A pixel's color comes from its *rank* in the frame's escape-count
//! distribution: the inclusive cumulative fraction of pixels that
//! escaped no later than it did.  That fraction walks four linear
//! ramps — blue to cyan to green to yellow to red — one per quartile
//! of [0, 1].  Pixels that never escaped sit outside the gradient
//! entirely and are painted black.

use num::clamp;

use histogram::Snapshot;

/// An RGB24 color triple.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The color of points that never escape.
pub const BLACK: Rgb = Rgb(0, 0, 0);

/// Maps a fraction in [0, 1] onto the four-ramp heat gradient.  Values
/// outside the range are clamped; a histogram fraction can only leave
/// [0, 1] through a bug upstream, and a saturated pixel beats an
/// abort.
pub fn heat_lut(x: f32) -> Rgb {
    const X0: f32 = 1.0 / 4.0;
    const X1: f32 = 2.0 / 4.0;
    const X2: f32 = 3.0 / 4.0;

    let x = clamp(x, 0.0, 1.0);
    if x < X0 {
        Rgb(0, (x / X0 * 255.0) as u8, 255)
    } else if x < X1 {
        Rgb(0, 255, ((X1 - x) / X0 * 255.0) as u8)
    } else if x < X2 {
        Rgb(((x - X1) / X0 * 255.0) as u8, 255, 0)
    } else {
        Rgb(255, ((1.0 - x) / X0 * 255.0) as u8, 0)
    }
}

/// The quartile ramp a fraction falls in, 0 through 3.  Exposed so the
/// gradient's ordering can be checked without comparing raw channel
/// values.
pub fn ramp_index(x: f32) -> usize {
    let x = clamp(x, 0.0, 1.0);
    if x < 0.25 {
        0
    } else if x < 0.5 {
        1
    } else if x < 0.75 {
        2
    } else {
        3
    }
}

/// One frame's color table: the heat gradient evaluated once per
/// histogram bin, so the coloring pass is a plain index per pixel.
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Builds the table from a frozen histogram.  The final bin — the
    /// never-escaped bucket — bypasses the gradient and gets black.
    pub fn from_histogram(snapshot: &Snapshot) -> Palette {
        let bins = snapshot.bins();
        let mut colors = Vec::with_capacity(bins);
        for count in 0..bins - 1 {
            colors.push(heat_lut(snapshot.fraction(count)));
        }
        colors.push(BLACK);
        Palette { colors }
    }

    /// The color for a pixel that survived `count` iterations.
    pub fn color(&self, count: usize) -> Rgb {
        self.colors[count]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use histogram::Histogram;

    #[test]
    fn ramp_endpoints() {
        assert_eq!(heat_lut(0.0), Rgb(0, 0, 255));
        assert_eq!(heat_lut(0.25), Rgb(0, 255, 255));
        assert_eq!(heat_lut(0.5), Rgb(0, 255, 0));
        assert_eq!(heat_lut(0.75), Rgb(255, 255, 0));
        assert_eq!(heat_lut(1.0), Rgb(255, 0, 0));
    }

    #[test]
    fn out_of_range_fractions_clamp() {
        assert_eq!(heat_lut(-0.5), heat_lut(0.0));
        assert_eq!(heat_lut(1.5), heat_lut(1.0));
    }

    #[test]
    fn ramp_position_is_monotonic() {
        let mut last = 0;
        for step in 0..=100 {
            let index = ramp_index(step as f32 / 100.0);
            assert!(index >= last);
            last = index;
        }
    }

    #[test]
    fn palette_paints_the_bounded_bin_black() {
        let histogram = Histogram::new(5);
        for count in &[1, 2, 2, 3, 5, 5] {
            histogram.record(*count);
        }
        let palette = Palette::from_histogram(&histogram.freeze());
        assert_eq!(palette.color(5), BLACK);
        assert_ne!(palette.color(1), BLACK);
    }

    #[test]
    fn palette_follows_the_cumulative_fractions() {
        let histogram = Histogram::new(2);
        // Bin 0 holds half of everything, so count 0 sits at the
        // second quartile boundary and count 1 at the end of the ramp.
        for count in &[0, 0, 1, 1] {
            histogram.record(*count);
        }
        let snapshot = histogram.freeze();
        let palette = Palette::from_histogram(&snapshot);
        assert_eq!(palette.color(0), heat_lut(0.5));
        assert_eq!(palette.color(1), heat_lut(1.0));
    }
}
