// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time iteration, in two forms that must agree exactly.
//!
//! The scalar form is the ground truth: iterate `z = z * z + c` from
//! zero and count how many steps the orbit stays inside the radius-2
//! circle, up to a cap.  The batched form runs the same recurrence for
//! eight points in lock-step, with a predicate mask freezing the
//! counter of each lane as its orbit escapes.  Both are written to
//! perform the same floating-point operations in the same order, so
//! their counts are equal bit for bit — the batched form is tested
//! against the scalar one, not against a tolerance.

use num::Complex;

use batch::{F32x8, U32x8, LANES};

/// Orbits are considered escaped once |z|² reaches this value.
pub const ESCAPE_RADIUS_SQ: f32 = 4.0;

/// Counts the iterations the orbit of `c` survives before escaping,
/// capped at `limit`.  A return of `limit` means the point did not
/// escape and is treated as belonging to the set.
pub fn escape_time(c: Complex<f32>, limit: usize) -> usize {
    let mut z: Complex<f32> = Complex::new(0.0, 0.0);
    let mut count = 0;
    while count < limit && z.norm_sqr() < ESCAPE_RADIUS_SQ {
        z = z * z + c;
        count += 1;
    }
    count
}

/// Escape counts for the eight points `(c_re[lane], c_im)`, in
/// lock-step.  Every live lane is tested, counted, and advanced each
/// step; the loop exits early only when *no* lane is still inside the
/// threshold, so lanes that escape first keep doing arithmetic whose
/// results are discarded.  That is a deliberate trade: a per-lane
/// state freeze costs more blends than the wasted multiplies save.
///
/// Escaped lanes can overrun to infinity and then NaN while the batch
/// finishes; NaN fails the `<` compare, so a dead lane's counter can
/// never restart.
pub fn escape_time_x8(c_re: F32x8, c_im: f32, limit: usize) -> [u32; LANES] {
    let c_im = F32x8::splat(c_im);
    let threshold = F32x8::splat(ESCAPE_RADIUS_SQ);
    let mut z_re = F32x8::splat(0.0);
    let mut z_im = F32x8::splat(0.0);
    let mut counts = U32x8::splat(0);

    for _ in 0..limit {
        let re2 = z_re * z_re;
        let im2 = z_im * z_im;
        let live = (re2 + im2).lt(threshold);
        if !live.any() {
            break;
        }
        counts.increment_where(live);

        // z = z * z + c, with the cross term as an exact doubling.
        let cross = z_re * z_im;
        z_re = (re2 - im2) + c_re;
        z_im = (cross + cross) + c_im;
    }

    counts.to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;
    use plane::Viewport;

    #[test]
    fn origin_never_escapes() {
        assert_eq!(escape_time(Complex::new(0.0, 0.0), 1000), 1000);
    }

    #[test]
    fn far_left_point_escapes_on_the_first_step() {
        // |c| > 2, so the very first z = c already lies outside.
        assert_eq!(escape_time(Complex::new(-2.5, 0.0), 100), 1);
    }

    #[test]
    fn zero_cap_counts_nothing() {
        assert_eq!(escape_time(Complex::new(-2.5, 0.0), 0), 0);
    }

    #[test]
    fn batched_counts_equal_scalar_counts_everywhere() {
        let vp = Viewport::new(16, 9);
        for (y, x) in iproduct!(0..9, (0..16).step_by(LANES)) {
            let got = escape_time_x8(vp.re_lanes(x), vp.row_to_im(y), 50);
            for lane in 0..LANES {
                let want = escape_time(vp.pixel_to_point(x + lane, y), 50);
                assert_eq!(
                    got[lane] as usize,
                    want,
                    "pixel ({}, {})",
                    x + lane,
                    y
                );
            }
        }
    }

    #[test]
    fn batched_counts_agree_across_a_partial_batch() {
        // Width 17 leaves one valid column in the final batch; the
        // seven overhanging lanes still compute, but the one in-range
        // lane must match the scalar count.
        let vp = Viewport::new(17, 9);
        for y in 0..9 {
            let got = escape_time_x8(vp.re_lanes(16), vp.row_to_im(y), 50);
            let want = escape_time(vp.pixel_to_point(16, y), 50);
            assert_eq!(got[0] as usize, want);
        }
    }

    #[test]
    fn bounded_lanes_hit_the_cap() {
        // Center the batch on the set's interior around the origin row.
        let vp = Viewport::new(160, 90);
        let counts = escape_time_x8(vp.re_lanes(88), vp.row_to_im(44), 100);
        let scalar = escape_time(vp.pixel_to_point(91, 44), 100);
        assert_eq!(scalar, 100);
        assert_eq!(counts[3] as usize, scalar);
    }
}
