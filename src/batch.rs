// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Fixed-width lane batches: eight values processed in lock-step.
//!
//! The escape-time kernel wants to advance eight pixels at once with a
//! predicate mask deciding which lanes still count.  These newtypes
//! give it exactly the operations it needs — elementwise arithmetic,
//! a less-than compare producing a mask, an "any lane still live"
//! test, and a masked counter increment — and nothing else.  The
//! implementation is plain lanewise arithmetic over fixed arrays,
//! which the compiler unrolls and vectorizes; a platform-intrinsic
//! backend can replace the method bodies without touching any caller.

use std::ops::{Add, Mul, Sub};

/// Number of lanes processed per batch.
pub const LANES: usize = 8;

/// Eight `f32` lanes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct F32x8([f32; LANES]);

/// Eight `u32` lanes, used for per-lane iteration counters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct U32x8([u32; LANES]);

/// A per-lane predicate, one bit per lane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Mask8(u8);

impl F32x8 {
    /// A batch from eight explicit lane values.
    pub fn new(lanes: [f32; LANES]) -> F32x8 {
        F32x8(lanes)
    }

    /// The same value in every lane.
    pub fn splat(value: f32) -> F32x8 {
        F32x8([value; LANES])
    }

    /// Lanewise `self < other`.
    pub fn lt(self, other: F32x8) -> Mask8 {
        let mut bits = 0_u8;
        for lane in 0..LANES {
            if self.0[lane] < other.0[lane] {
                bits |= 1 << lane;
            }
        }
        Mask8(bits)
    }

    /// The lane values as a plain array.
    pub fn to_array(self) -> [f32; LANES] {
        self.0
    }
}

impl Add for F32x8 {
    type Output = F32x8;

    fn add(self, rhs: F32x8) -> F32x8 {
        let mut out = self.0;
        for lane in 0..LANES {
            out[lane] += rhs.0[lane];
        }
        F32x8(out)
    }
}

impl Sub for F32x8 {
    type Output = F32x8;

    fn sub(self, rhs: F32x8) -> F32x8 {
        let mut out = self.0;
        for lane in 0..LANES {
            out[lane] -= rhs.0[lane];
        }
        F32x8(out)
    }
}

impl Mul for F32x8 {
    type Output = F32x8;

    fn mul(self, rhs: F32x8) -> F32x8 {
        let mut out = self.0;
        for lane in 0..LANES {
            out[lane] *= rhs.0[lane];
        }
        F32x8(out)
    }
}

impl U32x8 {
    /// The same value in every lane.
    pub fn splat(value: u32) -> U32x8 {
        U32x8([value; LANES])
    }

    /// Add one to every lane whose mask bit is set; the blend that
    /// freezes a lane's counter once its point has escaped.
    pub fn increment_where(&mut self, mask: Mask8) {
        for lane in 0..LANES {
            if mask.test(lane) {
                self.0[lane] += 1;
            }
        }
    }

    /// The lane values as a plain array.
    pub fn to_array(self) -> [u32; LANES] {
        self.0
    }
}

impl Mask8 {
    /// True if any lane's bit is set.
    pub fn any(self) -> bool {
        self.0 != 0
    }

    /// True if the given lane's bit is set.
    pub fn test(self, lane: usize) -> bool {
        self.0 & (1 << lane) != 0
    }
}
