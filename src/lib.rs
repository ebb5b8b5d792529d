#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Histogram-colored Mandelbrot renderer
//!
//! The Mandelbrot set takes a point on the complex plane and repeatedly
//! multiplies it by itself, measuring how quickly that number goes to
//! infinity.  The classic way to picture it is to color each pixel by
//! that "velocity" directly, which produces the familiar hard bands of
//! color.  This renderer instead builds a histogram of how many pixels
//! escaped at each iteration count and colors each pixel by its
//! *cumulative rank* in that distribution, which spreads the palette
//! evenly over the image and keeps the gradient smooth no matter what
//! the iteration cap is.
//!
//! The interesting work happens in three layers: an escape-time
//! iterator that exists in both a scalar form and an eight-lane
//! lock-step form (see [`escape`]), a shared atomic histogram that all
//! worker threads feed during the evaluation pass (see [`histogram`]),
//! and a two-pass scheduler that walks only the top half of the image
//! and mirrors the bottom half from it, since the view window is
//! symmetric about the real axis (see [`render`]).
//!
//! The renderer writes into a caller-owned RGB24 buffer and never
//! allocates pixel storage of its own; see [`Frame`] for the contract.

#[macro_use]
extern crate failure;

extern crate crossbeam;
extern crate itertools;
extern crate num;

pub mod batch;
pub mod color;
pub mod errors;
pub mod escape;
pub mod frame;
pub mod histogram;
pub mod plane;
pub mod render;

pub use errors::RenderError;
pub use frame::Frame;
pub use render::{render_rgb, Renderer, DEFAULT_ITERATIONS};
