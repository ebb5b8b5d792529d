// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The two-pass row scheduler.
//!
//! Pass one walks the top half of the image (the bottom half is a
//! mirror), batch-evaluating eight columns at a time, storing each
//! pixel's escape count and tallying it in the shared histogram.
//! Pass two freezes the histogram into a palette and writes every
//! stored count's color to its row and to the mirror row.  The two
//! passes cannot overlap: the palette depends on the whole histogram,
//! so joining the pass-one workers is a real barrier, not an
//! optimization.
//!
//! Work is dealt out as contiguous row ranges from a mutex-guarded
//! job list that worker threads drain until empty — rows cost wildly
//! different amounts (interior rows hit the iteration cap on every
//! pixel), so a fixed per-thread split would leave most of the pool
//! idle behind the slowest stripe.  The ranges group several rows per
//! lock to keep the queue out of the profile.

extern crate crossbeam;

use std::sync::{Arc, Mutex};

use itertools::iproduct;

use batch::LANES;
use color::Palette;
use errors::RenderError;
use escape::escape_time_x8;
use frame::{Frame, RowPair};
use histogram::Histogram;
use plane::Viewport;

/// Iteration cap used when the caller has no opinion.
pub const DEFAULT_ITERATIONS: usize = 100;

/// Rows per scheduling unit unless overridden.
const DEFAULT_ROWS_PER_TASK: usize = 8;

/// A configured renderer: the iteration cap plus the scheduling
/// grain.  Construction validates the parameters so the render calls
/// themselves cannot fail.
pub struct Renderer {
    n_iterations: usize,
    rows_per_task: usize,
}

impl Renderer {
    /// A renderer iterating each point at most `n_iterations` times.
    pub fn new(n_iterations: usize) -> Result<Renderer, RenderError> {
        if n_iterations == 0 {
            return Err(RenderError::ZeroIterations);
        }
        Ok(Renderer {
            n_iterations,
            rows_per_task: DEFAULT_ROWS_PER_TASK,
        })
    }

    /// Overrides how many contiguous rows each task claims.  Purely a
    /// throughput knob; any nonzero grain renders the same bytes.
    pub fn rows_per_task(mut self, rows: usize) -> Renderer {
        if rows > 0 {
            self.rows_per_task = rows;
        }
        self
    }

    /// Renders the frame across `threads` worker threads.  Zero asks
    /// for no workers at all, which we read as one.  The output is
    /// byte-identical regardless of the thread count.
    pub fn render(&self, frame: &mut Frame, threads: usize) {
        let threads = if threads == 0 { 1 } else { threads };
        let viewport = Viewport::new(frame.width(), frame.height());
        let width = frame.width();
        let top_rows = (frame.height() + 1) / 2;

        let histogram = Histogram::new(self.n_iterations);
        let mut counts = vec![0_u32; width * top_rows];

        {
            let jobs: Vec<(usize, &mut [u32])> = counts
                .chunks_mut(self.rows_per_task * width)
                .enumerate()
                .map(|(index, chunk)| (index * self.rows_per_task, chunk))
                .collect();
            let jobs = Arc::new(Mutex::new(jobs));
            let histogram = &histogram;
            let viewport = &viewport;
            let n_iterations = self.n_iterations;
            crossbeam::scope(|spawner| {
                for _ in 0..threads {
                    let jobs = jobs.clone();
                    spawner.spawn(move |_| loop {
                        let job = { jobs.lock().unwrap().pop() };
                        match job {
                            Some((y_start, chunk)) => {
                                evaluate_rows(viewport, n_iterations, y_start, chunk, histogram)
                            }
                            None => {
                                break;
                            }
                        }
                    });
                }
            })
            .unwrap();
        }

        // The scope join above is the barrier: every count is stored
        // and tallied before the distribution is read.
        let palette = Palette::from_histogram(&histogram.freeze());

        let jobs: Vec<(&[u32], RowPair)> = counts
            .chunks(width)
            .zip(frame.mirror_rows())
            .collect();
        let jobs = Arc::new(Mutex::new(jobs));
        let palette = &palette;
        let grain = self.rows_per_task;
        crossbeam::scope(|spawner| {
            for _ in 0..threads {
                let jobs = jobs.clone();
                spawner.spawn(move |_| loop {
                    let claimed = {
                        let mut jobs = jobs.lock().unwrap();
                        let keep = jobs.len().saturating_sub(grain);
                        jobs.split_off(keep)
                    };
                    if claimed.is_empty() {
                        break;
                    }
                    for (row_counts, (top, bottom)) in claimed {
                        color_row(palette, row_counts, top, bottom);
                    }
                });
            }
        })
        .unwrap();
    }

    /// The single-threaded reference path: the same two passes, the
    /// same helpers, driven by plain loops on the calling thread.
    /// Produces the same bytes as [`Renderer::render`].
    pub fn render_single(&self, frame: &mut Frame) {
        let viewport = Viewport::new(frame.width(), frame.height());
        let width = frame.width();
        let top_rows = (frame.height() + 1) / 2;

        let histogram = Histogram::new(self.n_iterations);
        let mut counts = vec![0_u32; width * top_rows];
        for (index, chunk) in counts.chunks_mut(self.rows_per_task * width).enumerate() {
            evaluate_rows(
                &viewport,
                self.n_iterations,
                index * self.rows_per_task,
                chunk,
                &histogram,
            );
        }

        let palette = Palette::from_histogram(&histogram.freeze());
        for (row_counts, (top, bottom)) in counts.chunks(width).zip(frame.mirror_rows()) {
            color_row(&palette, row_counts, top, bottom);
        }
    }
}

/// The single entry point most callers want: validate everything,
/// then overwrite every pixel of the buffer with the rendered set.
/// `buffer` must hold at least `stride * height` bytes with rows
/// `stride` bytes apart; nothing is written unless validation passes.
pub fn render_rgb(
    buffer: &mut [u8],
    width: usize,
    height: usize,
    stride: usize,
    n_iterations: usize,
    threads: usize,
) -> Result<(), RenderError> {
    let mut frame = Frame::new(buffer, width, height, stride)?;
    let renderer = Renderer::new(n_iterations)?;
    renderer.render(&mut frame, threads);
    Ok(())
}

/// Evaluates the row range starting at `y_start` whose counts live in
/// `chunk`, eight columns per step.  Lanes hanging past the right
/// edge in a row's final batch are computed and then dropped here,
/// before the counts array or the histogram sees them — the batch
/// evaluator itself never knows the image width.
fn evaluate_rows(
    viewport: &Viewport,
    n_iterations: usize,
    y_start: usize,
    chunk: &mut [u32],
    histogram: &Histogram,
) {
    let width = viewport.width();
    let rows = chunk.len() / width;
    for (row, x) in iproduct!(0..rows, (0..width).step_by(LANES)) {
        let y = y_start + row;
        let lane_counts = escape_time_x8(viewport.re_lanes(x), viewport.row_to_im(y), n_iterations);
        for (lane, &count) in lane_counts.iter().enumerate() {
            let column = x + lane;
            if column >= width {
                break;
            }
            chunk[row * width + column] = count;
            histogram.record(count);
        }
    }
}

/// Colors one row from its stored counts and copies it to the mirror
/// row, if it has one.
fn color_row(palette: &Palette, row_counts: &[u32], top: &mut [u8], bottom: Option<&mut [u8]>) {
    for (x, &count) in row_counts.iter().enumerate() {
        let color = palette.color(count as usize);
        let base = x * 3;
        top[base] = color.0;
        top[base + 1] = color.1;
        top[base + 2] = color.2;
    }
    if let Some(bottom) = bottom {
        bottom.copy_from_slice(top);
    }
}
