// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The caller-owned pixel buffer and its geometry.
//!
//! The renderer writes RGB24 pixels into memory it does not own: the
//! caller allocates `height` rows of at least `width * 3` bytes each,
//! `stride` bytes apart (the stride may exceed the row width for
//! alignment, and any padding is left untouched).  [`Frame`] checks
//! that contract once, up front, so the render passes can assume it
//! and never fail mid-write.

use std::collections::VecDeque;

use errors::RenderError;

/// Bytes per RGB24 pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// A validated view of a caller-owned RGB24 buffer.
pub struct Frame<'a> {
    buf: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

/// A top-half pixel row paired with the bottom-half row that mirrors
/// it, both trimmed to the pixel width.  The pair for an odd image's
/// middle row has no partner.
pub type RowPair<'a> = (&'a mut [u8], Option<&'a mut [u8]>);

impl<'a> Frame<'a> {
    /// Wraps `buf` as a `width` x `height` image with rows `stride`
    /// bytes apart, rejecting any geometry the buffer cannot honor.
    pub fn new(
        buf: &'a mut [u8],
        width: usize,
        height: usize,
        stride: usize,
    ) -> Result<Frame<'a>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyImage { width, height });
        }
        if stride < width * BYTES_PER_PIXEL {
            return Err(RenderError::StrideTooSmall { width, stride });
        }
        let needed = stride * height;
        if buf.len() < needed {
            return Err(RenderError::BufferTooSmall {
                len: buf.len(),
                needed,
            });
        }
        Ok(Frame {
            buf,
            width,
            height,
            stride,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row stride in bytes.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Splits the buffer into disjoint (top row, mirror row) pairs,
    /// ordered by top row index: entry `y` holds row `y` and row
    /// `height - 1 - y`.  The coloring pass writes each pair without
    /// any locking because no two pairs share a byte.
    pub fn mirror_rows(&mut self) -> Vec<RowPair> {
        let row_bytes = self.width * BYTES_PER_PIXEL;
        let mut rows: VecDeque<&mut [u8]> = self.buf[..self.stride * self.height]
            .chunks_mut(self.stride)
            .map(|row| &mut row[..row_bytes])
            .collect();

        let mut pairs = Vec::with_capacity((self.height + 1) / 2);
        while let Some(top) = rows.pop_front() {
            pairs.push((top, rows.pop_back()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_geometry() {
        let mut buf = vec![0_u8; 16];
        assert_eq!(
            Frame::new(&mut buf, 0, 4, 12).err().unwrap(),
            RenderError::EmptyImage { width: 0, height: 4 }
        );
    }

    #[test]
    fn rejects_a_stride_shorter_than_a_row() {
        let mut buf = vec![0_u8; 64];
        assert_eq!(
            Frame::new(&mut buf, 4, 4, 11).err().unwrap(),
            RenderError::StrideTooSmall { width: 4, stride: 11 }
        );
    }

    #[test]
    fn rejects_a_buffer_shorter_than_the_geometry() {
        let mut buf = vec![0_u8; 47];
        assert_eq!(
            Frame::new(&mut buf, 4, 4, 12).err().unwrap(),
            RenderError::BufferTooSmall { len: 47, needed: 48 }
        );
    }

    #[test]
    fn pairs_rows_with_their_mirrors() {
        let mut buf = vec![0_u8; 4 * 6];
        let mut frame = Frame::new(&mut buf, 2, 4, 6).unwrap();
        {
            let pairs = frame.mirror_rows();
            assert_eq!(pairs.len(), 2);
            for (top, bottom) in pairs {
                assert_eq!(top.len(), 6);
                assert_eq!(bottom.unwrap().len(), 6);
            }
        }
    }

    #[test]
    fn an_odd_middle_row_has_no_partner() {
        let mut buf = vec![0_u8; 5 * 9];
        let mut frame = Frame::new(&mut buf, 3, 5, 9).unwrap();
        let pairs = frame.mirror_rows();
        assert_eq!(pairs.len(), 3);
        assert!(pairs[0].1.is_some());
        assert!(pairs[1].1.is_some());
        assert!(pairs[2].1.is_none());
    }

    #[test]
    fn pairs_trim_stride_padding() {
        let mut buf = vec![0_u8; 8 * 4];
        let mut frame = Frame::new(&mut buf, 2, 4, 8).unwrap();
        for (top, bottom) in frame.mirror_rows() {
            assert_eq!(top.len(), 6);
            assert_eq!(bottom.unwrap().len(), 6);
        }
    }

    #[test]
    fn pair_order_follows_the_top_half() {
        let mut buf: Vec<u8> = (0..4 * 3).map(|byte| byte as u8).collect();
        let mut frame = Frame::new(&mut buf, 1, 4, 3).unwrap();
        let pairs = frame.mirror_rows();
        // Row y starts at byte y * stride.
        assert_eq!(pairs[0].0[0], 0);
        assert_eq!(pairs[0].1.as_ref().unwrap()[0], 9);
        assert_eq!(pairs[1].0[0], 3);
        assert_eq!(pairs[1].1.as_ref().unwrap()[0], 6);
    }
}
