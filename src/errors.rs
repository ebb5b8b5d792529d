//! Errors reported when a caller hands us a buffer or a parameter the
//! renderer cannot honor.  Every variant is a contract violation that
//! is detected up front, before a single pixel is written; rendering
//! itself cannot fail.

/// The ways a render request can be malformed.  There is no retry
/// story here: the renderer is deterministic, so a rejected request
/// will be rejected every time until the caller fixes it.
#[derive(Debug, Fail, PartialEq, Eq)]
pub enum RenderError {
    /// The image has a zero-sized dimension, so there is nothing to
    /// render into.
    #[fail(display = "image dimensions must be nonzero, got {}x{}", width, height)]
    EmptyImage {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// The declared stride cannot hold a full row of RGB24 pixels.
    #[fail(
        display = "stride of {} bytes cannot hold a row of {} RGB pixels",
        stride, width
    )]
    StrideTooSmall {
        /// Requested width in pixels.
        width: usize,
        /// Declared row stride in bytes.
        stride: usize,
    },

    /// The buffer is shorter than the declared geometry requires.
    #[fail(
        display = "buffer of {} bytes is smaller than the {} bytes the geometry needs",
        len, needed
    )]
    BufferTooSmall {
        /// Actual buffer length in bytes.
        len: usize,
        /// Minimum length implied by height and stride.
        needed: usize,
    },

    /// An iteration cap of zero cannot classify any point.
    #[fail(display = "iteration cap must be at least 1")]
    ZeroIterations,
}
