//! Frame geometry and the capture buffer.

use core::ops::{Deref, DerefMut};

/// Number of horizontal pixels for QVGA resolution.
pub const FRAME_WIDTH: usize = 320;

/// Number of vertical pixels for QVGA resolution.
pub const FRAME_HEIGHT: usize = 240;

/// Bytes per pixel in both RGB565 and YUV422 output.
pub const BYTES_PER_PIXEL: usize = 2;

/// Number of total bytes in one frame.
pub const FRAME_SIZE: usize = FRAME_WIDTH * FRAME_HEIGHT * BYTES_PER_PIXEL;

/// Number of 32-bit words the transfer engine drains per frame.
pub const FRAME_WORDS: usize = FRAME_SIZE / 4;

/// Byte transfers per row on the parallel bus.
pub const ROW_TRANSFERS: usize = FRAME_WIDTH * BYTES_PER_PIXEL;

/// Per-row transfer count handed to the protocol decoder: the decoder's loop
/// counter is zero-based, so one less than the transfers per row (639 for
/// QVGA).
pub const ROW_TRANSFER_COUNT: u32 = (ROW_TRANSFERS - 1) as u32;

/// One frame of raw sensor output, row-major, two bytes per pixel.
/// Word-aligned so the transfer engine can write it at 32-bit granularity.
#[repr(C, align(4))]
pub struct FrameBuffer([u8; FRAME_SIZE]);

impl FrameBuffer {
    pub const fn new() -> Self {
        FrameBuffer([0; FRAME_SIZE])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Base address for a word-granularity hardware writer.
    pub fn base_addr(&mut self) -> *mut u8 {
        self.0.as_mut_ptr()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for FrameBuffer {
    type Target = [u8; FRAME_SIZE];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for FrameBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qvga_geometry() {
        assert_eq!(FRAME_SIZE, 153_600);
        assert_eq!(FRAME_WORDS, 38_400);
        assert_eq!(ROW_TRANSFER_COUNT, 639);
    }

    #[test]
    fn buffer_is_word_aligned() {
        let buf = FrameBuffer::new();
        assert_eq!(buf.as_bytes().as_ptr() as usize % 4, 0);
    }
}
