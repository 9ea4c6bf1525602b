//! Frame transmission: raw buffer bytes over the host UART, no header, in
//! row-major order, exactly what the receive script expects. When the data
//! bus is wired in reversed bit order, every byte is straightened out on the
//! way to the wire.

use framegrabber_core::bits;
use framegrabber_core::frame::FrameBuffer;

use crate::pins::{FrameUart, DATA_BUS_REVERSED};

/// Ship one frame to the host, blocking until the last byte is queued.
pub fn send_frame(uart: &mut FrameUart, frame: &FrameBuffer) {
    if DATA_BUS_REVERSED {
        let mut chunk = [0u8; 64];
        for part in frame.as_bytes().chunks(chunk.len()) {
            let chunk = &mut chunk[..part.len()];
            for (out, raw) in chunk.iter_mut().zip(part) {
                *out = bits::reverse(*raw);
            }
            uart.write_full_blocking(chunk);
        }
    } else {
        uart.write_full_blocking(frame.as_bytes());
    }
}
