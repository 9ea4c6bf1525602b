//! The capture contract every frame source honors, whether backed by the
//! hardware decode-and-transfer pipeline or the polled fallback.

use crate::frame::FrameBuffer;

/// Capture failures visible to callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureError {
    /// The sensor never produced a frame's worth of data inside the bounded
    /// wait: not clocking, not wired, or not configured. The buffer contents
    /// are unspecified and must not be transmitted.
    SensorTimeout,
}

/// A source of complete frames. `grab_frame` blocks until `frame` holds one
/// full capture or the bounded wait expires; the buffer is exclusively owned
/// by the capture path for the duration of the call.
pub trait FrameGrabber {
    fn grab_frame(&mut self, frame: &mut FrameBuffer) -> Result<(), CaptureError>;
}
