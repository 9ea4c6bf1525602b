//! Bit-banged capture fallback. Platforms without a programmable-I/O decode
//! pipeline poll the sync signals and data bus directly; the result honors
//! the same `FrameGrabber` contract, so callers never know which path runs.
//!
//! This path burns the CPU for the whole frame and tolerates no jitter at
//! QVGA pixel rates; it exists for bring-up on constrained targets and as
//! the executable reference for the decode semantics.

use crate::frame::FrameBuffer;
use crate::grab::{CaptureError, FrameGrabber};

/// Level view of the sensor's parallel interface.
pub trait PixelBus {
    fn vsync(&mut self) -> bool;
    fn href(&mut self) -> bool;
    fn pclk(&mut self) -> bool;
    fn data(&mut self) -> u8;
}

/// Spin until `cond` holds, spending from the shared poll budget.
fn wait_for<B, F>(bus: &mut B, cond: F, budget: &mut u32) -> Result<(), CaptureError>
where
    B: PixelBus,
    F: Fn(&mut B) -> bool,
{
    while !cond(bus) {
        *budget = budget.checked_sub(1).ok_or(CaptureError::SensorTimeout)?;
    }
    Ok(())
}

/// Capture `dest.len()` bytes, aligned to the next frame: wait out any frame
/// in progress, then sample one byte per rising pixel-clock edge while
/// row-sync is asserted, rows until the buffer is full.
pub fn capture_into<B: PixelBus>(
    bus: &mut B,
    dest: &mut [u8],
    poll_budget: u32,
) -> Result<(), CaptureError> {
    let mut budget = poll_budget;

    wait_for(bus, |b| !b.vsync(), &mut budget)?;
    wait_for(bus, |b| b.vsync(), &mut budget)?;

    let mut filled = 0;
    while filled < dest.len() {
        wait_for(bus, |b| b.href(), &mut budget)?;
        while filled < dest.len() && bus.href() {
            wait_for(bus, |b| b.pclk(), &mut budget)?;
            dest[filled] = bus.data();
            filled += 1;
            wait_for(bus, |b| !b.pclk(), &mut budget)?;
        }
    }
    Ok(())
}

/// The fallback grabber: a pixel bus plus a poll budget sized for one frame
/// at the slowest expected pixel clock.
pub struct PolledGrabber<B> {
    bus: B,
    poll_budget: u32,
}

impl<B: PixelBus> PolledGrabber<B> {
    pub fn new(bus: B, poll_budget: u32) -> Self {
        PolledGrabber { bus, poll_budget }
    }
}

impl<B: PixelBus> FrameGrabber for PolledGrabber<B> {
    fn grab_frame(&mut self, frame: &mut FrameBuffer) -> Result<(), CaptureError> {
        capture_into(&mut self.bus, frame.as_mut_bytes(), self.poll_budget)
    }
}
