//! Capture session bookkeeping: one session at a time through
//! Idle → Armed → Running → Complete, and the debounced one-shot trigger
//! latch feeding it. The interrupt side only ever sets the raw request; all
//! policy (debounce, drop-while-busy) runs in the main loop.

/// Minimum spacing between honored capture triggers. Mechanical button
/// bounce shows up as edge bursts well inside this window.
pub const DEBOUNCE_MS: u32 = 250;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Armed,
    Running,
    Complete,
}

/// The single capture session. The decoder and transfer engine are
/// singletons, so at most one session may be armed or running at a time.
pub struct CaptureSession {
    state: CaptureState,
}

impl CaptureSession {
    pub const fn new() -> Self {
        CaptureSession {
            state: CaptureState::Idle,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// A session is active from arming until its buffer is handed back.
    pub fn is_active(&self) -> bool {
        matches!(self.state, CaptureState::Armed | CaptureState::Running)
    }

    /// Idle → Armed. Refused (false) unless idle: the shared hardware is
    /// still bound to the previous session.
    pub fn try_arm(&mut self) -> bool {
        if self.state != CaptureState::Idle {
            return false;
        }
        self.state = CaptureState::Armed;
        true
    }

    /// Armed → Running, once the decoder is enabled.
    pub fn run(&mut self) {
        debug_assert_eq!(self.state, CaptureState::Armed);
        self.state = CaptureState::Running;
    }

    /// Running → Complete, on the transfer engine's completion condition.
    pub fn complete(&mut self) {
        debug_assert_eq!(self.state, CaptureState::Running);
        self.state = CaptureState::Complete;
    }

    /// Back to Idle: buffer handed off, or the session tore down early on a
    /// capture error.
    pub fn release(&mut self) {
        self.state = CaptureState::Idle;
    }
}

impl Default for CaptureSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Debounced one-shot capture request. `offer` runs at trigger time (edge
/// events), `take` consumes at most one request per main-loop iteration,
/// `clear` drops requests that arrived while a capture was in flight;
/// deferred captures are never honored.
pub struct TriggerLatch {
    pending: bool,
    last_accept_ms: Option<u32>,
}

impl TriggerLatch {
    pub const fn new() -> Self {
        TriggerLatch {
            pending: false,
            last_accept_ms: None,
        }
    }

    /// Record a trigger edge at `now_ms`. Returns whether it was accepted;
    /// edges inside the debounce window of the last accepted one are noise.
    pub fn offer(&mut self, now_ms: u32) -> bool {
        if let Some(last) = self.last_accept_ms {
            if now_ms.wrapping_sub(last) < DEBOUNCE_MS {
                return false;
            }
        }
        self.last_accept_ms = Some(now_ms);
        self.pending = true;
        true
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        core::mem::replace(&mut self.pending, false)
    }

    /// Drop any request that arrived since the last `take`.
    pub fn clear(&mut self) {
        self.pending = false;
    }
}

impl Default for TriggerLatch {
    fn default() -> Self {
        Self::new()
    }
}
