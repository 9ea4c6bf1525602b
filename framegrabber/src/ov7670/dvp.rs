//! Protocol decoder for the OV7670 parallel bus, running on a PIO state
//! machine so the CPU never touches a pixel.
//!
//! Per enabled run the program pulls the per-row transfer count from the TX
//! FIFO, aligns to the next VSYNC rising edge, then free-runs rows: for each
//! HREF assertion it latches one byte per PCLK rising edge. Bytes shift
//! right into the ISR and autopush at 32 bits, so each RX FIFO word carries
//! four bus bytes in arrival order, one word per pair of 16-bit pixels.
//! The decoder never detects the end of a frame; the transfer engine bounds
//! the capture by the total word count it drains.

use pio::{Instruction, InstructionOperands, JmpCondition, MovDestination, MovOperation, MovSource};
use rp_pico::hal::pac;
use rp_pico::hal::pio::{
    PIOBuilder, PIOExt, PinDir, Rx, Running, ShiftDirection, StateMachine, Stopped, Tx, PIO, SM0,
};

use crate::pins;

// The PIO program hardcodes the sync-signal GPIO numbers; keep them in step
// with the pin binding.
const _: () = assert!(
    pins::PCLK_GPIO == 2 && pins::HREF_GPIO == 3 && pins::VSYNC_GPIO == 4,
    "decoder program disagrees with the pin binding"
);

type DvpSm = (pac::PIO0, SM0);

enum SmHandle {
    Stopped(StateMachine<DvpSm, Stopped>),
    Running(StateMachine<DvpSm, Running>),
}

/// The decode state machine, disabled at reset.
pub struct Decoder {
    sm: Option<SmHandle>,
    tx: Tx<DvpSm>,
    rx: Rx<DvpSm>,
    origin: u8,
    _pio: PIO<pac::PIO0>,
}

impl Decoder {
    pub fn new(pio0: pac::PIO0, resets: &mut pac::RESETS) -> Self {
        let (mut pio, sm0, _, _, _) = pio0.split(resets);

        let program = pio_proc::pio_asm!(
            ".define PCLK 2",
            ".define HREF 3",
            ".define VSYNC 4",
            // per-run preamble: byte transfers per row minus one, then frame
            // alignment
            "    pull block",
            "    mov y, osr",
            "    wait 0 gpio VSYNC",
            "    wait 1 gpio VSYNC",
            ".wrap_target",
            "    mov x, y",
            "    wait 0 gpio HREF",
            "    wait 1 gpio HREF",
            "byteloop:",
            "    wait 1 gpio PCLK",
            "    in pins, 8",
            "    wait 0 gpio PCLK",
            "    jmp x-- byteloop",
            ".wrap",
        );

        let installed = pio.install(&program.program).unwrap();
        let origin = installed.offset();

        let (mut sm, rx, tx) = PIOBuilder::from_program(installed)
            .in_pin_base(pins::DATA_GPIO_BASE)
            .in_shift_direction(ShiftDirection::Right)
            .autopush(true)
            .push_threshold(32)
            .clock_divisor_fixed_point(1, 0)
            .build(sm0);

        sm.set_pindirs(
            (pins::DATA_GPIO_BASE..pins::DATA_GPIO_BASE + 8)
                .map(|pin| (pin, PinDir::Input))
                .chain([
                    (pins::PCLK_GPIO, PinDir::Input),
                    (pins::HREF_GPIO, PinDir::Input),
                    (pins::VSYNC_GPIO, PinDir::Input),
                ]),
        );

        Decoder {
            sm: Some(SmHandle::Stopped(sm)),
            tx,
            rx,
            origin,
            _pio: pio,
        }
    }

    /// Enable the decoder for one run, telling it how many byte transfers
    /// make up a row (zero-based: 639 for QVGA).
    ///
    /// The program counter rewinds to the preamble, so the run starts on a
    /// frame boundary. A decoder re-enabled without that rewind would emit a
    /// garbage partial row first; callers are bounded by total word count
    /// either way.
    pub fn enable(&mut self, row_transfer_count: u32) {
        match self.sm.take() {
            Some(SmHandle::Stopped(mut sm)) => {
                // clear the input shift counter, then rewind
                sm.exec_instruction(Instruction {
                    operands: InstructionOperands::MOV {
                        destination: MovDestination::ISR,
                        op: MovOperation::None,
                        source: MovSource::NULL,
                    },
                    delay: 0,
                    side_set: None,
                });
                sm.exec_instruction(Instruction {
                    operands: InstructionOperands::JMP {
                        condition: JmpCondition::Always,
                        address: self.origin,
                    },
                    delay: 0,
                    side_set: None,
                });
                self.tx.write(row_transfer_count);
                self.sm = Some(SmHandle::Running(sm.start()));
            }
            other => self.sm = other,
        }
    }

    /// Disable the decoder and flush whatever it produced after the transfer
    /// engine stopped draining. Idempotent; always follows a completed (or
    /// failed) transfer so a later capture cannot inherit stale data.
    pub fn disable(&mut self) {
        match self.sm.take() {
            Some(SmHandle::Running(sm)) => self.sm = Some(SmHandle::Stopped(sm.stop())),
            other => self.sm = other,
        }
        while self.rx.read().is_some() {}
    }
}
