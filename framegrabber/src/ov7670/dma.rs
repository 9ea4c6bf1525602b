//! Bulk transfer engine: one DMA channel drains the decoder's RX FIFO into
//! the frame buffer at word granularity, paced by the PIO DREQ, with no CPU
//! work per word. The HAL's transfer API has no abort path for a source that
//! never produces data, so the channel registers are driven directly.

use framegrabber_core::grab::CaptureError;
use rp_pico::hal::pac;
use rp_pico::hal::Timer;

// Channel 0 is reserved for the frame transfer.
const DMA_CH: usize = 0;

// PIO0 RX FIFO 0 data register: the decoder's output queue.
const PIO0_RXF0_ADDR: u32 = 0x5020_0000 + 0x20;

// DREQ asserted by PIO0 while RX FIFO 0 holds a word.
const DREQ_PIO0_RX0: u8 = 4;

/// The DMA-backed transfer engine. Owns the DMA block outright.
pub struct TransferEngine {
    dma: pac::DMA,
}

impl TransferEngine {
    pub fn new(dma: pac::DMA, resets: &mut pac::RESETS) -> Self {
        resets.reset.modify(|_, w| w.dma().clear_bit());
        while resets.reset_done.read().dma().bit_is_clear() {}
        TransferEngine { dma }
    }

    /// Bind the channel to `dest` for exactly `word_count` 32-bit transfers:
    /// fixed read address (the decode queue), incrementing write address.
    /// Nothing moves until `start`.
    pub fn arm(&mut self, dest: *mut u8, word_count: u32) {
        let ch = &self.dma.ch[DMA_CH];
        ch.ch_read_addr.write(|w| unsafe { w.bits(PIO0_RXF0_ADDR) });
        ch.ch_write_addr.write(|w| unsafe { w.bits(dest as u32) });
        ch.ch_trans_count.write(|w| unsafe { w.bits(word_count) });
        ch.ch_ctrl_trig.write(|w| {
            unsafe {
                w
                    // 32-bit transfers
                    .data_size()
                    .size_word()
                    // source is a FIFO register
                    .incr_read()
                    .clear_bit()
                    // destination walks the frame buffer
                    .incr_write()
                    .set_bit()
                    // paced by the decoder's RX FIFO level
                    .treq_sel()
                    .bits(DREQ_PIO0_RX0)
                    // chain to self: chaining disabled
                    .chain_to()
                    .bits(DMA_CH as u8)
                    // armed, not yet triggered
                    .en()
                    .clear_bit()
            }
        });
    }

    /// Start the armed transfer.
    pub fn start(&mut self) {
        self.dma.ch[DMA_CH]
            .ch_ctrl_trig
            .modify(|_, w| w.en().set_bit());
    }

    fn busy(&self) -> bool {
        self.dma.ch[DMA_CH].ch_ctrl_trig.read().busy().bit_is_set()
    }

    /// Block until the channel has moved its full word count. The sensor
    /// offers no fault reporting, so the only failure signal available is
    /// the deadline: on expiry the channel is aborted and the capture fails
    /// with `SensorTimeout`.
    pub fn wait_complete(&mut self, timer: &Timer, timeout_us: u32) -> Result<(), CaptureError> {
        let start = timer.get_counter_low();
        while self.busy() {
            if timer.get_counter_low().wrapping_sub(start) > timeout_us {
                self.abort();
                return Err(CaptureError::SensorTimeout);
            }
        }
        Ok(())
    }

    /// Abort an in-flight transfer and wait for the channel to quiesce.
    fn abort(&mut self) {
        self.dma
            .chan_abort
            .write(|w| unsafe { w.bits(1 << DMA_CH) });
        while self.dma.chan_abort.read().bits() != 0 {}
    }
}
