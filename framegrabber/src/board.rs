//! Board bring-up for the off-sensor peripherals: the sensor master clock,
//! the host UART and the capture button.

use embedded_hal::PwmPin;
use rp_pico::hal::clocks::ClocksManager;
use rp_pico::hal::fugit::RateExtU32;
use rp_pico::hal::gpio::Interrupt;
use rp_pico::hal::pac;
use rp_pico::hal::pwm::{FreeRunning, Pwm2, Slice, Slices};
use rp_pico::hal::uart::{DataBits, StopBits, UartConfig, UartPeripheral};
use rp_pico::hal::Clock;

use crate::pins::{ButtonPin, FrameUart, UartRxPin, UartTxPin, XclkPin};

/// XCLK = 125 MHz / (XCLK_TOP + 1) = 25 MHz. The OV7670 accepts 10-48 MHz.
const XCLK_TOP: u16 = 4;

/// High for 2 of 5 counts; the sensor tolerates well off-center duty.
const XCLK_DUTY: u16 = 2;

/// Host link baud rate, matching the receive script.
pub const BAUD_RATE: u32 = 115_200;

/// Start the sensor's master clock. Nothing on the control bus answers until
/// this is running, so it comes first in the bring-up order.
pub fn start_xclk(
    pwm: pac::PWM,
    resets: &mut pac::RESETS,
    pin: XclkPin,
) -> Slice<Pwm2, FreeRunning> {
    let slices = Slices::new(pwm, resets);
    let mut slice = slices.pwm2;
    slice.set_div_int(1);
    slice.set_div_frac(0);
    slice.set_top(XCLK_TOP);
    slice.channel_b.output_to(pin);
    slice.channel_b.set_duty(XCLK_DUTY);
    slice.enable();
    slice
}

/// Bring up the host frame link: 115 200 8N1 on UART0.
pub fn setup_uart(
    uart0: pac::UART0,
    tx: UartTxPin,
    rx: UartRxPin,
    resets: &mut pac::RESETS,
    clocks: &ClocksManager,
) -> FrameUart {
    UartPeripheral::new(uart0, (tx, rx), resets)
        .enable(
            UartConfig::new(BAUD_RATE.Hz(), DataBits::Eight, None, StopBits::One),
            clocks.peripheral_clock.freq(),
        )
        .unwrap()
}

/// Arm the capture button: falling edge (pressed to ground) raises
/// IO_IRQ_BANK0. The handler only sets a flag.
pub fn setup_button(button: ButtonPin) -> ButtonPin {
    button.set_interrupt_enabled(Interrupt::EdgeLow, true);
    button
}
