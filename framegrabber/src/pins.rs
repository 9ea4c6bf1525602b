//! GPIO pin binding for the board. Fixed at build time; every logical signal
//! role maps to exactly one pin here and nowhere else.
//!
//! Wiring for the Pico + OV7670 module:
//!
//!     I2C0 SDA:  GP0  <--> OV7670 SIOD
//!     I2C0 SCL:  GP1   --> OV7670 SIOC
//!     PCLK:      GP2  <--  OV7670 PCLK   (pixel clock, PIO-observed)
//!     HREF:      GP3  <--  OV7670 HREF   (row sync, PIO-observed)
//!     VSYNC:     GP4  <--  OV7670 VSYNC  (frame sync, PIO-observed)
//!     XCLK:      GP5   --> OV7670 XCLK   (PWM slice 2B, 25 MHz)
//!     D0..D7:    GP6..GP13 <-- OV7670 D0..D7 (PIO input base, consecutive)
//!     PWDN:      GP14  --> OV7670 PWDN   (high = powered down)
//!     RESET:     GP15  --> OV7670 RESET  (active low)
//!     UART0 TX:  GP16  --> host serial link
//!     UART0 RX:  GP17 <--  host serial link
//!     BUTTON:    GP22 <--  capture trigger, to ground (pull-up, falling edge)
//!     LED:       GP25  --> capture activity

use rp_pico::hal::gpio::bank0::{
    Gpio0, Gpio1, Gpio14, Gpio15, Gpio16, Gpio17, Gpio22, Gpio25, Gpio5,
};
use rp_pico::hal::gpio::{
    FunctionI2C, FunctionNull, FunctionPio0, FunctionSio, FunctionUart, Pin, PullDown, PullNone,
    PullUp, SioInput, SioOutput,
};
use rp_pico::hal::pac;
use rp_pico::hal::uart::{Enabled, UartPeripheral};
use rp_pico::hal::I2C;

/// GPIO numbers the protocol decoder watches. The PIO program hardcodes the
/// same numbers; `ov7670::dvp` asserts they agree at compile time.
pub const PCLK_GPIO: u8 = 2;
pub const HREF_GPIO: u8 = 3;
pub const VSYNC_GPIO: u8 = 4;
pub const DATA_GPIO_BASE: u8 = 6;

/// Whether the eight data lines are wired to GP6..GP13 in reversed bit order.
/// At least one known harness routes D7..D0 onto the ascending GPIOs; set
/// this and every captured byte is bit-reversed before transmission.
pub const DATA_BUS_REVERSED: bool = false;

pub type SdaPin = Pin<Gpio0, FunctionI2C, PullUp>;
pub type SclPin = Pin<Gpio1, FunctionI2C, PullUp>;
pub type XclkPin = Pin<Gpio5, FunctionNull, PullDown>;
pub type PowerDownPin = Pin<Gpio14, FunctionSio<SioOutput>, PullDown>;
pub type ResetPin = Pin<Gpio15, FunctionSio<SioOutput>, PullDown>;
pub type UartTxPin = Pin<Gpio16, FunctionUart, PullNone>;
pub type UartRxPin = Pin<Gpio17, FunctionUart, PullNone>;
pub type ButtonPin = Pin<Gpio22, FunctionSio<SioInput>, PullUp>;
pub type LedPin = Pin<Gpio25, FunctionSio<SioOutput>, PullDown>;

/// The SCCB control bus.
pub type SccbI2c = I2C<pac::I2C0, (SdaPin, SclPin)>;

/// The host frame link.
pub type FrameUart = UartPeripheral<Enabled, pac::UART0, (UartTxPin, UartRxPin)>;

/// Every pin the firmware holds on to after configuration.
pub struct Binding {
    pub sda: SdaPin,
    pub scl: SclPin,
    pub xclk: XclkPin,
    pub pwdn: PowerDownPin,
    pub reset: ResetPin,
    pub uart_tx: UartTxPin,
    pub uart_rx: UartRxPin,
    pub button: ButtonPin,
    pub led: LedPin,
}

/// Configure the whole bank: decoder inputs are parked on PIO0, everything
/// else comes back typed for its peripheral.
pub fn bind(pins: rp_pico::Pins) -> Binding {
    // Signals the decoder observes; PIO owns them from here on.
    let _ = pins.gpio2.into_function::<FunctionPio0>();
    let _ = pins.gpio3.into_function::<FunctionPio0>();
    let _ = pins.gpio4.into_function::<FunctionPio0>();
    let _ = pins.gpio6.into_function::<FunctionPio0>();
    let _ = pins.gpio7.into_function::<FunctionPio0>();
    let _ = pins.gpio8.into_function::<FunctionPio0>();
    let _ = pins.gpio9.into_function::<FunctionPio0>();
    let _ = pins.gpio10.into_function::<FunctionPio0>();
    let _ = pins.gpio11.into_function::<FunctionPio0>();
    let _ = pins.gpio12.into_function::<FunctionPio0>();
    let _ = pins.gpio13.into_function::<FunctionPio0>();

    Binding {
        sda: pins.gpio0.reconfigure(),
        scl: pins.gpio1.reconfigure(),
        xclk: pins.gpio5,
        pwdn: pins.gpio14.into_push_pull_output(),
        reset: pins.gpio15.into_push_pull_output(),
        uart_tx: pins.gpio16.reconfigure(),
        uart_rx: pins.gpio17.reconfigure(),
        button: pins.gpio22.reconfigure(),
        led: pins.gpio25.into_push_pull_output(),
    }
}
