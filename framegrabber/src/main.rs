//! Firmware entry: bring the sensor up, then loop serving capture requests
//! from the button or the serial command byte.

#![no_main]
#![no_std]

use framegrabber::board;
use framegrabber::ov7670::Camera;
use framegrabber::pins::{self, ButtonPin};
use framegrabber::stream;

use core::cell::{Cell, RefCell};
use cortex_m::interrupt::{free, Mutex};
use cortex_m_rt::entry;
use embedded_hal::digital::v2::OutputPin;
use framegrabber_core::frame::FrameBuffer;
use framegrabber_core::grab::FrameGrabber;
use framegrabber_core::pattern;
use framegrabber_core::session::TriggerLatch;
use framegrabber_core::Profile;
use rp_pico::hal::{self, fugit::RateExtU32, gpio::Interrupt, pac, pac::interrupt, Clock};
use rtt_target::{rprintln, rtt_init_print};

// Shared memory between the main thread and the button interrupt. The
// handler only ever sets the edge flag; all capture policy runs here.
static BUTTON: Mutex<RefCell<Option<ButtonPin>>> = Mutex::new(RefCell::new(None));
static BUTTON_EDGE: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

// One frame of pixel data; too large for the stack, so it lives in .bss and
// main takes the only reference.
static mut FRAME: FrameBuffer = FrameBuffer::new();

#[entry]
fn main() -> ! {
    rtt_init_print!();
    rprintln!("framegrabber starting");

    let mut pac_periph = pac::Peripherals::take().unwrap();
    let cm_periph = pac::CorePeripherals::take().unwrap();

    let mut watchdog = hal::Watchdog::new(pac_periph.WATCHDOG);
    let clocks = hal::clocks::init_clocks_and_plls(
        rp_pico::XOSC_CRYSTAL_FREQ,
        pac_periph.XOSC,
        pac_periph.CLOCKS,
        pac_periph.PLL_SYS,
        pac_periph.PLL_USB,
        &mut pac_periph.RESETS,
        &mut watchdog,
    )
    .ok()
    .unwrap();

    let sio = hal::Sio::new(pac_periph.SIO);
    let all_pins = rp_pico::Pins::new(
        pac_periph.IO_BANK0,
        pac_periph.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac_periph.RESETS,
    );
    let binding = pins::bind(all_pins);

    let mut delay =
        cortex_m::delay::Delay::new(cm_periph.SYST, clocks.system_clock.freq().to_Hz());

    // Sensor master clock before anything touches the control bus.
    let _xclk = board::start_xclk(pac_periph.PWM, &mut pac_periph.RESETS, binding.xclk);

    let i2c = hal::I2C::i2c0(
        pac_periph.I2C0,
        binding.sda,
        binding.scl,
        100.kHz(),
        &mut pac_periph.RESETS,
        &clocks.system_clock,
    );

    let timer = hal::Timer::new(pac_periph.TIMER, &mut pac_periph.RESETS, &clocks);

    let mut uart = board::setup_uart(
        pac_periph.UART0,
        binding.uart_tx,
        binding.uart_rx,
        &mut pac_periph.RESETS,
        &clocks,
    );

    let mut camera = Camera::new(
        i2c,
        pac_periph.PIO0,
        pac_periph.DMA,
        &mut pac_periph.RESETS,
        binding.pwdn,
        binding.reset,
        timer,
        &mut delay,
        Profile::Rgb565,
    );
    camera.log_bus_devices();

    let mut led = binding.led;
    let frame = unsafe { &mut *core::ptr::addr_of_mut!(FRAME) };
    let mut trigger = TriggerLatch::new();

    free(|cs| {
        BUTTON
            .borrow(cs)
            .replace(Some(board::setup_button(binding.button)))
    });
    unsafe { pac::NVIC::unmask(pac::Interrupt::IO_IRQ_BANK0) };

    rprintln!("ready: button/'c' captures, 't' test pattern, 'r'/'y'/'b' profile");

    loop {
        // fold the raw interrupt flag into the debounced latch
        if free(|cs| BUTTON_EDGE.borrow(cs).replace(false)) {
            trigger.offer(camera.now_ms());
        }

        let mut byte = [0u8; 1];
        let got_command = matches!(uart.read_raw(&mut byte), Ok(n) if n > 0);
        if got_command {
            match byte[0] {
                b'c' => {
                    trigger.offer(camera.now_ms());
                }
                b't' => {
                    pattern::color_bars(frame);
                    stream::send_frame(&mut uart, frame);
                }
                b'r' => camera.set_profile(Profile::Rgb565, &mut delay),
                b'y' => camera.set_profile(Profile::Yuv422, &mut delay),
                b'b' => camera.set_profile(Profile::Rgb565Bars, &mut delay),
                _ => {}
            }
        }

        if trigger.take() {
            let _ = led.set_high();
            match camera.grab_frame(frame) {
                Ok(()) => stream::send_frame(&mut uart, frame),
                Err(e) => rprintln!("capture failed: {:?}, frame dropped", e),
            }
            let _ = led.set_low();

            // Requests that arrived during the capture are dropped, never
            // queued behind it.
            free(|cs| BUTTON_EDGE.borrow(cs).set(false));
            trigger.clear();
        }
    }
}

#[interrupt]
fn IO_IRQ_BANK0() {
    free(|cs| {
        if let Some(button) = BUTTON.borrow(cs).borrow_mut().as_mut() {
            if button.interrupt_status(Interrupt::EdgeLow) {
                button.clear_interrupt(Interrupt::EdgeLow);
                BUTTON_EDGE.borrow(cs).set(true);
            }
        }
    });
}
