//! Miscellaneous helper functions.

use core::panic::PanicInfo;
use rtt_target::rprintln;

#[inline(never)]
#[panic_handler]
/// Custom handler to use RTT when a panic occurs.
fn panic(info: &PanicInfo) -> ! {
    rprintln!("Panicked!");
    rprintln!("{}", info);
    loop {}
}
