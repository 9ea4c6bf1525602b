//! OV7670 QVGA frame grabber for the RP2040: PIO protocol decode, DMA bulk
//! transfer, UART frame streaming.

#![no_std]

pub mod board;
pub mod ov7670;
pub mod pins;
pub mod stream;
pub mod util;
