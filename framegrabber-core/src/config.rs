//! Sentinel-terminated register configuration programs for the OV7670.
//!
//! A configuration is layered from several programs applied back to back:
//! the QVGA timing base, a pixel-format overlay, color tuning, and possibly a
//! single corrective write. Later writes to the same address supersede earlier
//! ones, and some registers must be written before others (format before
//! scaling), so table order is part of the contract; never reorder entries.

use crate::regs::*;

/// One register write: `{address, value}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterOp {
    pub addr: u8,
    pub val: u8,
}

impl RegisterOp {
    pub const fn new(addr: u8, val: u8) -> Self {
        Self { addr, val }
    }

    /// End-of-program sentinel. Never a legitimate register write; scanning
    /// stops at the first occurrence.
    pub const END: RegisterOp = RegisterOp::new(0xFF, 0xFF);
}

/// The ops of `program` up to (excluding) the sentinel, in table order.
pub fn active_ops(program: &[RegisterOp]) -> impl Iterator<Item = &RegisterOp> {
    program.iter().take_while(|op| **op != RegisterOp::END)
}

/// QVGA (320x240) window timing, scaling and clock setup. Shared by all
/// pixel formats.
pub static QVGA_TIMING: &[RegisterOp] = &[
    RegisterOp::new(Register::CLKRC, 0x04), // internal clock prescale
    RegisterOp::new(Register::COM10, COM10_PCLK_HREF), // no PCLK toggle during HBLANK
    RegisterOp::new(Register::TSLB, 0x04),
    RegisterOp::new(Register::COM3, COM3_DCWEN), // enable downsampling
    RegisterOp::new(Register::COM14, 0x19),      // DCW and PCLK scaling, divide by 2
    RegisterOp::new(Register::SCALING_XSC, 0x3A),
    RegisterOp::new(Register::SCALING_YSC, 0x35),
    RegisterOp::new(Register::SCALING_DCWCTR, 0x11), // downsample by 2
    RegisterOp::new(Register::SCALING_PCLK_DIV, 0xF1),
    RegisterOp::new(Register::HSTART, 0x16),
    RegisterOp::new(Register::HSTOP, 0x04),
    RegisterOp::new(Register::HREF, 0x24),
    RegisterOp::new(Register::VSTART, 0x02),
    RegisterOp::new(Register::VSTOP, 0x7A),
    RegisterOp::new(Register::VREF, 0x0A),
    RegisterOp::END,
];

/// RGB565 output format overlay. Must follow the timing base: COM7 selects
/// the format the scaling registers were programmed for.
pub static FMT_RGB565: &[RegisterOp] = &[
    RegisterOp::new(Register::COM7, COM7_RGB),
    RegisterOp::new(Register::RGB444, 0x00), // RGB444 off, would override 565
    RegisterOp::new(Register::COM1, 0x00),   // no CCIR601
    RegisterOp::new(Register::COM15, COM15_RGB565 | COM15_R00FF), // full 0-255 range
    RegisterOp::new(Register::COM13, 0x88),
    RegisterOp::new(Register::COM9, 0x6A), // AGC gain ceiling 128x
    RegisterOp::END,
];

/// YUV422 (YUYV byte order) output format overlay.
pub static FMT_YUV422: &[RegisterOp] = &[
    RegisterOp::new(Register::COM7, COM7_YUV),
    RegisterOp::new(Register::COM15, COM15_R00FF),
    RegisterOp::new(Register::TSLB, 0x04), // YUYV, not UYVY
    RegisterOp::new(Register::COM13, 0x88),
    RegisterOp::new(Register::COM9, 0x6A),
    RegisterOp::END,
];

/// Color matrix, white balance and black-level tuning. Format-independent,
/// applied after the format overlay.
pub static COLOR_TUNING: &[RegisterOp] = &[
    RegisterOp::new(Register::BRIGHT, 0x00),
    RegisterOp::new(Register::CONTRAS, 0x40),
    RegisterOp::new(Register::ABLC1, 0x04), // enable ABLC
    RegisterOp::new(Register::MTX1, 0x80),
    RegisterOp::new(Register::MTX2, 0x80),
    RegisterOp::new(Register::MTX3, 0x00),
    RegisterOp::new(Register::MTX4, 0x22),
    RegisterOp::new(Register::MTX5, 0x5E),
    RegisterOp::new(Register::MTX6, 0x80),
    RegisterOp::new(Register::MTXS, 0x9E),
    RegisterOp::new(Register::AWBC7, 0x88),
    RegisterOp::new(Register::AWBC8, 0x88),
    RegisterOp::new(Register::AWBC9, 0x44),
    RegisterOp::new(Register::AWBC10, 0x67),
    RegisterOp::new(Register::AWBC11, 0x49),
    RegisterOp::new(Register::AWBC12, 0x0E),
    RegisterOp::new(Register::GFIX, 0x00),
    RegisterOp::new(Register::AWBCTR3, 0x0A),
    RegisterOp::new(Register::AWBCTR2, 0x55),
    RegisterOp::new(Register::AWBCTR1, 0x11),
    RegisterOp::new(Register::AWBCTR0, 0x9F),
    RegisterOp::new(Register::COM16, COM16_AWBGAIN), // auto denoise/edge off
    RegisterOp::new(Register::DNSTH, 0x00),
    RegisterOp::new(Register::REG76, 0x00),
    RegisterOp::new(Register::REG77, 0x00),
    RegisterOp::new(Register::GAM1, 0x04), // brighten shadow end points
    RegisterOp::new(Register::GAM2, 0x08),
    RegisterOp::new(Register::REG74, 0x10), // digital gain off
    RegisterOp::END,
];

/// Corrective single write: re-select RGB output with the sensor's color bar
/// generator enabled. Supersedes the COM7 value written by `FMT_RGB565`.
pub static COLOR_BAR_OVERRIDE: &[RegisterOp] = &[
    RegisterOp::new(Register::COM7, COM7_RGB | COM7_CBAR),
    RegisterOp::END,
];

/// Runtime-selectable sensor configuration. One code path; the historical
/// build-time variants became entries here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// QVGA RGB565, the production profile.
    Rgb565,
    /// QVGA YUV422 (YUYV).
    Yuv422,
    /// QVGA RGB565 with the sensor's internal color bars, for wiring checks.
    Rgb565Bars,
}

static RGB565_PROGRAMS: &[&[RegisterOp]] = &[QVGA_TIMING, FMT_RGB565, COLOR_TUNING];
static YUV422_PROGRAMS: &[&[RegisterOp]] = &[QVGA_TIMING, FMT_YUV422, COLOR_TUNING];
static RGB565_BARS_PROGRAMS: &[&[RegisterOp]] =
    &[QVGA_TIMING, FMT_RGB565, COLOR_TUNING, COLOR_BAR_OVERRIDE];

impl Profile {
    /// Configuration programs for this profile, in application order.
    pub fn programs(self) -> &'static [&'static [RegisterOp]] {
        match self {
            Profile::Rgb565 => RGB565_PROGRAMS,
            Profile::Yuv422 => YUV422_PROGRAMS,
            Profile::Rgb565Bars => RGB565_BARS_PROGRAMS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_programs() -> Vec<&'static [RegisterOp]> {
        let mut progs = vec![];
        for profile in [Profile::Rgb565, Profile::Yuv422, Profile::Rgb565Bars] {
            progs.extend_from_slice(profile.programs());
        }
        progs
    }

    #[test]
    fn every_program_is_sentinel_terminated() {
        for prog in all_programs() {
            assert_eq!(*prog.last().unwrap(), RegisterOp::END);
        }
    }

    #[test]
    fn sentinel_never_appears_as_a_legitimate_op() {
        for prog in all_programs() {
            assert!(active_ops(prog).all(|op| *op != RegisterOp::END));
            // exactly one sentinel, at the end
            assert_eq!(active_ops(prog).count(), prog.len() - 1);
        }
    }

    #[test]
    fn active_ops_preserves_table_order() {
        let ops: Vec<_> = active_ops(QVGA_TIMING).collect();
        assert_eq!(ops[0].addr, Register::CLKRC);
        assert_eq!(ops[1].addr, Register::COM10);
        assert_eq!(ops.last().unwrap().addr, Register::VREF);
    }

    #[test]
    fn color_bar_profile_supersedes_com7() {
        // Replay the layered programs into a map the way the sensor would
        // see them; the last write to COM7 must carry the color bar bit.
        let mut com7 = None;
        for prog in Profile::Rgb565Bars.programs() {
            for op in active_ops(prog) {
                if op.addr == Register::COM7 {
                    com7 = Some(op.val);
                }
            }
        }
        assert_eq!(com7, Some(COM7_RGB | COM7_CBAR));
    }
}
