//! OV7670 register addresses. Only the registers the configuration tables and
//! the SCCB driver actually touch are named here.

/// Device register addresses.
pub struct Register;

#[allow(dead_code)]
impl Register {
    // Identity
    pub const PID: u8 = 0x0A;
    pub const VER: u8 = 0x0B;
    pub const MIDH: u8 = 0x1C;
    pub const MIDL: u8 = 0x1D;

    // Common control
    pub const COM1: u8 = 0x04;
    pub const COM3: u8 = 0x0C;
    pub const COM7: u8 = 0x12;
    pub const COM9: u8 = 0x14;
    pub const COM10: u8 = 0x15;
    pub const COM13: u8 = 0x3D;
    pub const COM14: u8 = 0x3E;
    pub const COM15: u8 = 0x40;
    pub const COM16: u8 = 0x41;

    // Clock and window timing
    pub const CLKRC: u8 = 0x11;
    pub const HSTART: u8 = 0x17;
    pub const HSTOP: u8 = 0x18;
    pub const VSTART: u8 = 0x19;
    pub const VSTOP: u8 = 0x1A;
    pub const HREF: u8 = 0x32;
    pub const VREF: u8 = 0x03;

    // Scaling
    pub const SCALING_XSC: u8 = 0x70;
    pub const SCALING_YSC: u8 = 0x71;
    pub const SCALING_DCWCTR: u8 = 0x72;
    pub const SCALING_PCLK_DIV: u8 = 0x73;

    // Format / output
    pub const TSLB: u8 = 0x3A;
    pub const RGB444: u8 = 0x8C;

    // Brightness, contrast, black level
    pub const BRIGHT: u8 = 0x55;
    pub const CONTRAS: u8 = 0x56;
    pub const ABLC1: u8 = 0xB1;

    // Color matrix
    pub const MTX1: u8 = 0x4F;
    pub const MTX2: u8 = 0x50;
    pub const MTX3: u8 = 0x51;
    pub const MTX4: u8 = 0x52;
    pub const MTX5: u8 = 0x53;
    pub const MTX6: u8 = 0x54;
    pub const MTXS: u8 = 0x58;

    // Auto white balance
    pub const AWBC7: u8 = 0x59;
    pub const AWBC8: u8 = 0x5A;
    pub const AWBC9: u8 = 0x5B;
    pub const AWBC10: u8 = 0x5C;
    pub const AWBC11: u8 = 0x5D;
    pub const AWBC12: u8 = 0x5E;
    pub const AWBCTR3: u8 = 0x6C;
    pub const AWBCTR2: u8 = 0x6D;
    pub const AWBCTR1: u8 = 0x6E;
    pub const AWBCTR0: u8 = 0x6F;
    pub const GFIX: u8 = 0x69;

    // Noise and edge processing
    pub const DNSTH: u8 = 0x4C;
    pub const REG74: u8 = 0x74;
    pub const REG76: u8 = 0x76;
    pub const REG77: u8 = 0x77;
    pub const SLOP: u8 = 0x7A;
    pub const GAM1: u8 = 0x7B;
    pub const GAM2: u8 = 0x7C;
}

// COM7 bits
pub const COM7_RESET: u8 = 0x80;
pub const COM7_RGB: u8 = 0x04;
pub const COM7_YUV: u8 = 0x00;
pub const COM7_CBAR: u8 = 0x02;

// COM3 / COM10 / COM15 bits
pub const COM3_DCWEN: u8 = 0x04;
pub const COM10_PCLK_HREF: u8 = 0x20;
pub const COM15_RGB565: u8 = 0x10;
pub const COM15_R00FF: u8 = 0xC0;

// COM16 bits
pub const COM16_AWBGAIN: u8 = 0x08;
