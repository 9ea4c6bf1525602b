//! Driver for the Serial Camera Control Bus on the OV7670 image sensor,
//! generic over any microcontroller implementing the embedded-hal I2C
//! interface.
//!
//! Register writes toward the sensor are fire-and-forget: the OV7670 gives no
//! acknowledgement worth checking and a failed write is indistinguishable
//! from a successful one at this layer. Reads (identity, diagnostics) do
//! report bus errors.

use core::marker::PhantomData;

use embedded_hal::blocking::i2c;
use heapless::{consts, Vec};

use crate::config::{active_ops, RegisterOp};
use crate::regs::{Register, COM7_RESET};

/// SCCB driver.
pub struct Sccb<I2C> {
    /// Marker to ensure the same I2C type is used in all calls.
    i2c: PhantomData<I2C>,
    /// Device I2C address.
    address: u8,
}

/// SCCB errors.
#[derive(Debug, Eq, PartialEq)]
pub enum SccbError<E> {
    /// I2C write error.
    I2cWrite(E),
    /// I2C read error.
    I2cRead(E),
    /// Manufacturer or product ID mismatch.
    BadId(u16),
}

impl<I2C, E> Sccb<I2C>
where
    I2C: i2c::Read<Error = E> + i2c::Write<Error = E>,
{
    /// Creates a new SCCB driver associated with an I2C peripheral.
    pub fn new(_i2c: &I2C) -> Self {
        Sccb {
            i2c: PhantomData,
            address: OV7670_ADDRESS,
        }
    }

    /// Read a register. Must be two separate transactions, the OV7670 does
    /// not support a repeated-start `WriteRead`.
    pub fn read_register(&self, i2c: &mut I2C, reg: u8) -> Result<u8, SccbError<E>> {
        i2c.write(self.address, &[reg])
            .map_err(SccbError::I2cWrite)?;

        let mut buf = [0x00];
        i2c.read(self.address, &mut buf)
            .map_err(SccbError::I2cRead)?;

        Ok(buf[0])
    }

    /// Write a register.
    pub fn write_register(&self, i2c: &mut I2C, reg: u8, val: u8) -> Result<(), SccbError<E>> {
        i2c.write(self.address, &[reg, val])
            .map_err(SccbError::I2cWrite)
    }

    /// Reset all registers to their power-on defaults. The sensor needs a
    /// long settle after this before it accepts further writes; the bring-up
    /// sequencer owns that delay.
    pub fn soft_reset(&self, i2c: &mut I2C) {
        let _ = self.write_register(i2c, Register::COM7, COM7_RESET);
    }

    /// Check the device ID matches the OV7670.
    pub fn check_id(&self, i2c: &mut I2C) -> Result<(), SccbError<E>> {
        let manf_id_msb: u16 = self.read_register(i2c, Register::MIDH)?.into();
        let manf_id_lsb: u16 = self.read_register(i2c, Register::MIDL)?.into();
        let manf_id: u16 = (manf_id_msb << 8) | manf_id_lsb;
        if manf_id != OV7670_MANF_ID {
            return Err(SccbError::BadId(manf_id));
        }

        let product_id_msb: u16 = self.read_register(i2c, Register::PID)?.into();
        let product_id_lsb: u16 = self.read_register(i2c, Register::VER)?.into();
        let product_id: u16 = (product_id_msb << 8) | product_id_lsb;
        if product_id != OV7670_PROD_ID {
            return Err(SccbError::BadId(product_id));
        }

        Ok(())
    }

    /// Apply a configuration program: every op in table order, stopping at
    /// the `(0xFF, 0xFF)` sentinel, which is never written. Individual write
    /// results are discarded.
    pub fn apply_config(&self, i2c: &mut I2C, program: &[RegisterOp]) {
        for op in active_ops(program) {
            let _ = self.write_register(i2c, op.addr, op.val);
        }
    }

    /// Probe every 7-bit address and collect the ones that respond. Bring-up
    /// diagnostic only.
    pub fn bus_scan(i2c: &mut I2C) -> Vec<u8, consts::U16> {
        let mut found = Vec::new();
        for addr in 1..127u8 {
            let mut buf = [0x00];
            if i2c.read(addr, &mut buf).is_ok() {
                if found.push(addr).is_err() {
                    break;
                }
            }
        }
        found
    }
}

/// Device address is 0x42/0x43 on the wire; the I2C driver left-shifts the
/// provided address by 1.
const OV7670_ADDRESS: u8 = 0x21;

/// Expected manufacturer ID, shared across OmniVision sensors.
const OV7670_MANF_ID: u16 = 0x7FA2;

/// Expected product ID: PID then VER.
const OV7670_PROD_ID: u16 = 0x7673;

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::Profile;
    use crate::regs::Register;

    /// Recording I2C bus: logs writes, serves reads from a scripted register
    /// map, NAKs everything else.
    pub struct MockBus {
        pub writes: std::vec::Vec<(u8, std::vec::Vec<u8>)>,
        pub registers: std::collections::HashMap<u8, u8>,
        addressed: Option<u8>,
    }

    #[derive(Debug, PartialEq, Eq)]
    pub struct Nak;

    impl MockBus {
        pub fn new() -> Self {
            MockBus {
                writes: vec![],
                registers: std::collections::HashMap::new(),
                addressed: None,
            }
        }

        pub fn with_ov7670_ids() -> Self {
            let mut bus = Self::new();
            bus.registers.insert(Register::MIDH, 0x7F);
            bus.registers.insert(Register::MIDL, 0xA2);
            bus.registers.insert(Register::PID, 0x76);
            bus.registers.insert(Register::VER, 0x73);
            bus
        }

        /// The (reg, val) pairs written so far, in order.
        pub fn reg_writes(&self) -> std::vec::Vec<(u8, u8)> {
            self.writes
                .iter()
                .filter(|(_, bytes)| bytes.len() == 2)
                .map(|(_, bytes)| (bytes[0], bytes[1]))
                .collect()
        }
    }

    impl i2c::Write for MockBus {
        type Error = Nak;

        fn write(&mut self, addr: u8, bytes: &[u8]) -> Result<(), Nak> {
            if addr != OV7670_ADDRESS {
                return Err(Nak);
            }
            self.addressed = bytes.first().copied();
            self.writes.push((addr, bytes.to_vec()));
            Ok(())
        }
    }

    impl i2c::Read for MockBus {
        type Error = Nak;

        fn read(&mut self, addr: u8, buf: &mut [u8]) -> Result<(), Nak> {
            if addr != OV7670_ADDRESS {
                return Err(Nak);
            }
            let reg = self.addressed.take().ok_or(Nak)?;
            let val = self.registers.get(&reg).copied().ok_or(Nak)?;
            buf[0] = val;
            Ok(())
        }
    }

    #[test]
    fn apply_config_writes_in_table_order_and_stops_at_sentinel() {
        let mut bus = MockBus::new();
        let sccb = Sccb::new(&bus);
        let program = [
            RegisterOp::new(0x12, 0x80),
            RegisterOp::new(0x12, 0x80), // duplicate writes are issued twice
            RegisterOp::new(0x11, 0x04),
            RegisterOp::END,
            RegisterOp::new(0x55, 0xAA), // unreachable, past the sentinel
        ];

        sccb.apply_config(&mut bus, &program);

        assert_eq!(
            bus.reg_writes(),
            vec![(0x12, 0x80), (0x12, 0x80), (0x11, 0x04)]
        );
    }

    #[test]
    fn apply_config_never_writes_the_sentinel() {
        let mut bus = MockBus::new();
        let sccb = Sccb::new(&bus);
        for program in Profile::Rgb565.programs() {
            sccb.apply_config(&mut bus, program);
        }
        assert!(bus.reg_writes().iter().all(|&(reg, _)| reg != 0xFF));
    }

    #[test]
    fn check_id_accepts_the_ov7670() {
        let mut bus = MockBus::with_ov7670_ids();
        let sccb = Sccb::new(&bus);
        assert_eq!(sccb.check_id(&mut bus), Ok(()));
    }

    #[test]
    fn check_id_rejects_a_stranger() {
        let mut bus = MockBus::with_ov7670_ids();
        bus.registers.insert(Register::PID, 0x26); // an OV2640 shows up
        let sccb = Sccb::new(&bus);
        assert_eq!(sccb.check_id(&mut bus), Err(SccbError::BadId(0x2673)));
    }
}
