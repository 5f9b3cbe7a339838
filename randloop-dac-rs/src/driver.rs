//! Low-level MCP4725 bus access.
//!
//! Encodes commands into the device's byte layout and decodes read-back
//! frames. Range checking lives one layer up in [`Mcp4725`].
//!
//! [`Mcp4725`]: crate::Mcp4725

use embedded_hal_async::i2c::I2c;

use crate::error::DacError;
use crate::registers::{
    CMD_PD_SHIFT, EEPROM_PD_SHIFT, FAST_PD_SHIFT, READ_LEN, STATUS_PD_SHIFT, STATUS_POR,
    STATUS_READY,
};

/// Output stage state. Anything but `Normal` disconnects the output and
/// pulls it to ground through the given resistor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerDown {
    #[default]
    Normal,
    Pulldown1K,
    Pulldown100K,
    Pulldown500K,
}

impl PowerDown {
    pub(crate) fn bits(self) -> u8 {
        match self {
            PowerDown::Normal => 0b00,
            PowerDown::Pulldown1K => 0b01,
            PowerDown::Pulldown100K => 0b10,
            PowerDown::Pulldown500K => 0b11,
        }
    }

    pub(crate) fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => PowerDown::Normal,
            0b01 => PowerDown::Pulldown1K,
            0b10 => PowerDown::Pulldown100K,
            _ => PowerDown::Pulldown500K,
        }
    }
}

/// Decoded five-byte read-back frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DacReadout {
    /// `false` while an EEPROM write is in progress.
    pub ready: bool,
    /// Set after a power-on reset.
    pub power_on_reset: bool,
    pub power_down: PowerDown,
    /// Code currently in the DAC register.
    pub code: u16,
    /// Power-down state restored at power-on.
    pub eeprom_power_down: PowerDown,
    /// Code restored at power-on.
    pub eeprom_code: u16,
}

impl DacReadout {
    pub(crate) fn decode(frame: &[u8; READ_LEN]) -> Self {
        Self {
            ready: frame[0] & STATUS_READY != 0,
            power_on_reset: frame[0] & STATUS_POR != 0,
            power_down: PowerDown::from_bits(frame[0] >> STATUS_PD_SHIFT),
            code: (frame[1] as u16) << 4 | (frame[2] >> 4) as u16,
            eeprom_power_down: PowerDown::from_bits(frame[3] >> EEPROM_PD_SHIFT),
            eeprom_code: ((frame[3] & 0x0F) as u16) << 8 | frame[4] as u16,
        }
    }
}

/// Two-byte fast write frame. `code` must already be range checked.
pub(crate) fn fast_write_frame(code: u16, power_down: PowerDown) -> [u8; 2] {
    [
        (power_down.bits() << FAST_PD_SHIFT) | ((code >> 8) as u8 & 0x0F),
        (code & 0xFF) as u8,
    ]
}

/// Three-byte write frame for `command`. `code` must already be range checked.
pub(crate) fn command_frame(command: u8, code: u16, power_down: PowerDown) -> [u8; 3] {
    [
        command | (power_down.bits() << CMD_PD_SHIFT),
        (code >> 4) as u8,
        ((code & 0x0F) as u8) << 4,
    ]
}

/// Owns the bus and the device address.
pub(crate) struct Mcp4725Bus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Mcp4725Bus<I2C>
where
    I2C: I2c,
{
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub async fn write(&mut self, frame: &[u8]) -> Result<(), DacError<I2C::Error>> {
        self.i2c.write(self.address, frame).await?;
        Ok(())
    }

    pub async fn read(&mut self) -> Result<DacReadout, DacError<I2C::Error>> {
        let mut frame = [0u8; READ_LEN];
        self.i2c.read(self.address, &mut frame).await?;
        Ok(DacReadout::decode(&frame))
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}
