//! High-level interface for the MCP4725.
//!
//! [`Mcp4725`] range checks codes, remembers the last written value so the
//! power-down mode can change without moving the output, and exposes the
//! device's EEPROM and status read-back.

use embedded_hal_async::i2c::I2c;

use crate::driver::{command_frame, fast_write_frame, DacReadout, Mcp4725Bus, PowerDown};
use crate::error::DacError;
use crate::registers::{CMD_WRITE_DAC, CMD_WRITE_DAC_EEPROM, MAX_CODE};

/// Async MCP4725 12-bit DAC.
///
/// # Example
///
/// ```ignore
/// use mcp4725_driver::{Mcp4725, DEFAULT_ADDRESS};
///
/// // `i2c` is any `embedded-hal-async` I2C implementation
/// let mut dac = Mcp4725::new(i2c, DEFAULT_ADDRESS);
/// dac.write(816).await?;
/// ```
pub struct Mcp4725<I2C> {
    bus: Mcp4725Bus<I2C>,
    code: u16,
    power_down: PowerDown,
}

impl<I2C> Mcp4725<I2C>
where
    I2C: I2c,
{
    /// Create a new DAC interface. Nothing is sent until the first write.
    ///
    /// # Arguments
    /// * `i2c`: I2C peripheral (takes ownership for exclusive access)
    /// * `address`: 7-bit I2C device address (typically 0x62)
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            bus: Mcp4725Bus::new(i2c, address),
            code: 0,
            power_down: PowerDown::Normal,
        }
    }

    pub fn address(&self) -> u8 {
        self.bus.address()
    }

    /// Last code successfully written.
    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn power_down(&self) -> PowerDown {
        self.power_down
    }

    // -----------------------------------------------------------------------
    // Write operations
    // -----------------------------------------------------------------------

    /// Set the output using the two-byte fast write command.
    ///
    /// # Errors
    /// * [`DacError::CodeOutOfRange`] if `code > 4095`; nothing is sent
    /// * [`DacError::I2c`] on communication failure
    pub async fn write(&mut self, code: u16) -> Result<(), DacError<I2C::Error>> {
        check_code(code)?;
        self.bus.write(&fast_write_frame(code, self.power_down)).await?;
        self.code = code;
        Ok(())
    }

    /// Set the output and store it in EEPROM as the power-on value.
    ///
    /// The EEPROM write takes up to 50 ms; [`DacReadout::ready`] reports
    /// when it has finished.
    pub async fn write_and_persist(&mut self, code: u16) -> Result<(), DacError<I2C::Error>> {
        check_code(code)?;
        self.bus
            .write(&command_frame(CMD_WRITE_DAC_EEPROM, code, self.power_down))
            .await?;
        self.code = code;
        Ok(())
    }

    /// Change the output stage state, keeping the current code.
    pub async fn set_power_down(&mut self, mode: PowerDown) -> Result<(), DacError<I2C::Error>> {
        self.bus
            .write(&command_frame(CMD_WRITE_DAC, self.code, mode))
            .await?;
        self.power_down = mode;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read operations
    // -----------------------------------------------------------------------

    /// Read the status byte, DAC register and EEPROM contents.
    pub async fn read(&mut self) -> Result<DacReadout, DacError<I2C::Error>> {
        self.bus.read().await
    }

    /// Give the I2C peripheral back.
    pub fn release(self) -> I2C {
        self.bus.release()
    }
}

fn check_code<E>(code: u16) -> Result<(), DacError<E>> {
    if code > MAX_CODE {
        return Err(DacError::CodeOutOfRange(code));
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────
