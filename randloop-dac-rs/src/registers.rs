//! MCP4725 command and status bit layout.
//!
//! The device has no register address byte. The two most significant bits
//! of the first byte written select the command:
//!
//! ```text
//! fast write:     [0 0 PD1 PD0 D11 D10 D9 D8] [D7 .. D0]
//! write DAC:      [0 1 0 x x PD1 PD0 x] [D11 .. D4] [D3 D2 D1 D0 x x x x]
//! write DAC+EE:   [0 1 1 x x PD1 PD0 x] [D11 .. D4] [D3 D2 D1 D0 x x x x]
//! ```
//!
//! A read returns five bytes: status, the DAC register (two bytes) and the
//! EEPROM contents (two bytes).

// ---------------------------------------------------------------------------
// Addressing
// ---------------------------------------------------------------------------

/// I2C address with the A0 pin tied low (Adafruit breakout default).
pub const DEFAULT_ADDRESS: u8 = 0x62;

/// Largest code the 12-bit DAC accepts.
pub const MAX_CODE: u16 = 0x0FFF;

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Write the DAC register only (3-byte form).
pub(crate) const CMD_WRITE_DAC: u8 = 0x40;

/// Write the DAC register and the EEPROM.
pub(crate) const CMD_WRITE_DAC_EEPROM: u8 = 0x60;

/// Power-down bits in the first byte of a fast write.
pub(crate) const FAST_PD_SHIFT: u8 = 4;

/// Power-down bits in the command byte of a 3-byte write.
pub(crate) const CMD_PD_SHIFT: u8 = 1;

// ---------------------------------------------------------------------------
// Read-back layout
// ---------------------------------------------------------------------------

/// Length of a full status read.
pub(crate) const READ_LEN: usize = 5;

/// Status byte: EEPROM write complete.
pub(crate) const STATUS_READY: u8 = 0x80;

/// Status byte: power-on reset flag.
pub(crate) const STATUS_POR: u8 = 0x40;

/// Status byte: power-down bits.
pub(crate) const STATUS_PD_SHIFT: u8 = 1;

/// EEPROM high byte: power-down bits.
pub(crate) const EEPROM_PD_SHIFT: u8 = 5;
