//! Async driver for the Microchip MCP4725 12-bit I2C DAC.
//!
//! Provides an Embassy-compatible driver for the MCP4725 as found on the
//! Adafruit breakout (Product #935), used here as a 0-5 V pitch CV output.
//!
//! # Architecture
//!
//! - **`driver`** (crate-private): Frame encoding/decoding and raw bus
//!   access.
//! - **[`Mcp4725`]** (public): Range-checked writes, power-down control and
//!   status read-back.
//!
//! # Quick start
//!
//! ```ignore
//! use mcp4725_driver::{Mcp4725, DEFAULT_ADDRESS};
//!
//! let mut dac = Mcp4725::new(i2c, DEFAULT_ADDRESS);
//! dac.write(2048).await?;
//! ```
//!
//! # Features
//!
//! - **`defmt`**: Enable [`defmt::Format`] implementations for embedded
//!   logging.

#![no_std]

pub use dac::Mcp4725;
pub use driver::{DacReadout, PowerDown};
pub use error::DacError;
pub use registers::{DEFAULT_ADDRESS, MAX_CODE};

mod dac;
mod driver;
mod error;
mod registers;
