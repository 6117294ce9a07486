//! Physical transport layer for board connections.
//!
//! The only transport today is the Linux i2c-dev character device. Boards on
//! a Raspberry Pi header sit on bus 1, which is the default.

pub mod i2c_dev;

pub use i2c_dev::I2cDev;

/// Bus used when none is configured.
pub const DEFAULT_BUS: u8 = 1;
