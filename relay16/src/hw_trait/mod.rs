//! Hardware abstraction layer traits.
//!
//! Drivers are written against [`I2c`] so they work the same over a Linux
//! `/dev/i2c-*` device or a test double.

use crate::error::TransportError;

#[cfg(test)]
pub(crate) mod mock;

/// Minimal I2C master interface.
///
/// Each call is one bus transaction that either completes or fails; there is
/// no retry at this layer.
pub trait I2c {
    /// Write `bytes` to the device at 7-bit `address`.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TransportError>;

    /// Write `bytes`, then read into `buffer` after a repeated start.
    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), TransportError>;

    /// SMBus "read word": register offset out, two bytes back, low byte first.
    fn read_word_data(&mut self, address: u8, register: u8) -> Result<u16, TransportError> {
        let mut data = [0u8; 2];
        self.write_read(address, &[register], &mut data)?;
        Ok(u16::from_le_bytes(data))
    }

    /// SMBus "write word": register offset followed by the value, low byte first.
    fn write_word_data(
        &mut self,
        address: u8,
        register: u8,
        value: u16,
    ) -> Result<(), TransportError> {
        let bytes = value.to_le_bytes();
        self.write(address, &[register, bytes[0], bytes[1]])
    }
}

impl<T: I2c + ?Sized> I2c for &mut T {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TransportError> {
        (**self).write(address, bytes)
    }

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        (**self).write_read(address, bytes, buffer)
    }
}
