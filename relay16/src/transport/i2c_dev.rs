//! Linux `/dev/i2c-N` transport.
//!
//! Built on `rppal`. A register read is a single combined transaction
//! (write offset, repeated start, read) rather than two separate ones with a
//! stop in between.

use tracing::trace;

use crate::error::TransportError;
use crate::hw_trait::I2c;

/// An open i2c-dev bus. The device node is closed when this is dropped.
#[derive(Debug)]
pub struct I2cDev {
    i2c: rppal::i2c::I2c,
    bus: u8,
    // Slave address the adapter is currently pointed at
    selected: Option<u8>,
}

impl I2cDev {
    /// Open `/dev/i2c-<bus>` for reading and writing.
    pub fn open(bus: u8) -> Result<Self, TransportError> {
        let i2c =
            rppal::i2c::I2c::with_bus(bus).map_err(|source| TransportError::Open { bus, source })?;
        trace!(bus, "Opened i2c-dev bus.");
        Ok(Self {
            i2c,
            bus,
            selected: None,
        })
    }

    pub fn bus(&self) -> u8 {
        self.bus
    }

    fn select(&mut self, address: u8) -> Result<(), TransportError> {
        if self.selected != Some(address) {
            // Forget the old address first so a failed switch is retried
            self.selected = None;
            self.i2c
                .set_slave_address(address.into())
                .map_err(|source| TransportError::from_bus(address, source))?;
            self.selected = Some(address);
        }
        Ok(())
    }
}

impl I2c for I2cDev {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TransportError> {
        self.select(address)?;
        let written = self
            .i2c
            .write(bytes)
            .map_err(|source| TransportError::from_bus(address, source))?;
        if written != bytes.len() {
            return Err(TransportError::Incomplete {
                address,
                expected: bytes.len(),
                actual: written,
            });
        }
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        self.select(address)?;
        self.i2c
            .write_read(bytes, buffer)
            .map_err(|source| TransportError::from_bus(address, source))
    }
}
