//! In-memory I2C bus for driver tests.
//!
//! Each attached device is modelled as a bank of word registers that echo
//! back whatever was last written, which is how the expander's output and
//! configuration registers behave.

use std::collections::HashMap;

use super::I2c;
use crate::error::TransportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Read { register: u8 },
    Write { register: u8, value: u16 },
}

#[derive(Debug, Default)]
pub struct MockI2c {
    devices: HashMap<u8, HashMap<u8, u16>>,
    log: Vec<Transaction>,
    addresses: Vec<u8>,
    raw_writes: Vec<Vec<u8>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MockI2c {
    /// Bus with a single device at `address`, all registers zero.
    pub fn new(address: u8) -> Self {
        let mut bus = Self::default();
        bus.attach(address);
        bus
    }

    /// Bus with nothing attached; every transfer NACKs.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, address: u8) {
        self.devices.entry(address).or_default();
    }

    /// Set a register on every attached device without logging it.
    pub fn preset(&mut self, register: u8, value: u16) {
        for regs in self.devices.values_mut() {
            regs.insert(register, value);
        }
    }

    pub fn register(&self, register: u8) -> u16 {
        self.devices
            .values()
            .next()
            .and_then(|regs| regs.get(&register).copied())
            .unwrap_or(0)
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Every attempted transaction, including failed ones.
    pub fn log(&self) -> &[Transaction] {
        &self.log
    }

    /// Device address of every attempted transaction, in order.
    pub fn addresses(&self) -> &[u8] {
        &self.addresses
    }

    pub fn raw_writes(&self) -> &[Vec<u8>] {
        &self.raw_writes
    }

    pub fn calls(&self) -> usize {
        self.log.len()
    }

    pub fn writes(&self) -> Vec<(u8, u16)> {
        self.log
            .iter()
            .filter_map(|t| match *t {
                Transaction::Write { register, value } => Some((register, value)),
                Transaction::Read { .. } => None,
            })
            .collect()
    }

    fn nack(address: u8) -> TransportError {
        TransportError::Nack { address }
    }
}

impl I2c for MockI2c {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), TransportError> {
        let register = bytes.first().copied().unwrap_or_default();
        let value = match bytes {
            [_, lo, hi, ..] => u16::from_le_bytes([*lo, *hi]),
            _ => 0,
        };
        self.log.push(Transaction::Write { register, value });
        self.addresses.push(address);
        self.raw_writes.push(bytes.to_vec());

        if self.fail_writes {
            return Err(Self::nack(address));
        }
        let regs = self.devices.get_mut(&address).ok_or(Self::nack(address))?;
        regs.insert(register, value);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), TransportError> {
        let register = bytes.first().copied().unwrap_or_default();
        self.log.push(Transaction::Read { register });
        self.addresses.push(address);

        if self.fail_reads {
            return Err(Self::nack(address));
        }
        let regs = self.devices.get(&address).ok_or(Self::nack(address))?;
        let value = regs.get(&register).copied().unwrap_or(0).to_le_bytes();
        for (dst, src) in buffer.iter_mut().zip(value) {
            *dst = src;
        }
        Ok(())
    }
}
