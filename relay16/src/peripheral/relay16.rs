//! Sixteen-relay stackable board driver
//!
//! The board carries a PCA9535-family expander whose 16 output lines drive
//! the relay coils. Up to eight boards share one bus; jumpers select a stack
//! level that sets the low three address bits, inverted.
//!
//! The board routing wires relay 1 to expander line 15 and relay 16 to line
//! 0, so every value crossing the bus goes through [`relay_to_io`] or
//! [`io_to_relay`]. Nothing else in this module deals with physical bit
//! order.
//!
//! The driver keeps no copy of the relay state. Every call reads the output
//! register fresh, and a single relay change is a read-modify-write of that
//! register. Concurrent users of the same board (other threads or processes)
//! are not arbitrated here.

use strum::{Display, EnumString};
use tracing::{debug, trace};

use super::pca9535::{self, configuration, registers};
use crate::config::BoardConfig;
use crate::error::{Error, InvalidArgument, Result, TransportError};
use crate::hw_trait::I2c;

/// I2C address of stack level 7
pub const BASE_ADDRESS: u8 = 0x20;

/// Base address of boards fitted with the alternate expander variant
pub const ALTERNATE_BASE_ADDRESS: u8 = 0x38;

pub const STACK_LEVEL_MAX: u8 = 7;

pub const RELAY_COUNT: u8 = 16;

/// Physical output bit for each logical relay bit: relay 1 (bit 0) is wired
/// to line 15.
static RELAY_TO_IO: [u16; RELAY_COUNT as usize] = [
    0x8000, 0x4000, 0x2000, 0x1000, 0x0800, 0x0400, 0x0200, 0x0100,
    0x0080, 0x0040, 0x0020, 0x0010, 0x0008, 0x0004, 0x0002, 0x0001,
];

/// Convert a logical relay mask (bit 0 = relay 1) to the output register value.
pub fn relay_to_io(relays: u16) -> u16 {
    let mut io: u16 = 0;
    for (i, mask) in RELAY_TO_IO.iter().enumerate() {
        if relays & (1 << i) != 0 {
            io |= *mask;
        }
    }
    io
}

/// Convert an output register value to a logical relay mask.
pub fn io_to_relay(io: u16) -> u16 {
    let mut relays: u16 = 0;
    for (i, mask) in RELAY_TO_IO.iter().enumerate() {
        if io & *mask != 0 {
            relays |= 1 << i;
        }
    }
    relays
}

/// Which expander variant, and therefore which address block, a board uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressBase {
    #[default]
    Primary,
    Alternate,
}

impl AddressBase {
    pub fn base(self) -> u8 {
        match self {
            AddressBase::Primary => BASE_ADDRESS,
            AddressBase::Alternate => ALTERNATE_BASE_ADDRESS,
        }
    }
}

/// Bus address of the board at `stack`. Stack 0 is 0x27, stack 7 is 0x20.
pub fn device_address(stack: u8) -> Result<u8> {
    device_address_with_base(AddressBase::Primary, stack)
}

pub fn device_address_with_base(base: AddressBase, stack: u8) -> Result<u8> {
    if stack > STACK_LEVEL_MAX {
        return Err(InvalidArgument::StackLevel(stack).into());
    }
    Ok(base.base() + (0x07 ^ stack))
}

fn check_relay(relay: u8) -> Result<()> {
    if !(1..=RELAY_COUNT).contains(&relay) {
        return Err(InvalidArgument::Relay(relay).into());
    }
    Ok(())
}

/// Commanded state of one relay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RelayState {
    Off,
    On,
}

impl From<bool> for RelayState {
    fn from(on: bool) -> Self {
        if on {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

impl From<RelayState> for bool {
    fn from(state: RelayState) -> Self {
        state == RelayState::On
    }
}

/// A board that answered during [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedBoard {
    pub stack: u8,
    pub address: u8,
    pub base: AddressBase,
}

/// Find the boards present on a bus.
///
/// Each stack level is probed at the primary address, then at the alternate
/// one, by reading the configuration register. Nothing is written. A failed
/// read just means no board there.
pub fn scan<I2C: I2c>(i2c: &mut I2C) -> Vec<DetectedBoard> {
    let mut found = Vec::new();
    for stack in 0..=STACK_LEVEL_MAX {
        for base in [AddressBase::Primary, AddressBase::Alternate] {
            let address = base.base() + (0x07 ^ stack);
            if i2c.read_word_data(address, registers::CONFIGURATION).is_ok() {
                debug!(stack, "Found board at 0x{:02X}", address);
                found.push(DetectedBoard {
                    stack,
                    address,
                    base,
                });
                break;
            }
        }
    }
    found
}

/// Sixteen-relay board driver
#[derive(Debug)]
pub struct Relay16<I2C> {
    i2c: I2C,
    stack: u8,
    address: u8,
}

impl<I2C: I2c> Relay16<I2C> {
    /// Open the board at `stack` and make sure all expander lines are outputs.
    ///
    /// The configuration register is only written when it is not already
    /// all-outputs, so the relays of a running board are left alone.
    pub fn new(i2c: I2C, stack: u8) -> Result<Self> {
        let address = device_address(stack)?;
        let mut board = Self {
            i2c,
            stack,
            address,
        };
        board.init()?;
        Ok(board)
    }

    /// Like [`Relay16::new`], but falls back to the alternate address block
    /// when nothing answers at the primary address.
    pub fn probe(i2c: I2C, stack: u8) -> Result<Self> {
        let address = device_address(stack)?;
        let mut board = Self {
            i2c,
            stack,
            address,
        };
        match board.read_configuration() {
            Ok(config) => board.reset_configuration(config)?,
            Err(e) => {
                debug!(
                    "No answer at 0x{:02X} ({}), trying alternate address",
                    address, e
                );
                board.address = device_address_with_base(AddressBase::Alternate, stack)?;
                board.init()?;
            }
        }
        Ok(board)
    }

    /// Open the board described by `config`.
    pub fn from_config(i2c: I2C, config: &BoardConfig) -> Result<Self> {
        if config.probe_alternate {
            Self::probe(i2c, config.stack)
        } else {
            Self::new(i2c, config.stack)
        }
    }

    pub fn stack(&self) -> u8 {
        self.stack
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Turn one relay (1..=16) on or off, leaving the others as they are.
    ///
    /// If the write fails after a successful read the board keeps whatever
    /// the output register held; no rollback is attempted.
    pub fn set(&mut self, relay: u8, on: bool) -> Result<()> {
        check_relay(relay)?;
        let mut relays = io_to_relay(self.read_output()?);
        let bit: u16 = 1 << (relay - 1);
        if on {
            relays |= bit;
        } else {
            relays &= !bit;
        }
        self.write_output(relay_to_io(relays))
    }

    /// Set every relay at once from a logical mask (bit 0 = relay 1).
    pub fn set_all(&mut self, relays: u16) -> Result<()> {
        self.write_output(relay_to_io(relays))
    }

    /// Commanded state of one relay (1..=16).
    ///
    /// This reads back the output register, so it reports what was last
    /// written rather than a measured contact state.
    pub fn get(&mut self, relay: u8) -> Result<bool> {
        check_relay(relay)?;
        let relays = io_to_relay(self.read_output()?);
        Ok(relays & (1 << (relay - 1)) != 0)
    }

    /// Commanded state of all relays as a logical mask.
    pub fn get_all(&mut self) -> Result<u16> {
        Ok(io_to_relay(self.read_output()?))
    }

    fn init(&mut self) -> Result<()> {
        let config = self.read_configuration()?;
        self.reset_configuration(config)
    }

    fn read_configuration(&mut self) -> Result<u16> {
        self.read_word(registers::CONFIGURATION)
            .map_err(|source| Error::Initialization {
                address: self.address,
                source,
            })
    }

    fn reset_configuration(&mut self, config: u16) -> Result<()> {
        if config == configuration::ALL_OUTPUTS {
            debug!(stack = self.stack, "Board at 0x{:02X} ready", self.address);
            return Ok(());
        }
        self.write_word(registers::CONFIGURATION, configuration::ALL_OUTPUTS)
            .map_err(|source| Error::Initialization {
                address: self.address,
                source,
            })?;
        debug!(
            stack = self.stack,
            "Board at 0x{:02X} ready, CONFIGURATION was 0x{:04X}", self.address, config
        );
        Ok(())
    }

    fn read_output(&mut self) -> Result<u16> {
        self.read_word(registers::OUTPUT)
            .map_err(|source| Error::Operation {
                address: self.address,
                source,
            })
    }

    fn write_output(&mut self, io: u16) -> Result<()> {
        self.write_word(registers::OUTPUT, io)
            .map_err(|source| Error::Operation {
                address: self.address,
                source,
            })
    }

    // Helper methods for I2C operations

    fn read_word(&mut self, register: u8) -> std::result::Result<u16, TransportError> {
        let value = self.i2c.read_word_data(self.address, register)?;
        trace!(
            "0x{:02X} read {} = 0x{:04X}",
            self.address,
            pca9535::register_name(register),
            value
        );
        Ok(value)
    }

    fn write_word(&mut self, register: u8, value: u16) -> std::result::Result<(), TransportError> {
        trace!(
            "0x{:02X} write {} = 0x{:04X}",
            self.address,
            pca9535::register_name(register),
            value
        );
        self.i2c.write_word_data(self.address, register, value)
    }
}
