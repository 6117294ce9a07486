//! Driver for stackable 16-channel I2C relay boards.
//!
//! Up to eight boards share one bus, each selected by a stack level (0..=7).
//! [`Relay16`] opens one board and switches its relays by number (1..=16);
//! [`scan`] lists the boards present.
//!
//! ```no_run
//! use relay16::{I2cDev, Relay16};
//!
//! # fn main() -> anyhow::Result<()> {
//! let bus = I2cDev::open(1)?;
//! let mut board = Relay16::new(bus, 0)?;
//! board.set(3, true)?;
//! assert!(board.get(3)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hw_trait;
pub mod peripheral;
pub mod tracing;
pub mod transport;

pub use config::BoardConfig;
pub use error::{Error, InvalidArgument, Result, TransportError};
pub use hw_trait::I2c;
pub use peripheral::relay16::{
    device_address, io_to_relay, relay_to_io, scan, AddressBase, DetectedBoard, Relay16,
    RelayState, RELAY_COUNT, STACK_LEVEL_MAX,
};
pub use transport::I2cDev;
