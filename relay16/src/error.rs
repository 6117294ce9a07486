//! Common error types for relay16.
//!
//! Bus-level failures are reported as [`TransportError`]. The board driver
//! wraps them into [`Error`], which separates caller mistakes (bad stack level
//! or relay number) from failures talking to the hardware.

use thiserror::Error;

/// Failure of a single bus transaction.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The bus device node could not be opened
    #[error("failed to open i2c bus {bus}: {source}")]
    Open {
        bus: u8,
        #[source]
        source: rppal::i2c::Error,
    },

    /// No device acknowledged the address
    #[error("no acknowledge from 0x{address:02X}")]
    Nack { address: u8 },

    /// The transfer was rejected by the bus driver
    #[error("transfer to 0x{address:02X} failed: {source}")]
    Bus {
        address: u8,
        #[source]
        source: rppal::i2c::Error,
    },

    /// The adapter accepted fewer bytes than were submitted
    #[error("incomplete write to 0x{address:02X}: {actual} of {expected} bytes")]
    Incomplete {
        address: u8,
        expected: usize,
        actual: usize,
    },
}

impl TransportError {
    /// Classify a failed transfer. The i2c-dev driver reports a missing
    /// acknowledge as `ENXIO` or `EREMOTEIO`.
    pub(crate) fn from_bus(address: u8, source: rppal::i2c::Error) -> Self {
        const ENXIO: i32 = 6;
        const EREMOTEIO: i32 = 121;

        match &source {
            rppal::i2c::Error::Io(e) if matches!(e.raw_os_error(), Some(ENXIO | EREMOTEIO)) => {
                TransportError::Nack { address }
            }
            _ => TransportError::Bus { address, source },
        }
    }
}

/// Argument outside the range the board supports.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("invalid stack level {0}, expected 0..=7")]
    StackLevel(u8),
    #[error("invalid relay number {0}, expected 1..=16")]
    Relay(u8),
}

/// Main error type for relay16 operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Caller passed a stack level or relay number out of range. Raised
    /// before any bus access.
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// The board could not be brought up (configuration register read or
    /// reset failed)
    #[error("failed to initialize board at 0x{address:02X}: {source}")]
    Initialization {
        address: u8,
        #[source]
        source: TransportError,
    },

    /// A relay read or write failed after the board was initialized
    #[error("relay operation on board at 0x{address:02X} failed: {source}")]
    Operation {
        address: u8,
        #[source]
        source: TransportError,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// The invalid argument, if this error is one.
    pub fn invalid_argument(&self) -> Option<InvalidArgument> {
        match self {
            Error::InvalidArgument(arg) => Some(*arg),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
