//! Board configuration.
//!
//! A board is identified by the bus it sits on and its stack level. Values
//! come from defaults, then the `RELAY16_STACK` / `RELAY16_BUS` environment
//! variables, then whatever the caller overrides (the CLI uses its flags).
//! Range checks run on the merged result, so an out-of-range environment
//! value that a flag replaces is never an error.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Error, InvalidArgument, Result};
use crate::peripheral::relay16::STACK_LEVEL_MAX;
use crate::transport::DEFAULT_BUS;

pub const STACK_ENV: &str = "RELAY16_STACK";
pub const BUS_ENV: &str = "RELAY16_BUS";

/// Which board to talk to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Stack level selected by the address jumpers (0..=7)
    #[serde(default)]
    pub stack: u8,

    /// i2c-dev bus number
    #[serde(default = "default_bus")]
    pub bus: u8,

    /// Also try the alternate address block when the board does not answer
    #[serde(default)]
    pub probe_alternate: bool,
}

fn default_bus() -> u8 {
    DEFAULT_BUS
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            stack: 0,
            bus: DEFAULT_BUS,
            probe_alternate: false,
        }
    }
}

impl BoardConfig {
    /// Defaults overridden by the environment. Not validated; call
    /// [`BoardConfig::validate`] once every override is applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(stack) = lookup(STACK_ENV) {
            config.stack = parse_var(STACK_ENV, &stack)?;
        }
        if let Some(bus) = lookup(BUS_ENV) {
            config.bus = parse_var(BUS_ENV, &bus)?;
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stack > STACK_LEVEL_MAX {
            return Err(InvalidArgument::StackLevel(self.stack).into());
        }
        Ok(())
    }
}

fn parse_var(key: &str, value: &str) -> Result<u8> {
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("{key}={value:?}: {e}")))
}
