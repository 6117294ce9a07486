//! Command-line interface for 16-relay boards.
//!
//! ```bash
//! # Which boards answer on bus 1
//! relay16 list
//!
//! # Relay 5 on board 0 on
//! relay16 0 write 5 on
//!
//! # All relays of board 2 from a mask (bit 0 = relay 1)
//! relay16 2 write-all 0x00ff
//!
//! # Read one relay, or all of them as JSON. Without a stack level the
//! # board comes from $RELAY16_STACK, or 0.
//! relay16 0 read 5
//! RELAY16_STACK=3 relay16 --json read
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use relay16::tracing::{self, prelude::*};
use relay16::{scan, BoardConfig, I2cDev, Relay16, RelayState, RELAY_COUNT};

/// Control stackable 16-relay I2C boards
#[derive(Parser, Debug)]
#[command(name = "relay16")]
#[command(version)]
#[command(long_about = None)]
struct Args {
    /// i2c-dev bus number (default: $RELAY16_BUS or 1)
    #[arg(short, long)]
    bus: Option<u8>,

    /// Also try the alternate address block when a board does not answer
    #[arg(short, long)]
    alternate: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Stack level of the board, 0..=7 (default: $RELAY16_STACK or 0)
    stack: Option<u8>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the boards present on the bus
    List,

    /// Turn one relay on or off
    Write {
        /// Relay number (1..=16)
        relay: u8,
        /// on or off
        state: RelayState,
    },

    /// Set all relays from a mask, bit 0 = relay 1
    WriteAll {
        /// Decimal or 0x-prefixed hex
        #[arg(value_parser = parse_mask)]
        mask: u16,
    },

    /// Read one relay, or all of them
    Read {
        /// Relay number (1..=16); omit for all relays
        relay: Option<u8>,
    },
}

fn parse_mask(s: &str) -> Result<u16, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid mask {s:?}: {e}"))
}

fn main() {
    tracing::init_journald_or_stderr();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = with_overrides(BoardConfig::from_env()?, &args);
    debug!("Using {:?}", config);

    let bus = I2cDev::open(config.bus)?;
    let stack = config.stack;

    match args.command {
        Command::List => list(bus, args.json)?,
        Command::Write { relay, state } => {
            let mut board = open_board(bus, &config)?;
            board.set(relay, state.into())?;
            info!(stack, relay, %state, "Relay written.");
        }
        Command::WriteAll { mask } => {
            let mut board = open_board(bus, &config)?;
            board.set_all(mask)?;
            info!(stack, "Relays written: 0x{:04X}", mask);
        }
        Command::Read { relay: Some(relay) } => {
            let mut board = open_board(bus, &config)?;
            let state = RelayState::from(board.get(relay)?);
            if args.json {
                println!("{}", json!({ "stack": stack, "relay": relay, "state": state.to_string() }));
            } else {
                println!("{state}");
            }
        }
        Command::Read { relay: None } => {
            let mut board = open_board(bus, &config)?;
            let mask = board.get_all()?;
            if args.json {
                let states: Vec<bool> = (0..RELAY_COUNT).map(|i| mask & (1 << i) != 0).collect();
                println!("{}", json!({ "stack": stack, "mask": mask, "relays": states }));
            } else {
                println!("0x{mask:04X}");
            }
        }
    }
    Ok(())
}

/// Command-line flags win over the environment.
fn with_overrides(mut config: BoardConfig, args: &Args) -> BoardConfig {
    if let Some(bus) = args.bus {
        config.bus = bus;
    }
    if let Some(stack) = args.stack {
        config.stack = stack;
    }
    config.probe_alternate |= args.alternate;
    config
}

fn open_board(bus: I2cDev, config: &BoardConfig) -> Result<Relay16<I2cDev>> {
    config.validate()?;
    Relay16::from_config(bus, config)
        .with_context(|| format!("board {} on bus {}", config.stack, config.bus))
}

fn list(mut bus: I2cDev, as_json: bool) -> Result<()> {
    let boards = scan(&mut bus);
    if as_json {
        let found: Vec<_> = boards
            .iter()
            .map(|b| json!({ "stack": b.stack, "address": b.address }))
            .collect();
        println!("{}", json!({ "bus": bus.bus(), "boards": found }));
        return Ok(());
    }

    println!("{} board(s) detected", boards.len());
    if !boards.is_empty() {
        let ids: Vec<String> = boards.iter().map(|b| b.stack.to_string()).collect();
        println!("Id: {}", ids.join(" "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_accepts_hex_and_decimal() {
        assert_eq!(parse_mask("0x00ff"), Ok(0x00FF));
        assert_eq!(parse_mask("0XFFFF"), Ok(0xFFFF));
        assert_eq!(parse_mask("257"), Ok(257));
        assert!(parse_mask("65536").is_err());
        assert!(parse_mask("0xg").is_err());
    }

    #[test]
    fn parses_write_command() {
        let args = Args::try_parse_from(["relay16", "-b", "0", "3", "write", "16", "ON"]).unwrap();
        assert_eq!(args.bus, Some(0));
        assert_eq!(args.stack, Some(3));
        match args.command {
            Command::Write { relay, state } => {
                assert_eq!((relay, state), (16, RelayState::On));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_state() {
        assert!(Args::try_parse_from(["relay16", "0", "write", "1", "maybe"]).is_err());
    }

    #[test]
    fn read_relay_is_optional() {
        let args = Args::try_parse_from(["relay16", "--json", "2", "read"]).unwrap();
        assert!(args.json);
        assert_eq!(args.stack, Some(2));
        assert!(matches!(args.command, Command::Read { relay: None }));
    }

    #[test]
    fn stack_level_is_optional() {
        let args = Args::try_parse_from(["relay16", "write-all", "0xff"]).unwrap();
        assert_eq!(args.stack, None);
        assert!(matches!(args.command, Command::WriteAll { mask: 0x00FF }));

        let args = Args::try_parse_from(["relay16", "list"]).unwrap();
        assert!(matches!(args.command, Command::List));
    }

    #[test]
    fn stack_argument_replaces_environment_stack() {
        let env = BoardConfig {
            stack: 9,
            ..BoardConfig::default()
        };
        let args = Args::try_parse_from(["relay16", "0", "write", "1", "on"]).unwrap();

        let config = with_overrides(env, &args);
        assert_eq!(config.stack, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_stack_used_without_argument() {
        let env = BoardConfig {
            stack: 3,
            bus: 0,
            ..BoardConfig::default()
        };
        let args = Args::try_parse_from(["relay16", "-a", "read", "4"]).unwrap();

        let config = with_overrides(env, &args);
        assert_eq!((config.stack, config.bus), (3, 0));
        assert!(config.probe_alternate);

        let args = Args::try_parse_from(["relay16", "read"]).unwrap();
        let config = with_overrides(BoardConfig { stack: 9, ..config }, &args);
        assert!(config.validate().is_err());
    }

    #[test]
    fn clap_definition_is_consistent() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
