//! PCA9535-family 16-bit I/O expander registers.
//!
//! The chip exposes its two 8-bit ports as register pairs, so a word access
//! at an even offset covers port 0 in the low byte and port 1 in the high
//! byte.
//!
//! Datasheet: <https://www.nxp.com/docs/en/data-sheet/PCA9535_PCA9535C.pdf>

/// Word register offsets
pub mod registers {
    pub const INPUT: u8 = 0x00;
    pub const OUTPUT: u8 = 0x02;
    pub const POLARITY_INVERSION: u8 = 0x04;
    pub const CONFIGURATION: u8 = 0x06;
}

/// CONFIGURATION register values. A set bit makes the line an input.
pub mod configuration {
    pub const ALL_OUTPUTS: u16 = 0x0000;
    pub const ALL_INPUTS: u16 = 0xFFFF;
}

/// Register name for log output.
pub fn register_name(register: u8) -> &'static str {
    match register {
        registers::INPUT => "INPUT",
        registers::OUTPUT => "OUTPUT",
        registers::POLARITY_INVERSION => "POLARITY_INVERSION",
        registers::CONFIGURATION => "CONFIGURATION",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_names() {
        assert_eq!(register_name(registers::OUTPUT), "OUTPUT");
        assert_eq!(register_name(registers::CONFIGURATION), "CONFIGURATION");
        assert_eq!(register_name(0x03), "unknown");
    }
}
