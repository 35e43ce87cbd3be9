//! Named bitfields of the configuration registers.
//!
//! Each register is a newtype over its byte value. Getters decode a field,
//! `with_*` methods return a copy with one field replaced and every other
//! bit left as it was.

use std::fmt;

const PON_BIT: u8 = 0x01;
const AEN_BIT: u8 = 0x02;
const PEN_BIT: u8 = 0x04;
const WEN_BIT: u8 = 0x08;

const WLONG_BIT: u8 = 0x02;

const AGAIN_MASK: u8 = 0x03;
const IR_TO_GREEN_BIT: u8 = 0x08;

const AGAINL_BIT: u8 = 0x04;

const fn with_bits(value: u8, mask: u8, set: bool) -> u8 {
    if set {
        value | mask
    } else {
        value & !mask
    }
}

/// Analog gain of the color channels
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Gain {
    X1,
    X4,
    X16,
    X64,
}

impl Gain {
    /// Gain for a multiplier. Anything but 1, 4, 16 or 64 maps to 4x.
    pub fn from_multiplier(multiplier: u32) -> Gain {
        match multiplier {
            1 => Gain::X1,
            4 => Gain::X4,
            16 => Gain::X16,
            64 => Gain::X64,
            _ => Gain::X4,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Gain::X1 => 0b00,
            Gain::X4 => 0b01,
            Gain::X16 => 0b10,
            Gain::X64 => 0b11,
        }
    }

    pub const fn from_bits(bits: u8) -> Gain {
        match bits & AGAIN_MASK {
            0b00 => Gain::X1,
            0b01 => Gain::X4,
            0b10 => Gain::X16,
            _ => Gain::X64,
        }
    }

    pub const fn multiplier(self) -> u32 {
        1 << (2 * self.bits())
    }
}

impl Default for Gain {
    fn default() -> Self {
        Gain::X4
    }
}

impl fmt::Display for Gain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.multiplier())
    }
}

/// ENABLE (0x80)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EnableReg(pub u8);

impl EnableReg {
    pub const fn wait(self) -> bool {
        self.0 & WEN_BIT != 0
    }

    pub const fn proximity(self) -> bool {
        self.0 & PEN_BIT != 0
    }

    /// True when both power and ALS enable are set
    pub const fn ambient_light(self) -> bool {
        self.0 & (PON_BIT | AEN_BIT) == (PON_BIT | AEN_BIT)
    }

    pub const fn with_wait(self, on: bool) -> Self {
        EnableReg(with_bits(self.0, WEN_BIT, on))
    }

    pub const fn with_proximity(self, on: bool) -> Self {
        EnableReg(with_bits(self.0, PEN_BIT, on))
    }

    /// Power and ALS enable are switched together
    pub const fn with_ambient_light(self, on: bool) -> Self {
        EnableReg(with_bits(self.0, PON_BIT | AEN_BIT, on))
    }
}

/// CFG0 (0x8D)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cfg0Reg(pub u8);

impl Cfg0Reg {
    /// Integration and wait times are 12 times longer
    pub const fn wide_long(self) -> bool {
        self.0 & WLONG_BIT != 0
    }

    pub const fn with_wide_long(self, on: bool) -> Self {
        Cfg0Reg(with_bits(self.0, WLONG_BIT, on))
    }
}

/// CFG1 (0x90)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cfg1Reg(pub u8);

impl Cfg1Reg {
    pub const fn gain(self) -> Gain {
        Gain::from_bits(self.0)
    }

    pub const fn ir_to_green(self) -> bool {
        self.0 & IR_TO_GREEN_BIT != 0
    }

    pub const fn with_gain(self, gain: Gain) -> Self {
        Cfg1Reg((self.0 & !AGAIN_MASK) | gain.bits())
    }

    pub const fn with_ir_to_green(self, on: bool) -> Self {
        Cfg1Reg(with_bits(self.0, IR_TO_GREEN_BIT, on))
    }
}

/// CFG2 (0x9F)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Cfg2Reg(pub u8);

impl Cfg2Reg {
    /// Full gain range. When cleared the selected gain is halved.
    pub const fn wide_range(self) -> bool {
        self.0 & AGAINL_BIT != 0
    }

    pub const fn with_wide_range(self, on: bool) -> Self {
        Cfg2Reg(with_bits(self.0, AGAINL_BIT, on))
    }
}
