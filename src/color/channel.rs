use crate::error::SensorError;
use std::convert::TryFrom;
use std::fmt;

/// Number of data registers in one color sample
pub const SAMPLE_LEN: usize = 9;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Channel {
    Clear,
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::Clear, Channel::Red, Channel::Green, Channel::Blue];

    /// Offset of the low byte in a `ColorSample`
    pub const fn offset(self) -> usize {
        match self {
            Channel::Clear => 0,
            Channel::Red => 2,
            Channel::Green => 4,
            Channel::Blue => 6,
        }
    }
}

/// Numeric selectors: 1 clear, 2 red, 3 green, 4 blue
impl TryFrom<u8> for Channel {
    type Error = SensorError;
    fn try_from(c: u8) -> Result<Self, Self::Error> {
        match c {
            1 => Ok(Channel::Clear),
            2 => Ok(Channel::Red),
            3 => Ok(Channel::Green),
            4 => Ok(Channel::Blue),
            _ => Err(SensorError::InvalidChannel(c)),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Clear => write!(f, "clear"),
            Channel::Red => write!(f, "red"),
            Channel::Green => write!(f, "green"),
            Channel::Blue => write!(f, "blue"),
        }
    }
}

/// Raw bytes of CDATAL to PDATA
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct ColorSample([u8; SAMPLE_LEN]);

impl ColorSample {
    pub const fn new(bytes: [u8; SAMPLE_LEN]) -> ColorSample {
        ColorSample(bytes)
    }

    /// Build a sample from channel counts
    pub fn from_channels(clear: u16, red: u16, green: u16, blue: u16, proximity: u8) -> Self {
        let mut bytes = [0u8; SAMPLE_LEN];
        for (c, v) in Channel::ALL.iter().zip([clear, red, green, blue]) {
            bytes[c.offset()..c.offset() + 2].copy_from_slice(&v.to_le_bytes());
        }
        bytes[8] = proximity;
        ColorSample(bytes)
    }

    pub fn bytes(&self) -> &[u8; SAMPLE_LEN] {
        &self.0
    }

    pub fn proximity(&self) -> u8 {
        self.0[8]
    }

    pub fn channel(&self, channel: Channel) -> u16 {
        assemble_channel(self, channel)
    }
}

/// Combine the low and high data bytes of a channel
pub fn assemble_channel(sample: &ColorSample, channel: Channel) -> u16 {
    let low = sample.0[channel.offset()];
    let high = sample.0[channel.offset() + 1];
    (u16::from(high) << 8) | u16::from(low)
}
