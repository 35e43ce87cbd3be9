use crate::base::registers::{Register, RegisterGroup};
use std::error::Error;
use std::fmt;

pub type DynResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InitStage {
    IntegrationTime,
    Gain,
    Enable,
}

impl fmt::Display for InitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitStage::IntegrationTime => write!(f, "integration time"),
            InitStage::Gain => write!(f, "gain"),
            InitStage::Enable => write!(f, "enable"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorError {
    /// Device did not acknowledge a transaction. `status` is the transport
    /// status code.
    BusNack { register: u8, status: u8 },
    /// Transaction completed but no data was returned.
    ReadUnavailable { register: u8 },
    /// Configuration parameter outside its domain. Nothing was written.
    OutOfRange { parameter: &'static str, value: i32 },
    /// Bulk read aborted in `group`.
    PartialRead {
        group: RegisterGroup,
        cause: Box<SensorError>,
    },
    /// A register snapshot slot has not been read from the device.
    UnreadRegister(Register),
    InvalidChannel(u8),
    Init {
        stage: InitStage,
        cause: Box<SensorError>,
    },
}

impl Error for SensorError {}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::BusNack { register, status } => write!(
                f,
                "Device did not acknowledge access to register 0x{:02x} (status {})",
                register, status
            ),
            SensorError::ReadUnavailable { register } => {
                write!(f, "No data on register 0x{:02x}", register)
            }
            SensorError::OutOfRange { parameter, value } => {
                write!(f, "{} out of range: {}", parameter, value)
            }
            SensorError::PartialRead { group, cause } => {
                write!(f, "Failed reading {} registers: {}", group, cause)
            }
            SensorError::UnreadRegister(reg) => {
                write!(f, "Register {} has not been read", reg.name())
            }
            SensorError::InvalidChannel(c) => write!(f, "Invalid color channel selector {}", c),
            SensorError::Init { stage, cause } => {
                write!(f, "Failed to set {}: {}", stage, cause)
            }
        }
    }
}
