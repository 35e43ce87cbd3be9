pub mod error;

pub mod base {
    pub mod fields;
    pub mod registers;
}

pub mod drivers;

pub mod protocol {
    pub mod register_access;
}

pub mod config {
    pub mod configuration;
    pub mod engine;
}

pub mod color {
    pub mod calibration;
    pub mod channel;
    pub mod hsv;
    pub mod report;
}

pub use base::registers::{Register, RegisterFile, DEFAULT_ADDRESS};
pub use color::calibration::{calibrate, read_calibrated, CalibratedColor};
pub use config::configuration::Configuration;
pub use error::SensorError;
pub use protocol::register_access::SensorBus;
