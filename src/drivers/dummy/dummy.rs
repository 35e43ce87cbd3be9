use crate::drivers::driver::{BusTransport, DriverInfo, DynTransport, OpenError, STATUS_ADDRESS_NACK};
use std::collections::HashMap;

/// Bus without any devices
pub struct DummyDriver;

impl BusTransport for DummyDriver {
    fn begin_transaction(&mut self, _address: u8) {}

    fn write_byte(&mut self, _byte: u8) {}

    fn end_transaction(&mut self, _hold_bus: bool) -> u8 {
        STATUS_ADDRESS_NACK
    }

    fn request_bytes(&mut self, _address: u8, _count: usize) -> usize {
        0
    }

    fn read_available_byte(&mut self) -> Option<u8> {
        None
    }
}

fn driver_open(_params: HashMap<String, String>) -> Result<DynTransport, OpenError> {
    Ok(Box::new(DummyDriver))
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: "DUMMY".to_string(),
        description: "Dummy driver. Emulates an empty bus.".to_string(),
        open: driver_open,
    }
}
