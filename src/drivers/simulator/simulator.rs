use crate::base::registers::DEFAULT_ADDRESS;
use crate::drivers::driver::{
    BusTransport, DriverInfo, DynTransport, OpenError, STATUS_ADDRESS_NACK, STATUS_DATA_NACK,
    STATUS_OK,
};
use crate::drivers::simulator::device::SimTmd3725;
use crate::drivers::utils::parse_param;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Bus with one simulated sensor attached.
///
/// The device is shared so tests can inspect and change it while a
/// `SensorBus` owns the transport.
pub struct SimBus {
    device: Arc<Mutex<SimTmd3725>>,
    device_address: u8,
    tx_address: Option<u8>,
    tx_bytes: Vec<u8>,
    rx: VecDeque<u8>,
}

impl SimBus {
    pub fn new() -> SimBus {
        Self::with_device(SimTmd3725::new(), DEFAULT_ADDRESS)
    }

    pub fn with_device(device: SimTmd3725, device_address: u8) -> SimBus {
        SimBus {
            device: Arc::new(Mutex::new(device)),
            device_address,
            tx_address: None,
            tx_bytes: Vec::new(),
            rx: VecDeque::new(),
        }
    }

    pub fn device(&self) -> Arc<Mutex<SimTmd3725>> {
        self.device.clone()
    }
}

impl Default for SimBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BusTransport for SimBus {
    fn begin_transaction(&mut self, address: u8) {
        self.tx_address = Some(address);
        self.tx_bytes.clear();
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx_bytes.push(byte);
    }

    fn end_transaction(&mut self, _hold_bus: bool) -> u8 {
        let address = self.tx_address.take();
        if address != Some(self.device_address) {
            return STATUS_ADDRESS_NACK;
        }
        let mut device = match self.device.lock() {
            Ok(d) => d,
            Err(_) => return STATUS_DATA_NACK,
        };
        if device.write(&self.tx_bytes) {
            STATUS_OK
        } else {
            STATUS_DATA_NACK
        }
    }

    fn request_bytes(&mut self, address: u8, count: usize) -> usize {
        self.rx.clear();
        if address != self.device_address {
            return 0;
        }
        if let Ok(mut device) = self.device.lock() {
            self.rx.extend(device.read(count));
        }
        self.rx.len()
    }

    fn read_available_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

fn driver_open(params: HashMap<String, String>) -> Result<DynTransport, OpenError> {
    let address = parse_param(&params, "address", DEFAULT_ADDRESS)?;
    let mut device = SimTmd3725::new();
    device.jitter = parse_param(&params, "jitter", 0u16)?;
    device.set_channels(
        parse_param(&params, "clear", 1000u16)?,
        parse_param(&params, "red", 300u16)?,
        parse_param(&params, "green", 300u16)?,
        parse_param(&params, "blue", 100u16)?,
        parse_param(&params, "proximity", 0u8)?,
    );
    Ok(Box::new(SimBus::with_device(device, address)))
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: "SIMULATOR".to_string(),
        description: "Simulated TMD3725. Parameters: address, clear, red, green, blue, proximity, jitter".to_string(),
        open: driver_open,
    }
}
