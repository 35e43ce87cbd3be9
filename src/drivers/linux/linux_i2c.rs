use crate::base::registers::DEFAULT_ADDRESS;
use crate::drivers::driver::{BusTransport, DriverInfo, DynTransport, OpenError, STATUS_OK, STATUS_OTHER};
use crate::drivers::utils::parse_param;
use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::debug;
use std::collections::{HashMap, VecDeque};

/// Linux `/dev/i2c-N` adapter.
///
/// The kernel interface has no repeated start between a register write and
/// the following read, so `hold_bus` is ignored.
pub struct LinuxI2cBus {
    dev: LinuxI2CDevice,
    slave: u8,
    tx_address: u8,
    tx_bytes: Vec<u8>,
    rx: VecDeque<u8>,
}

impl LinuxI2cBus {
    pub fn open(path: &str, address: u8) -> Result<LinuxI2cBus, OpenError> {
        let dev = LinuxI2CDevice::new(path, u16::from(address))
            .map_err(|e| OpenError::DriverError(Box::new(e)))?;
        Ok(LinuxI2cBus {
            dev,
            slave: address,
            tx_address: address,
            tx_bytes: Vec::new(),
            rx: VecDeque::new(),
        })
    }

    fn select(&mut self, address: u8) -> bool {
        if self.slave == address {
            return true;
        }
        match self.dev.set_slave_address(u16::from(address)) {
            Ok(()) => {
                self.slave = address;
                true
            }
            Err(e) => {
                debug!("Failed to select address 0x{:02x}: {}", address, e);
                false
            }
        }
    }
}

impl BusTransport for LinuxI2cBus {
    fn begin_transaction(&mut self, address: u8) {
        self.tx_address = address;
        self.tx_bytes.clear();
    }

    fn write_byte(&mut self, byte: u8) {
        self.tx_bytes.push(byte);
    }

    fn end_transaction(&mut self, _hold_bus: bool) -> u8 {
        if !self.select(self.tx_address) {
            return STATUS_OTHER;
        }
        match self.dev.write(&self.tx_bytes) {
            Ok(()) => STATUS_OK,
            Err(e) => {
                debug!("I2C write to 0x{:02x} failed: {}", self.tx_address, e);
                STATUS_OTHER
            }
        }
    }

    fn request_bytes(&mut self, address: u8, count: usize) -> usize {
        self.rx.clear();
        if !self.select(address) {
            return 0;
        }
        let mut buf = vec![0u8; count];
        match self.dev.read(&mut buf) {
            Ok(()) => {
                self.rx.extend(buf);
                count
            }
            Err(e) => {
                debug!("I2C read from 0x{:02x} failed: {}", address, e);
                0
            }
        }
    }

    fn read_available_byte(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }
}

fn driver_open(params: HashMap<String, String>) -> Result<DynTransport, OpenError> {
    let path = params
        .get("path")
        .cloned()
        .unwrap_or_else(|| "/dev/i2c-1".to_string());
    let address = parse_param(&params, "address", DEFAULT_ADDRESS)?;
    Ok(Box::new(LinuxI2cBus::open(&path, address)?))
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: "I2CDEV".to_string(),
        description: "Linux I2C character device. Parameters: path (default /dev/i2c-1), address"
            .to_string(),
        open: driver_open,
    }
}
