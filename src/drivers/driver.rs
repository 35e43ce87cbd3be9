use lazy_static::lazy_static;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Mutex;

/// Transport status for a completed transaction
pub const STATUS_OK: u8 = 0;
/// Address byte not acknowledged
pub const STATUS_ADDRESS_NACK: u8 = 2;
/// Data byte not acknowledged
pub const STATUS_DATA_NACK: u8 = 3;
/// Any other bus error
pub const STATUS_OTHER: u8 = 4;

/// Byte level access to a register addressed serial bus.
///
/// A write is `begin_transaction`, one or more `write_byte`, then
/// `end_transaction`. A read is `request_bytes` followed by
/// `read_available_byte` until it returns `None`.
pub trait BusTransport {
    fn begin_transaction(&mut self, address: u8);

    /// Queue a byte for the current transaction
    fn write_byte(&mut self, byte: u8);

    /// Finish the current transaction. With `hold_bus` the bus is kept for
    /// a following read (repeated start). Returns `STATUS_OK` on success.
    fn end_transaction(&mut self, hold_bus: bool) -> u8;

    /// Read `count` bytes from the device. Returns the number of bytes
    /// received.
    fn request_bytes(&mut self, address: u8, count: usize) -> usize;

    fn read_available_byte(&mut self) -> Option<u8>;
}

impl<T> BusTransport for Box<T>
where
    T: BusTransport + ?Sized,
{
    fn begin_transaction(&mut self, address: u8) {
        (**self).begin_transaction(address)
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte)
    }

    fn end_transaction(&mut self, hold_bus: bool) -> u8 {
        (**self).end_transaction(hold_bus)
    }

    fn request_bytes(&mut self, address: u8, count: usize) -> usize {
        (**self).request_bytes(address, count)
    }

    fn read_available_byte(&mut self) -> Option<u8> {
        (**self).read_available_byte()
    }
}

pub type DynTransport = Box<dyn BusTransport + Send>;

#[derive(Debug)]
pub enum OpenError {
    NotFound,
    InvalidParameter(String),
    DriverError(Box<dyn Error + Send + Sync>),
}

impl Error for OpenError {}

impl fmt::Display for OpenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpenError::NotFound => write!(f, "Driver not found"),
            OpenError::InvalidParameter(p) => write!(f, "Invalid driver parameter: {}", p),
            OpenError::DriverError(e) => write!(f, "Driver error: {}", e),
        }
    }
}

pub type OpenFn = fn(HashMap<String, String>) -> Result<DynTransport, OpenError>;

#[derive(Clone)]
pub struct DriverInfo {
    pub name: String,
    pub description: String,
    pub open: OpenFn,
}

lazy_static! {
    static ref DRIVERS: Mutex<Vec<DriverInfo>> = Mutex::new(Vec::new());
}

/// Register a driver. A driver with the same name replaces the old one.
pub fn add_driver(info: DriverInfo) {
    if let Ok(mut drivers) = DRIVERS.lock() {
        drivers.retain(|d| d.name != info.name);
        drivers.push(info);
    }
}

pub fn driver_names() -> Vec<String> {
    match DRIVERS.lock() {
        Ok(drivers) => drivers.iter().map(|d| d.name.clone()).collect(),
        Err(_) => Vec::new(),
    }
}

pub fn driver_descriptions() -> Vec<(String, String)> {
    match DRIVERS.lock() {
        Ok(drivers) => drivers
            .iter()
            .map(|d| (d.name.clone(), d.description.clone()))
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Split `name:key=value,key=value` into the driver name and its
/// parameters.
pub fn parse_device_spec(spec: &str) -> Result<(String, HashMap<String, String>), OpenError> {
    let mut params = HashMap::new();
    let (name, rest) = match spec.split_once(':') {
        Some((name, rest)) => (name, rest),
        None => (spec, ""),
    };
    for param in rest.split(',').filter(|p| !p.trim().is_empty()) {
        match param.split_once('=') {
            Some((k, v)) => {
                params.insert(k.trim().to_string(), v.trim().to_string());
            }
            None => return Err(OpenError::InvalidParameter(param.to_string())),
        }
    }
    Ok((name.trim().to_string(), params))
}

/// Open a driver by name. `default` selects the first registered driver.
pub fn open(spec: &str) -> Result<DynTransport, OpenError> {
    let (name, params) = parse_device_spec(spec)?;
    let info = {
        let drivers = DRIVERS.lock().map_err(|_| OpenError::NotFound)?;
        let found = if name == "default" {
            drivers.first()
        } else {
            drivers.iter().find(|d| d.name.eq_ignore_ascii_case(&name))
        };
        found.cloned().ok_or(OpenError::NotFound)?
    };
    (info.open)(params)
}
