use crate::base::registers::{self, RegisterFile, RegisterGroup, DEFAULT_ADDRESS};
use crate::color::channel::{ColorSample, SAMPLE_LEN};
use crate::drivers::driver::{BusTransport, STATUS_OK};
use crate::error::SensorError;
use log::{debug, warn};

/// Single register access to one sensor on a bus.
pub struct SensorBus<T: BusTransport> {
    transport: T,
    address: u8,
}

impl<T: BusTransport> SensorBus<T> {
    pub fn new(transport: T) -> SensorBus<T> {
        Self::with_address(transport, DEFAULT_ADDRESS)
    }

    pub fn with_address(transport: T, address: u8) -> SensorBus<T> {
        SensorBus { transport, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn transport(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn release(self) -> T {
        self.transport
    }

    /// Check that a device acknowledges its address
    pub fn connected(&mut self) -> bool {
        self.transport.begin_transaction(self.address);
        self.transport.end_transaction(false) == STATUS_OK
    }

    pub fn read_register(&mut self, register: u8) -> Result<u8, SensorError> {
        self.transport.begin_transaction(self.address);
        self.transport.write_byte(register);
        let status = self.transport.end_transaction(true);
        if status != STATUS_OK {
            warn!(
                "No acknowledge on 0x{:02x} address, 0x{:02x} register",
                self.address, register
            );
            return Err(SensorError::BusNack { register, status });
        }
        self.transport.request_bytes(self.address, 1);
        // Keep the last byte if the device sent more than asked for
        let mut data = None;
        while let Some(b) = self.transport.read_available_byte() {
            data = Some(b);
        }
        match data {
            Some(value) => {
                debug!("Read 0x{:02x}: 0x{:02x}", register, value);
                Ok(value)
            }
            None => {
                warn!(
                    "No data on 0x{:02x} address, 0x{:02x} register",
                    self.address, register
                );
                Err(SensorError::ReadUnavailable { register })
            }
        }
    }

    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), SensorError> {
        self.transport.begin_transaction(self.address);
        self.transport.write_byte(register);
        self.transport.write_byte(value);
        let status = self.transport.end_transaction(false);
        if status != STATUS_OK {
            warn!("Communication error writing 0x{:02x}: {}", register, status);
            return Err(SensorError::BusNack { register, status });
        }
        debug!("Wrote 0x{:02x}: 0x{:02x}", register, value);
        Ok(())
    }

    /// Read every register of the sensor.
    ///
    /// Stops at the first failing read and reports the group it belongs to.
    /// Nothing is returned unless all registers were read.
    pub fn read_all_registers(&mut self) -> Result<RegisterFile, SensorError> {
        let mut regs = RegisterFile::new();
        for group in RegisterGroup::ALL {
            for reg in group.registers() {
                match self.read_register(reg.address()) {
                    Ok(v) => regs.set(reg, v),
                    Err(e) => {
                        warn!("Failed reading {} registers", group);
                        return Err(SensorError::PartialRead {
                            group,
                            cause: Box::new(e),
                        });
                    }
                }
            }
        }
        debug!("{}", regs);
        Ok(regs)
    }

    /// Read the clear, red, green, blue and proximity data registers
    pub fn read_color_channels(&mut self) -> Result<ColorSample, SensorError> {
        let mut bytes = [0u8; SAMPLE_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = self.read_register(registers::CDATAL + i as u8)?;
        }
        debug!("Color data: {:02x?}", bytes);
        Ok(ColorSample::new(bytes))
    }
}
