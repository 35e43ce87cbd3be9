//! Configuration writes.
//!
//! The register snapshot is only updated once the device acknowledged the
//! write, so it keeps matching the device when a write fails.
//! Bitfield updates are read-modify-write against the snapshot; other bits
//! of the register are kept.

use crate::base::fields::{Cfg1Reg, EnableReg, Gain};
use crate::base::registers::{self, Register, RegisterFile};
use crate::drivers::driver::BusTransport;
use crate::error::{InitStage, SensorError};
use crate::protocol::register_access::SensorBus;
use log::{info, warn};

pub const MIN_CYCLES: u16 = 1;
pub const MAX_CYCLES: u16 = 256;

/// Set the integration time in cycles of 2.81 ms
pub fn set_integration_time<T: BusTransport>(
    bus: &mut SensorBus<T>,
    regs: &mut RegisterFile,
    cycles: u16,
) -> Result<(), SensorError> {
    if !(MIN_CYCLES..=MAX_CYCLES).contains(&cycles) {
        return Err(SensorError::OutOfRange {
            parameter: "integration cycles",
            value: i32::from(cycles),
        });
    }
    let atime = (cycles - 1) as u8;
    bus.write_register(registers::ATIME, atime)?;
    regs.set(Register::Atime, atime);
    Ok(())
}

/// Set analog gain and IR to green routing.
///
/// `gain` is the multiplier 1, 4, 16 or 64. Other values select 4x.
pub fn set_gain_and_routing<T: BusTransport>(
    bus: &mut SensorBus<T>,
    regs: &mut RegisterFile,
    ir_to_green: bool,
    gain: u32,
) -> Result<(), SensorError> {
    let cfg1 = Cfg1Reg(regs.get(Register::Cfg1)?)
        .with_ir_to_green(ir_to_green)
        .with_gain(Gain::from_multiplier(gain));
    bus.write_register(registers::CFG1, cfg1.0)?;
    regs.set(Register::Cfg1, cfg1.0);
    Ok(())
}

/// Change gain and/or IR to green routing. A setting that is `None` keeps
/// its current value from the snapshot.
pub fn update_gain_and_routing<T: BusTransport>(
    bus: &mut SensorBus<T>,
    regs: &mut RegisterFile,
    ir_to_green: Option<bool>,
    gain: Option<u32>,
) -> Result<(), SensorError> {
    let current = Cfg1Reg(regs.get(Register::Cfg1)?);
    set_gain_and_routing(
        bus,
        regs,
        ir_to_green.unwrap_or_else(|| current.ir_to_green()),
        gain.unwrap_or_else(|| current.gain().multiplier()),
    )
}

/// Enable or disable the wait timer, proximity and ambient light sensing
pub fn set_feature_enables<T: BusTransport>(
    bus: &mut SensorBus<T>,
    regs: &mut RegisterFile,
    wait: bool,
    proximity: bool,
    ambient_light: bool,
) -> Result<(), SensorError> {
    let enable = EnableReg(regs.get(Register::Enable)?)
        .with_wait(wait)
        .with_proximity(proximity)
        .with_ambient_light(ambient_light);
    bus.write_register(registers::ENABLE, enable.0)?;
    regs.set(Register::Enable, enable.0);
    Ok(())
}

struct DeviceTag(Option<u8>);

impl std::fmt::Display for DeviceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(id) => write!(f, "[DEVICE-0x{:X}]", id),
            None => write!(f, "[DEVICE-?]"),
        }
    }
}

/// Set up the sensor for color measurements.
///
/// One integration cycle, 4x gain without IR routing, proximity and ambient
/// light enabled. A failed gain write is logged and the sensor keeps its
/// previous gain.
pub fn initialize<T: BusTransport>(
    bus: &mut SensorBus<T>,
    regs: &mut RegisterFile,
) -> Result<(), SensorError> {
    let tag = DeviceTag(regs.device_id());
    set_integration_time(bus, regs, 1).map_err(|e| SensorError::Init {
        stage: InitStage::IntegrationTime,
        cause: Box::new(e),
    })?;
    info!("{} Set integration time to 1 integration cycle", tag);

    match set_gain_and_routing(bus, regs, false, 4) {
        Ok(()) => info!("{} Set gain to x4", tag),
        Err(e) => warn!("{} Failed to set gain: {}", tag, e),
    }

    set_feature_enables(bus, regs, false, true, true).map_err(|e| SensorError::Init {
        stage: InitStage::Enable,
        cause: Box::new(e),
    })?;
    info!("{} Enabled color integration cycle", tag);
    Ok(())
}
