//! Conversion of raw channel counts to lux, CCT and IR corrected color.
//!
//! The coefficients characterize the TMD3725 and must not be changed.

use crate::color::channel::{assemble_channel, Channel, ColorSample};
use crate::config::configuration::Configuration;
use crate::drivers::driver::BusTransport;
use crate::error::SensorError;
use crate::protocol::register_access::SensorBus;

/// Device gain factor
pub const DGF: f32 = 682.85;
pub const CLEAR_COEF: f32 = 0.16;
pub const RED_COEF: f32 = -0.04;
pub const GREEN_COEF: f32 = 0.16;
pub const BLUE_COEF: f32 = -0.29;
/// Color temperature slope in K
pub const CT_COEF: f32 = 4520.0;
/// Color temperature offset in K
pub const CT_OFFSET: f32 = 1804.0;

/// Calibrated measurement.
///
/// The default value (all zero) stands for "no calibration done".
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct CalibratedColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub clear: f32,
    /// IR estimate. Negative when the clear channel exceeds R+G+B.
    pub ir: f32,
    /// Counts per lux
    pub cpl: f32,
    pub lux: f32,
    /// Correlated color temperature in K. Not finite when the corrected red
    /// channel is zero.
    pub cct: f32,
}

/// Calibrate one color sample with the active configuration
pub fn calibrate(sample: &ColorSample, config: &Configuration) -> CalibratedColor {
    let clear = i32::from(assemble_channel(sample, Channel::Clear));
    let red = i32::from(assemble_channel(sample, Channel::Red));
    let green = i32::from(assemble_channel(sample, Channel::Green));
    let blue = i32::from(assemble_channel(sample, Channel::Blue));

    // Integer halving, truncates toward zero
    let ir = ((red + green + blue) - clear) / 2;
    let ir = ir as f32;

    let cpl = config.gain_multiplier() * config.integration_time_ms() / DGF;
    let lux = (CLEAR_COEF * clear as f32
        + RED_COEF * red as f32
        + GREEN_COEF * green as f32
        + BLUE_COEF * blue as f32)
        / cpl;

    let red = red as f32 - ir;
    let green = green as f32 - ir;
    let blue = blue as f32 - ir;
    let clear = clear as f32 - ir;
    let cct = CT_COEF * (blue / red) + CT_OFFSET;

    CalibratedColor {
        red,
        green,
        blue,
        clear,
        ir,
        cpl,
        lux,
        cct,
    }
}

/// Read the color data registers and calibrate them.
///
/// Nothing is calibrated if the read fails.
pub fn read_calibrated<T: BusTransport>(
    bus: &mut SensorBus<T>,
    config: &Configuration,
) -> Result<CalibratedColor, SensorError> {
    let sample = bus.read_color_channels()?;
    Ok(calibrate(&sample, config))
}
