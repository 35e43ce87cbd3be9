use crate::base::fields::{Cfg0Reg, Cfg1Reg, Cfg2Reg, EnableReg, Gain};
use crate::base::registers::{Register, RegisterFile};
use crate::error::SensorError;
use std::fmt;

/// Length of one integration cycle in ms
pub const CYCLE_MS: f32 = 2.81;
/// Integration time factor when WLONG is set
pub const WIDE_LONG_FACTOR: f32 = 12.0;

/// Measurement settings decoded from a register snapshot
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Configuration {
    /// Integration cycles, 1 to 256
    pub integration_cycles: u16,
    pub gain: Gain,
    pub ir_to_green: bool,
    pub wide_range: bool,
    pub wide_long: bool,
    pub wait: bool,
    pub proximity: bool,
    pub ambient_light: bool,
}

impl Configuration {
    pub fn from_register_file(regs: &RegisterFile) -> Result<Configuration, SensorError> {
        let enable = EnableReg(regs.get(Register::Enable)?);
        let cfg0 = Cfg0Reg(regs.get(Register::Cfg0)?);
        let cfg1 = Cfg1Reg(regs.get(Register::Cfg1)?);
        let cfg2 = Cfg2Reg(regs.get(Register::Cfg2)?);
        Ok(Configuration {
            integration_cycles: u16::from(regs.get(Register::Atime)?) + 1,
            gain: cfg1.gain(),
            ir_to_green: cfg1.ir_to_green(),
            wide_range: cfg2.wide_range(),
            wide_long: cfg0.wide_long(),
            wait: enable.wait(),
            proximity: enable.proximity(),
            ambient_light: enable.ambient_light(),
        })
    }

    /// Integration time in ms
    pub fn integration_time_ms(&self) -> f32 {
        let t = CYCLE_MS * f32::from(self.integration_cycles);
        if self.wide_long {
            t * WIDE_LONG_FACTOR
        } else {
            t
        }
    }

    /// Effective gain. Halved unless the wide gain range is selected.
    pub fn gain_multiplier(&self) -> f32 {
        let g = 2f32.powi(2 * i32::from(self.gain.bits()));
        if self.wide_range {
            g
        } else {
            g / 2.0
        }
    }
}

impl Default for Configuration {
    /// Settings applied by `initialize`
    fn default() -> Self {
        Configuration {
            integration_cycles: 1,
            gain: Gain::X4,
            ir_to_green: false,
            wide_range: true,
            wide_long: false,
            wait: false,
            proximity: true,
            ambient_light: true,
        }
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Integration time: {} cycles ({:.2} ms)",
            self.integration_cycles,
            self.integration_time_ms()
        )?;
        writeln!(f, "Gain: {} (effective {})", self.gain, self.gain_multiplier())?;
        writeln!(f, "IR to green: {}", self.ir_to_green)?;
        writeln!(
            f,
            "Enabled: wait {}, proximity {}, ambient light {}",
            self.wait, self.proximity, self.ambient_light
        )
    }
}
