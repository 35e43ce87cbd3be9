use crate::error::SensorError;
use std::fmt;

/// Default bus address of the TMD3725
pub const DEFAULT_ADDRESS: u8 = 0x39;

pub const ENABLE: u8 = 0x80;
pub const ATIME: u8 = 0x81;
pub const PTIME: u8 = 0x82;
pub const WTIME: u8 = 0x83;
pub const AILTL: u8 = 0x84;
pub const AILTH: u8 = 0x85;
pub const AIHTL: u8 = 0x86;
pub const AIHTH: u8 = 0x87;
pub const PILT: u8 = 0x88;
pub const PIHT: u8 = 0x8A;
pub const PERS: u8 = 0x8C;
pub const CFG0: u8 = 0x8D;
pub const PCFG0: u8 = 0x8E;
pub const PCFG1: u8 = 0x8F;
pub const CFG1: u8 = 0x90;
pub const REVID: u8 = 0x91;
pub const ID: u8 = 0x92;
pub const STATUS: u8 = 0x93;
pub const CDATAL: u8 = 0x94;
pub const CDATAH: u8 = 0x95;
pub const RDATAL: u8 = 0x96;
pub const RDATAH: u8 = 0x97;
pub const GDATAL: u8 = 0x98;
pub const GDATAH: u8 = 0x99;
pub const BDATAL: u8 = 0x9A;
pub const BDATAH: u8 = 0x9B;
pub const PDATA: u8 = 0x9C;
pub const CFG2: u8 = 0x9F;
pub const CFG3: u8 = 0xAB;
pub const POFFSETL: u8 = 0xC0;
pub const POFFSETH: u8 = 0xC1;
pub const CALIB: u8 = 0xD7;
pub const CALIBCFG: u8 = 0xD9;
pub const CALIBSTAT: u8 = 0xDC;
pub const INTENAB: u8 = 0xDD;

/// Number of registers in a full register snapshot
pub const REGISTER_COUNT: usize = 35;

/// Every register kept in a `RegisterFile`, in snapshot order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Register {
    Enable,
    Atime,
    Ptime,
    Wtime,
    Ailtl,
    Ailth,
    Aihtl,
    Aihth,
    Pilt,
    Piht,
    Pers,
    Cfg0,
    Pcfg0,
    Pcfg1,
    Cfg1,
    Revid,
    Id,
    Status,
    Cdatal,
    Cdatah,
    Rdatal,
    Rdatah,
    Gdatal,
    Gdatah,
    Bdatal,
    Bdatah,
    Pdata,
    Cfg2,
    Cfg3,
    Poffsetl,
    Poffseth,
    Calib,
    Calibcfg,
    Calibstat,
    Intenab,
}

use Register::*;

const REGISTER_INFO: [(Register, u8, &str); REGISTER_COUNT] = [
    (Enable, ENABLE, "ENABLE"),
    (Atime, ATIME, "ATIME"),
    (Ptime, PTIME, "PTIME"),
    (Wtime, WTIME, "WTIME"),
    (Ailtl, AILTL, "AILTL"),
    (Ailth, AILTH, "AILTH"),
    (Aihtl, AIHTL, "AIHTL"),
    (Aihth, AIHTH, "AIHTH"),
    (Pilt, PILT, "PILT"),
    (Piht, PIHT, "PIHT"),
    (Pers, PERS, "PERS"),
    (Cfg0, CFG0, "CFG0"),
    (Pcfg0, PCFG0, "PCFG0"),
    (Pcfg1, PCFG1, "PCFG1"),
    (Cfg1, CFG1, "CFG1"),
    (Revid, REVID, "REVID"),
    (Id, ID, "ID"),
    (Status, STATUS, "STATUS"),
    (Cdatal, CDATAL, "CDATAL"),
    (Cdatah, CDATAH, "CDATAH"),
    (Rdatal, RDATAL, "RDATAL"),
    (Rdatah, RDATAH, "RDATAH"),
    (Gdatal, GDATAL, "GDATAL"),
    (Gdatah, GDATAH, "GDATAH"),
    (Bdatal, BDATAL, "BDATAL"),
    (Bdatah, BDATAH, "BDATAH"),
    (Pdata, PDATA, "PDATA"),
    (Cfg2, CFG2, "CFG2"),
    (Cfg3, CFG3, "CFG3"),
    (Poffsetl, POFFSETL, "POFFSETL"),
    (Poffseth, POFFSETH, "POFFSETH"),
    (Calib, CALIB, "CALIB"),
    (Calibcfg, CALIBCFG, "CALIBCFG"),
    (Calibstat, CALIBSTAT, "CALIBSTAT"),
    (Intenab, INTENAB, "INTENAB"),
];

impl Register {
    /// Slot index in a `RegisterFile`
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Bus address of the register
    pub const fn address(self) -> u8 {
        REGISTER_INFO[self as usize].1
    }

    pub const fn name(self) -> &'static str {
        REGISTER_INFO[self as usize].2
    }

    /// All registers in snapshot order
    pub fn all() -> impl Iterator<Item = Register> {
        REGISTER_INFO.iter().map(|(r, _, _)| *r)
    }

    pub fn from_address(address: u8) -> Option<Register> {
        REGISTER_INFO
            .iter()
            .find(|(_, a, _)| *a == address)
            .map(|(r, _, _)| *r)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contiguous runs of registers read in one go during a bulk read.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RegisterGroup {
    EnableBlock,
    ProximityHighThreshold,
    PersistenceBlock,
    ConfigBlock,
    Config2,
    Config3,
    ProximityOffsetLow,
    ProximityOffsetHigh,
    Calibration,
    CalibrationConfig,
    CalibrationStatus,
    InterruptEnable,
}

impl RegisterGroup {
    /// Groups in bulk read order
    pub const ALL: [RegisterGroup; 12] = [
        RegisterGroup::EnableBlock,
        RegisterGroup::ProximityHighThreshold,
        RegisterGroup::PersistenceBlock,
        RegisterGroup::ConfigBlock,
        RegisterGroup::Config2,
        RegisterGroup::Config3,
        RegisterGroup::ProximityOffsetLow,
        RegisterGroup::ProximityOffsetHigh,
        RegisterGroup::Calibration,
        RegisterGroup::CalibrationConfig,
        RegisterGroup::CalibrationStatus,
        RegisterGroup::InterruptEnable,
    ];

    /// First and last register of the group
    pub const fn bounds(self) -> (Register, Register) {
        match self {
            RegisterGroup::EnableBlock => (Enable, Pilt),
            RegisterGroup::ProximityHighThreshold => (Piht, Piht),
            RegisterGroup::PersistenceBlock => (Pers, Pcfg1),
            RegisterGroup::ConfigBlock => (Cfg1, Pdata),
            RegisterGroup::Config2 => (Cfg2, Cfg2),
            RegisterGroup::Config3 => (Cfg3, Cfg3),
            RegisterGroup::ProximityOffsetLow => (Poffsetl, Poffsetl),
            RegisterGroup::ProximityOffsetHigh => (Poffseth, Poffseth),
            RegisterGroup::Calibration => (Calib, Calib),
            RegisterGroup::CalibrationConfig => (Calibcfg, Calibcfg),
            RegisterGroup::CalibrationStatus => (Calibstat, Calibstat),
            RegisterGroup::InterruptEnable => (Intenab, Intenab),
        }
    }

    /// Registers of the group. Within a group addresses are consecutive.
    pub fn registers(self) -> impl Iterator<Item = Register> {
        let (first, last) = self.bounds();
        REGISTER_INFO[first.index()..=last.index()]
            .iter()
            .map(|(r, _, _)| *r)
    }
}

impl fmt::Display for RegisterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, last) = self.bounds();
        if first == last {
            f.write_str(first.name())
        } else {
            write!(f, "{} to {}", first.name(), last.name())
        }
    }
}

/// Local copy of the device registers.
///
/// Slots that have not been read successfully hold `None`. Values are
/// only consumed through `get`, which refuses unread slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    slots: [Option<u8>; REGISTER_COUNT],
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        RegisterFile {
            slots: [None; REGISTER_COUNT],
        }
    }

    pub fn from_values(values: [u8; REGISTER_COUNT]) -> RegisterFile {
        RegisterFile {
            slots: values.map(Some),
        }
    }

    pub fn get(&self, reg: Register) -> Result<u8, SensorError> {
        self.slots[reg.index()].ok_or(SensorError::UnreadRegister(reg))
    }

    pub fn slot(&self, reg: Register) -> Option<u8> {
        self.slots[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: u8) {
        self.slots[reg.index()] = Some(value);
    }

    /// Mark a slot as not read
    pub fn invalidate(&mut self, reg: Register) {
        self.slots[reg.index()] = None;
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Device identifier, used to tag log messages
    pub fn device_id(&self) -> Option<u8> {
        self.slot(Id)
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "REG[{}]:", REGISTER_COUNT)?;
        for s in &self.slots {
            match s {
                Some(v) => write!(f, " {:02X}", v)?,
                None => f.write_str(" --")?,
            }
        }
        Ok(())
    }
}
