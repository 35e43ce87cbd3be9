use crate::base::registers::{self as reg, Register};
use crate::color::channel::{Channel, ColorSample};
use std::collections::HashSet;

extern crate rand;
use rand::Rng;

/// Register level model of a TMD3725
pub struct SimTmd3725 {
    pub registers: [u8; 256],
    /// Registers that NACK when addressed
    pub nack_registers: HashSet<u8>,
    /// Registers that ACK but never return data
    pub silent_registers: HashSet<u8>,
    /// Every accepted register write, in order
    pub write_log: Vec<(u8, u8)>,
    /// Maximum random deviation added to the color counts on each read
    pub jitter: u16,
    pointer: u8,
    base_counts: [u16; 4],
    proximity: u8,
}

const RESET_VALUES: [(Register, u8); 9] = [
    (Register::Ptime, 0x1f),
    (Register::Cfg0, 0x80),
    (Register::Pcfg0, 0x4f),
    (Register::Pcfg1, 0x80),
    (Register::Revid, 0x01),
    (Register::Id, 0xe4),
    (Register::Cfg2, 0x04),
    (Register::Cfg3, 0x4c),
    (Register::Calibcfg, 0x57),
];

fn read_only(address: u8) -> bool {
    matches!(address, reg::REVID | reg::ID | reg::STATUS) || (reg::CDATAL..=reg::PDATA).contains(&address)
}

impl SimTmd3725 {
    pub fn new() -> SimTmd3725 {
        let mut registers = [0u8; 256];
        for (r, v) in RESET_VALUES.iter() {
            registers[r.address() as usize] = *v;
        }
        SimTmd3725 {
            registers,
            nack_registers: HashSet::new(),
            silent_registers: HashSet::new(),
            write_log: Vec::new(),
            jitter: 0,
            pointer: 0,
            base_counts: [0; 4],
            proximity: 0,
        }
    }

    pub fn register(&self, reg: Register) -> u8 {
        self.registers[reg.address() as usize]
    }

    pub fn set_register(&mut self, reg: Register, value: u8) {
        self.registers[reg.address() as usize] = value;
    }

    /// Set the counts reported by the color data registers
    pub fn set_channels(&mut self, clear: u16, red: u16, green: u16, blue: u16, proximity: u8) {
        self.base_counts = [clear, red, green, blue];
        self.proximity = proximity;
        self.latch_data();
    }

    fn latch_data(&mut self) {
        let mut counts = self.base_counts;
        if self.jitter > 0 {
            let mut rng = rand::thread_rng();
            for c in counts.iter_mut() {
                let d: i32 = rng.gen_range(-i32::from(self.jitter)..=i32::from(self.jitter));
                *c = (i32::from(*c) + d).clamp(0, i32::from(u16::MAX)) as u16;
            }
        }
        let [clear, red, green, blue] = counts;
        let sample = ColorSample::from_channels(clear, red, green, blue, self.proximity);
        let start = reg::CDATAL as usize;
        self.registers[start..start + sample.bytes().len()].copy_from_slice(sample.bytes());
    }

    /// Current count of a channel as stored in the data registers
    pub fn channel(&self, channel: Channel) -> u16 {
        let low = reg::CDATAL as usize + channel.offset();
        u16::from_le_bytes([self.registers[low], self.registers[low + 1]])
    }

    /// Handle a write transaction. The first byte selects the register.
    /// Returns false if the transaction is not acknowledged.
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        let (first, data) = match bytes.split_first() {
            Some(s) => s,
            None => return true,
        };
        if self.nack_registers.contains(first) {
            return false;
        }
        self.pointer = *first;
        for b in data {
            if !read_only(self.pointer) {
                self.registers[self.pointer as usize] = *b;
                self.write_log.push((self.pointer, *b));
            }
            self.pointer = self.pointer.wrapping_add(1);
        }
        true
    }

    /// Read bytes from the current register pointer
    pub fn read(&mut self, count: usize) -> Vec<u8> {
        if self.silent_registers.contains(&self.pointer) {
            return Vec::new();
        }
        // A read starting at the first data register samples a new value
        if self.pointer == reg::CDATAL {
            self.latch_data();
        }
        let mut data = Vec::with_capacity(count);
        for _ in 0..count {
            data.push(self.registers[self.pointer as usize]);
            self.pointer = self.pointer.wrapping_add(1);
        }
        data
    }
}

impl Default for SimTmd3725 {
    fn default() -> Self {
        Self::new()
    }
}
