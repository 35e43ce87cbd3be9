use crate as tmd;
use std::convert::TryFrom;
use tmd::base::fields::{Cfg1Reg, Gain};
use tmd::base::registers::{self as reg, Register, RegisterFile, RegisterGroup, REGISTER_COUNT};
use tmd::color::calibration::read_calibrated;
use tmd::color::channel::Channel;
use tmd::config::configuration::Configuration;
use tmd::config::engine;
use tmd::drivers::driver::{self, BusTransport, STATUS_ADDRESS_NACK, STATUS_DATA_NACK};
use tmd::drivers::dummy::dummy::DummyDriver;
use tmd::drivers::simulator::device::SimTmd3725;
use tmd::drivers::simulator::simulator::SimBus;
use tmd::error::{InitStage, SensorError};
use tmd::protocol::register_access::SensorBus;

fn sim_bus() -> (SensorBus<SimBus>, std::sync::Arc<std::sync::Mutex<SimTmd3725>>) {
    let sim = SimBus::new();
    let dev = sim.device();
    (SensorBus::new(sim), dev)
}

#[test]
fn read_single_registers() {
    let (mut bus, dev) = sim_bus();
    assert_eq!(bus.read_register(reg::ID), Ok(0xe4));
    bus.write_register(reg::WTIME, 0x12).unwrap();
    assert_eq!(bus.read_register(reg::WTIME), Ok(0x12));
    assert_eq!(dev.lock().unwrap().write_log, vec![(reg::WTIME, 0x12)]);
}

#[test]
fn wrong_address_is_nack() {
    let mut bus = SensorBus::with_address(SimBus::new(), 0x29);
    assert_eq!(
        bus.read_register(reg::ENABLE),
        Err(SensorError::BusNack {
            register: reg::ENABLE,
            status: STATUS_ADDRESS_NACK
        })
    );
    assert!(bus.write_register(reg::ENABLE, 1).is_err());
}

#[test]
fn presence() {
    let (mut bus, _) = sim_bus();
    assert!(bus.connected());
    let mut bus = SensorBus::with_address(SimBus::new(), 0x40);
    assert!(!bus.connected());
    let mut bus = SensorBus::new(DummyDriver);
    assert!(!bus.connected());
}

#[test]
fn read_all() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Intenab, 0x5a);
    dev.lock().unwrap().set_channels(0x1234, 2, 3, 4, 5);
    let regs = bus.read_all_registers().unwrap();
    assert!(regs.is_complete());
    assert_eq!(regs.get(Register::Id), Ok(0xe4));
    assert_eq!(regs.get(Register::Cfg2), Ok(0x04));
    assert_eq!(regs.get(Register::Intenab), Ok(0x5a));
    assert_eq!(regs.get(Register::Cdatal), Ok(0x34));
    assert_eq!(regs.get(Register::Cdatah), Ok(0x12));
    assert_eq!(regs.get(Register::Pdata), Ok(5));
    assert_eq!(regs.device_id(), Some(0xe4));
    assert_eq!(regs.to_string().split(' ').count(), REGISTER_COUNT + 1);
}

#[test]
fn read_all_names_failing_group() {
    let cases = [
        (reg::AILTH, RegisterGroup::EnableBlock),
        (reg::PIHT, RegisterGroup::ProximityHighThreshold),
        (reg::PCFG0, RegisterGroup::PersistenceBlock),
        (reg::BDATAL, RegisterGroup::ConfigBlock),
        (reg::CFG2, RegisterGroup::Config2),
        (reg::CALIBSTAT, RegisterGroup::CalibrationStatus),
        (reg::INTENAB, RegisterGroup::InterruptEnable),
    ];
    for (address, group) in cases {
        let (mut bus, dev) = sim_bus();
        dev.lock().unwrap().nack_registers.insert(address);
        match bus.read_all_registers() {
            Err(SensorError::PartialRead { group: g, cause }) => {
                assert_eq!(g, group);
                assert_eq!(
                    *cause,
                    SensorError::BusNack {
                        register: address,
                        status: STATUS_DATA_NACK
                    }
                );
            }
            r => panic!("Expected failure in {}, got {:?}", group, r),
        }
    }
}

#[test]
fn read_all_without_data() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().silent_registers.insert(reg::POFFSETH);
    match bus.read_all_registers() {
        Err(SensorError::PartialRead { group, cause }) => {
            assert_eq!(group, RegisterGroup::ProximityOffsetHigh);
            assert_eq!(*cause, SensorError::ReadUnavailable { register: reg::POFFSETH });
        }
        r => panic!("Unexpected result {:?}", r),
    }
}

#[test]
fn integration_time_encoding() {
    let (mut bus, dev) = sim_bus();
    let mut regs = bus.read_all_registers().unwrap();
    let before = regs.clone();
    for cycles in 1..=256u16 {
        dev.lock().unwrap().write_log.clear();
        engine::set_integration_time(&mut bus, &mut regs, cycles).unwrap();
        let atime = (cycles - 1) as u8;
        assert_eq!(dev.lock().unwrap().write_log, vec![(reg::ATIME, atime)]);
        assert_eq!(regs.get(Register::Atime), Ok(atime));
        for r in Register::all().filter(|r| *r != Register::Atime) {
            assert_eq!(regs.slot(r), before.slot(r));
        }
    }
}

#[test]
fn integration_time_out_of_range() {
    let (mut bus, dev) = sim_bus();
    let mut regs = bus.read_all_registers().unwrap();
    let before = regs.clone();
    for cycles in [0u16, 257, 1000, u16::MAX] {
        assert_eq!(
            engine::set_integration_time(&mut bus, &mut regs, cycles),
            Err(SensorError::OutOfRange {
                parameter: "integration cycles",
                value: i32::from(cycles)
            })
        );
    }
    assert!(dev.lock().unwrap().write_log.is_empty());
    assert_eq!(regs, before);
}

#[test]
fn gain_and_routing() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Cfg1, 0xf4);
    let mut regs = bus.read_all_registers().unwrap();
    for (gain, bits) in [(1, 0b00), (4, 0b01), (16, 0b10), (64, 0b11), (2, 0b01), (0, 0b01)] {
        engine::set_gain_and_routing(&mut bus, &mut regs, false, gain).unwrap();
        let v = dev.lock().unwrap().register(Register::Cfg1);
        assert_eq!(v & 0x03, bits);
        assert_eq!(v & !0x03, 0xf4);
        assert_eq!(regs.get(Register::Cfg1), Ok(v));
    }
    engine::set_gain_and_routing(&mut bus, &mut regs, true, 64).unwrap();
    let v = Cfg1Reg(dev.lock().unwrap().register(Register::Cfg1));
    assert!(v.ir_to_green());
    assert_eq!(v.gain(), Gain::X64);
    assert_eq!(v.0, 0xff);
}

#[test]
fn gain_needs_read_snapshot() {
    let (mut bus, dev) = sim_bus();
    let mut regs = RegisterFile::new();
    assert_eq!(
        engine::set_gain_and_routing(&mut bus, &mut regs, false, 4),
        Err(SensorError::UnreadRegister(Register::Cfg1))
    );
    assert!(dev.lock().unwrap().write_log.is_empty());
}

#[test]
fn feature_enables() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Enable, 0x40);
    let mut regs = bus.read_all_registers().unwrap();
    engine::set_feature_enables(&mut bus, &mut regs, true, false, true).unwrap();
    assert_eq!(dev.lock().unwrap().register(Register::Enable), 0x4b);
    engine::set_feature_enables(&mut bus, &mut regs, false, true, false).unwrap();
    assert_eq!(dev.lock().unwrap().register(Register::Enable), 0x44);
}

#[test]
fn routing_without_gain() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Cfg1, 0x02);
    let mut regs = bus.read_all_registers().unwrap();

    // Only routing given, gain stays at 16x
    engine::update_gain_and_routing(&mut bus, &mut regs, Some(true), None).unwrap();
    assert_eq!(dev.lock().unwrap().register(Register::Cfg1), 0x0a);

    // Only gain given, routing stays on
    engine::update_gain_and_routing(&mut bus, &mut regs, None, Some(64)).unwrap();
    assert_eq!(dev.lock().unwrap().register(Register::Cfg1), 0x0b);
    assert_eq!(regs.get(Register::Cfg1), Ok(0x0b));

    engine::update_gain_and_routing(&mut bus, &mut regs, Some(false), Some(1)).unwrap();
    assert_eq!(dev.lock().unwrap().register(Register::Cfg1), 0x00);
}

#[test]
fn initialize_sequence() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Atime, 0x80);
    dev.lock().unwrap().set_register(Register::Cfg1, 0x0b);
    let mut regs = bus.read_all_registers().unwrap();
    engine::initialize(&mut bus, &mut regs).unwrap();
    assert_eq!(
        dev.lock().unwrap().write_log,
        vec![(reg::ATIME, 0x00), (reg::CFG1, 0x01), (reg::ENABLE, 0x07)]
    );
    let config = Configuration::from_register_file(&regs).unwrap();
    assert_eq!(config, Configuration::default());
}

#[test]
fn initialize_tolerates_gain_failure() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Cfg1, 0x02);
    let mut regs = bus.read_all_registers().unwrap();
    dev.lock().unwrap().nack_registers.insert(reg::CFG1);
    engine::initialize(&mut bus, &mut regs).unwrap();
    let dev = dev.lock().unwrap();
    assert_eq!(dev.write_log, vec![(reg::ATIME, 0x00), (reg::ENABLE, 0x07)]);
    assert_eq!(dev.register(Register::Cfg1), 0x02);
}

#[test]
fn failed_write_keeps_snapshot() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_register(Register::Cfg1, 0x02);
    dev.lock().unwrap().set_channels(1000, 300, 300, 100, 0);
    let mut regs = bus.read_all_registers().unwrap();
    dev.lock().unwrap().nack_registers.insert(reg::CFG1);
    engine::initialize(&mut bus, &mut regs).unwrap();

    let device_cfg1 = dev.lock().unwrap().register(Register::Cfg1);
    assert_eq!(regs.get(Register::Cfg1), Ok(device_cfg1));
    let config = Configuration::from_register_file(&regs).unwrap();
    assert_eq!(config.gain, Gain::X16);
    assert_eq!(config.gain, Cfg1Reg(device_cfg1).gain());
    // Calibration runs with the gain the device actually uses
    let color = read_calibrated(&mut bus, &config).unwrap();
    assert!((color.cpl - 16.0 * 2.81 / 682.85).abs() < 1e-5);

    // The other setters leave the snapshot alone on a failed write as well
    dev.lock().unwrap().nack_registers.insert(reg::ATIME);
    dev.lock().unwrap().nack_registers.insert(reg::ENABLE);
    let atime = regs.get(Register::Atime);
    let enable = regs.get(Register::Enable);
    assert!(engine::set_integration_time(&mut bus, &mut regs, 100).is_err());
    assert!(engine::set_feature_enables(&mut bus, &mut regs, true, false, false).is_err());
    assert_eq!(regs.get(Register::Atime), atime);
    assert_eq!(regs.get(Register::Enable), enable);
}

#[test]
fn initialize_aborts() {
    for (address, stage) in [
        (reg::ATIME, InitStage::IntegrationTime),
        (reg::ENABLE, InitStage::Enable),
    ] {
        let (mut bus, dev) = sim_bus();
        let mut regs = bus.read_all_registers().unwrap();
        dev.lock().unwrap().nack_registers.insert(address);
        match engine::initialize(&mut bus, &mut regs) {
            Err(SensorError::Init { stage: s, .. }) => assert_eq!(s, stage),
            r => panic!("Expected {} failure, got {:?}", stage, r),
        }
    }
    // Nothing after the integration time is attempted
    let (mut bus, dev) = sim_bus();
    let mut regs = bus.read_all_registers().unwrap();
    dev.lock().unwrap().nack_registers.insert(reg::ATIME);
    assert!(engine::initialize(&mut bus, &mut regs).is_err());
    assert!(dev.lock().unwrap().write_log.is_empty());
}

#[test]
fn calibrated_reading() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().set_channels(1000, 300, 300, 100, 9);
    let mut regs = bus.read_all_registers().unwrap();
    engine::initialize(&mut bus, &mut regs).unwrap();
    let config = Configuration::from_register_file(&regs).unwrap();
    let sample = bus.read_color_channels().unwrap();
    assert_eq!(sample.channel(Channel::Clear), 1000);
    assert_eq!(sample.proximity(), 9);
    let c = read_calibrated(&mut bus, &config).unwrap();
    assert_eq!(c.ir, -150.0);
    assert_eq!((c.red, c.green, c.blue, c.clear), (450.0, 450.0, 250.0, 1150.0));
}

#[test]
fn failed_color_read_is_not_calibrated() {
    let (mut bus, dev) = sim_bus();
    dev.lock().unwrap().nack_registers.insert(reg::GDATAH);
    let config = Configuration::default();
    assert_eq!(
        read_calibrated(&mut bus, &config),
        Err(SensorError::BusNack {
            register: reg::GDATAH,
            status: STATUS_DATA_NACK
        })
    );
}

#[test]
fn jitter_stays_in_bounds() {
    let (mut bus, dev) = sim_bus();
    {
        let mut d = dev.lock().unwrap();
        d.jitter = 5;
        d.set_channels(1000, 300, 300, 3, 0);
    }
    for _ in 0..20 {
        let s = bus.read_color_channels().unwrap();
        assert!((995..=1005).contains(&s.channel(Channel::Clear)));
        assert!(s.channel(Channel::Blue) <= 8);
    }
}

#[test]
fn open_simulator_from_registry() {
    tmd::drivers::init().unwrap();
    assert!(driver::driver_names().contains(&"SIMULATOR".to_string()));
    let transport = tmd::drivers::open("SIMULATOR:clear=2000,red=0x100,address=0x39").unwrap();
    let mut bus = SensorBus::new(transport);
    let sample = bus.read_color_channels().unwrap();
    assert_eq!(sample.channel(Channel::Clear), 2000);
    assert_eq!(sample.channel(Channel::Red), 0x100);
    assert_eq!(sample.channel(Channel::Blue), 100);
    assert_eq!(Channel::try_from(4).map(|c| sample.channel(c)), Ok(100));
}

#[test]
fn dummy_bus_reads_nothing() {
    let mut dummy = DummyDriver;
    assert_eq!(dummy.request_bytes(0x39, 1), 0);
    let mut bus = SensorBus::new(dummy);
    assert!(matches!(
        bus.read_all_registers(),
        Err(SensorError::PartialRead {
            group: RegisterGroup::EnableBlock,
            ..
        })
    ));
}
