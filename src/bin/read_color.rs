use log::{info, warn};
use std::time::Instant;
use tmd::color::report::ColorReport;
use tmd::config::configuration::Configuration;
use tmd::config::engine;
use tmd::drivers::driver::OpenError;
use tmd::drivers::utils::parse_number;
use tmd::{read_calibrated, SensorBus};
use tmd3725_tools as tmd;
use tokio::time::Duration;

extern crate clap;
use clap::{value_parser, Arg, ArgAction, Command};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = tmd::drivers::init() {
        eprintln!("Failed to initialize drivers: {}", e);
    }
    let matches = Command::new("read_color")
        .about("Periodically read calibrated color from a TMD3725.")
        .arg(
            Arg::new("DEVICE")
                .short('d')
                .long("device")
                .default_value("default")
                .help("Select bus driver, e.g. I2CDEV:path=/dev/i2c-1"),
        )
        .arg(
            Arg::new("address")
                .short('a')
                .long("address")
                .default_value("0x39")
                .help("Bus address of the sensor"),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_parser(value_parser!(u64))
                .default_value("1000")
                .help("Time between readings in ms"),
        )
        .arg(
            Arg::new("count")
                .short('n')
                .long("count")
                .value_parser(value_parser!(u64))
                .help("Stop after this many readings"),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print one JSON record per reading"),
        )
        .arg(
            Arg::new("no_init")
                .long("no-init")
                .action(ArgAction::SetTrue)
                .help("Keep the current sensor configuration"),
        )
        .get_matches();

    let device_name = matches.get_one::<String>("DEVICE").unwrap();
    let address = match parse_number(matches.get_one::<String>("address").unwrap()) {
        Some(a) if a < 0x80 => a as u8,
        _ => {
            eprintln!("Invalid bus address");
            return;
        }
    };
    let interval = Duration::from_millis(*matches.get_one::<u64>("interval").unwrap());
    let count = matches.get_one::<u64>("count").copied();
    let json = matches.get_flag("json");

    let driver = match tmd::drivers::open(device_name) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Failed to open bus device: {}", e);
            if let OpenError::NotFound = e {
                eprintln!("Available drivers:");
                for name in tmd::drivers::driver_names() {
                    eprintln!("  {}", name);
                }
            }
            return;
        }
    };
    let mut bus = SensorBus::with_address(driver, address);
    if !bus.connected() {
        warn!("No device acknowledged address 0x{:02x}", address);
    }

    let mut regs = match bus.read_all_registers() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Failed to read registers: {}", e);
            return;
        }
    };
    info!("{}", regs);
    if !matches.get_flag("no_init") {
        if let Err(e) = engine::initialize(&mut bus, &mut regs) {
            eprintln!("Failed to initialize sensor: {}", e);
            return;
        }
    }
    let config = match Configuration::from_register_file(&regs) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return;
        }
    };
    info!("Integration time {:.2} ms, gain {}", config.integration_time_ms(), config.gain_multiplier());

    let start = Instant::now();
    let mut readings = 0u64;
    loop {
        if let Some(n) = count {
            if readings >= n {
                break;
            }
        }
        tokio::time::sleep(interval).await;
        readings += 1;
        match read_calibrated(&mut bus, &config) {
            Ok(color) => {
                let report = ColorReport::new(color);
                if json {
                    match report.to_json(start.elapsed().as_millis() as u64) {
                        Ok(line) => println!("{}", line),
                        Err(e) => eprintln!("Failed to encode reading: {}", e),
                    }
                } else {
                    println!("{}", report);
                }
            }
            Err(e) => eprintln!("Failed to read color data: {}", e),
        }
    }
}
