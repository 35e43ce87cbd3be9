use tmd::base::registers::{Register, RegisterGroup};
use tmd::config::configuration::Configuration;
use tmd::drivers::driver::{self, OpenError};
use tmd::drivers::utils::parse_number;
use tmd::SensorBus;
use tmd3725_tools as tmd;

extern crate clap;
use clap::{Arg, ArgAction, Command};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = tmd::drivers::init() {
        eprintln!("Failed to initialize drivers: {}", e);
    }
    let matches = Command::new("dump_registers")
        .about("Read and print all TMD3725 registers.")
        .arg(
            Arg::new("DEVICE")
                .short('d')
                .long("device")
                .default_value("default")
                .help("Select bus driver"),
        )
        .arg(
            Arg::new("address")
                .short('a')
                .long("address")
                .default_value("0x39")
                .help("Bus address of the sensor"),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list-drivers")
                .action(ArgAction::SetTrue)
                .help("List available drivers and exit"),
        )
        .get_matches();

    if matches.get_flag("list") {
        for (name, descr) in driver::driver_descriptions() {
            println!("{:<10} {}", name, descr);
        }
        return;
    }

    let device_name = matches.get_one::<String>("DEVICE").unwrap();
    let address = match parse_number(matches.get_one::<String>("address").unwrap()) {
        Some(a) if a < 0x80 => a as u8,
        _ => {
            eprintln!("Invalid bus address");
            return;
        }
    };
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
    let regs = match bus.read_all_registers() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };
    println!("{}", regs);
    for group in RegisterGroup::ALL {
        println!("{}:", group);
        for r in group.registers() {
            if let Ok(v) = regs.get(r) {
                println!("  {:<10} 0x{:02x}: 0x{:02x} {:08b}", r.name(), r.address(), v, v);
            }
        }
    }
    if let Some(id) = regs.slot(Register::Id) {
        println!("Device ID: 0x{:02x}", id);
    }
    match Configuration::from_register_file(&regs) {
        Ok(config) => print!("{}", config),
        Err(e) => eprintln!("{}", e),
    }
}
