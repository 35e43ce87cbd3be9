use tmd::config::configuration::Configuration;
use tmd::config::engine;
use tmd::drivers::driver::OpenError;
use tmd::drivers::utils::parse_number;
use tmd::SensorBus;
use tmd3725_tools as tmd;

extern crate clap;
use clap::{value_parser, Arg, Command};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    if let Err(e) = tmd::drivers::init() {
        eprintln!("Failed to initialize drivers: {}", e);
    }
    let matches = Command::new("configure")
        .about("Change integration time, gain and enabled features of a TMD3725.")
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
            Arg::new("atime")
                .short('t')
                .long("atime")
                .value_parser(value_parser!(u16))
                .help("Integration time in cycles of 2.81 ms (1-256)"),
        )
        .arg(
            Arg::new("gain")
                .short('g')
                .long("gain")
                .value_parser(value_parser!(u32))
                .help("Analog gain: 1, 4, 16 or 64"),
        )
        .arg(
            Arg::new("ir_to_green")
                .long("ir-to-green")
                .value_parser(value_parser!(bool))
                .default_missing_value("true")
                .num_args(0..=1)
                .help("Route the IR channel to green. Keeps the current gain unless --gain is given"),
        )
        .arg(
            Arg::new("enable")
                .short('e')
                .long("enable")
                .value_parser(["none", "als", "prox", "all"])
                .help("Enabled features, wait is enabled by 'all' only"),
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
    let mut regs = match bus.read_all_registers() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e);
            return;
        }
    };

    if let Some(&cycles) = matches.get_one::<u16>("atime") {
        if let Err(e) = engine::set_integration_time(&mut bus, &mut regs, cycles) {
            eprintln!("Failed to set integration time: {}", e);
            return;
        }
    }
    let gain = matches.get_one::<u32>("gain").copied();
    let ir_to_green = matches.get_one::<bool>("ir_to_green").copied();
    if gain.is_some() || ir_to_green.is_some() {
        if let Err(e) = engine::update_gain_and_routing(&mut bus, &mut regs, ir_to_green, gain) {
            eprintln!("Failed to set gain: {}", e);
            return;
        }
    }
    if let Some(enable) = matches.get_one::<String>("enable") {
        let (wait, prox, als) = match enable.as_str() {
            "als" => (false, false, true),
            "prox" => (false, true, false),
            "all" => (true, true, true),
            _ => (false, false, false),
        };
        if let Err(e) = engine::set_feature_enables(&mut bus, &mut regs, wait, prox, als) {
            eprintln!("Failed to set enable register: {}", e);
            return;
        }
    }
    match Configuration::from_register_file(&regs) {
        Ok(config) => print!("{}", config),
        Err(e) => eprintln!("{}", e),
    }
}
