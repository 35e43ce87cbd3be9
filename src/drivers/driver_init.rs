use crate::drivers;
use crate::error::DynResult;
use drivers::driver::add_driver;
use drivers::dummy::dummy;
#[cfg(feature = "i2cdev_driver")]
use drivers::linux::linux_i2c;
#[cfg(any(test, feature = "simulator"))]
use drivers::simulator::simulator;

/// Register the compiled in drivers. Hardware drivers come first so that
/// `default` picks them when available.
pub fn init() -> DynResult<()> {
    #[cfg(feature = "i2cdev_driver")]
    add_driver(linux_i2c::driver_info());
    #[cfg(any(test, feature = "simulator"))]
    add_driver(simulator::driver_info());
    add_driver(dummy::driver_info());
    Ok(())
}
