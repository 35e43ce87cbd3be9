pub mod driver;
pub mod driver_init;
pub use driver::driver_names;
pub use driver::open;
pub use driver_init::init;

pub mod utils;

pub mod dummy {
    pub mod dummy;
}

#[cfg(feature = "i2cdev_driver")]
pub mod linux {
    pub mod linux_i2c;
}

#[cfg(any(test, feature = "simulator"))]
pub mod simulator {
    pub mod device;
    pub mod simulator;
    #[cfg(test)]
    mod test;
}
