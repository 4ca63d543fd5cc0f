pub mod device_check;

pub use device_check::DeviceCheck;
