pub mod device;
pub mod device_type;
pub mod port;
pub mod profile;
