use crate::error::AppError;
use crate::models::device::Device;
use crate::models::port::{PortDetails, PortSettings};
use crate::models::profile::PortProfile;

/// A change to a single switch port.
#[derive(Debug, Clone, PartialEq)]
pub enum PortUpdate {
    /// Assign a profile; per-port overrides are switched off.
    Profile(String),
    /// Keep the current profile and apply these settings as overrides.
    Overrides(PortSettings),
}

/// Operations on one managed site.
///
/// The port toggle and switch resolution only talk to this trait, so they can
/// be driven by the HTTP client or by an in-memory site in tests.
#[allow(async_fn_in_trait)]
pub trait SiteClient {
    async fn list_devices(&self) -> Result<Vec<Device>, AppError>;

    async fn get_device(&self, mac: &str) -> Result<Device, AppError>;

    async fn get_switch_port(&self, device: &Device, port: u32) -> Result<PortDetails, AppError>;

    async fn update_switch_port(
        &self,
        device: &Device,
        port: u32,
        update: PortUpdate,
    ) -> Result<(), AppError>;

    async fn get_port_profiles(&self) -> Result<Vec<PortProfile>, AppError>;
}
