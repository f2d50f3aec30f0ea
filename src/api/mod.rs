pub mod client;
pub mod errors;
pub mod response;
pub mod site_client;

pub use client::{ConnectionConfig, OmadaClient};
pub use site_client::OmadaSiteClient;
