use serde::{Deserialize, Serialize};

/// Name of the built-in profile that administratively disables a port.
pub const DISABLE_PROFILE: &str = "Disable";

/// A named LAN port profile. Only the fields the CLI needs are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortProfile {
    pub id: String,
    pub name: String,
}

impl PortProfile {
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Exact, case-sensitive name lookup.
pub fn find_profile<'a>(profiles: &'a [PortProfile], name: &str) -> Option<&'a PortProfile> {
    profiles.iter().find(|p| p.name == name)
}
