use serde::Serialize;

/// Kind of adopted device as reported by the controller's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Switch,
    Ap,
    Gateway,
    Unknown,
}

impl DeviceType {
    pub fn from_type(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "switch" => DeviceType::Switch,
            "ap" => DeviceType::Ap,
            "gateway" => DeviceType::Gateway,
            _ => DeviceType::Unknown,
        }
    }

    pub fn is_switch(&self) -> bool {
        matches!(self, DeviceType::Switch)
    }

    pub fn category(&self) -> &'static str {
        match self {
            DeviceType::Switch => "switch",
            DeviceType::Ap => "access point",
            DeviceType::Gateway => "gateway",
            DeviceType::Unknown => "unknown",
        }
    }
}
