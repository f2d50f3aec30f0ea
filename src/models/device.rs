use serde::{Deserialize, Serialize};

use crate::models::device_type::DeviceType;

/// An adopted device as listed under a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub mac: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl Device {
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn name_or_mac(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.mac)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or("Unknown")
    }

    pub fn kind(&self) -> DeviceType {
        DeviceType::from_type(self.device_type.as_deref().unwrap_or_default())
    }
}
