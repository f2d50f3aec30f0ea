use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Controller settings are small integer codes. Each enum keeps codes it
/// does not know in `Other` so a settings payload built from a read is
/// written back unchanged.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(from = "i64", into = "i64")]
        pub enum $name {
            $($variant,)+
            Other(i64),
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                match value {
                    $($value => $name::$variant,)+
                    other => $name::Other(other),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $value,)+
                    $name::Other(other) => other,
                }
            }
        }
    };
}

wire_enum!(LinkSpeed {
    Auto = 0,
    Mbps10 = 1,
    Mbps100 = 2,
    Gbps1 = 3,
    Gbps10 = 4,
    Gbps2_5 = 5,
});

wire_enum!(Duplex {
    Auto = 0,
    Half = 1,
    Full = 2,
});

wire_enum!(
    /// 802.1x port control mode.
    Dot1xControl {
        ForceUnauthorized = 0,
        ForceAuthorized = 1,
        Auto = 2,
    }
);

wire_enum!(PoeMode {
    Disabled = 0,
    Enabled = 1,
    UseDeviceSettings = 2,
});

wire_enum!(BandwidthControl {
    Off = 0,
    RateLimit = 1,
    StormControl = 2,
});

/// Port settings that survive a full override request.
///
/// The trailing optional flags are only present on some switch models and
/// firmware versions; they stay `None` (and are left out of the payload)
/// unless the controller returned them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortSettings {
    pub operation: String,
    pub link_speed: LinkSpeed,
    pub duplex: Duplex,
    pub dot1x: Dot1xControl,
    pub poe: PoeMode,
    #[serde(rename = "bandWidthCtrlType")]
    pub bandwidth_control: BandwidthControl,
    pub lldp_med_enable: bool,
    pub spanning_tree_enable: bool,
    pub loopback_detect_enable: bool,
    pub port_isolation_enable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topo_notify_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eee_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_control_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fast_leave_enable: Option<bool>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub schedule_enable: Option<bool>,
}

impl PortSettings {
    pub fn with_schedule_enabled(mut self, enabled: bool) -> Self {
        self.schedule_enable = Some(enabled);
        self
    }
}

/// A fresh read of one switch port.
///
/// Only the identity, profile and schedule fields are parsed up front; the
/// settings snapshot is taken from `raw` when an override needs it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortDetails {
    pub port: u32,
    #[serde(default)]
    pub name: String,
    pub profile_id: String,
    #[serde(default)]
    pub profile_name: Option<String>,
    #[serde(rename = "disable", default)]
    pub is_disabled: bool,
    #[serde(default)]
    pub schedule_id: Option<String>,
    #[serde(skip)]
    pub raw: serde_json::Value,
}

impl PortDetails {
    pub fn from_json(value: &serde_json::Value) -> Result<Self, AppError> {
        let mut details: PortDetails = serde_json::from_value(value.clone())?;
        details.raw = value.clone();
        Ok(details)
    }

    pub fn has_schedule(&self) -> bool {
        self.schedule_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn state(&self) -> PortState {
        if self.is_disabled {
            PortState::Disabled
        } else {
            PortState::Enabled
        }
    }

    /// Current settings, ready to be sent back as an override. Fails when
    /// the read is missing one of the required settings.
    pub fn preserved_settings(&self) -> Result<PortSettings, AppError> {
        Ok(PortSettings::deserialize(&self.raw)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    Enabled,
    Disabled,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortState::Enabled => f.write_str("enabled"),
            PortState::Disabled => f.write_str("disabled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn port_json() -> serde_json::Value {
        json!({
            "port": 3,
            "name": "Port3",
            "profileId": "p-default",
            "profileName": "All",
            "disable": false,
            "operation": "switching",
            "linkSpeed": 0,
            "duplex": 0,
            "dot1x": 1,
            "poe": 1,
            "bandWidthCtrlType": 0,
            "lldpMedEnable": true,
            "spanningTreeEnable": false,
            "loopbackDetectEnable": true,
            "portIsolationEnable": false,
            "eeeEnable": false,
            "scheduleEnable": true,
            "profileOverrideEnable": false,
        })
    }

    #[test]
    fn test_parse_port_details() {
        let port = PortDetails::from_json(&port_json()).unwrap();
        assert_eq!(port.port, 3);
        assert_eq!(port.profile_id, "p-default");
        assert_eq!(port.state(), PortState::Enabled);
        assert!(!port.has_schedule());
        assert_eq!(port.raw["profileOverrideEnable"], false);

        let settings = port.preserved_settings().unwrap();
        assert_eq!(settings.dot1x, Dot1xControl::ForceAuthorized);
        assert_eq!(settings.poe, PoeMode::Enabled);
    }

    #[test]
    fn test_optional_flags_only_when_present() {
        let settings = PortDetails::from_json(&port_json())
            .unwrap()
            .preserved_settings()
            .unwrap();
        assert_eq!(settings.eee_enable, Some(false));
        assert_eq!(settings.topo_notify_enable, None);
        // scheduleEnable on the read is not carried into the settings
        assert_eq!(settings.schedule_enable, None);

        let payload = serde_json::to_value(settings).unwrap();
        assert_eq!(payload["eeeEnable"], false);
        assert!(payload.get("topoNotifyEnable").is_none());
        assert!(payload.get("flowControlEnable").is_none());
        assert!(payload.get("fastLeaveEnable").is_none());
        assert!(payload.get("scheduleEnable").is_none());
    }

    #[test]
    fn test_schedule_flag_serialized_when_set() {
        let port = PortDetails::from_json(&port_json()).unwrap();
        let payload =
            serde_json::to_value(port.preserved_settings().unwrap().with_schedule_enabled(false))
                .unwrap();
        assert_eq!(payload["scheduleEnable"], false);
        assert_eq!(payload["operation"], "switching");
        assert_eq!(payload["bandWidthCtrlType"], 0);
        assert_eq!(payload["lldpMedEnable"], true);
    }

    #[test]
    fn test_unknown_codes_are_kept() {
        let mut data = port_json();
        data["linkSpeed"] = json!(7);
        let port = PortDetails::from_json(&data).unwrap();
        let settings = port.preserved_settings().unwrap();
        assert_eq!(settings.link_speed, LinkSpeed::Other(7));
        let payload = serde_json::to_value(settings).unwrap();
        assert_eq!(payload["linkSpeed"], 7);
    }

    #[test]
    fn test_read_without_poe_parses() {
        let mut data = port_json();
        data.as_object_mut().unwrap().remove("poe");
        let port = PortDetails::from_json(&data).unwrap();
        assert_eq!(port.profile_id, "p-default");
        assert!(matches!(port.preserved_settings(), Err(AppError::Json(_))));
    }

    #[test]
    fn test_has_schedule() {
        let mut data = port_json();
        data["scheduleId"] = json!("");
        assert!(!PortDetails::from_json(&data).unwrap().has_schedule());
        data["scheduleId"] = json!("sched-1");
        assert!(PortDetails::from_json(&data).unwrap().has_schedule());
    }

    #[test]
    fn test_disabled_state() {
        let mut data = port_json();
        data["disable"] = json!(true);
        let port = PortDetails::from_json(&data).unwrap();
        assert_eq!(port.state(), PortState::Disabled);
        assert_eq!(port.state().to_string(), "disabled");
    }
}
