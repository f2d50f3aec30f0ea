use reqwest::Method;
use serde_json::json;

use super::client::Session;
use super::response::result_items;
use crate::error::AppError;
use crate::models::device::Device;
use crate::models::port::PortDetails;
use crate::models::profile::PortProfile;
use crate::site::{PortUpdate, SiteClient};

/// Site-scoped calls against `/{omadacId}/api/v2/sites/{siteKey}/...`.
pub struct OmadaSiteClient {
    session: Session,
    site_key: String,
}

impl OmadaSiteClient {
    pub(crate) fn new(session: Session, site_key: String) -> Self {
        Self { session, site_key }
    }

    pub fn site_key(&self) -> &str {
        &self.site_key
    }

    fn path(&self, rest: &str) -> String {
        format!("sites/{}/{}", self.site_key, rest)
    }

    fn port_path(device: &Device, port: u32) -> String {
        format!("switches/{}/ports/{}", device.mac, port)
    }
}

fn update_payload(current: &PortDetails, update: PortUpdate) -> Result<serde_json::Value, AppError> {
    let mut payload = json!({
        "name": current.name,
        "profileId": current.profile_id,
        "profileOverrideEnable": false,
    });
    match update {
        PortUpdate::Profile(id) => {
            payload["profileId"] = json!(id);
        }
        PortUpdate::Overrides(settings) => {
            payload["profileOverrideEnable"] = json!(true);
            if let (Some(obj), serde_json::Value::Object(fields)) =
                (payload.as_object_mut(), serde_json::to_value(settings)?)
            {
                obj.extend(fields);
            }
        }
    }
    Ok(payload)
}

impl SiteClient for OmadaSiteClient {
    async fn list_devices(&self) -> Result<Vec<Device>, AppError> {
        let result = self
            .session
            .request(Method::GET, &self.path("devices"), None)
            .await?;
        Ok(result_items(result)
            .iter()
            .filter_map(Device::from_json)
            .collect())
    }

    async fn get_device(&self, mac: &str) -> Result<Device, AppError> {
        self.list_devices()
            .await?
            .into_iter()
            .find(|d| d.mac.eq_ignore_ascii_case(mac))
            .ok_or_else(|| AppError::DeviceNotFound(mac.to_string()))
    }

    async fn get_switch_port(&self, device: &Device, port: u32) -> Result<PortDetails, AppError> {
        let result = self
            .session
            .request(Method::GET, &self.path(&Self::port_path(device, port)), None)
            .await?
            .ok_or_else(|| AppError::Api {
                message: format!("No data for port {} on {}", port, device.mac),
                error_code: None,
            })?;
        PortDetails::from_json(&result)
    }

    async fn update_switch_port(
        &self,
        device: &Device,
        port: u32,
        update: PortUpdate,
    ) -> Result<(), AppError> {
        let current = self.get_switch_port(device, port).await?;
        let payload = update_payload(&current, update)?;
        self.session
            .request(
                Method::PATCH,
                &self.path(&Self::port_path(device, port)),
                Some(&payload),
            )
            .await?;
        Ok(())
    }

    async fn get_port_profiles(&self) -> Result<Vec<PortProfile>, AppError> {
        let result = self
            .session
            .request(Method::GET, &self.path("setting/lan/profiles"), None)
            .await?;
        Ok(result_items(result)
            .iter()
            .filter_map(PortProfile::from_json)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current() -> PortDetails {
        PortDetails::from_json(&json!({
            "port": 5,
            "name": "Uplink",
            "profileId": "p-default",
            "operation": "switching",
            "linkSpeed": 3,
            "duplex": 2,
            "dot1x": 1,
            "poe": 0,
            "bandWidthCtrlType": 0,
            "lldpMedEnable": false,
            "spanningTreeEnable": true,
            "loopbackDetectEnable": false,
            "portIsolationEnable": false,
            "topoNotifyEnable": true,
        }))
        .unwrap()
    }

    #[test]
    fn test_profile_payload() {
        let payload = update_payload(&current(), PortUpdate::Profile("p-1".into())).unwrap();
        assert_eq!(
            payload,
            json!({"name": "Uplink", "profileId": "p-1", "profileOverrideEnable": false})
        );
    }

    #[test]
    fn test_override_payload_keeps_profile() {
        let settings = current().preserved_settings().unwrap().with_schedule_enabled(true);
        let payload = update_payload(&current(), PortUpdate::Overrides(settings)).unwrap();
        assert_eq!(payload["profileId"], "p-default");
        assert_eq!(payload["profileOverrideEnable"], true);
        assert_eq!(payload["scheduleEnable"], true);
        assert_eq!(payload["linkSpeed"], 3);
        assert_eq!(payload["topoNotifyEnable"], true);
        assert!(payload.get("eeeEnable").is_none());
    }
}
