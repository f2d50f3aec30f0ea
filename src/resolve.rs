use tracing::debug;

use crate::error::AppError;
use crate::models::device::Device;
use crate::site::SiteClient;

/// Normalize a MAC address to the controller's `AA-BB-CC-DD-EE-FF` form.
///
/// Accepts `:`, `-` or `.` separators (or none). Returns `None` when the
/// input is not 12 hex digits.
pub fn normalize_mac(input: &str) -> Option<String> {
    let digits: String = input
        .chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect();
    if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let upper = digits.to_ascii_uppercase();
    let pairs: Vec<&str> = (0..6).map(|i| &upper[i * 2..i * 2 + 2]).collect();
    Some(pairs.join("-"))
}

/// Resolve a switch by MAC address or name.
///
/// An identifier shaped like a MAC that matches no device is tried as a name.
pub async fn resolve_switch<C: SiteClient>(site: &C, identifier: &str) -> Result<Device, AppError> {
    let device = match normalize_mac(identifier) {
        Some(mac) => match site.get_device(&mac).await {
            Err(AppError::DeviceNotFound(_)) => {
                debug!(identifier, "no device with that MAC, trying names");
                resolve_by_name(site, identifier).await?
            }
            other => other?,
        },
        None => resolve_by_name(site, identifier).await?,
    };

    if !device.kind().is_switch() {
        return Err(AppError::InvalidInput(format!(
            "'{}' is a {}, not a switch",
            device.name_or_mac(),
            device.kind().category()
        )));
    }
    debug!(mac = %device.mac, name = device.name_or_mac(), "resolved switch");
    Ok(device)
}

async fn resolve_by_name<C: SiteClient>(site: &C, name: &str) -> Result<Device, AppError> {
    let devices = site.list_devices().await?;

    // Resolution priority:
    // 1. Exact name match
    // 2. Case-insensitive name match
    // 3. Partial name match (only if exactly one result)

    if let Some(device) = devices.iter().find(|d| d.name.as_deref() == Some(name)) {
        return Ok(device.clone());
    }

    let name_lower = name.to_lowercase();
    if let Some(device) = devices
        .iter()
        .find(|d| d.name_or_mac().to_lowercase() == name_lower)
    {
        return Ok(device.clone());
    }

    let partial_matches: Vec<&Device> = devices
        .iter()
        .filter(|d| d.name_or_mac().to_lowercase().contains(&name_lower))
        .collect();

    match partial_matches.as_slice() {
        [device] => Ok((*device).clone()),
        [] => Err(AppError::DeviceNotFound(name.to_string())),
        many => {
            let names: Vec<&str> = many.iter().map(|d| d.name_or_mac()).collect();
            Err(AppError::DeviceNotFound(format!(
                "Multiple devices match '{}': {}",
                name,
                names.join(", ")
            )))
        }
    }
}
