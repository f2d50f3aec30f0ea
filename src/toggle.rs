use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::models::device::Device;
use crate::models::port::PortState;
use crate::models::profile::{find_profile, DISABLE_PROFILE};
use crate::site::{PortUpdate, SiteClient};

pub const DEFAULT_CONFIRM_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_CONFIRM_ATTEMPTS: u32 = 5;

/// How long to wait for a temporary disable to show up before restoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for ConfirmPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_CONFIRM_INTERVAL,
            max_attempts: DEFAULT_CONFIRM_ATTEMPTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PortAction {
    Enable,
    Disable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleStrategy {
    /// Flip the port's schedule through a settings override.
    ScheduleToggle,
    /// Assign the Disable profile and leave it there.
    ProfileDisable,
    /// Assign the Disable profile, then put the original profile back.
    ProfileCycle,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleReport {
    pub port: u32,
    pub action: PortAction,
    pub strategy: ToggleStrategy,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<PortState>,
}

impl ToggleReport {
    fn new(port: u32, action: PortAction, strategy: ToggleStrategy) -> Self {
        Self {
            port,
            action,
            strategy,
            steps: Vec::new(),
            state: None,
        }
    }

    /// Record a step and hand it to `on_step` straight away, so a caller can
    /// show progress even when a later step fails.
    fn step(&mut self, on_step: &mut impl FnMut(&str), message: String) {
        info!("{}", message);
        on_step(&message);
        self.steps.push(message);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentPhase {
    Captured,
    Applied,
    Restored,
}

/// What a profile cycle changed, kept so a failed restore can be undone by hand.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSwapIntent {
    pub device_mac: String,
    pub port: u32,
    pub original_profile_id: String,
    pub applied_profile_id: String,
    pub captured_at: DateTime<Utc>,
    pub phase: IntentPhase,
}

impl ProfileSwapIntent {
    fn capture(device: &Device, port: u32, original: String, applied: String) -> Self {
        Self {
            device_mac: device.mac.clone(),
            port,
            original_profile_id: original,
            applied_profile_id: applied,
            captured_at: Utc::now(),
            phase: IntentPhase::Captured,
        }
    }

    fn advance(&mut self, phase: IntentPhase) {
        self.phase = phase;
        debug!(
            device = %self.device_mac,
            port = self.port,
            original = %self.original_profile_id,
            applied = %self.applied_profile_id,
            phase = ?self.phase,
            "profile swap"
        );
    }
}

async fn disable_profile_id<C: SiteClient>(site: &C) -> Result<String, AppError> {
    let profiles = site.get_port_profiles().await?;
    find_profile(&profiles, DISABLE_PROFILE)
        .map(|p| p.id.clone())
        .ok_or_else(|| AppError::ProfileNotFound(DISABLE_PROFILE.into()))
}

/// Re-read the port until it reports `profile_id` (or reports itself
/// disabled). Returns false when the attempts run out; read errors count as
/// unconfirmed attempts.
async fn wait_for_profile<C: SiteClient>(
    site: &C,
    device: &Device,
    port: u32,
    profile_id: &str,
    confirm: ConfirmPolicy,
) -> bool {
    for attempt in 1..=confirm.max_attempts {
        tokio::time::sleep(confirm.interval).await;
        match site.get_switch_port(device, port).await {
            Ok(details) if details.profile_id == profile_id || details.is_disabled => {
                debug!(port, attempt, "profile change confirmed");
                return true;
            }
            Ok(_) => debug!(port, attempt, "profile change not visible yet"),
            Err(e) => warn!(port, attempt, error = %e, "port read failed while confirming"),
        }
    }
    confirm.max_attempts == 0
}

/// Enable a port.
///
/// A port with a schedule is enabled by switching the schedule off while
/// keeping every other setting. Otherwise the port is bounced through the
/// Disable profile and put back on the profile it had before.
pub async fn enable_port<C: SiteClient>(
    site: &C,
    device: &Device,
    port: u32,
    confirm: ConfirmPolicy,
    mut on_step: impl FnMut(&str),
) -> Result<ToggleReport, AppError> {
    let details = site.get_switch_port(device, port).await?;
    let original_profile = details.profile_id.clone();

    if details.has_schedule() {
        let mut report = ToggleReport::new(port, PortAction::Enable, ToggleStrategy::ScheduleToggle);
        let settings = details.preserved_settings()?.with_schedule_enabled(false);
        site.update_switch_port(device, port, PortUpdate::Overrides(settings))
            .await?;
        report.step(&mut on_step, format!("Port {} enabled by disabling schedule", port));
        return Ok(report);
    }

    let mut report = ToggleReport::new(port, PortAction::Enable, ToggleStrategy::ProfileCycle);
    let disable_id = disable_profile_id(site).await?;
    let mut intent = ProfileSwapIntent::capture(device, port, original_profile, disable_id.clone());

    site.update_switch_port(device, port, PortUpdate::Profile(disable_id.clone()))
        .await?;
    intent.advance(IntentPhase::Applied);
    report.step(&mut on_step, format!("Port {} temporarily disabled", port));

    if !wait_for_profile(site, device, port, &disable_id, confirm).await {
        warn!(port, attempts = confirm.max_attempts, "disable not confirmed, restoring anyway");
        report.step(
            &mut on_step,
            format!("Port {} disable unconfirmed after {} checks", port, confirm.max_attempts),
        );
    }

    let restore = PortUpdate::Profile(intent.original_profile_id.clone());
    if let Err(source) = site.update_switch_port(device, port, restore).await {
        return Err(AppError::RestoreFailed {
            intent: Box::new(intent),
            source: Box::new(source),
        });
    }
    intent.advance(IntentPhase::Restored);
    report.step(&mut on_step, format!("Port {} re-enabled with original profile", port));

    let refreshed = site.get_switch_port(device, port).await?;
    report.state = Some(refreshed.state());
    report.step(&mut on_step, format!("Port {} status: {}", port, refreshed.state()));
    Ok(report)
}

/// Disable a port.
///
/// With `apply_schedule` a port that has a schedule is disabled by switching
/// the schedule on; every other case assigns the Disable profile.
pub async fn disable_port<C: SiteClient>(
    site: &C,
    device: &Device,
    port: u32,
    apply_schedule: bool,
    mut on_step: impl FnMut(&str),
) -> Result<ToggleReport, AppError> {
    let details = site.get_switch_port(device, port).await?;

    if details.has_schedule() && apply_schedule {
        let mut report =
            ToggleReport::new(port, PortAction::Disable, ToggleStrategy::ScheduleToggle);
        let settings = details.preserved_settings()?.with_schedule_enabled(true);
        site.update_switch_port(device, port, PortUpdate::Overrides(settings))
            .await?;
        report.step(&mut on_step, format!("Port {} disabled by enabling schedule", port));
        return Ok(report);
    }

    let mut report = ToggleReport::new(port, PortAction::Disable, ToggleStrategy::ProfileDisable);
    let disable_id = disable_profile_id(site).await?;
    site.update_switch_port(device, port, PortUpdate::Profile(disable_id))
        .await?;
    report.step(&mut on_step, format!("Port {} disabled via profile", port));
    Ok(report)
}
