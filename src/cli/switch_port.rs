use std::time::Duration;

use clap::{ArgGroup, Args};
use serde_json::json;
use tracing::debug;

use crate::api::OmadaClient;
use crate::auth::credentials::connection_for;
use crate::cli::output::print_json;
use crate::config::{OutputMode, RuntimeConfig};
use crate::error::AppError;
use crate::resolve::resolve_switch;
use crate::site::SiteClient;
use crate::target::TargetStore;
use crate::toggle::{disable_port, enable_port, ConfirmPolicy, DEFAULT_CONFIRM_ATTEMPTS};

#[derive(Args)]
#[command(group(ArgGroup::new("state").required(true).args(["enable", "disable"])))]
pub struct SwitchPortArgs {
    /// The MAC address or name of the switch
    #[arg(value_name = "SWITCH")]
    pub switch: String,

    /// The port number to control
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub port: u32,

    /// Enable the port. If the port has a schedule, disables the schedule.
    /// Otherwise, temporarily sets the port to the Disable profile, then
    /// restores the original profile.
    #[arg(long)]
    pub enable: bool,

    /// Disable the port. With --apply-schedule and a port schedule, enables
    /// the schedule. Otherwise, sets the port to the Disable profile.
    #[arg(long)]
    pub disable: bool,

    /// When disabling, use the port's schedule if it has one
    #[arg(long, requires = "disable")]
    pub apply_schedule: bool,

    /// Output raw port information after the change
    #[arg(short, long)]
    pub dump: bool,

    /// How many times to re-read the port before restoring its profile
    #[arg(long, default_value_t = DEFAULT_CONFIRM_ATTEMPTS)]
    pub confirm_attempts: u32,

    /// Milliseconds to wait before each re-read
    #[arg(long, default_value_t = 1000)]
    pub confirm_interval_ms: u64,
}

impl SwitchPortArgs {
    fn confirm_policy(&self) -> ConfirmPolicy {
        ConfirmPolicy {
            interval: Duration::from_millis(self.confirm_interval_ms),
            max_attempts: self.confirm_attempts,
        }
    }
}

pub async fn handle(args: &SwitchPortArgs, config: &RuntimeConfig) -> Result<(), AppError> {
    let store = TargetStore::load(&config.targets_path)?;
    let target = store.select(config.target.as_deref())?;
    let connection = connection_for(target)?;

    let client = OmadaClient::connect(&connection).await?;
    let site = match client.get_site_client(&target.site).await {
        Ok(site) => site,
        Err(e) => {
            client.logout().await;
            return Err(e);
        }
    };
    debug!(
        target_name = %target.name,
        controller = client.controller_id(),
        site_key = site.site_key(),
        "using site"
    );
    let result = run(&site, args, config).await;
    client.logout().await;
    result
}

pub async fn run<C: SiteClient>(
    site: &C,
    args: &SwitchPortArgs,
    config: &RuntimeConfig,
) -> Result<(), AppError> {
    // Table mode prints each step as it happens.
    let table = config.output_mode == OutputMode::Table;
    let result = execute(site, args, |step| {
        if table {
            println!("{}", step);
        }
    })
    .await?;

    if !table {
        print_json(&result);
    } else if let Some(raw) = result.get("port_details") {
        print_json(raw);
    }
    Ok(())
}

async fn execute<C: SiteClient>(
    site: &C,
    args: &SwitchPortArgs,
    on_step: impl FnMut(&str),
) -> Result<serde_json::Value, AppError> {
    let device = resolve_switch(site, &args.switch).await?;

    let report = if args.enable {
        enable_port(site, &device, args.port, args.confirm_policy(), on_step).await?
    } else {
        disable_port(site, &device, args.port, args.apply_schedule, on_step).await?
    };

    let mut result = json!({
        "device": device.name_or_mac(),
        "mac": &device.mac,
        "model": device.model(),
        "port": report.port,
        "action": report.action,
        "strategy": report.strategy,
        "steps": &report.steps,
    });
    if let Some(state) = report.state {
        result["state"] = json!(state);
    }
    if args.dump {
        result["port_details"] = site.get_switch_port(&device, args.port).await?.raw;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::PortProfile;
    use crate::site::fake::{port_json, Call, FakeSite};

    fn site() -> FakeSite {
        let profiles = vec![
            PortProfile {
                id: "p-default".into(),
                name: "All".into(),
            },
            PortProfile {
                id: "p-1".into(),
                name: "Disable".into(),
            },
        ];
        FakeSite::new(vec![port_json(3, "p-default", None)], profiles)
    }

    fn args(enable: bool, dump: bool) -> SwitchPortArgs {
        SwitchPortArgs {
            switch: "core".into(),
            port: 3,
            enable,
            disable: !enable,
            apply_schedule: false,
            dump,
            confirm_attempts: 1,
            confirm_interval_ms: 0,
        }
    }

    #[tokio::test]
    async fn test_enable_result_fields() {
        let site = site();
        let mut steps = Vec::new();

        let result = execute(&site, &args(true, false), |s| steps.push(s.to_string()))
            .await
            .unwrap();

        assert_eq!(result["device"], "Core Switch");
        assert_eq!(result["mac"], "AA-BB-CC-DD-EE-FF");
        assert_eq!(result["model"], "TL-SG2210P");
        assert_eq!(result["action"], "enable");
        assert_eq!(result["strategy"], "profile_cycle");
        assert_eq!(result["state"], "enabled");
        assert_eq!(result["steps"], json!(steps));
        assert!(result.get("port_details").is_none());
    }

    #[tokio::test]
    async fn test_dump_reads_port_after_change() {
        let site = site();

        let result = execute(&site, &args(false, true), |_| {}).await.unwrap();

        assert_eq!(result["port_details"]["profileId"], "p-1");
        assert_eq!(result["port_details"]["name"], "Port3");
        assert!(result.get("state").is_none());
        assert_eq!(site.calls().last(), Some(&Call::GetPort(3)));
        let reads = site
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::GetPort(_)))
            .count();
        assert_eq!(reads, 2);
    }

    #[tokio::test]
    async fn test_disable_without_dump_skips_extra_read() {
        let site = site();

        execute(&site, &args(false, false), |_| {}).await.unwrap();

        assert!(matches!(site.calls().last(), Some(Call::Update(3, _))));
    }
}
