use clap::Subcommand;
use dialoguer::Password;
use serde_json::json;
use tabled::Tabled;
use tracing::warn;

use crate::auth::credentials::password_from_env;
use crate::auth::keychain;
use crate::cli::output::{print_json, print_table};
use crate::config::{OutputMode, RuntimeConfig};
use crate::error::AppError;
use crate::target::{TargetConfig, TargetStore, DEFAULT_SITE};

#[derive(Subcommand)]
pub enum TargetCommand {
    /// Add or replace a controller target
    Add {
        /// Target name
        name: String,
        /// Controller URL, e.g. https://omada.lan:8043
        #[arg(long)]
        url: String,
        /// Controller username
        #[arg(short, long)]
        username: String,
        /// Site name
        #[arg(long, default_value = DEFAULT_SITE)]
        site: String,
        /// Accept self-signed controller certificates
        #[arg(long)]
        no_verify_ssl: bool,
        /// Make this the default target
        #[arg(long)]
        set_default: bool,
    },

    /// List stored targets
    List,

    /// Remove a target and its stored password
    Remove {
        /// Target name
        name: String,
    },

    /// Set the default target
    #[command(name = "default")]
    SetDefault {
        /// Target name
        name: String,
    },
}

#[derive(Tabled)]
struct TargetRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "URL")]
    url: String,
    #[tabled(rename = "USERNAME")]
    username: String,
    #[tabled(rename = "SITE")]
    site: String,
    #[tabled(rename = "VERIFY SSL")]
    verify_ssl: String,
    #[tabled(rename = "DEFAULT")]
    default: String,
}

pub async fn handle(cmd: &TargetCommand, config: &RuntimeConfig) -> Result<(), AppError> {
    match cmd {
        TargetCommand::Add {
            name,
            url,
            username,
            site,
            no_verify_ssl,
            set_default,
        } => {
            let target = TargetConfig {
                name: name.clone(),
                url: url.clone(),
                username: username.clone(),
                site: site.clone(),
                verify_ssl: !no_verify_ssl,
            };
            handle_add(target, *set_default, config)
        }
        TargetCommand::List => handle_list(config),
        TargetCommand::Remove { name } => handle_remove(name, config),
        TargetCommand::SetDefault { name } => {
            let mut store = TargetStore::load(&config.targets_path)?;
            store.set_default(name)?;
            store.save(&config.targets_path)?;
            print_json(&json!({"default": name}));
            Ok(())
        }
    }
}

fn handle_add(target: TargetConfig, set_default: bool, config: &RuntimeConfig) -> Result<(), AppError> {
    if !(target.url.starts_with("https://") || target.url.starts_with("http://")) {
        return Err(AppError::InvalidInput(format!(
            "Controller URL must start with http:// or https://: {}",
            target.url
        )));
    }

    // With OMADA_PASSWORD set the keychain is never consulted, so nothing is stored.
    let password_stored = if password_from_env().is_none() {
        let password: String = Password::new()
            .with_prompt(format!("Password for {}", target.username))
            .interact()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        keychain::store_password(&target.name, &password)?;
        true
    } else {
        false
    };

    let mut store = TargetStore::load(&config.targets_path)?;
    let name = target.name.clone();
    store.upsert(target);
    if set_default {
        store.set_default(&name)?;
    }
    store.save(&config.targets_path)?;

    print_json(&json!({
        "target": name,
        "default": store.default.as_deref() == Some(name.as_str()),
        "password_stored": password_stored,
    }));
    Ok(())
}

fn handle_list(config: &RuntimeConfig) -> Result<(), AppError> {
    let store = TargetStore::load(&config.targets_path)?;
    let is_default = |t: &TargetConfig| store.default.as_deref() == Some(t.name.as_str());

    if config.output_mode == OutputMode::Table {
        let rows: Vec<TargetRow> = store
            .targets
            .iter()
            .map(|t| TargetRow {
                name: t.name.clone(),
                url: t.url.clone(),
                username: t.username.clone(),
                site: t.site.clone(),
                verify_ssl: if t.verify_ssl { "yes" } else { "no" }.to_string(),
                default: if is_default(t) { "*" } else { "" }.to_string(),
            })
            .collect();
        print_table(&rows);
    } else {
        let targets: Vec<serde_json::Value> = store
            .targets
            .iter()
            .map(|t| {
                json!({
                    "name": t.name,
                    "url": t.url,
                    "username": t.username,
                    "site": t.site,
                    "verify_ssl": t.verify_ssl,
                    "default": is_default(t),
                })
            })
            .collect();
        print_json(&json!(targets));
    }
    Ok(())
}

fn handle_remove(name: &str, config: &RuntimeConfig) -> Result<(), AppError> {
    let mut store = TargetStore::load(&config.targets_path)?;
    store.remove(name)?;
    store.save(&config.targets_path)?;

    if let Err(e) = keychain::delete_password(name) {
        warn!(target_name = name, error = %e, "could not remove stored password");
    }

    print_json(&json!({"removed": name}));
    Ok(())
}
