use std::env;

use crate::api::ConnectionConfig;
use crate::auth::keychain;
use crate::error::AppError;
use crate::target::TargetConfig;

pub const PASSWORD_ENV: &str = "OMADA_PASSWORD";

/// Password from the environment, or None if not set.
pub fn password_from_env() -> Option<String> {
    env::var(PASSWORD_ENV).ok().filter(|p| !p.is_empty())
}

/// Build connection settings for a target. The environment wins over the
/// keychain.
pub fn connection_for(target: &TargetConfig) -> Result<ConnectionConfig, AppError> {
    let password = match password_from_env() {
        Some(p) => p,
        None => keychain::get_password(&target.name)?
            .ok_or_else(|| AppError::MissingPassword(target.name.clone()))?,
    };

    Ok(ConnectionConfig {
        url: target.url.clone(),
        username: target.username.clone(),
        password,
        verify_ssl: target.verify_ssl,
    })
}
