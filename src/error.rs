use crate::toggle::ProfileSwapIntent;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        error_code: Option<i32>,
    },

    #[error("No controller target configured. Run 'omada target add' first.")]
    NoTarget,

    #[error("No password for target '{0}'. Set OMADA_PASSWORD or re-add the target.")]
    MissingPassword(String),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Site not found: {0}")]
    SiteNotFound(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Could not find {0} profile")]
    ProfileNotFound(String),

    #[error("API error: {message}")]
    Api {
        message: String,
        error_code: Option<i32>,
    },

    #[error(
        "Port {port} left on profile {profile} after restore failed: {source}",
        port = .intent.port,
        profile = .intent.applied_profile_id
    )]
    RestoreFailed {
        intent: Box<ProfileSwapIntent>,
        source: Box<AppError>,
    },

    #[error("Keychain error: {0}")]
    Keychain(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Auth { .. } | AppError::NoTarget | AppError::MissingPassword(_) => 2,
            AppError::TargetNotFound(_)
            | AppError::SiteNotFound(_)
            | AppError::DeviceNotFound(_)
            | AppError::ProfileNotFound(_) => 3,
            AppError::RestoreFailed { .. } => 5,
            _ => 1,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Auth { .. } => "auth",
            AppError::NoTarget => "no_target",
            AppError::MissingPassword(_) => "missing_password",
            AppError::TargetNotFound(_) => "target_not_found",
            AppError::SiteNotFound(_) => "site_not_found",
            AppError::DeviceNotFound(_) => "device_not_found",
            AppError::ProfileNotFound(_) => "profile_not_found",
            AppError::Api { .. } => "api",
            AppError::RestoreFailed { .. } => "restore_failed",
            AppError::Keychain(_) => "keychain",
            AppError::Config(_) => "config",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Http(_) => "http",
            AppError::Json(_) => "json",
            AppError::Io(_) => "io",
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let mut obj = serde_json::json!({
            "error": self.error_type(),
            "message": self.to_string(),
        });
        if let Some(code) = self.api_error_code() {
            obj["error_code"] = serde_json::json!(code);
        }
        if let AppError::RestoreFailed { intent, .. } = self {
            obj["intent"] = serde_json::to_value(intent).unwrap_or_default();
        }
        obj
    }

    fn api_error_code(&self) -> Option<i32> {
        match self {
            AppError::Auth { error_code, .. } | AppError::Api { error_code, .. } => *error_code,
            AppError::RestoreFailed { source, .. } => source.api_error_code(),
            _ => None,
        }
    }
}
