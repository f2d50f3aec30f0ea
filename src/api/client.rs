use std::time::Duration;

use reqwest::Method;
use serde_json::json;
use tracing::debug;

use super::errors::is_auth_error;
use super::response::ApiResponse;
use super::site_client::OmadaSiteClient;
use crate::error::AppError;

const PATH_INFO: &str = "/api/info";
const PATH_LOGIN: &str = "login";
const PATH_LOGOUT: &str = "logout";
const PATH_CURRENT_USER: &str = "users/current";

/// Where and how to reach a controller.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub verify_ssl: bool,
}

fn build_http_client(verify_ssl: bool) -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .cookie_store(true)
        .danger_accept_invalid_certs(!verify_ssl)
        .timeout(Duration::from_secs(15))
        .build()?)
}

/// Logged-in controller session. Cheap to clone; clones share the cookie jar.
#[derive(Clone)]
pub(crate) struct Session {
    http: reqwest::Client,
    base_url: String,
    omadac_id: String,
    token: Option<String>,
}

impl Session {
    fn url(&self, path: &str) -> String {
        format!("{}/{}/api/v2/{}", self.base_url, self.omadac_id, path)
    }

    /// Send a request to `/{omadacId}/api/v2/{path}` and unwrap the envelope.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Option<serde_json::Value>, AppError> {
        let url = self.url(path);
        debug!(%method, %url, "controller request");

        let mut request = self.http.request(method, &url);
        if let Some(token) = &self.token {
            request = request.header("Csrf-Token", token);
        }
        if let Some(body) = body {
            debug!(body = %body, "request body");
            request = request.json(body);
        }

        let response = request.send().await?;
        let api_response = parse_response(response).await?;
        debug!(
            error_code = api_response.error_code,
            msg = api_response.msg.as_deref().unwrap_or_default(),
            "controller response"
        );
        check(api_response)
    }
}

async fn parse_response(response: reqwest::Response) -> Result<ApiResponse, AppError> {
    if response.status().is_success() {
        Ok(response.json().await?)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Api {
            message: format!("{}: {}", status, body),
            error_code: None,
        })
    }
}

fn check(response: ApiResponse) -> Result<Option<serde_json::Value>, AppError> {
    if response.successful() {
        return Ok(response.result);
    }
    let code = response.error_code;
    let message = response
        .msg
        .unwrap_or_else(|| format!("Controller error code {}", code));
    if is_auth_error(code) {
        Err(AppError::Auth {
            message,
            error_code: Some(code),
        })
    } else {
        Err(AppError::Api {
            message,
            error_code: Some(code),
        })
    }
}

/// Client for one Omada controller.
pub struct OmadaClient {
    session: Session,
}

impl OmadaClient {
    /// Look up the controller id and log in.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, AppError> {
        if config.username.is_empty() {
            return Err(AppError::InvalidInput("Username is required".into()));
        }
        if config.password.is_empty() {
            return Err(AppError::InvalidInput("Password is required".into()));
        }

        let http = build_http_client(config.verify_ssl)?;
        let base_url = config.url.trim_end_matches('/').to_string();
        let omadac_id = controller_id(&http, &base_url).await?;

        let mut session = Session {
            http,
            base_url,
            omadac_id,
            token: None,
        };

        let body = json!({
            "username": config.username,
            "password": config.password,
        });
        let result = session
            .request(Method::POST, PATH_LOGIN, Some(&body))
            .await?
            .unwrap_or_default();
        let token = result
            .get("token")
            .and_then(|v| v.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth {
                message: "Login response did not include a token".into(),
                error_code: None,
            })?;
        session.token = Some(token.to_string());
        debug!(controller = %session.omadac_id, "logged in");

        Ok(Self { session })
    }

    pub fn controller_id(&self) -> &str {
        &self.session.omadac_id
    }

    /// Resolve a site by name, exact match first, then case-insensitive.
    pub async fn get_site_client(&self, site: &str) -> Result<OmadaSiteClient, AppError> {
        let result = self
            .session
            .request(Method::GET, PATH_CURRENT_USER, None)
            .await?
            .unwrap_or_default();

        let sites: Vec<(String, String)> = result
            .pointer("/privilege/sites")
            .and_then(|v| v.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|s| {
                        let name = s.get("name")?.as_str()?;
                        let key = s.get("key")?.as_str()?;
                        Some((name.to_string(), key.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let key = sites
            .iter()
            .find(|(name, _)| name == site)
            .or_else(|| sites.iter().find(|(name, _)| name.eq_ignore_ascii_case(site)))
            .map(|(_, key)| key.clone())
            .ok_or_else(|| AppError::SiteNotFound(site.to_string()))?;

        Ok(OmadaSiteClient::new(self.session.clone(), key))
    }

    /// End the session. Failures are only logged.
    pub async fn logout(&self) {
        if let Err(e) = self.session.request(Method::POST, PATH_LOGOUT, None).await {
            debug!(error = %e, "logout failed");
        }
    }
}

async fn controller_id(http: &reqwest::Client, base_url: &str) -> Result<String, AppError> {
    let url = format!("{}{}", base_url, PATH_INFO);
    debug!(%url, "controller info");
    let response = http.get(&url).send().await?;
    let result = check(parse_response(response).await?)?.unwrap_or_default();
    result
        .get("omadacId")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Api {
            message: "Controller info did not include omadacId".into(),
            error_code: None,
        })
}
