//! Portal configuration sourced from environment variables with an optional
//! yaml override file (`TRE_PORTAL_CONFIG`).
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_POLL_SECS: u64 = 30;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_UI_STATE_FILE: &str = "tre-ui-state.yaml";

#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the workspace API, e.g. `https://tre.example.org/api`.
    pub api_url: String,
    pub workspace_id: String,
    pub workspace_service_id: String,
    /// Audience URI the bearer credential is scoped to.
    pub workspace_app_id_uri: String,
    pub bearer_token: String,
    /// Identifier of the signed-in principal; used only to group resources
    /// by ownership. Unset means the caller owns nothing.
    pub principal_id: Option<String>,
    pub poll_secs: u64,
    pub request_timeout_secs: u64,
    pub ui_state_file: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct PortalConfigOverride {
    api_url: Option<String>,
    workspace_id: Option<String>,
    workspace_service_id: Option<String>,
    workspace_app_id_uri: Option<String>,
    bearer_token: Option<String>,
    principal_id: Option<String>,
    poll_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
    ui_state_file: Option<String>,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_sources(PortalConfigOverride::default())
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let override_cfg = match std::env::var("TRE_PORTAL_CONFIG") {
            Ok(path) => {
                let contents = fs::read_to_string(&path)
                    .with_context(|| format!("read TRE_PORTAL_CONFIG: {path}"))?;
                serde_yaml::from_str(&contents).with_context(|| "parse portal config yaml")?
            }
            Err(_) => PortalConfigOverride::default(),
        };
        Self::from_sources(override_cfg)
    }

    fn from_sources(override_cfg: PortalConfigOverride) -> Result<Self> {
        let api_url = override_cfg
            .api_url
            .or_else(|| env_string("TRE_API_URL"))
            .context("TRE_API_URL must be set")?;
        let workspace_id = override_cfg
            .workspace_id
            .or_else(|| env_string("TRE_WORKSPACE_ID"))
            .context("TRE_WORKSPACE_ID must be set")?;
        let workspace_service_id = override_cfg
            .workspace_service_id
            .or_else(|| env_string("TRE_WORKSPACE_SERVICE_ID"))
            .context("TRE_WORKSPACE_SERVICE_ID must be set")?;
        let workspace_app_id_uri = override_cfg
            .workspace_app_id_uri
            .or_else(|| env_string("TRE_WORKSPACE_APP_ID_URI"))
            .context("TRE_WORKSPACE_APP_ID_URI must be set")?;
        let bearer_token = override_cfg
            .bearer_token
            .or_else(|| env_string("TRE_TOKEN"))
            .context("TRE_TOKEN must be set")?;
        let principal_id = override_cfg
            .principal_id
            .or_else(|| env_string("TRE_PRINCIPAL_ID"));
        let poll_secs = match override_cfg.poll_secs {
            Some(value) => value,
            None => env_u64("TRE_POLL_SECS")?.unwrap_or(DEFAULT_POLL_SECS),
        };
        let request_timeout_secs = match override_cfg.request_timeout_secs {
            Some(value) => value,
            None => env_u64("TRE_REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        let ui_state_file = override_cfg
            .ui_state_file
            .or_else(|| env_string("TRE_UI_STATE_FILE"))
            .unwrap_or_else(|| DEFAULT_UI_STATE_FILE.to_string());
        Ok(PortalConfig {
            api_url,
            workspace_id,
            workspace_service_id,
            workspace_app_id_uri,
            bearer_token,
            principal_id,
            poll_secs,
            request_timeout_secs,
            ui_state_file: PathBuf::from(ui_state_file),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => {
            let parsed = value
                .parse::<u64>()
                .with_context(|| format!("parse {key}"))?;
            Ok(Some(parsed))
        }
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            std::env::set_var(key, value);
            EnvGuard { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            std::env::remove_var(key);
            EnvGuard { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => std::env::set_var(self.key, value),
                None => std::env::remove_var(self.key),
            }
        }
    }

    fn required_env() -> Vec<EnvGuard> {
        vec![
            EnvGuard::set("TRE_API_URL", "https://tre.example.org/api"),
            EnvGuard::set("TRE_WORKSPACE_ID", "ws-1"),
            EnvGuard::set("TRE_WORKSPACE_SERVICE_ID", "svc-1"),
            EnvGuard::set("TRE_WORKSPACE_APP_ID_URI", "api://ws-1"),
            EnvGuard::set("TRE_TOKEN", "tok"),
            EnvGuard::unset("TRE_PRINCIPAL_ID"),
            EnvGuard::unset("TRE_POLL_SECS"),
            EnvGuard::unset("TRE_REQUEST_TIMEOUT_SECS"),
            EnvGuard::unset("TRE_UI_STATE_FILE"),
            EnvGuard::unset("TRE_PORTAL_CONFIG"),
        ]
    }

    #[test]
    #[serial]
    fn from_env_applies_defaults() {
        let _guards = required_env();
        let config = PortalConfig::from_env().expect("config");
        assert_eq!(config.poll_secs, DEFAULT_POLL_SECS);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.ui_state_file, PathBuf::from(DEFAULT_UI_STATE_FILE));
        assert!(config.principal_id.is_none());
    }

    #[test]
    #[serial]
    fn from_env_requires_api_url() {
        let _guards = required_env();
        let _missing = EnvGuard::unset("TRE_API_URL");
        let err = PortalConfig::from_env().err().expect("missing api url");
        assert!(err.to_string().contains("TRE_API_URL"));
    }

    #[test]
    #[serial]
    fn from_env_rejects_unparseable_poll_secs() {
        let _guards = required_env();
        let _bad = EnvGuard::set("TRE_POLL_SECS", "soon");
        let err = PortalConfig::from_env().err().expect("bad poll secs");
        assert!(err.to_string().contains("TRE_POLL_SECS"));
    }

    #[test]
    #[serial]
    fn yaml_override_wins_over_env() {
        let _guards = required_env();
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("portal.yaml");
        std::fs::write(
            &path,
            "workspace_id: ws-override\npoll_secs: 5\nprincipal_id: me\n",
        )
        .expect("write override");
        let _cfg = EnvGuard::set("TRE_PORTAL_CONFIG", path.to_str().expect("utf8 path"));

        let config = PortalConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.workspace_id, "ws-override");
        assert_eq!(config.poll_secs, 5);
        assert_eq!(config.principal_id.as_deref(), Some("me"));
        // Untouched fields still come from the environment.
        assert_eq!(config.workspace_service_id, "svc-1");
    }
}
