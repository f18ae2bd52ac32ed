//! Authenticated workspace API client.
//!
//! # Purpose
//! Issues the portal's REST calls with a bearer credential scoped to the
//! workspace's application id URI and decodes responses into the typed
//! models. All validation of wire payloads happens here so callers only
//! ever see well-formed data or an `ApiError`.
//!
//! # Notes
//! The audience is captured once at construction and treated as stable for
//! the lifetime of the client; a mid-flight audience change is undefined
//! behavior upstream and is not handled here.
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{
    CreateUserResourceRequest, PatchUserResourceRequest, UserResource, UserResourceResponse,
    UserResourceTemplate, UserResourceTemplatesResponse, UserResourcesResponse, WorkspaceService,
    WorkspaceServiceResponse, WorkspaceUser, WorkspaceUsersResponse,
};

pub mod auth;
pub mod error;

pub use auth::{CredentialProvider, CredentialError, StaticCredential};
pub use error::ApiError;

pub(crate) const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error body shape emitted by the API for rejected requests.
#[derive(Debug, Deserialize)]
struct WireError {
    code: Option<String>,
    message: Option<String>,
}

/// HTTP client bound to one API endpoint and one credential audience.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    audience: String,
    credential: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        audience: &str,
        credential: Arc<dyn CredentialProvider>,
    ) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, audience, credential, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: &str,
        audience: &str,
        credential: Arc<dyn CredentialProvider>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            audience: audience.to_string(),
            credential,
        })
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub async fn get_workspace_service(
        &self,
        workspace_id: &str,
        service_id: &str,
    ) -> Result<WorkspaceService, ApiError> {
        let path = service_path(workspace_id, service_id);
        let response: WorkspaceServiceResponse = self.get_json(&path).await?;
        Ok(response.workspace_service)
    }

    pub async fn list_user_resources(
        &self,
        workspace_id: &str,
        service_id: &str,
    ) -> Result<Vec<UserResource>, ApiError> {
        let path = format!("{}/user-resources", service_path(workspace_id, service_id));
        let response: UserResourcesResponse = self.get_json(&path).await?;
        Ok(response.user_resources)
    }

    pub async fn list_user_resource_templates(
        &self,
        workspace_id: &str,
        template_name: &str,
    ) -> Result<Vec<UserResourceTemplate>, ApiError> {
        let path = format!(
            "workspaces/{workspace_id}/workspace-service-templates/{template_name}/user-resource-templates"
        );
        let response: UserResourceTemplatesResponse = self.get_json(&path).await?;
        Ok(response.templates)
    }

    pub async fn list_workspace_users(
        &self,
        workspace_id: &str,
    ) -> Result<Vec<WorkspaceUser>, ApiError> {
        let path = format!("workspaces/{workspace_id}/users");
        let response: WorkspaceUsersResponse = self.get_json(&path).await?;
        Ok(response.users)
    }

    pub async fn create_user_resource(
        &self,
        workspace_id: &str,
        service_id: &str,
        request: &CreateUserResourceRequest,
    ) -> Result<UserResource, ApiError> {
        let path = format!("{}/user-resources", service_path(workspace_id, service_id));
        let response: UserResourceResponse = self
            .request_json(Method::POST, "POST", &path, Some(request))
            .await?;
        Ok(response.user_resource)
    }

    pub async fn patch_user_resource(
        &self,
        workspace_id: &str,
        service_id: &str,
        resource_id: &str,
        request: &PatchUserResourceRequest,
    ) -> Result<UserResource, ApiError> {
        let path = format!(
            "{}/user-resources/{resource_id}",
            service_path(workspace_id, service_id)
        );
        let response: UserResourceResponse = self
            .request_json(Method::PATCH, "PATCH", &path, Some(request))
            .await?;
        Ok(response.user_resource)
    }

    pub async fn delete_user_resource(
        &self,
        workspace_id: &str,
        service_id: &str,
        resource_id: &str,
    ) -> Result<(), ApiError> {
        let path = format!(
            "{}/user-resources/{resource_id}",
            service_path(workspace_id, service_id)
        );
        self.request_empty(Method::DELETE, "DELETE", &path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request_json::<T, ()>(Method::GET, "GET", path, None)
            .await
    }

    async fn request_json<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        method_name: &'static str,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let response = self.send(method, method_name, path, body).await?;
        response.json::<T>().await.map_err(|source| ApiError::Decode {
            method: method_name,
            path: path.to_string(),
            source,
        })
    }

    async fn request_empty(
        &self,
        method: Method,
        method_name: &'static str,
        path: &str,
    ) -> Result<(), ApiError> {
        self.send::<()>(method, method_name, path, None).await?;
        Ok(())
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        method_name: &'static str,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let token = self
            .credential
            .bearer_token(&self.audience)
            .await
            .map_err(|source| ApiError::Credential {
                audience: self.audience.clone(),
                source,
            })?;
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, method = method_name, "workspace api request");
        let mut request = self.http.request(method, &url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                method: method_name,
                path: path.to_string(),
                source,
            })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Rejected: keep whatever diagnostic shape the server sent.
        let body = response.text().await.unwrap_or_default();
        let wire: WireError = serde_json::from_str(&body).unwrap_or(WireError {
            code: None,
            message: None,
        });
        Err(ApiError::Status {
            method: method_name,
            path: path.to_string(),
            status: status.as_u16(),
            code: wire
                .code
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
            message: wire.message.unwrap_or(body),
        })
    }
}

fn service_path(workspace_id: &str, service_id: &str) -> String {
    format!("workspaces/{workspace_id}/workspace-services/{service_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ApiClient::new(
            "https://tre.example.org/api/",
            "api://ws-1",
            Arc::new(StaticCredential::new("tok")),
        )
        .expect("client");
        assert_eq!(client.base_url, "https://tre.example.org/api");
        assert_eq!(client.audience(), "api://ws-1");
    }

    #[test]
    fn service_path_composes_both_ids() {
        assert_eq!(
            service_path("ws-1", "svc-2"),
            "workspaces/ws-1/workspace-services/svc-2"
        );
    }
}
