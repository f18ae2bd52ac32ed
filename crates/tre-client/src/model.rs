//! Workspace API payload definitions.
//!
//! # Purpose
//! Typed request/response shapes for the workspace REST API. Responses are
//! validated at the client boundary so the sync core never sees malformed
//! payloads.
use serde::{Deserialize, Serialize};

/// Deployment lifecycle stage of a resource.
///
/// Unrecognized wire values map to `Unknown` so one odd resource does not
/// fail an entire list fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    AwaitingDeployment,
    Deploying,
    Deployed,
    AwaitingUpdate,
    Updating,
    DeploymentFailed,
    Deleting,
    Deleted,
    #[serde(other)]
    Unknown,
}

impl DeploymentStatus {
    /// Whether the resource finished deploying successfully. Gates actions
    /// that require a usable parent, such as creating a child resource.
    pub fn is_success(&self) -> bool {
        matches!(self, DeploymentStatus::Deployed)
    }

    /// Wire spelling of the status, for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::AwaitingDeployment => "awaiting_deployment",
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Deployed => "deployed",
            DeploymentStatus::AwaitingUpdate => "awaiting_update",
            DeploymentStatus::Updating => "updating",
            DeploymentStatus::DeploymentFailed => "deployment_failed",
            DeploymentStatus::Deleting => "deleting",
            DeploymentStatus::Deleted => "deleted",
            DeploymentStatus::Unknown => "unknown",
        }
    }
}

/// Templated properties bag shared by services and user resources.
///
/// Well-known keys are typed; template-defined extras are kept verbatim in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceProperties {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_exposed_externally: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A per-user deployable artifact, child of a workspace service and owned by
/// exactly one principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResource {
    pub id: String,
    pub owner_id: String,
    pub template_name: String,
    pub deployment_status: DeploymentStatus,
    pub is_enabled: bool,
    #[serde(default)]
    pub properties: ResourceProperties,
}

/// A deployable component within a workspace, parent to zero or more user
/// resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceService {
    pub id: String,
    pub template_name: String,
    pub deployment_status: DeploymentStatus,
    pub is_enabled: bool,
    #[serde(default)]
    pub properties: ResourceProperties,
}

/// A user-resource template offered by a workspace service template. The
/// presence of any template gates the Resources section of the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResourceTemplate {
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A workspace member as returned by the membership endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceUser {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_principal_name: Option<String>,
}

/// Display metadata cached per principal. Contact prefers email and falls
/// back to the user principal name.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedUser {
    pub display_name: String,
    pub contact: Option<String>,
}

impl From<&WorkspaceUser> for CachedUser {
    fn from(user: &WorkspaceUser) -> Self {
        CachedUser {
            display_name: user.display_name.clone(),
            contact: user
                .email
                .clone()
                .or_else(|| user.user_principal_name.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResourceRequest {
    pub template_name: String,
    pub properties: ResourceProperties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchUserResourceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<ResourceProperties>,
}

// Response envelopes, one per endpoint, matching the wire shapes.

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceServiceResponse {
    pub workspace_service: WorkspaceService,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResourcesResponse {
    pub user_resources: Vec<UserResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResourceResponse {
    pub user_resource: UserResource,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResourceTemplatesResponse {
    pub templates: Vec<UserResourceTemplate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceUsersResponse {
    pub users: Vec<WorkspaceUser>,
}
