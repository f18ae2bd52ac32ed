// Client-side data layer for a TRE workspace portal.
//
// This crate talks to the workspace REST API on behalf of one authenticated
// principal and keeps a local, renderable view of a workspace service and its
// user resources:
//
// - `api`: typed HTTP client; every call carries a bearer credential scoped
//   to the workspace's application id URI. Token acquisition itself is
//   delegated behind `CredentialProvider`.
// - `store`: ordered, copy-on-write list of user resources keyed by id.
//   Replace/remove of an absent id is a silent no-op; a concurrent poll may
//   have already dropped the entry and that race is benign.
// - `partition`: pure split of a resource list into "owned by the current
//   principal" and "owned by others".
// - `users`: best-effort owner display cache. When the secondary user fetch
//   fails the cache is rebuilt empty rather than left stale, so labels
//   degrade to raw identifiers instead of going wrong.
// - `sync`: the poll/refresh controller. Runs the fetch pipeline, publishes
//   atomic view snapshots through a watch channel, and re-polls on a fixed
//   interval while the view stays healthy.
//
// Single-threaded in spirit: concurrency here means overlapping async
// operations (timer ticks, manual refreshes), not parallel state mutation.
// The refresh pipeline is gated by one boolean flag, and list replacement is
// always wholesale, never partial.

#[macro_use]
mod macros;

pub mod api;
pub mod model;
pub mod partition;
pub mod store;
pub mod sync;
pub mod users;

pub use api::auth::{CredentialProvider, StaticCredential};
pub use api::{ApiClient, ApiError};
pub use model::{
    CachedUser, CreateUserResourceRequest, DeploymentStatus, PatchUserResourceRequest,
    ResourceProperties, UserResource, UserResourceTemplate, WorkspaceService, WorkspaceUser,
};
pub use partition::{partition_by_owner, OwnershipPartition};
pub use store::ResourceList;
pub use sync::{
    FetchPipeline, PrimaryFetch, RefreshOutcome, ServiceFetchPipeline, ServiceView,
    ServiceViewController, SyncConfig, ViewError, ViewPhase,
};
pub use users::UserDisplayCache;
