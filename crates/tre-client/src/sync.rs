//! Poll/refresh orchestration for a workspace-service view.
//!
//! # Purpose
//! Owns the view's fetch lifecycle: runs the full pipeline (service, user
//! resources, templates, then the best-effort user cache), publishes atomic
//! `ServiceView` snapshots through a watch channel, and re-polls on a fixed
//! interval while the view is in the steady `Ok` phase.
//!
//! # Design notes
//! A refresh replaces the stored lists wholesale; readers of the watch
//! channel always observe a complete snapshot, never a half-applied one.
//! Overlapping pipeline runs are prevented by a single atomic flag rather
//! than a lock: a trigger that loses the race is dropped, not queued. The
//! poll timer is a scoped resource: armed on entering `Ok`, its task exits
//! when the phase leaves `Ok`, and `shutdown`/`Drop` abort it on every other
//! exit path so no orphaned timer outlives the view.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::api::{ApiClient, ApiError};
use crate::model::{UserResource, UserResourceTemplate, WorkspaceService, WorkspaceUser};
use crate::store::ResourceList;
use crate::users::UserDisplayCache;

/// User-facing message attached to every failed primary fetch.
pub const FETCH_ERROR_MESSAGE: &str = "Error retrieving resources";

/// Default poll period; the portal refreshes deployment status twice a
/// minute.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Lifecycle phase of the view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewPhase {
    #[default]
    Loading,
    Ok,
    Error,
}

/// Error payload carried by the `Error` phase: what the user sees plus the
/// diagnostic detail already emitted to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub user_message: String,
    pub detail: String,
}

impl ViewError {
    fn from_api_error(err: &ApiError) -> Self {
        ViewError {
            user_message: FETCH_ERROR_MESSAGE.to_string(),
            detail: err.to_string(),
        }
    }
}

/// One consistent snapshot of everything the view renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceView {
    pub phase: ViewPhase,
    pub workspace_service: Option<WorkspaceService>,
    pub resources: ResourceList,
    pub has_user_resource_templates: bool,
    pub users: UserDisplayCache,
    pub error: Option<ViewError>,
}

/// Result of the primary fetch: everything that must succeed for the view
/// to be healthy.
#[derive(Debug, Clone)]
pub struct PrimaryFetch {
    pub workspace_service: WorkspaceService,
    pub user_resources: Vec<UserResource>,
    pub templates: Vec<UserResourceTemplate>,
}

/// The two-stage fetch pipeline the controller drives.
///
/// `fetch_primary` failures are fatal to the view; `fetch_users` failures
/// are absorbed and only degrade owner labels.
#[async_trait]
pub trait FetchPipeline: Send + Sync {
    async fn fetch_primary(&self) -> Result<PrimaryFetch, ApiError>;
    async fn fetch_users(&self) -> Result<Vec<WorkspaceUser>, ApiError>;
}

/// `FetchPipeline` backed by the workspace API for one service.
pub struct ServiceFetchPipeline {
    client: ApiClient,
    workspace_id: String,
    service_id: String,
}

impl ServiceFetchPipeline {
    pub fn new(client: ApiClient, workspace_id: impl Into<String>, service_id: impl Into<String>) -> Self {
        ServiceFetchPipeline {
            client,
            workspace_id: workspace_id.into(),
            service_id: service_id.into(),
        }
    }
}

#[async_trait]
impl FetchPipeline for ServiceFetchPipeline {
    async fn fetch_primary(&self) -> Result<PrimaryFetch, ApiError> {
        let workspace_service = self
            .client
            .get_workspace_service(&self.workspace_id, &self.service_id)
            .await?;
        let user_resources = self
            .client
            .list_user_resources(&self.workspace_id, &self.service_id)
            .await?;
        let templates = self
            .client
            .list_user_resource_templates(&self.workspace_id, &workspace_service.template_name)
            .await?;
        Ok(PrimaryFetch {
            workspace_service,
            user_resources,
            templates,
        })
    }

    async fn fetch_users(&self) -> Result<Vec<WorkspaceUser>, ApiError> {
        self.client.list_workspace_users(&self.workspace_id).await
    }
}

/// Outcome of a manual refresh trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The pipeline ran to completion; the phase it landed in is attached.
    Completed(ViewPhase),
    /// Another refresh was already in flight; no fetch was issued.
    AlreadyInFlight,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Drives the fetch pipeline for one workspace-service view.
pub struct ServiceViewController {
    pipeline: Arc<dyn FetchPipeline>,
    state: watch::Sender<ServiceView>,
    refresh_in_flight: AtomicBool,
    poll_interval: Duration,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

impl ServiceViewController {
    pub fn new(pipeline: Arc<dyn FetchPipeline>, config: SyncConfig) -> Arc<Self> {
        let (state, _) = watch::channel(ServiceView::default());
        Arc::new(ServiceViewController {
            pipeline,
            state,
            refresh_in_flight: AtomicBool::new(false),
            poll_interval: config.poll_interval,
            poll_task: Mutex::new(None),
        })
    }

    /// Watch handle for view snapshots. Every published value is complete;
    /// partial list replacement is never observable.
    pub fn subscribe(&self) -> watch::Receiver<ServiceView> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> ServiceView {
        self.state.borrow().clone()
    }

    pub fn phase(&self) -> ViewPhase {
        self.state.borrow().phase
    }

    /// True while a refresh pipeline run (manual or scheduled) is in
    /// flight. The view uses this to disable its refresh control.
    pub fn is_refresh_in_flight(&self) -> bool {
        self.refresh_in_flight.load(Ordering::SeqCst)
    }

    /// Initial load: enters `Loading`, runs the pipeline, arms the poll
    /// timer on success.
    pub async fn start(self: &Arc<Self>) {
        self.load().await;
    }

    /// Re-trigger after an error. There is no automatic recovery out of
    /// `Error`; this is the view's explicit way back through `Loading`.
    pub async fn retry(self: &Arc<Self>) {
        self.load().await;
    }

    async fn load(self: &Arc<Self>) {
        if !self.try_begin_refresh() {
            debug!("load skipped, refresh already in flight");
            return;
        }
        self.state.send_modify(|view| {
            view.phase = ViewPhase::Loading;
            view.error = None;
        });
        let phase = self.run_pipeline().await;
        self.end_refresh();
        if phase == ViewPhase::Ok {
            self.arm_poll_timer();
        }
    }

    /// Manual refresh trigger. Rejected without issuing any fetch when a
    /// refresh is already in flight; the timer is unaffected either way.
    pub async fn refresh(self: &Arc<Self>) -> RefreshOutcome {
        if !self.try_begin_refresh() {
            t_counter!("tre_client_refresh_rejected_total").increment(1);
            debug!("manual refresh rejected, already in flight");
            return RefreshOutcome::AlreadyInFlight;
        }
        let phase = self.run_pipeline().await;
        self.end_refresh();
        if phase == ViewPhase::Ok {
            // Covers refresh-driven recovery when no timer is alive.
            self.arm_poll_timer();
        }
        RefreshOutcome::Completed(phase)
    }

    /// Tears the controller down: no further scheduled fetches will run.
    pub fn shutdown(&self) {
        self.disarm_poll_timer();
    }

    // Optimistic local-list reconciliation after a targeted API call. The
    // next poll replaces the list wholesale anyway; these keep the view
    // current in between.

    pub fn apply_add(&self, resource: UserResource) {
        self.state
            .send_modify(|view| view.resources = view.resources.add(resource.clone()));
    }

    pub fn apply_update(&self, resource: UserResource) {
        self.state
            .send_modify(|view| view.resources = view.resources.update(resource.clone()));
    }

    pub fn apply_remove(&self, resource: &UserResource) {
        self.state
            .send_modify(|view| view.resources = view.resources.remove(resource));
    }

    fn try_begin_refresh(&self) -> bool {
        self.refresh_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn end_refresh(&self) {
        self.refresh_in_flight.store(false, Ordering::SeqCst);
    }

    /// Runs the full pipeline once and publishes the resulting snapshot.
    /// Caller must hold the refresh flag.
    async fn run_pipeline(&self) -> ViewPhase {
        t_counter!("tre_client_refresh_total").increment(1);
        let primary = match self.pipeline.fetch_primary().await {
            Ok(primary) => primary,
            Err(err) => {
                t_counter!("tre_client_refresh_errors_total").increment(1);
                error!(error = %err, "primary resource fetch failed");
                let view_error = ViewError::from_api_error(&err);
                self.state.send_modify(|view| {
                    view.phase = ViewPhase::Error;
                    view.error = Some(view_error.clone());
                });
                return ViewPhase::Error;
            }
        };
        // Secondary fetch: owner display metadata. Failures degrade labels
        // to raw identifiers; they never fail the refresh.
        let users = match self.pipeline.fetch_users().await {
            Ok(users) => UserDisplayCache::from_users(users),
            Err(err) => {
                warn!(error = %err, "workspace user fetch failed, owner labels fall back to ids");
                UserDisplayCache::default()
            }
        };
        self.state.send_modify(|view| {
            view.phase = ViewPhase::Ok;
            view.workspace_service = Some(primary.workspace_service.clone());
            view.has_user_resource_templates = !primary.templates.is_empty();
            view.resources = ResourceList::from(primary.user_resources.clone());
            view.users = users.clone();
            view.error = None;
        });
        debug!(
            resources = primary.user_resources.len(),
            users = users.len(),
            "refresh pipeline completed"
        );
        ViewPhase::Ok
    }

    /// Arms the recurring poll timer if none is alive. The task re-checks
    /// the phase on every tick and exits as soon as the view leaves `Ok`,
    /// so an error refresh (scheduled or manual) disarms polling.
    fn arm_poll_timer(self: &Arc<Self>) {
        let mut guard = self.poll_task.lock().expect("poll timer lock");
        if let Some(handle) = guard.as_ref() {
            if !handle.is_finished() {
                return;
            }
        }
        let weak: Weak<ServiceViewController> = Arc::downgrade(self);
        let period = self.poll_interval;
        *guard = Some(tokio::spawn(async move {
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            loop {
                ticker.tick().await;
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                if controller.phase() != ViewPhase::Ok {
                    break;
                }
                if !controller.try_begin_refresh() {
                    // A manual refresh is mid-flight; skip this tick rather
                    // than queueing a second pipeline run.
                    continue;
                }
                let phase = controller.run_pipeline().await;
                controller.end_refresh();
                if phase != ViewPhase::Ok {
                    break;
                }
            }
        }));
    }

    fn disarm_poll_timer(&self) {
        if let Some(handle) = self.poll_task.lock().expect("poll timer lock").take() {
            handle.abort();
        }
    }
}

impl Drop for ServiceViewController {
    fn drop(&mut self) {
        self.disarm_poll_timer();
    }
}
