//! TRE workspace portal terminal front-end.
//!
//! # Purpose
//! Wires configuration, credentials, the workspace API client, and the
//! poll/refresh controller, then renders view snapshots to stdout and reads
//! single-letter commands from stdin (`r` refresh, `t` theme toggle, `q`
//! quit).
//!
//! # Notes
//! Logs go to stderr so the rendered view on stdout stays clean.
mod config;
mod observability;
mod prefs;
mod view;

use anyhow::{Context, Result};
use std::future::Future;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tre_client::{
    ApiClient, RefreshOutcome, ServiceFetchPipeline, ServiceViewController, StaticCredential,
    SyncConfig, ViewPhase,
};

use crate::config::PortalConfig;
use crate::prefs::UiStateStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = PortalConfig::from_env_or_yaml().context("portal config")?;
    observability::init_observability("tre-portal");
    run(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run<F>(config: PortalConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let prefs = UiStateStore::new(config.ui_state_file.clone());
    let mut theme = prefs.load_theme();

    let credential = Arc::new(StaticCredential::new(config.bearer_token.clone()));
    let client = ApiClient::with_timeout(
        &config.api_url,
        &config.workspace_app_id_uri,
        credential,
        config.request_timeout(),
    )
    .context("build api client")?;
    let pipeline = Arc::new(ServiceFetchPipeline::new(
        client,
        config.workspace_id.clone(),
        config.workspace_service_id.clone(),
    ));
    let controller = ServiceViewController::new(
        pipeline,
        SyncConfig {
            poll_interval: config.poll_interval(),
        },
    );
    let principal_id = config.principal_id.clone();

    tracing::info!(
        workspace = %config.workspace_id,
        service = %config.workspace_service_id,
        poll_secs = config.poll_secs,
        "portal starting"
    );

    let mut snapshots = controller.subscribe();
    controller.start().await;
    render(&controller, theme, principal_id.as_deref());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                snapshots.borrow_and_update();
                render(&controller, theme, principal_id.as_deref());
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "r" => {
                        if controller.phase() == ViewPhase::Error {
                            controller.retry().await;
                        } else if controller.refresh().await == RefreshOutcome::AlreadyInFlight {
                            tracing::info!("refresh already in flight");
                        }
                    }
                    "t" => {
                        theme = theme.toggled();
                        if let Err(err) = prefs.store_theme(theme) {
                            tracing::warn!(error = %err, "failed to persist theme preference");
                        }
                        render(&controller, theme, principal_id.as_deref());
                    }
                    "q" => break,
                    "" => {}
                    other => {
                        tracing::info!(command = other, "unknown command; use r, t, or q");
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }

    controller.shutdown();
    tracing::info!("portal stopped");
    Ok(())
}

fn render(controller: &ServiceViewController, theme: prefs::Theme, principal_id: Option<&str>) {
    let snapshot = controller.snapshot();
    println!(
        "{}",
        view::render(
            &snapshot,
            theme,
            principal_id,
            controller.is_refresh_in_flight()
        )
    );
}
