//! Text rendering of a workspace-service view snapshot.
//!
//! # Purpose
//! Pure presentation over `ServiceView`: loading line, error layout, or the
//! service header plus an ownership-grouped resource listing. All data
//! decisions (what is in the list, who owns what, which labels resolve)
//! happen upstream; this module only formats.
use tre_client::{partition_by_owner, ServiceView, UserResource, ViewPhase};

use crate::prefs::Theme;

pub const EMPTY_RESOURCES_TEXT: &str = "This workspace service contains no user resources.";
pub const LOADING_TEXT: &str = "Loading workspace service...";

pub fn render(
    view: &ServiceView,
    theme: Theme,
    principal_id: Option<&str>,
    refreshing: bool,
) -> String {
    match view.phase {
        ViewPhase::Loading => LOADING_TEXT.to_string(),
        ViewPhase::Error => render_error(view, theme),
        ViewPhase::Ok => render_ok(view, theme, principal_id, refreshing),
    }
}

fn render_error(view: &ServiceView, theme: Theme) -> String {
    let mut out = String::new();
    match &view.error {
        Some(error) => {
            out.push_str(&heading(&error.user_message, theme));
            out.push('\n');
            out.push_str(&format!("  {}\n", error.detail));
        }
        None => out.push_str(&heading("Error", theme)),
    }
    out.push_str("  press r to retry\n");
    out
}

fn render_ok(
    view: &ServiceView,
    theme: Theme,
    principal_id: Option<&str>,
    refreshing: bool,
) -> String {
    let mut out = String::new();
    if let Some(service) = &view.workspace_service {
        let name = service
            .properties
            .display_name
            .as_deref()
            .unwrap_or(&service.template_name);
        out.push_str(&heading(name, theme));
        out.push('\n');
        out.push_str(&format!(
            "  status: {}  enabled: {}\n",
            service.deployment_status.as_str(),
            service.is_enabled
        ));
        if let Some(description) = service.properties.description.as_deref() {
            out.push_str(&format!("  {description}\n"));
        }
    }

    if !view.has_user_resource_templates {
        return out;
    }

    let refresh_marker = if refreshing { " (refreshing...)" } else { "" };
    out.push('\n');
    out.push_str(&heading(&format!("Resources{refresh_marker}"), theme));
    out.push('\n');

    if view.resources.is_empty() {
        out.push_str(&format!("  {EMPTY_RESOURCES_TEXT}\n"));
        return out;
    }

    let partition = partition_by_owner(view.resources.items(), principal_id);
    if !partition.mine.is_empty() {
        out.push_str(&subheading("My Resources", theme));
        out.push('\n');
        for resource in &partition.mine {
            out.push_str(&resource_row(resource, view));
        }
    }
    if !partition.others.is_empty() {
        let title = if partition.mine.is_empty() {
            "All Resources"
        } else {
            "Other Resources"
        };
        out.push_str(&subheading(title, theme));
        out.push('\n');
        for resource in &partition.others {
            out.push_str(&resource_row(resource, view));
        }
    }
    out
}

fn resource_row(resource: &UserResource, view: &ServiceView) -> String {
    let name = resource
        .properties
        .display_name
        .as_deref()
        .unwrap_or(&resource.id);
    let owner = view.users.display_label(&resource.owner_id);
    let mut markers = String::new();
    if !resource.is_enabled {
        markers.push_str("  [disabled]");
    }
    let exposed = view
        .workspace_service
        .as_ref()
        .map(|service| service.properties.is_exposed_externally)
        .unwrap_or(false);
    if exposed {
        markers.push_str("  [external]");
    }
    format!(
        "  - {name}  [{status}]  owner: {owner}{markers}\n",
        status = resource.deployment_status.as_str()
    )
}

fn heading(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Dark => format!("\x1b[1;36m{text}\x1b[0m"),
        Theme::Light => text.to_string(),
    }
}

fn subheading(text: &str, theme: Theme) -> String {
    match theme {
        Theme::Dark => format!("\x1b[1m{text}\x1b[0m"),
        Theme::Light => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tre_client::{
        ResourceList, ServiceView, UserDisplayCache, UserResource, ViewError, WorkspaceService,
        WorkspaceUser,
    };

    fn service() -> WorkspaceService {
        serde_json::from_value(serde_json::json!({
            "id": "svc-1",
            "templateName": "guacamole",
            "deploymentStatus": "deployed",
            "isEnabled": true,
            "properties": { "display_name": "Remote Desktop" }
        }))
        .expect("service")
    }

    fn resource(id: &str, owner: &str) -> UserResource {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "ownerId": owner,
            "templateName": "guacamole-vm",
            "deploymentStatus": "deployed",
            "isEnabled": true,
            "properties": { "display_name": format!("vm-{id}") }
        }))
        .expect("resource")
    }

    fn ok_view(resources: Vec<UserResource>, has_templates: bool) -> ServiceView {
        ServiceView {
            phase: ViewPhase::Ok,
            workspace_service: Some(service()),
            resources: ResourceList::new(resources),
            has_user_resource_templates: has_templates,
            users: UserDisplayCache::default(),
            error: None,
        }
    }

    #[test]
    fn loading_phase_renders_loading_line() {
        let view = ServiceView::default();
        assert_eq!(render(&view, Theme::Light, None, false), LOADING_TEXT);
    }

    #[test]
    fn empty_resource_list_shows_empty_state_text() {
        let view = ok_view(Vec::new(), true);
        let output = render(&view, Theme::Light, Some("me"), false);
        assert!(output.contains("Resources"));
        assert!(output.contains(EMPTY_RESOURCES_TEXT));
    }

    #[test]
    fn missing_templates_hide_the_resources_section() {
        let view = ok_view(Vec::new(), false);
        let output = render(&view, Theme::Light, Some("me"), false);
        assert!(!output.contains("Resources"));
        assert!(!output.contains(EMPTY_RESOURCES_TEXT));
    }

    #[test]
    fn owned_and_other_resources_render_in_separate_groups() {
        let view = ok_view(vec![resource("a", "me"), resource("b", "you")], true);
        let output = render(&view, Theme::Light, Some("me"), false);
        assert!(output.contains("My Resources"));
        assert!(output.contains("Other Resources"));
        assert!(!output.contains("All Resources"));
        assert!(output.contains("vm-a"));
        assert!(output.contains("vm-b"));
    }

    #[test]
    fn all_resources_heading_when_caller_owns_none() {
        let view = ok_view(vec![resource("a", "you")], true);
        let output = render(&view, Theme::Light, Some("me"), false);
        assert!(output.contains("All Resources"));
        assert!(!output.contains("My Resources"));
        assert!(!output.contains("Other Resources"));
    }

    #[test]
    fn owner_labels_resolve_through_the_cache() {
        let mut view = ok_view(vec![resource("a", "u1")], true);
        view.users = UserDisplayCache::from_users(vec![WorkspaceUser {
            id: "u1".to_string(),
            display_name: "Ada Lovelace".to_string(),
            email: None,
            user_principal_name: None,
        }]);
        let output = render(&view, Theme::Light, None, false);
        assert!(output.contains("owner: Ada Lovelace"));

        view.users = UserDisplayCache::default();
        let degraded = render(&view, Theme::Light, None, false);
        assert!(degraded.contains("owner: u1"));
    }

    #[test]
    fn error_phase_renders_user_message_and_detail() {
        let view = ServiceView {
            phase: ViewPhase::Error,
            error: Some(ViewError {
                user_message: "Error retrieving resources".to_string(),
                detail: "GET workspaces/ws-1: http 500: internal: boom".to_string(),
            }),
            ..ServiceView::default()
        };
        let output = render(&view, Theme::Light, None, false);
        assert!(output.contains("Error retrieving resources"));
        assert!(output.contains("http 500"));
        assert!(output.contains("press r to retry"));
    }

    #[test]
    fn dark_theme_wraps_headings_in_ansi_codes() {
        let view = ok_view(Vec::new(), true);
        let dark = render(&view, Theme::Dark, None, false);
        let light = render(&view, Theme::Light, None, false);
        assert!(dark.contains("\x1b["));
        assert!(!light.contains("\x1b["));
    }

    #[test]
    fn refresh_marker_appears_while_in_flight() {
        let view = ok_view(Vec::new(), true);
        let output = render(&view, Theme::Light, None, true);
        assert!(output.contains("(refreshing...)"));
    }

    #[test]
    fn disabled_resources_are_marked() {
        let mut disabled = resource("a", "me");
        disabled.is_enabled = false;
        let view = ok_view(vec![disabled], true);
        let output = render(&view, Theme::Light, Some("me"), false);
        assert!(output.contains("[disabled]"));
    }
}
