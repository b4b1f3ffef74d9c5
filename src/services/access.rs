//! Role and department gating predicates.
//!
//! Every check here is a pure function of the request context and the
//! target row. Role comparisons are numeric: a lower level is more
//! privileged, and an actor may act when its level is at or below the
//! threshold.

use uuid::Uuid;

use crate::middleware::auth::RequestContext;
use crate::models::chat::ChatChannel;
use crate::models::document::Document;
use crate::models::role::{self, level_for_name};

/// Department sentinel meaning "every department".
pub const ALL_DEPARTMENTS: &str = "All";

/// Highest level allowed to administer roles.
pub const ROLE_ADMIN_LEVEL: i32 = 1;

/// Highest level allowed to delete any document.
pub const DOCUMENT_DELETE_LEVEL: i32 = 2;

/// Highest level allowed to upload documents (VP and above).
pub const DOCUMENT_UPLOAD_LEVEL: i32 = 3;

pub fn can_act(level: i32, threshold: i32) -> bool {
    level <= threshold
}

/// Whether an entity addressed to `departments` (or, for older rows, the
/// single `legacy` string) reaches `department`.
///
/// A non-empty list is authoritative. The legacy string is only consulted
/// when the list is absent or empty.
pub fn targets_department(
    departments: Option<&[String]>,
    legacy: Option<&str>,
    department: Option<&str>,
) -> bool {
    if let Some(list) = departments.filter(|l| !l.is_empty()) {
        return list
            .iter()
            .any(|d| d == ALL_DEPARTMENTS || Some(d.as_str()) == department);
    }

    match legacy {
        Some(ALL_DEPARTMENTS) => true,
        Some(legacy) => Some(legacy) == department,
        None => false,
    }
}

/// Resolve the target list for a new entity: the explicit list when given,
/// otherwise the single department, otherwise everyone.
pub fn normalize_targets(departments: Option<Vec<String>>, department: Option<String>) -> Vec<String> {
    match departments {
        Some(list) if !list.is_empty() => list,
        _ => vec![department.unwrap_or_else(|| ALL_DEPARTMENTS.to_string())],
    }
}

/// Legacy single-string form of a target list, kept in sync for older clients.
pub fn legacy_department(departments: &[String]) -> String {
    if departments.iter().any(|d| d == ALL_DEPARTMENTS) {
        ALL_DEPARTMENTS.to_string()
    } else {
        departments.join(", ")
    }
}

/// Least privileged level that may read `document`.
///
/// An explicit `access_levels` list opens the document to every tier down to
/// its least privileged entry; otherwise the legacy `access_level` applies,
/// defaulting to Employee.
///
/// The list is read as a threshold, not as exact membership: `[Officer]`
/// also admits VPs and Senior VPs, where the web client only showed the
/// document to roles named in the list.
pub fn required_document_level(document: &Document) -> i32 {
    if let Some(levels) = document.access_levels.as_ref().filter(|l| !l.is_empty()) {
        return levels
            .iter()
            .map(|name| level_for_name(name))
            .max()
            .unwrap_or(role::UNKNOWN_LEVEL);
    }

    level_for_name(document.access_level.as_deref().unwrap_or(role::EMPLOYEE))
}

pub fn can_access_document(ctx: &RequestContext, document: &Document) -> bool {
    if ctx.is_admin() {
        return true;
    }

    if !can_act(ctx.level(), required_document_level(document)) {
        return false;
    }

    let untargeted = document.departments.as_ref().map_or(true, |d| d.is_empty())
        && document.department.as_deref().map_or(true, str::is_empty);
    untargeted
        || targets_department(
            document.departments.as_deref(),
            document.department.as_deref(),
            ctx.department.as_deref(),
        )
}

pub fn can_upload_document(ctx: &RequestContext) -> bool {
    can_act(ctx.level(), DOCUMENT_UPLOAD_LEVEL)
}

/// Senior VP and above may delete anything; a VP only documents of their own
/// department or that they uploaded.
pub fn can_delete_document(ctx: &RequestContext, document: &Document) -> bool {
    if can_act(ctx.level(), DOCUMENT_DELETE_LEVEL) {
        return true;
    }
    if !can_upload_document(ctx) {
        return false;
    }

    let same_department = ctx.department.is_some() && document.department == ctx.department;
    same_department || document.uploaded_by == Some(ctx.user_id)
}

pub fn can_access_channel(ctx: &RequestContext, channel: &ChatChannel) -> bool {
    let required = channel
        .required_role
        .as_deref()
        .map(level_for_name)
        .unwrap_or(role::UNKNOWN_LEVEL);
    if !can_act(ctx.level(), required) {
        return false;
    }

    match channel.department.as_deref() {
        Some(dept) if !dept.is_empty() => ctx.department.as_deref() == Some(dept),
        _ => true,
    }
}

pub fn can_manage_roles(ctx: &RequestContext) -> bool {
    can_act(ctx.level(), ROLE_ADMIN_LEVEL)
}

/// Users may edit their own profile; administrators may edit anyone's.
pub fn can_edit_user(ctx: &RequestContext, user_id: Uuid) -> bool {
    ctx.user_id == user_id || can_manage_roles(ctx)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn ctx(level: i32, department: &str) -> RequestContext {
        RequestContext {
            user_id: Uuid::new_v4(),
            email: None,
            name: Some("Test".to_string()),
            department: Some(department.to_string()),
            role_name: None,
            role_level: Some(level),
        }
    }

    fn document(access_level: &str, departments: &[&str]) -> Document {
        Document {
            id: Uuid::new_v4(),
            name: "handbook.pdf".to_string(),
            doc_type: "pdf".to_string(),
            size: Some("1.2 MB".to_string()),
            content_url: None,
            uploaded_by: None,
            uploaded_by_name: None,
            department: Some(legacy_department(
                &departments.iter().map(|d| d.to_string()).collect::<Vec<_>>(),
            )),
            departments: Some(departments.iter().map(|d| d.to_string()).collect()),
            access_level: Some(access_level.to_string()),
            access_levels: None,
            downloads: 0,
            views: 0,
            shared: false,
            created_at: Utc::now(),
        }
    }

    fn channel(required_role: &str, department: Option<&str>) -> ChatChannel {
        ChatChannel {
            id: Uuid::new_v4(),
            name: "general".to_string(),
            channel_type: "public".to_string(),
            required_role: Some(required_role.to_string()),
            department: department.map(str::to_string),
        }
    }

    #[test]
    fn can_act_is_inclusive() {
        assert!(can_act(3, 3));
        assert!(can_act(1, 3));
        assert!(!can_act(4, 3));
    }

    #[test]
    fn wildcard_targets_every_department() {
        let all = vec!["All".to_string()];
        for dept in ["Finance", "IT", "HR"] {
            assert!(targets_department(Some(all.as_slice()), None, Some(dept)));
        }
        assert!(targets_department(Some(all.as_slice()), None, None));
    }

    #[test]
    fn explicit_list_matches_member_only() {
        let list = vec!["Finance".to_string(), "IT".to_string()];
        assert!(targets_department(Some(list.as_slice()), None, Some("IT")));
        assert!(!targets_department(Some(list.as_slice()), None, Some("HR")));
    }

    #[test]
    fn list_supersedes_legacy_string() {
        let list = vec!["Finance".to_string()];
        assert!(!targets_department(Some(list.as_slice()), Some("HR"), Some("HR")));
    }

    #[test]
    fn empty_list_falls_back_to_legacy() {
        assert!(targets_department(Some(&[][..]), Some("HR"), Some("HR")));
        assert!(targets_department(None, Some("All"), Some("IT")));
        assert!(!targets_department(None, Some("HR"), Some("IT")));
        assert!(!targets_department(None, None, Some("IT")));
    }

    #[test]
    fn normalize_defaults_to_all() {
        assert_eq!(normalize_targets(None, None), vec!["All"]);
        assert_eq!(normalize_targets(Some(vec![]), Some("IT".into())), vec!["IT"]);
        assert_eq!(
            normalize_targets(Some(vec!["HR".into(), "IT".into()]), Some("Finance".into())),
            vec!["HR", "IT"]
        );
    }

    #[test]
    fn legacy_department_collapses_wildcard() {
        assert_eq!(legacy_department(&["IT".to_string(), "All".to_string()]), "All");
        assert_eq!(legacy_department(&["IT".to_string(), "HR".to_string()]), "IT, HR");
    }

    #[test]
    fn all_department_document_visible_everywhere() {
        let doc = document(role::EMPLOYEE, &["All"]);
        for dept in ["Finance", "IT", "Operations"] {
            assert!(can_access_document(&ctx(5, dept), &doc));
        }
    }

    #[test]
    fn document_level_gate() {
        let doc = document(role::VP, &["All"]);
        assert!(can_access_document(&ctx(3, "IT"), &doc));
        assert!(!can_access_document(&ctx(4, "IT"), &doc));
    }

    #[test]
    fn document_department_gate() {
        let doc = document(role::EMPLOYEE, &["Finance"]);
        assert!(can_access_document(&ctx(5, "Finance"), &doc));
        assert!(!can_access_document(&ctx(5, "IT"), &doc));
    }

    #[test]
    fn administrator_sees_restricted_documents() {
        let doc = document(role::SENIOR_VP, &["Finance"]);
        assert!(can_access_document(&ctx(1, "IT"), &doc));
    }

    #[test]
    fn access_level_list_uses_least_privileged_entry() {
        let mut doc = document(role::SENIOR_VP, &["All"]);
        doc.access_levels = Some(vec![role::VP.to_string(), role::OFFICER.to_string()]);
        assert_eq!(required_document_level(&doc), 4);
        assert!(can_access_document(&ctx(4, "IT"), &doc));
        assert!(!can_access_document(&ctx(5, "IT"), &doc));
    }

    #[test]
    fn untargeted_document_ignores_department() {
        let mut doc = document(role::EMPLOYEE, &[]);
        doc.department = None;
        assert!(can_access_document(&ctx(5, "IT"), &doc));
    }

    #[test]
    fn vp_deletes_own_department_only() {
        let vp = ctx(3, "Finance");
        assert!(can_delete_document(&vp, &document(role::EMPLOYEE, &["Finance"])));
        assert!(!can_delete_document(&vp, &document(role::EMPLOYEE, &["IT"])));

        let mut uploaded = document(role::EMPLOYEE, &["IT"]);
        uploaded.uploaded_by = Some(vp.user_id);
        assert!(can_delete_document(&vp, &uploaded));
    }

    #[test]
    fn senior_vp_deletes_anything_officer_nothing() {
        let doc = document(role::EMPLOYEE, &["IT"]);
        assert!(can_delete_document(&ctx(2, "Finance"), &doc));
        assert!(!can_delete_document(&ctx(4, "IT"), &doc));
    }

    #[test]
    fn upload_requires_vp() {
        assert!(can_upload_document(&ctx(3, "IT")));
        assert!(!can_upload_document(&ctx(4, "IT")));
    }

    #[test]
    fn channel_requires_level_and_department() {
        let officers = channel(role::OFFICER, None);
        assert!(can_access_channel(&ctx(4, "IT"), &officers));
        assert!(can_access_channel(&ctx(2, "IT"), &officers));
        assert!(!can_access_channel(&ctx(5, "IT"), &officers));

        let finance = channel(role::EMPLOYEE, Some("Finance"));
        assert!(can_access_channel(&ctx(5, "Finance"), &finance));
        assert!(!can_access_channel(&ctx(1, "IT"), &finance));
    }

    #[test]
    fn only_administrators_manage_roles() {
        assert!(can_manage_roles(&ctx(1, "IT")));
        assert!(!can_manage_roles(&ctx(2, "IT")));
    }

    #[test]
    fn users_edit_themselves_administrators_edit_anyone() {
        let officer = ctx(4, "IT");
        let admin = ctx(1, "IT");
        let colleague = Uuid::new_v4();

        assert!(can_edit_user(&officer, officer.user_id));
        assert!(!can_edit_user(&officer, colleague));
        assert!(!can_edit_user(&ctx(2, "IT"), colleague));
        assert!(can_edit_user(&admin, colleague));
    }
}
