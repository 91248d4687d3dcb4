use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use guardia_core::audit::AuditAction;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::basic_auth::Identity;
use crate::api::error::AppError;
use crate::api::handlers::audit_entry;
use crate::app_state::SharedAppState;

const TABLE: &str = "roles_permisos";

#[derive(Debug, Clone, Deserialize)]
pub struct RolePermissionRequest {
    pub id_rol: i64,
    pub id_permiso: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BulkAssignRequest {
    pub permisos: Vec<i64>,
}

pub async fn list_permissions_of_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id_rol): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = state.directory.permissions_of_role(id_rol).await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({ "consulta": TABLE, "parametros": [id_rol] }),
        ))
        .await?;

    Ok(Json(permissions))
}

pub async fn add_permission_to_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<RolePermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let link = state
        .directory
        .add_role_permission(request.id_rol, request.id_permiso)
        .await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Insert,
            TABLE,
            &identity,
            serde_json::to_value(link).unwrap_or_default(),
        ))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "mensaje": "Permiso asignado al rol" })),
    ))
}

pub async fn remove_permission_from_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<RolePermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let link = state
        .directory
        .remove_role_permission(request.id_rol, request.id_permiso)
        .await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Delete,
            TABLE,
            &identity,
            serde_json::to_value(link).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(json!({ "mensaje": "Permiso quitado del rol" })))
}

/// Replace-all assignment: the role ends up granting exactly the supplied
/// permissions. The directory runs the delete+insert under one
/// transactional scope, so a failure leaves the prior set intact and the
/// audit record is only written once the new set is committed.
pub async fn bulk_assign_permissions_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id_rol): Path<i64>,
    Json(request): Json<BulkAssignRequest>,
) -> Result<impl IntoResponse, AppError> {
    let applied = state
        .directory
        .replace_role_permissions(id_rol, &request.permisos)
        .await?;

    info!(
        "Replaced permissions of role {} ({} granted)",
        id_rol,
        applied.len()
    );
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Update,
            TABLE,
            &identity,
            json!({ "id_rol": id_rol, "permisos": applied }),
        ))
        .await?;

    Ok(Json(json!({
        "success": true,
        "message": "Permisos asignados correctamente",
    })))
}
