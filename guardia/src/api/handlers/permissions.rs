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
use crate::services::directory::PermissionPatch;

const TABLE: &str = "permisos";

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePermissionRequest {
    pub nombre_permiso: String,
    pub descripcion: Option<String>,
    pub url_permiso: String,
    pub id_modulo: String,
    #[serde(default = "default_estado")]
    pub estado: bool,
}

fn default_estado() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePermissionRequest {
    pub nombre_permiso: Option<String>,
    pub descripcion: Option<String>,
    pub url_permiso: Option<String>,
    pub id_modulo: Option<String>,
    pub estado: Option<bool>,
}

pub async fn list_permissions_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let permissions = state.directory.list_permissions().await;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({ "consulta": TABLE }),
        ))
        .await?;

    Ok(Json(permissions))
}

pub async fn get_permission_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let permission = state.directory.get_permission(id).await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({ "consulta": TABLE, "parametros": [id] }),
        ))
        .await?;

    Ok(Json(permission))
}

pub async fn create_permission_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreatePermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let permission = state
        .directory
        .create_permission(
            &request.nombre_permiso,
            request.descripcion,
            &request.url_permiso,
            &request.id_modulo,
            request.estado,
        )
        .await?;

    info!(
        "Created permission '{}' in module '{}'",
        permission.nombre_permiso, permission.id_modulo
    );
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Insert,
            TABLE,
            &identity,
            serde_json::to_value(&permission).unwrap_or_default(),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(permission)))
}

pub async fn update_permission_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePermissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let permission = state
        .directory
        .update_permission(
            id,
            PermissionPatch {
                nombre_permiso: request.nombre_permiso,
                descripcion: request.descripcion,
                url_permiso: request.url_permiso,
                id_modulo: request.id_modulo,
                estado: request.estado,
            },
        )
        .await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Update,
            TABLE,
            &identity,
            serde_json::to_value(&permission).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(permission))
}

pub async fn delete_permission_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let permission = state.directory.delete_permission(id).await?;

    info!("Deleted permission '{}'", permission.nombre_permiso);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Delete,
            TABLE,
            &identity,
            serde_json::to_value(&permission).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(json!({ "mensaje": "Permiso eliminado correctamente" })))
}
