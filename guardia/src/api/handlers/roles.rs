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
use crate::api::handlers::{audit_entry, DataResponse};
use crate::app_state::SharedAppState;
use crate::services::directory::RolePatch;

const TABLE: &str = "roles";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoleRequest {
    pub nombre_rol: String,
    pub descripcion: Option<String>,
    #[serde(default = "default_estado")]
    pub estado: bool,
}

fn default_estado() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRoleRequest {
    pub nombre_rol: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<bool>,
}

pub async fn list_roles_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let roles = state.directory.list_roles().await;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({ "consulta": TABLE, "usuario_autenticado": identity.login_name() }),
        ))
        .await?;

    Ok(Json(DataResponse::new(roles, &identity)))
}

pub async fn get_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.directory.get_role(id).await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({
                "consulta": TABLE,
                "parametros": [id],
                "usuario_autenticado": identity.login_name(),
            }),
        ))
        .await?;

    Ok(Json(DataResponse::new(role, &identity)))
}

pub async fn create_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = state
        .directory
        .create_role(&request.nombre_rol, request.descripcion, request.estado)
        .await?;

    info!("Created role '{}'", role.nombre_rol);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Insert,
            TABLE,
            &identity,
            serde_json::to_value(&role).unwrap_or_default(),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(role, &identity))))
}

pub async fn update_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let role = state
        .directory
        .update_role(
            id,
            RolePatch {
                nombre_rol: request.nombre_rol,
                descripcion: request.descripcion,
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
            serde_json::to_value(&role).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(DataResponse::new(role, &identity)))
}

pub async fn delete_role_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let role = state.directory.delete_role(id).await?;

    info!("Deleted role '{}'", role.nombre_rol);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Delete,
            TABLE,
            &identity,
            serde_json::to_value(&role).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(json!({
        "mensaje": "Rol eliminado correctamente",
        "id_usuario_autenticado": identity.user_id(),
    })))
}
