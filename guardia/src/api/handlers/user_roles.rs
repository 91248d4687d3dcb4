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

const TABLE: &str = "usuarios_roles";

#[derive(Debug, Clone, Deserialize)]
pub struct UserRoleRequest {
    pub id_usuario: i64,
    pub id_rol: i64,
}

pub async fn list_roles_of_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id_usuario): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    // The join itself tolerates an unknown user (empty result); the lookup
    // below turns that into NotFound to keep the directory contract.
    state.directory.get_user(id_usuario).await?;
    let roles = state.resolver.roles_of(id_usuario).await;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({
                "consulta": TABLE,
                "parametros": [id_usuario],
                "usuario_autenticado": identity.login_name(),
            }),
        ))
        .await?;

    Ok(Json(DataResponse::new(roles, &identity)))
}

pub async fn add_role_to_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<UserRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let link = state
        .directory
        .add_user_role(request.id_usuario, request.id_rol)
        .await?;

    info!(
        "Linked user {} to role {}",
        request.id_usuario, request.id_rol
    );
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Insert,
            TABLE,
            &identity,
            serde_json::to_value(link).unwrap_or_default(),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(link, &identity))))
}

pub async fn remove_role_from_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<UserRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let link = state
        .directory
        .remove_user_role(request.id_usuario, request.id_rol)
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

    Ok(Json(json!({
        "mensaje": "Rol quitado del usuario",
        "id_usuario_autenticado": identity.user_id(),
    })))
}
