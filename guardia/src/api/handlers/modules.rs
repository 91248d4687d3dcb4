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
use crate::services::directory::ModulePatch;

const TABLE: &str = "modulos";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateModuleRequest {
    pub id_modulo: String,
    pub nombre_modulo: String,
    #[serde(default = "default_estado")]
    pub estado: bool,
}

fn default_estado() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateModuleRequest {
    pub nombre_modulo: Option<String>,
    pub estado: Option<bool>,
}

// Module reads are not considered sensitive, so unlike the other
// directory surfaces only mutations are audited here.

pub async fn list_modules_handler(
    State(state): State<SharedAppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.directory.list_modules().await))
}

pub async fn get_module_handler(
    State(state): State<SharedAppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.directory.get_module(&id).await?))
}

pub async fn create_module_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let module = state
        .directory
        .create_module(&request.id_modulo, &request.nombre_modulo, request.estado)
        .await?;

    info!("Created module '{}'", module.id_modulo);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Insert,
            TABLE,
            &identity,
            serde_json::to_value(&module).unwrap_or_default(),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(module)))
}

pub async fn update_module_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(request): Json<UpdateModuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let module = state
        .directory
        .update_module(
            &id,
            ModulePatch {
                nombre_modulo: request.nombre_modulo,
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
            serde_json::to_value(&module).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(module))
}

pub async fn delete_module_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let module = state.directory.delete_module(&id).await?;

    info!("Deleted module '{}'", module.id_modulo);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Delete,
            TABLE,
            &identity,
            serde_json::to_value(&module).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(json!({ "mensaje": "Módulo eliminado correctamente" })))
}
