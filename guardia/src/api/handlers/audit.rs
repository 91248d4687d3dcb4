use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use guardia_core::audit::{AuditAction, NewAuditRecord};
use serde::Deserialize;
use serde_json::json;

use crate::api::error::AppError;
use crate::app_state::SharedAppState;

/// Append payload accepted from sibling modules that report their own
/// actions into the shared trail.
#[derive(Debug, Clone, Deserialize)]
pub struct AppendAuditRequest {
    pub accion: AuditAction,
    pub modulo: String,
    pub tabla: String,
    pub id_usuario: Option<i64>,
    pub details: Option<serde_json::Value>,
    #[serde(default = "default_role_name")]
    pub nombre_rol: String,
}

fn default_role_name() -> String {
    "Sistema".to_string()
}

pub async fn list_audit_handler(
    State(state): State<SharedAppState>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.audit.list_all().await))
}

pub async fn get_audit_handler(
    State(state): State<SharedAppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(state.audit.by_id(id).await?))
}

/// Unlike the implicit appends wrapping directory calls, a failure here is
/// the caller's whole request, so it propagates instead of being
/// swallowed.
pub async fn append_audit_handler(
    State(state): State<SharedAppState>,
    Json(request): Json<AppendAuditRequest>,
) -> Result<impl IntoResponse, AppError> {
    state
        .audit
        .record(NewAuditRecord {
            accion: request.accion,
            modulo: request.modulo,
            tabla: request.tabla,
            id_usuario: request.id_usuario,
            details: request.details,
            nombre_rol: request.nombre_rol,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "mensaje": "Auditoría registrada correctamente" })),
    ))
}
