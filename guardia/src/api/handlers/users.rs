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
use crate::services::credentials;
use crate::services::directory::UserPatch;

const TABLE: &str = "usuarios";

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub usuario: String,
    pub contrasena: String,
    pub nombre: String,
    #[serde(default = "default_estado")]
    pub estado: bool,
}

fn default_estado() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub usuario: Option<String>,
    pub contrasena: Option<String>,
    pub nombre: Option<String>,
    pub estado: Option<bool>,
}

pub async fn list_users_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.directory.list_users().await;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({ "consulta": TABLE }),
        ))
        .await?;

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.directory.get_user(id).await?;

    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Select,
            TABLE,
            &identity,
            json!({ "consulta": TABLE, "parametros": [id] }),
        ))
        .await?;

    Ok(Json(user))
}

pub async fn create_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Json(request): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.contrasena.is_empty() {
        return Err(AppError::InvalidInput("contrasena is required".to_string()));
    }

    let hash = credentials::hash_password(&request.contrasena)?;
    let user = state
        .directory
        .create_user(&request.usuario, &hash, &request.nombre, request.estado)
        .await?;

    info!("Created user '{}'", user.usuario);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Insert,
            TABLE,
            &identity,
            serde_json::to_value(&user).unwrap_or_default(),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn update_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    // An absent or empty password keeps the stored hash.
    let contrasena = match request.contrasena.as_deref() {
        Some(plain) if !plain.is_empty() => Some(credentials::hash_password(plain)?),
        _ => None,
    };

    let user = state
        .directory
        .update_user(
            id,
            UserPatch {
                usuario: request.usuario,
                contrasena,
                nombre: request.nombre,
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
            serde_json::to_value(&user).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(user))
}

pub async fn delete_user_handler(
    State(state): State<SharedAppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.directory.delete_user(id).await?;

    info!("Deleted user '{}'", user.usuario);
    state
        .audit
        .record_best_effort(audit_entry(
            AuditAction::Delete,
            TABLE,
            &identity,
            serde_json::to_value(&user).unwrap_or_default(),
        ))
        .await?;

    Ok(Json(json!({ "mensaje": "Usuario eliminado correctamente" })))
}
