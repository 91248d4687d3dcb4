use axum::{extract::State, response::IntoResponse, Extension, Json};
use guardia_core::audit::{AuditAction, NewAuditRecord};
use guardia_core::entities::{Permission, UserSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::api::basic_auth::CurrentUser;
use crate::api::error::AppError;
use crate::app_state::SharedAppState;
use crate::services::credentials;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub usuario: Option<String>,
    pub contrasena: Option<String>,
    pub id_modulo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub usuario: UserSummary,
    pub permisos: Vec<Permission>,
}

/// Single-transition login: verify the secret, snapshot the primary role,
/// compute effective permissions for the target module, issue a token and
/// audit the successful entry. A wrong login name and a wrong secret are
/// indistinguishable to the caller, and neither leaves a LOGIN record.
pub async fn login_handler(
    State(state): State<SharedAppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (usuario, contrasena, id_modulo) = match (
        request.usuario.as_deref(),
        request.contrasena.as_deref(),
        request.id_modulo.as_deref(),
    ) {
        (Some(u), Some(c), Some(m)) if !u.is_empty() && !c.is_empty() && !m.is_empty() => {
            (u, c, m)
        }
        _ => {
            return Err(AppError::InvalidInput(
                "usuario, contrasena and id_modulo are required".to_string(),
            ))
        }
    };

    let user = state
        .directory
        .find_user_by_login(usuario)
        .await
        .ok_or(AppError::InvalidCredentials)?;

    if !credentials::verify_password(contrasena, &user.contrasena) {
        debug!("Login rejected for '{}'", usuario);
        return Err(AppError::InvalidCredentials);
    }

    let nombre_rol = state
        .resolver
        .primary_role_name(user.id_usuario)
        .await
        .unwrap_or_else(|| "Sin rol".to_string());

    let permisos = state
        .resolver
        .effective_permissions(user.id_usuario, id_modulo)
        .await;

    let token = state.tokens.issue(&user, &nombre_rol)?;

    info!("User '{}' logged in to module '{}'", user.usuario, id_modulo);
    state
        .audit
        .record_best_effort(NewAuditRecord {
            accion: AuditAction::Login,
            modulo: id_modulo.to_string(),
            tabla: "-".to_string(),
            id_usuario: Some(user.id_usuario),
            details: Some(json!({ "usuario": user.usuario })),
            nombre_rol,
        })
        .await?;

    Ok(Json(LoginResponse {
        token,
        usuario: user.summary(),
        permisos,
    }))
}

/// Guarded by `require_auth`; reaching the handler means the token passed
/// signature and expiry checks.
pub async fn verify_token_handler(
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    Json(json!({ "mensaje": "Token válido", "usuario": user }))
}
