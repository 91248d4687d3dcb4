pub mod audit;
pub mod login;
pub mod modules;
pub mod permissions;
pub mod role_permissions;
pub mod roles;
pub mod user_roles;
pub mod users;

use guardia_core::audit::{AuditAction, NewAuditRecord};
use serde::Serialize;

use crate::api::basic_auth::Identity;

/// Module tag for audit entries produced by this service's own endpoints.
pub(crate) const OWN_MODULE: &str = "seguridad";

/// Response wrapper used by the role and user-role surfaces: the payload
/// plus the id of the authenticated caller (None when anonymous).
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
    pub id_usuario_autenticado: Option<i64>,
}

impl<T> DataResponse<T> {
    pub fn new(data: T, identity: &Identity) -> Self {
        Self {
            data,
            id_usuario_autenticado: identity.user_id(),
        }
    }
}

/// Audit entry for an operation of this module, tagged with the acting
/// identity resolved from the request's token.
pub(crate) fn audit_entry(
    accion: AuditAction,
    tabla: &str,
    identity: &Identity,
    details: serde_json::Value,
) -> NewAuditRecord {
    NewAuditRecord {
        accion,
        modulo: OWN_MODULE.to_string(),
        tabla: tabla.to_string(),
        id_usuario: identity.user_id(),
        details: Some(details),
        nombre_rol: identity.role_name(),
    }
}
