use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action kinds tracked by the audit trail. Serialized uppercase, matching
/// the `accion` column of the wider application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Select,
    Insert,
    Update,
    Delete,
    Login,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Select => "SELECT",
            AuditAction::Insert => "INSERT",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
            AuditAction::Login => "LOGIN",
        }
    }
}

/// One immutable entry of the audit trail. Never updated or deleted once
/// appended; `timestamp` is assigned by the server at append time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuditRecord {
    pub id: i64,
    pub accion: AuditAction,
    pub modulo: String,
    pub tabla: String,
    pub id_usuario: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub nombre_rol: String,
    pub timestamp: DateTime<Utc>,
}

/// Payload for an append; the trail assigns `id` and `timestamp`.
///
/// `id_usuario` is None for system actions (no token on the request);
/// `nombre_rol` then carries the literal "Sistema".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditRecord {
    pub accion: AuditAction,
    pub modulo: String,
    pub tabla: String,
    pub id_usuario: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub nombre_rol: String,
}

/// Result of a best-effort append, kept distinct from the business result
/// so telemetry can observe audit gaps without the caller's outcome
/// changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    Recorded,
    Failed,
}
