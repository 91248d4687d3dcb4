use chrono::Utc;
use guardia_core::audit::{AuditOutcome, AuditRecord, NewAuditRecord};
use tracing::error;

use crate::api::error::AppError;
use crate::services::directory::Store;

/// Append-only trail of tracked actions. Records are never updated or
/// deleted once written; the timestamp is assigned here, at append time.
#[derive(Clone, Debug)]
pub struct AuditService {
    store: Store,
    fail_closed: bool,
}

impl AuditService {
    pub fn new(store: Store, fail_closed: bool) -> Self {
        Self { store, fail_closed }
    }

    /// Appends one record and returns it with id and timestamp assigned.
    pub async fn record(&self, entry: NewAuditRecord) -> Result<AuditRecord, AppError> {
        let mut tables = self.store.write().await;
        let id = tables.next_audit_id();
        let record = AuditRecord {
            id,
            accion: entry.accion,
            modulo: entry.modulo,
            tabla: entry.tabla,
            id_usuario: entry.id_usuario,
            details: entry.details,
            nombre_rol: entry.nombre_rol,
            timestamp: Utc::now(),
        };
        tables.audit.push(record.clone());
        Ok(record)
    }

    /// Best-effort append, invoked after the business outcome is already
    /// determined. Under the default fail-open policy a failure is logged
    /// and reported only through the returned outcome — the accepted cost
    /// is a silent gap in the trail. Under fail-closed it surfaces as
    /// `AuditWriteFailed`.
    pub async fn record_best_effort(
        &self,
        entry: NewAuditRecord,
    ) -> Result<AuditOutcome, AppError> {
        match self.record(entry).await {
            Ok(_) => Ok(AuditOutcome::Recorded),
            Err(e) => {
                error!("Failed to append audit record: {}", e);
                if self.fail_closed {
                    Err(AppError::AuditWriteFailed)
                } else {
                    Ok(AuditOutcome::Failed)
                }
            }
        }
    }

    /// All records, newest first.
    pub async fn list_all(&self) -> Vec<AuditRecord> {
        self.store.read().await.audit.iter().rev().cloned().collect()
    }

    pub async fn by_id(&self, id: i64) -> Result<AuditRecord, AppError> {
        self.store
            .read()
            .await
            .audit
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(AppError::AuditRecordNotFound(id))
    }
}
