use std::collections::BTreeMap;
use std::sync::Arc;

use guardia_core::audit::AuditRecord;
use guardia_core::entities::{Module, Permission, Role, RolePermission, User, UserRole};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// The relational state owned by the directory.
///
/// Join rows only ever reference existing parent rows; the directory
/// enforces this on every mutation rather than assuming it from callers.
/// Audit rows are append-only.
#[derive(Debug, Default)]
pub struct Tables {
    pub users: BTreeMap<i64, User>,
    pub roles: BTreeMap<i64, Role>,
    pub permissions: BTreeMap<i64, Permission>,
    pub modules: BTreeMap<String, Module>,
    pub user_roles: Vec<UserRole>,
    pub role_permissions: Vec<RolePermission>,
    pub audit: Vec<AuditRecord>,
    next_user_id: i64,
    next_role_id: i64,
    next_permission_id: i64,
    next_audit_id: i64,
}

impl Tables {
    pub fn next_user_id(&mut self) -> i64 {
        self.next_user_id += 1;
        self.next_user_id
    }

    pub fn next_role_id(&mut self) -> i64 {
        self.next_role_id += 1;
        self.next_role_id
    }

    pub fn next_permission_id(&mut self) -> i64 {
        self.next_permission_id += 1;
        self.next_permission_id
    }

    pub fn next_audit_id(&mut self) -> i64 {
        self.next_audit_id += 1;
        self.next_audit_id
    }
}

/// Shared handle on the table set.
///
/// A write guard doubles as the transactional connection of the bulk
/// re-assignment: it is scoped, so it is released on every exit path
/// without caller discipline.
#[derive(Clone, Debug, Default)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}
