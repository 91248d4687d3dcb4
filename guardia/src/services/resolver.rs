use std::collections::BTreeSet;

use guardia_core::entities::{Permission, Role};

use crate::services::directory::Store;

/// Computes derived permission sets by walking
/// user →(usuarios_roles)→ role →(roles_permisos)→ permission.
#[derive(Clone, Debug)]
pub struct PermissionResolver {
    store: Store,
}

impl PermissionResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// All roles linked to the user, in link insertion order.
    pub async fn roles_of(&self, id_usuario: i64) -> Vec<Role> {
        let tables = self.store.read().await;
        tables
            .user_roles
            .iter()
            .filter(|ur| ur.id_usuario == id_usuario)
            .filter_map(|ur| tables.roles.get(&ur.id_rol))
            .cloned()
            .collect()
    }

    /// The single role name used for token claims and audit tagging.
    ///
    /// When the user holds several roles the one with the lowest id wins —
    /// an explicit tie-break, so the selection does not depend on storage
    /// iteration order. None when the user holds no roles.
    pub async fn primary_role_name(&self, id_usuario: i64) -> Option<String> {
        self.roles_of(id_usuario)
            .await
            .into_iter()
            .min_by_key(|r| r.id_rol)
            .map(|r| r.nombre_rol)
    }

    /// Effective permissions of a user within one module: the union across
    /// every held role, collapsed by permission id and filtered to the
    /// module. No role outranks another. An empty result (no roles, or no
    /// grants in the module) is a normal outcome, not an error.
    pub async fn effective_permissions(
        &self,
        id_usuario: i64,
        id_modulo: &str,
    ) -> Vec<Permission> {
        let tables = self.store.read().await;

        let role_ids: BTreeSet<i64> = tables
            .user_roles
            .iter()
            .filter(|ur| ur.id_usuario == id_usuario)
            .map(|ur| ur.id_rol)
            .collect();

        // BTreeSet both deduplicates across roles and fixes the output
        // order to ascending permission id.
        let permission_ids: BTreeSet<i64> = tables
            .role_permissions
            .iter()
            .filter(|rp| role_ids.contains(&rp.id_rol))
            .map(|rp| rp.id_permiso)
            .collect();

        permission_ids
            .iter()
            .filter_map(|id| tables.permissions.get(id))
            .filter(|p| p.id_modulo == id_modulo)
            .cloned()
            .collect()
    }
}
