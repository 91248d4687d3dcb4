mod store;
#[cfg(test)]
mod tests;

pub use store::{Store, Tables};

use guardia_core::entities::{
    Module, Permission, PermissionWithModule, Role, RolePermission, User, UserRole,
};
use tracing::debug;

use crate::api::error::AppError;

/// Partial update of a user row. `None` keeps the stored value. The
/// password, when present, must already be hashed by the caller.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub usuario: Option<String>,
    pub contrasena: Option<String>,
    pub nombre: Option<String>,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct RolePatch {
    pub nombre_rol: Option<String>,
    pub descripcion: Option<String>,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct PermissionPatch {
    pub nombre_permiso: Option<String>,
    pub descripcion: Option<String>,
    pub url_permiso: Option<String>,
    pub id_modulo: Option<String>,
    pub estado: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct ModulePatch {
    pub nombre_modulo: Option<String>,
    pub estado: Option<bool>,
}

/// Owns the relational entities and every query/mutation primitive over
/// them. Referential integrity of the join tables is enforced here:
/// callers cannot create dangling links, and deletes cascade into the join
/// rows that reference the deleted row.
#[derive(Clone, Debug)]
pub struct DirectoryService {
    store: Store,
}

impl DirectoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // --- users ---

    pub async fn list_users(&self) -> Vec<User> {
        self.store.read().await.users.values().cloned().collect()
    }

    pub async fn get_user(&self, id_usuario: i64) -> Result<User, AppError> {
        self.store
            .read()
            .await
            .users
            .get(&id_usuario)
            .cloned()
            .ok_or(AppError::UserNotFound(id_usuario))
    }

    pub async fn find_user_by_login(&self, usuario: &str) -> Option<User> {
        self.store
            .read()
            .await
            .users
            .values()
            .find(|u| u.usuario == usuario)
            .cloned()
    }

    pub async fn create_user(
        &self,
        usuario: &str,
        contrasena_hash: &str,
        nombre: &str,
        estado: bool,
    ) -> Result<User, AppError> {
        if usuario.trim().is_empty() || nombre.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "usuario and nombre are required".to_string(),
            ));
        }

        let mut tables = self.store.write().await;
        if tables.users.values().any(|u| u.usuario == usuario) {
            return Err(AppError::Conflict(format!(
                "login name '{usuario}' already exists"
            )));
        }

        let id_usuario = tables.next_user_id();
        let user = User {
            id_usuario,
            usuario: usuario.to_string(),
            contrasena: contrasena_hash.to_string(),
            nombre: nombre.to_string(),
            estado,
        };
        tables.users.insert(id_usuario, user.clone());
        debug!("Created user {} ('{}')", id_usuario, usuario);
        Ok(user)
    }

    pub async fn update_user(&self, id_usuario: i64, patch: UserPatch) -> Result<User, AppError> {
        let mut tables = self.store.write().await;
        if let Some(new_login) = &patch.usuario {
            if tables
                .users
                .values()
                .any(|u| u.usuario == *new_login && u.id_usuario != id_usuario)
            {
                return Err(AppError::Conflict(format!(
                    "login name '{new_login}' already exists"
                )));
            }
        }

        let user = tables
            .users
            .get_mut(&id_usuario)
            .ok_or(AppError::UserNotFound(id_usuario))?;

        if let Some(usuario) = patch.usuario {
            user.usuario = usuario;
        }
        if let Some(contrasena) = patch.contrasena {
            user.contrasena = contrasena;
        }
        if let Some(nombre) = patch.nombre {
            user.nombre = nombre;
        }
        if let Some(estado) = patch.estado {
            user.estado = estado;
        }
        Ok(user.clone())
    }

    /// Deletes the user and its role links. Deactivation (`estado = false`)
    /// is the preferred lifecycle end, but hard deletes are supported.
    pub async fn delete_user(&self, id_usuario: i64) -> Result<User, AppError> {
        let mut tables = self.store.write().await;
        let user = tables
            .users
            .remove(&id_usuario)
            .ok_or(AppError::UserNotFound(id_usuario))?;
        tables.user_roles.retain(|ur| ur.id_usuario != id_usuario);
        Ok(user)
    }

    // --- roles ---

    pub async fn list_roles(&self) -> Vec<Role> {
        self.store.read().await.roles.values().cloned().collect()
    }

    pub async fn get_role(&self, id_rol: i64) -> Result<Role, AppError> {
        self.store
            .read()
            .await
            .roles
            .get(&id_rol)
            .cloned()
            .ok_or(AppError::RoleNotFound(id_rol))
    }

    pub async fn create_role(
        &self,
        nombre_rol: &str,
        descripcion: Option<String>,
        estado: bool,
    ) -> Result<Role, AppError> {
        if nombre_rol.trim().is_empty() {
            return Err(AppError::InvalidInput("nombre_rol is required".to_string()));
        }

        let mut tables = self.store.write().await;
        let id_rol = tables.next_role_id();
        let role = Role {
            id_rol,
            nombre_rol: nombre_rol.to_string(),
            descripcion,
            estado,
        };
        tables.roles.insert(id_rol, role.clone());
        Ok(role)
    }

    pub async fn update_role(&self, id_rol: i64, patch: RolePatch) -> Result<Role, AppError> {
        let mut tables = self.store.write().await;
        let role = tables
            .roles
            .get_mut(&id_rol)
            .ok_or(AppError::RoleNotFound(id_rol))?;

        if let Some(nombre_rol) = patch.nombre_rol {
            role.nombre_rol = nombre_rol;
        }
        if let Some(descripcion) = patch.descripcion {
            role.descripcion = Some(descripcion);
        }
        if let Some(estado) = patch.estado {
            role.estado = estado;
        }
        Ok(role.clone())
    }

    /// Deletes the role and every link row (user↔role, role↔permission)
    /// that references it.
    pub async fn delete_role(&self, id_rol: i64) -> Result<Role, AppError> {
        let mut tables = self.store.write().await;
        let role = tables
            .roles
            .remove(&id_rol)
            .ok_or(AppError::RoleNotFound(id_rol))?;
        tables.user_roles.retain(|ur| ur.id_rol != id_rol);
        tables.role_permissions.retain(|rp| rp.id_rol != id_rol);
        Ok(role)
    }

    // --- permissions ---

    pub async fn list_permissions(&self) -> Vec<Permission> {
        self.store
            .read()
            .await
            .permissions
            .values()
            .cloned()
            .collect()
    }

    pub async fn get_permission(&self, id_permiso: i64) -> Result<Permission, AppError> {
        self.store
            .read()
            .await
            .permissions
            .get(&id_permiso)
            .cloned()
            .ok_or(AppError::PermissionNotFound(id_permiso))
    }

    pub async fn create_permission(
        &self,
        nombre_permiso: &str,
        descripcion: Option<String>,
        url_permiso: &str,
        id_modulo: &str,
        estado: bool,
    ) -> Result<Permission, AppError> {
        // All three requirements are checked before any write happens.
        if nombre_permiso.trim().is_empty() || url_permiso.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "nombre_permiso and url_permiso are required".to_string(),
            ));
        }

        let mut tables = self.store.write().await;
        if !tables.modules.contains_key(id_modulo) {
            return Err(AppError::InvalidInput(format!(
                "id_modulo '{id_modulo}' does not resolve to a module"
            )));
        }

        let id_permiso = tables.next_permission_id();
        let permission = Permission {
            id_permiso,
            nombre_permiso: nombre_permiso.to_string(),
            descripcion,
            url_permiso: url_permiso.to_string(),
            estado,
            id_modulo: id_modulo.to_string(),
        };
        tables.permissions.insert(id_permiso, permission.clone());
        Ok(permission)
    }

    pub async fn update_permission(
        &self,
        id_permiso: i64,
        patch: PermissionPatch,
    ) -> Result<Permission, AppError> {
        let mut tables = self.store.write().await;
        if let Some(id_modulo) = &patch.id_modulo {
            if !tables.modules.contains_key(id_modulo) {
                return Err(AppError::InvalidInput(format!(
                    "id_modulo '{id_modulo}' does not resolve to a module"
                )));
            }
        }

        let permission = tables
            .permissions
            .get_mut(&id_permiso)
            .ok_or(AppError::PermissionNotFound(id_permiso))?;

        if let Some(nombre_permiso) = patch.nombre_permiso {
            permission.nombre_permiso = nombre_permiso;
        }
        if let Some(descripcion) = patch.descripcion {
            permission.descripcion = Some(descripcion);
        }
        if let Some(url_permiso) = patch.url_permiso {
            permission.url_permiso = url_permiso;
        }
        if let Some(id_modulo) = patch.id_modulo {
            permission.id_modulo = id_modulo;
        }
        if let Some(estado) = patch.estado {
            permission.estado = estado;
        }
        Ok(permission.clone())
    }

    pub async fn delete_permission(&self, id_permiso: i64) -> Result<Permission, AppError> {
        let mut tables = self.store.write().await;
        let permission = tables
            .permissions
            .remove(&id_permiso)
            .ok_or(AppError::PermissionNotFound(id_permiso))?;
        tables
            .role_permissions
            .retain(|rp| rp.id_permiso != id_permiso);
        Ok(permission)
    }

    // --- modules ---

    pub async fn list_modules(&self) -> Vec<Module> {
        self.store.read().await.modules.values().cloned().collect()
    }

    pub async fn get_module(&self, id_modulo: &str) -> Result<Module, AppError> {
        self.store
            .read()
            .await
            .modules
            .get(id_modulo)
            .cloned()
            .ok_or_else(|| AppError::ModuleNotFound(id_modulo.to_string()))
    }

    pub async fn create_module(
        &self,
        id_modulo: &str,
        nombre_modulo: &str,
        estado: bool,
    ) -> Result<Module, AppError> {
        if id_modulo.trim().is_empty() || nombre_modulo.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "id_modulo and nombre_modulo are required".to_string(),
            ));
        }

        let mut tables = self.store.write().await;
        if tables.modules.contains_key(id_modulo) {
            return Err(AppError::Conflict(format!(
                "module '{id_modulo}' already exists"
            )));
        }

        let module = Module {
            id_modulo: id_modulo.to_string(),
            nombre_modulo: nombre_modulo.to_string(),
            estado,
        };
        tables.modules.insert(id_modulo.to_string(), module.clone());
        Ok(module)
    }

    pub async fn update_module(
        &self,
        id_modulo: &str,
        patch: ModulePatch,
    ) -> Result<Module, AppError> {
        let mut tables = self.store.write().await;
        let module = tables
            .modules
            .get_mut(id_modulo)
            .ok_or_else(|| AppError::ModuleNotFound(id_modulo.to_string()))?;

        if let Some(nombre_modulo) = patch.nombre_modulo {
            module.nombre_modulo = nombre_modulo;
        }
        if let Some(estado) = patch.estado {
            module.estado = estado;
        }
        Ok(module.clone())
    }

    /// A module that still owns permissions cannot be deleted; a permission
    /// always belongs to exactly one existing module.
    pub async fn delete_module(&self, id_modulo: &str) -> Result<Module, AppError> {
        let mut tables = self.store.write().await;
        if tables.permissions.values().any(|p| p.id_modulo == id_modulo) {
            return Err(AppError::Conflict(format!(
                "module '{id_modulo}' still owns permissions"
            )));
        }
        tables
            .modules
            .remove(id_modulo)
            .ok_or_else(|| AppError::ModuleNotFound(id_modulo.to_string()))
    }

    // --- user↔role links ---

    pub async fn add_user_role(&self, id_usuario: i64, id_rol: i64) -> Result<UserRole, AppError> {
        let mut tables = self.store.write().await;
        if !tables.users.contains_key(&id_usuario) {
            return Err(AppError::UserNotFound(id_usuario));
        }
        if !tables.roles.contains_key(&id_rol) {
            return Err(AppError::RoleNotFound(id_rol));
        }

        let link = UserRole { id_usuario, id_rol };
        if tables.user_roles.contains(&link) {
            return Err(AppError::Conflict(format!(
                "user {id_usuario} already holds role {id_rol}"
            )));
        }
        tables.user_roles.push(link);
        Ok(link)
    }

    pub async fn remove_user_role(
        &self,
        id_usuario: i64,
        id_rol: i64,
    ) -> Result<UserRole, AppError> {
        let mut tables = self.store.write().await;
        let link = UserRole { id_usuario, id_rol };
        let before = tables.user_roles.len();
        tables.user_roles.retain(|ur| *ur != link);
        if tables.user_roles.len() == before {
            return Err(AppError::RelationNotFound);
        }
        Ok(link)
    }

    // --- role↔permission links ---

    pub async fn add_role_permission(
        &self,
        id_rol: i64,
        id_permiso: i64,
    ) -> Result<RolePermission, AppError> {
        let mut tables = self.store.write().await;
        if !tables.roles.contains_key(&id_rol) {
            return Err(AppError::RoleNotFound(id_rol));
        }
        if !tables.permissions.contains_key(&id_permiso) {
            return Err(AppError::PermissionNotFound(id_permiso));
        }

        let link = RolePermission { id_rol, id_permiso };
        if tables.role_permissions.contains(&link) {
            return Err(AppError::Conflict(format!(
                "role {id_rol} already grants permission {id_permiso}"
            )));
        }
        tables.role_permissions.push(link);
        Ok(link)
    }

    pub async fn remove_role_permission(
        &self,
        id_rol: i64,
        id_permiso: i64,
    ) -> Result<RolePermission, AppError> {
        let mut tables = self.store.write().await;
        let link = RolePermission { id_rol, id_permiso };
        let before = tables.role_permissions.len();
        tables.role_permissions.retain(|rp| *rp != link);
        if tables.role_permissions.len() == before {
            return Err(AppError::RelationNotFound);
        }
        Ok(link)
    }

    /// Three-way join: role→permission→module, each permission enriched
    /// with the owning module's display name.
    pub async fn permissions_of_role(
        &self,
        id_rol: i64,
    ) -> Result<Vec<PermissionWithModule>, AppError> {
        let tables = self.store.read().await;
        if !tables.roles.contains_key(&id_rol) {
            return Err(AppError::RoleNotFound(id_rol));
        }

        let rows = tables
            .role_permissions
            .iter()
            .filter(|rp| rp.id_rol == id_rol)
            .filter_map(|rp| tables.permissions.get(&rp.id_permiso))
            .filter_map(|p| {
                tables
                    .modules
                    .get(&p.id_modulo)
                    .map(|m| PermissionWithModule::new(p, &m.nombre_modulo))
            })
            .collect();
        Ok(rows)
    }

    /// Replaces the whole permission set of a role in one transaction.
    ///
    /// The write guard is held for the full delete+insert sequence, so no
    /// intermediate state is observable. On an unknown permission id the
    /// prior set is restored untouched and the error reported. Duplicate
    /// ids in the input collapse to one row. Two concurrent replace-alls
    /// on the same role are serialized by the guard; the later commit
    /// wins.
    ///
    /// Returns the applied id list, in input order, for audit summaries.
    pub async fn replace_role_permissions(
        &self,
        id_rol: i64,
        ids: &[i64],
    ) -> Result<Vec<i64>, AppError> {
        let mut tables = self.store.write().await;
        if !tables.roles.contains_key(&id_rol) {
            return Err(AppError::RoleNotFound(id_rol));
        }

        let prior: Vec<RolePermission> = tables
            .role_permissions
            .iter()
            .filter(|rp| rp.id_rol == id_rol)
            .copied()
            .collect();
        tables.role_permissions.retain(|rp| rp.id_rol != id_rol);

        let mut applied: Vec<i64> = Vec::with_capacity(ids.len());
        for &id_permiso in ids {
            if applied.contains(&id_permiso) {
                continue;
            }
            if !tables.permissions.contains_key(&id_permiso) {
                // Roll back: put the prior set back exactly as it was.
                tables.role_permissions.retain(|rp| rp.id_rol != id_rol);
                tables.role_permissions.extend(prior);
                return Err(AppError::PermissionNotFound(id_permiso));
            }
            tables
                .role_permissions
                .push(RolePermission { id_rol, id_permiso });
            applied.push(id_permiso);
        }

        debug!(
            "Replaced permission set of role {} with {} permissions",
            id_rol,
            applied.len()
        );
        Ok(applied)
    }
}
