use super::{DirectoryService, Store, UserPatch};
use crate::api::error::AppError;
use crate::services::resolver::PermissionResolver;

/// Directory plus resolver over one shared store, with the "seguridad"
/// and "inventario" modules pre-created.
async fn test_services() -> (DirectoryService, PermissionResolver) {
    let store = Store::new();
    let directory = DirectoryService::new(store.clone());
    let resolver = PermissionResolver::new(store);

    directory
        .create_module("seguridad", "Seguridad", true)
        .await
        .unwrap();
    directory
        .create_module("inventario", "Inventario", true)
        .await
        .unwrap();

    (directory, resolver)
}

#[tokio::test]
async fn user_crud_round_trip() {
    let (directory, _) = test_services().await;

    let created = directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();
    assert_eq!(created.id_usuario, 1);

    let fetched = directory.get_user(1).await.unwrap();
    assert_eq!(fetched, created);

    let updated = directory
        .update_user(
            1,
            UserPatch {
                nombre: Some("Jane D.".to_string()),
                estado: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.nombre, "Jane D.");
    assert!(!updated.estado);
    // Untouched fields keep their stored values.
    assert_eq!(updated.usuario, "jdoe");

    directory.delete_user(1).await.unwrap();
    assert!(matches!(
        directory.get_user(1).await,
        Err(AppError::UserNotFound(1))
    ));
}

#[tokio::test]
async fn duplicate_login_name_is_a_conflict() {
    let (directory, _) = test_services().await;
    directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();

    assert!(matches!(
        directory
            .create_user("jdoe", "$2b$04$other", "John Doe", true)
            .await,
        Err(AppError::Conflict(_))
    ));

    let second = directory
        .create_user("jsmith", "$2b$04$hash", "John Smith", true)
        .await
        .unwrap();
    assert!(matches!(
        directory
            .update_user(
                second.id_usuario,
                UserPatch {
                    usuario: Some("jdoe".to_string()),
                    ..Default::default()
                },
            )
            .await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn missing_required_fields_are_rejected_before_any_write() {
    let (directory, _) = test_services().await;

    assert!(matches!(
        directory.create_user("", "$2b$04$hash", "X", true).await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        directory.create_role("   ", None, true).await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        directory
            .create_permission("", None, "/usuarios", "seguridad", true)
            .await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(matches!(
        directory
            .create_permission("ver_usuarios", None, "", "seguridad", true)
            .await,
        Err(AppError::InvalidInput(_))
    ));
    // Unresolvable module reference, checked before the insert.
    assert!(matches!(
        directory
            .create_permission("ver_usuarios", None, "/usuarios", "no-existe", true)
            .await,
        Err(AppError::InvalidInput(_))
    ));
    assert!(directory.list_users().await.is_empty());
    assert!(directory.list_permissions().await.is_empty());
}

#[tokio::test]
async fn delete_of_missing_rows_signals_not_found() {
    let (directory, _) = test_services().await;

    assert!(matches!(
        directory.delete_user(99).await,
        Err(AppError::UserNotFound(99))
    ));
    assert!(matches!(
        directory.delete_role(99).await,
        Err(AppError::RoleNotFound(99))
    ));
    assert!(matches!(
        directory.delete_permission(99).await,
        Err(AppError::PermissionNotFound(99))
    ));
    assert!(matches!(
        directory.delete_module("no-existe").await,
        Err(AppError::ModuleNotFound(_))
    ));
}

#[tokio::test]
async fn module_owning_permissions_cannot_be_deleted() {
    let (directory, _) = test_services().await;
    directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();

    assert!(matches!(
        directory.delete_module("seguridad").await,
        Err(AppError::Conflict(_))
    ));
    assert!(directory.delete_module("inventario").await.is_ok());
}

#[tokio::test]
async fn links_require_both_ends_and_reject_duplicates() {
    let (directory, _) = test_services().await;
    let user = directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();
    let role = directory.create_role("admin", None, true).await.unwrap();

    assert!(matches!(
        directory.add_user_role(99, role.id_rol).await,
        Err(AppError::UserNotFound(99))
    ));
    assert!(matches!(
        directory.add_user_role(user.id_usuario, 99).await,
        Err(AppError::RoleNotFound(99))
    ));

    directory
        .add_user_role(user.id_usuario, role.id_rol)
        .await
        .unwrap();
    assert!(matches!(
        directory.add_user_role(user.id_usuario, role.id_rol).await,
        Err(AppError::Conflict(_))
    ));

    directory
        .remove_user_role(user.id_usuario, role.id_rol)
        .await
        .unwrap();
    assert!(matches!(
        directory.remove_user_role(user.id_usuario, role.id_rol).await,
        Err(AppError::RelationNotFound)
    ));
}

#[tokio::test]
async fn role_deletion_cascades_into_link_tables() {
    let (directory, resolver) = test_services().await;
    let user = directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();
    let role = directory.create_role("admin", None, true).await.unwrap();
    let permission = directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();

    directory
        .add_user_role(user.id_usuario, role.id_rol)
        .await
        .unwrap();
    directory
        .add_role_permission(role.id_rol, permission.id_permiso)
        .await
        .unwrap();

    directory.delete_role(role.id_rol).await.unwrap();

    assert!(resolver.roles_of(user.id_usuario).await.is_empty());
    assert!(resolver
        .effective_permissions(user.id_usuario, "seguridad")
        .await
        .is_empty());
}

#[tokio::test]
async fn permissions_of_role_is_a_three_way_join() {
    let (directory, _) = test_services().await;
    let role = directory.create_role("admin", None, true).await.unwrap();
    let permission = directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();
    directory
        .add_role_permission(role.id_rol, permission.id_permiso)
        .await
        .unwrap();

    let rows = directory.permissions_of_role(role.id_rol).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].nombre_permiso, "ver_usuarios");
    assert_eq!(rows[0].nombre_modulo, "Seguridad");

    assert!(matches!(
        directory.permissions_of_role(99).await,
        Err(AppError::RoleNotFound(99))
    ));
}

#[tokio::test]
async fn bulk_assignment_replaces_the_whole_set() {
    let (directory, _) = test_services().await;
    let role = directory.create_role("admin", None, true).await.unwrap();
    let mut ids = Vec::new();
    for name in ["ver_usuarios", "crear_usuarios", "borrar_usuarios"] {
        let p = directory
            .create_permission(name, None, "/usuarios", "seguridad", true)
            .await
            .unwrap();
        ids.push(p.id_permiso);
    }

    directory
        .replace_role_permissions(role.id_rol, &[ids[0], ids[1]])
        .await
        .unwrap();

    // Replace, not add: the read-back equals exactly the supplied set.
    directory
        .replace_role_permissions(role.id_rol, &[ids[2]])
        .await
        .unwrap();
    let granted: Vec<i64> = directory
        .permissions_of_role(role.id_rol)
        .await
        .unwrap()
        .iter()
        .map(|p| p.id_permiso)
        .collect();
    assert_eq!(granted, vec![ids[2]]);
}

#[tokio::test]
async fn bulk_assignment_with_empty_list_clears_all() {
    let (directory, _) = test_services().await;
    let role = directory.create_role("admin", None, true).await.unwrap();
    let p = directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();
    directory
        .replace_role_permissions(role.id_rol, &[p.id_permiso])
        .await
        .unwrap();

    directory
        .replace_role_permissions(role.id_rol, &[])
        .await
        .unwrap();
    assert!(directory
        .permissions_of_role(role.id_rol)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn bulk_assignment_collapses_duplicate_ids() {
    let (directory, _) = test_services().await;
    let role = directory.create_role("admin", None, true).await.unwrap();
    let p = directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();

    let applied = directory
        .replace_role_permissions(role.id_rol, &[p.id_permiso, p.id_permiso])
        .await
        .unwrap();
    assert_eq!(applied, vec![p.id_permiso]);
    assert_eq!(
        directory
            .permissions_of_role(role.id_rol)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn bulk_assignment_rolls_back_on_unknown_permission() {
    let (directory, _) = test_services().await;
    let role = directory.create_role("admin", None, true).await.unwrap();
    let p = directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();
    directory
        .replace_role_permissions(role.id_rol, &[p.id_permiso])
        .await
        .unwrap();

    let before = directory.permissions_of_role(role.id_rol).await.unwrap();

    let result = directory
        .replace_role_permissions(role.id_rol, &[p.id_permiso, 999])
        .await;
    assert!(matches!(result, Err(AppError::PermissionNotFound(999))));

    // The prior set is completely intact after the abort.
    let after = directory.permissions_of_role(role.id_rol).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn bulk_assignment_requires_an_existing_role() {
    let (directory, _) = test_services().await;
    assert!(matches!(
        directory.replace_role_permissions(42, &[]).await,
        Err(AppError::RoleNotFound(42))
    ));
}

#[tokio::test]
async fn resolver_returns_empty_for_user_without_roles() {
    let (directory, resolver) = test_services().await;
    let user = directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();

    assert!(resolver.roles_of(user.id_usuario).await.is_empty());
    assert!(resolver
        .effective_permissions(user.id_usuario, "seguridad")
        .await
        .is_empty());
    assert_eq!(resolver.primary_role_name(user.id_usuario).await, None);
}

#[tokio::test]
async fn resolver_unions_overlapping_roles_and_filters_by_module() {
    let (directory, resolver) = test_services().await;
    let user = directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();
    let admin = directory.create_role("admin", None, true).await.unwrap();
    let auditor = directory.create_role("auditor", None, true).await.unwrap();

    let shared = directory
        .create_permission("ver_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();
    let admin_only = directory
        .create_permission("crear_usuarios", None, "/usuarios", "seguridad", true)
        .await
        .unwrap();
    let other_module = directory
        .create_permission("ver_stock", None, "/stock", "inventario", true)
        .await
        .unwrap();

    directory
        .add_user_role(user.id_usuario, admin.id_rol)
        .await
        .unwrap();
    directory
        .add_user_role(user.id_usuario, auditor.id_rol)
        .await
        .unwrap();
    directory
        .replace_role_permissions(
            admin.id_rol,
            &[shared.id_permiso, admin_only.id_permiso, other_module.id_permiso],
        )
        .await
        .unwrap();
    directory
        .replace_role_permissions(auditor.id_rol, &[shared.id_permiso])
        .await
        .unwrap();

    let effective = resolver
        .effective_permissions(user.id_usuario, "seguridad")
        .await;
    let names: Vec<&str> = effective.iter().map(|p| p.nombre_permiso.as_str()).collect();

    // Overlap collapses by permission id; the inventario grant is filtered.
    assert_eq!(names, vec!["ver_usuarios", "crear_usuarios"]);
}

#[tokio::test]
async fn primary_role_is_the_lowest_role_id() {
    let (directory, resolver) = test_services().await;
    let user = directory
        .create_user("jdoe", "$2b$04$hash", "Jane Doe", true)
        .await
        .unwrap();
    let first = directory.create_role("admin", None, true).await.unwrap();
    let second = directory.create_role("auditor", None, true).await.unwrap();

    // Link in reverse order to show the pick ignores insertion order.
    directory
        .add_user_role(user.id_usuario, second.id_rol)
        .await
        .unwrap();
    directory
        .add_user_role(user.id_usuario, first.id_rol)
        .await
        .unwrap();

    assert_eq!(
        resolver.primary_role_name(user.id_usuario).await,
        Some("admin".to_string())
    );
}
