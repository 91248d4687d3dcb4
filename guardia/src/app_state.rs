use std::sync::Arc;

use crate::services::directory::Store;
use crate::services::{AuditService, DirectoryService, PermissionResolver, TokenService};
use crate::settings::config::Settings;

#[derive(Clone, Debug)]
pub struct AppState {
    pub settings: Settings,
    pub directory: DirectoryService,
    pub resolver: PermissionResolver,
    pub audit: AuditService,
    pub tokens: TokenService,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub fn new() -> anyhow::Result<SharedAppState> {
        let settings = Settings::new()?;
        Ok(Self::with_settings(settings))
    }

    /// Builds the service graph over one shared table set. The token
    /// service derives its keys from the signing secret here, once.
    pub fn with_settings(settings: Settings) -> SharedAppState {
        let store = Store::new();
        let tokens = TokenService::new(&settings.auth);
        let audit = AuditService::new(store.clone(), settings.audit.fail_closed);
        let directory = DirectoryService::new(store.clone());
        let resolver = PermissionResolver::new(store);

        Arc::new(AppState {
            settings,
            directory,
            resolver,
            audit,
            tokens,
        })
    }
}
