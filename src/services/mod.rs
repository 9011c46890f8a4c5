//! Business logic services

pub mod auth;
pub mod catalog;
pub mod loans;
pub mod sessions;

use std::sync::Arc;

use crate::{
    config::AppConfig,
    repository::{AccountStore, CatalogStore},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub sessions: sessions::SessionService,
}

impl Services {
    /// Create all services over the given stores
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        accounts: Arc<dyn AccountStore>,
        sessions: Arc<dyn sessions::SessionStore>,
        config: &AppConfig,
    ) -> Self {
        let page_size = config.catalog.page_size;
        Self {
            auth: auth::AuthService::new(accounts, config.auth.clone()),
            catalog: catalog::CatalogService::new(catalog.clone(), page_size),
            loans: loans::LoansService::new(catalog, page_size),
            sessions: sessions::SessionService::new(sessions),
        }
    }
}
