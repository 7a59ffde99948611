use salvo::async_trait;
use std::sync::Arc;

use crate::error::AppResult;
use inkbook_core::error::CoreError;
use inkbook_service::store::StudioStore;

/// Injects the studio store into the depot of every request.
pub struct StoreProviderHandler {
    pub store: Arc<dyn StudioStore>,
}

#[async_trait]
impl salvo::Handler for StoreProviderHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        depot.inject(Arc::clone(&self.store));
    }
}

/// ## Summary
/// Retrieves the studio store from the depot.
///
/// ## Errors
/// Returns an error if the store is not found in the depot.
pub fn get_store_from_depot(depot: &salvo::Depot) -> AppResult<Arc<dyn StudioStore>> {
    depot
        .obtain::<Arc<dyn StudioStore>>()
        .cloned()
        .map_err(|_err| CoreError::InvariantViolation("Studio store not found in depot").into())
}
