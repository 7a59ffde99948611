use std::sync::Arc;

use salvo::async_trait;
pub use inkbook_core::config::*;
use inkbook_core::error::CoreError;
use inkbook_service::scheduling::SchedulingPolicy;

use crate::error::{AppError, AppResult};

/// Injects the loaded settings and the resolved scheduling policy.
pub struct ConfigHandler {
    pub settings: Settings,
    pub policy: SchedulingPolicy,
}

#[async_trait]
impl salvo::Handler for ConfigHandler {
    #[tracing::instrument(skip(self, _req, depot, _res, _ctrl))]
    async fn handle(
        &self,
        _req: &mut salvo::Request,
        depot: &mut salvo::Depot,
        _res: &mut salvo::Response,
        _ctrl: &mut salvo::FlowCtrl,
    ) {
        let settings: Arc<Settings> = Arc::new(self.settings.clone());
        depot.inject(settings);
        let policy: Arc<SchedulingPolicy> = Arc::new(self.policy.clone());
        depot.inject(policy);
    }
}

/// ## Summary
/// Retrieves the application configuration from the depot.
///
/// ## Errors
/// Returns an error if the configuration is not found in the depot.
pub fn get_config_from_depot(depot: &salvo::Depot) -> AppResult<Arc<Settings>> {
    depot.obtain::<Arc<Settings>>().cloned().map_err(|_err| {
        AppError::CoreError(CoreError::InvariantViolation(
            "Configuration not found in depot",
        ))
    })
}

/// ## Summary
/// Retrieves the scheduling policy from the depot.
///
/// ## Errors
/// Returns an error if the policy is not found in the depot.
pub fn get_policy_from_depot(depot: &salvo::Depot) -> AppResult<Arc<SchedulingPolicy>> {
    depot
        .obtain::<Arc<SchedulingPolicy>>()
        .cloned()
        .map_err(|_err| {
            AppError::CoreError(CoreError::InvariantViolation(
                "Scheduling policy not found in depot",
            ))
        })
}
