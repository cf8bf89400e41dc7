//! Commands exposed by the `coresuite` binary

use serde::Serialize;

use coresuite_domain::KeyRotationOutcome;

use crate::AppContext;

/// Snapshot of what the integration layer will talk to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub enabled_providers: Vec<&'static str>,
    pub log_file: String,
    pub env_file: String,
    /// Whether `rotate-key` can persist a new key.
    pub env_writable: bool,
}

/// Report enabled providers and storage locations.
pub fn status(ctx: &AppContext) -> StatusReport {
    StatusReport {
        enabled_providers: ctx.integrations.enabled_providers(),
        log_file: ctx.config.storage.log_file.display().to_string(),
        env_file: ctx.config.storage.env_file.display().to_string(),
        env_writable: ctx.key_rotation.can_update_config(),
    }
}

/// Rotate the Coresuite API key on behalf of `user_id`.
pub async fn rotate_key(ctx: &AppContext, user_id: i64) -> KeyRotationOutcome {
    ctx.key_rotation.generate_api_key(user_id).await
}
