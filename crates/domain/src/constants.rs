//! Integration constants
//!
//! Centralized location for the defaults and fixed identifiers shared by the
//! transport, provider clients, orchestrator and key rotation.

// Transport defaults
pub const DEFAULT_TIMEOUT_SECS: f64 = 15.0;
pub const DEFAULT_RETRIES: u32 = 1;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 250;
pub const MIN_TIMEOUT_SECS: f64 = 0.5;
pub const MAX_CONNECT_TIMEOUT_SECS: f64 = 5.0;

// Endpoint templating
pub const ID_PLACEHOLDER: &str = "{id}";

// Sentinel error codes returned by disabled providers
pub const PAYMENT_GATEWAY_DISABLED: &str = "payment_gateway_disabled";
pub const TICKETING_DISABLED: &str = "ticketing_disabled";
pub const DIGITAL_SIGNATURE_DISABLED: &str = "digital_signature_disabled";

// Key rotation
pub const CORESUITE_API_KEY_VAR: &str = "CORESUITE_API_KEY";
pub const API_KEY_BYTES: usize = 32;
pub const AUDIT_ACTION_KEY_ROTATED: &str = "integration_key_rotated";

// Storage defaults
pub const DEFAULT_LOG_FILE: &str = "storage/logs/integrations.log";
pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_AUDIT_DB: &str = "storage/audit.db";
