//! Reconciliation scheduling configuration.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Settings for the periodic storage-metadata reconciliation run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SyncConfig {
    /// Cron expression for scheduled runs (6-field, seconds first).
    /// Empty disables the scheduler; admins can still trigger runs
    /// through the API.
    #[serde(default)]
    pub schedule: String,
    /// Owner attributed to rows created by scheduled runs. A cron
    /// invocation carries no request identity, so the operator
    /// designates one here.
    #[serde(default)]
    pub system_owner_id: Option<Uuid>,
}
