use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counters served by the backend's `/admin/stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminStats {
    pub total_users: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub users_by_role: BTreeMap<String, u64>,
    pub total_job_offers: u64,
    pub job_offers_by_domain: BTreeMap<String, u64>,
}
