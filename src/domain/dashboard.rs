//! Seller metrics served by `GET /api/dashboard/pro-stats/`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Aggregated metrics for the signed-in farmer.
///
/// The backend owns the shape. Known counters default to zero, anything else
/// is kept in `extra` so newer metrics still reach the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerStats {
    #[serde(default)]
    pub total_listings: u64,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub pending_orders: u64,
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
