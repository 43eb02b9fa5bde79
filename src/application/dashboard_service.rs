//! DashboardService - seller metrics.

use std::sync::Arc;

use crate::domain::dashboard::SellerStats;
use crate::ports::{ApiGateway, HttpMethod};

use super::wire::decode;
use super::{ClientError, SessionStore};

pub const PRO_STATS_PATH: &str = "/api/dashboard/pro-stats/";

pub struct DashboardService {
    session: Arc<SessionStore>,
    gateway: Arc<dyn ApiGateway>,
}

impl DashboardService {
    pub fn new(session: Arc<SessionStore>, gateway: Arc<dyn ApiGateway>) -> Self {
        Self { session, gateway }
    }

    pub async fn pro_stats(&self) -> Result<SellerStats, ClientError> {
        let token = self.session.require_token()?;
        let response = self
            .gateway
            .request(HttpMethod::Get, PRO_STATS_PATH, None, Some(&token))
            .await?;
        decode(PRO_STATS_PATH, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockGateway;
    use crate::application::test_support::logged_in_session;
    use crate::domain::foundation::UserType;
    use crate::ports::GatewayError;
    use serde_json::json;

    #[tokio::test]
    async fn pro_stats_keeps_unknown_metrics() {
        let gateway = Arc::new(MockGateway::new());
        let session = logged_in_session(&gateway, UserType::Farmer).await;
        gateway.respond(
            HttpMethod::Get,
            PRO_STATS_PATH,
            MockGateway::ok(json!({"total_listings": 4, "total_revenue": "12500.00", "top_breed": "Galla"})),
        );
        let service = DashboardService::new(session, gateway.clone());

        let stats = service.pro_stats().await.unwrap();

        assert_eq!(stats.total_listings, 4);
        assert_eq!(stats.pending_orders, 0);
        assert_eq!(stats.extra.get("top_breed"), Some(&json!("Galla")));
        assert_eq!(gateway.last_call().unwrap().token.as_deref(), Some("acc-1"));
    }

    #[tokio::test]
    async fn buyer_is_forbidden_by_backend() {
        let gateway = Arc::new(MockGateway::new());
        let session = logged_in_session(&gateway, UserType::Buyer).await;
        gateway.respond(
            HttpMethod::Get,
            PRO_STATS_PATH,
            MockGateway::api_error(403, json!({"detail": "You do not have permission to perform this action."})),
        );

        let err = DashboardService::new(session, gateway).pro_stats().await.unwrap_err();

        assert!(matches!(err, ClientError::Gateway(GatewayError::Api(ref e)) if e.is_unauthorized()));
    }
}
