//! Storefront - builds the stores once and shares them.

use std::sync::Arc;

use crate::domain::navigation::{dispatch, Route, ViewId};
use crate::ports::{ApiGateway, ContactMailer, Notifier, TokenStore};

use super::{
    CartStore, CatalogService, ContactService, DashboardService, OrderBook, OrderService,
    OrderStatusPoller, PaymentWatcher, PollerConfig, RefreshSignal, SessionStore,
};

/// The adapters a storefront runs on.
#[derive(Clone)]
pub struct StorefrontPorts {
    pub gateway: Arc<dyn ApiGateway>,
    pub token_store: Arc<dyn TokenStore>,
    pub notifier: Arc<dyn Notifier>,
    pub mailer: Arc<dyn ContactMailer>,
}

/// Every store and service of one client session.
pub struct Storefront {
    pub session: Arc<SessionStore>,
    pub cart: CartStore,
    pub orders: OrderService,
    pub catalog: CatalogService,
    pub dashboard: DashboardService,
    pub contact: ContactService,
    pub payments: PaymentWatcher,
    refresh: RefreshSignal,
}

impl Storefront {
    pub fn new(ports: StorefrontPorts, poller: PollerConfig) -> Self {
        let StorefrontPorts {
            gateway,
            token_store,
            notifier,
            mailer,
        } = ports;

        let refresh = RefreshSignal::new();
        let book = Arc::new(OrderBook::new());
        let session = Arc::new(SessionStore::new(gateway.clone(), token_store));

        let cart = CartStore::new(
            session.clone(),
            gateway.clone(),
            notifier.clone(),
            refresh.clone(),
        );
        let orders = OrderService::new(
            session.clone(),
            gateway.clone(),
            notifier.clone(),
            refresh.clone(),
            book.clone(),
        );
        let payments = PaymentWatcher::new(OrderStatusPoller::new(
            session.clone(),
            gateway.clone(),
            notifier.clone(),
            refresh.clone(),
            book,
            poller,
        ));
        let catalog = CatalogService::new(session.clone(), gateway.clone(), refresh.clone());
        let dashboard = DashboardService::new(session.clone(), gateway);
        let contact = ContactService::new(mailer, notifier);

        Self {
            session,
            cart,
            orders,
            catalog,
            dashboard,
            contact,
            payments,
            refresh,
        }
    }

    pub fn refresh_signal(&self) -> &RefreshSignal {
        &self.refresh
    }

    /// Resolves `path` for the current session.
    ///
    /// Leaving the buyer orders view tears down any payment watch it started.
    pub fn navigate(&self, path: &str) -> Route {
        let route = dispatch(path, &self.session.snapshot());
        if route != Route::View(ViewId::BuyerOrders) {
            self.payments.stop();
        }
        route
    }

    /// Ends the session and drops everything fetched on its behalf.
    pub fn logout(&self) {
        self.payments.stop();
        self.orders.book().replace_all(Vec::new());
        self.session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryTokenStore, MockContactMailer, MockGateway, RecordingNotifier};
    use crate::application::session_store::{ME_PATH, TOKEN_PATH};
    use crate::application::test_support::user_json;
    use crate::domain::foundation::{OrderId, UserType};
    use crate::ports::HttpMethod;
    use serde_json::json;

    fn storefront(gateway: &Arc<MockGateway>) -> Storefront {
        Storefront::new(
            StorefrontPorts {
                gateway: gateway.clone(),
                token_store: Arc::new(InMemoryTokenStore::new()),
                notifier: Arc::new(RecordingNotifier::new()),
                mailer: Arc::new(MockContactMailer::new()),
            },
            PollerConfig::default(),
        )
    }

    #[tokio::test]
    async fn navigation_follows_session() {
        let gateway = Arc::new(MockGateway::new());
        let store = storefront(&gateway);
        assert_eq!(store.navigate("/shop"), Route::View(ViewId::Loading));

        store.session.bootstrap().await;
        assert_eq!(store.navigate("/my-orders"), Route::View(ViewId::BuyerAuth));

        gateway.respond(
            HttpMethod::Post,
            TOKEN_PATH,
            MockGateway::ok(json!({"access": "a", "refresh": "r"})),
        );
        gateway.respond(
            HttpMethod::Get,
            ME_PATH,
            MockGateway::ok(user_json(3, "kamau", UserType::Buyer)),
        );
        store.session.login("kamau", "pw").await.unwrap();

        assert_eq!(store.navigate("/auth"), Route::Redirect("/shop"));
        assert_eq!(store.navigate("/my-orders"), Route::View(ViewId::BuyerOrders));
    }

    #[tokio::test(start_paused = true)]
    async fn leaving_orders_view_stops_payment_watch() {
        let gateway = Arc::new(MockGateway::new());
        let store = storefront(&gateway);
        store.payments.watch(OrderId::new(7));
        assert_eq!(store.payments.active_order(), Some(OrderId::new(7)));

        store.navigate("/shop");

        assert_eq!(store.payments.active_order(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn logout_stops_watch_and_forgets_orders() {
        let gateway = Arc::new(MockGateway::new());
        let store = storefront(&gateway);
        store.payments.watch(OrderId::new(7));

        store.logout();

        assert_eq!(store.payments.active_order(), None);
        assert!(store.orders.cached_orders().is_empty());
        assert!(!store.session.is_authenticated());
    }
}
