//! Path-to-view dispatch.
//!
//! A pure function of the path and a snapshot of the session. Navigation
//! itself (pushing history, rendering) belongs to the caller.

use super::foundation::UserType;

/// The fixed set of views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Loading,
    BuyerLanding,
    Shop,
    BuyerAuth,
    BuyerOrders,
    Contact,
    FarmerLanding,
    FarmerAuth,
    FarmerDashboard,
    FarmerListings,
    FarmerOrders,
    FarmerContact,
    NotFound,
}

impl ViewId {
    pub fn is_seller_view(&self) -> bool {
        matches!(
            self,
            ViewId::FarmerLanding
                | ViewId::FarmerAuth
                | ViewId::FarmerDashboard
                | ViewId::FarmerListings
                | ViewId::FarmerOrders
                | ViewId::FarmerContact
        )
    }
}

/// Outcome of dispatching a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    View(ViewId),
    Redirect(&'static str),
}

/// What dispatch needs to know about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionSnapshot {
    pub loading: bool,
    pub user_type: Option<UserType>,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.user_type.is_some()
    }

    fn is(&self, role: UserType) -> bool {
        self.user_type == Some(role)
    }
}

/// Maps `path` to a view, applying the portal guards.
pub fn dispatch(path: &str, session: &SessionSnapshot) -> Route {
    if session.loading {
        return Route::View(ViewId::Loading);
    }

    if path.starts_with("/seller") {
        if !session.is(UserType::Farmer) {
            return Route::View(if path == "/seller" {
                ViewId::FarmerLanding
            } else {
                ViewId::FarmerAuth
            });
        }
        return Route::View(match path {
            "/seller" => ViewId::FarmerLanding,
            "/seller/dashboard" => ViewId::FarmerDashboard,
            "/seller/listings" => ViewId::FarmerListings,
            "/seller/orders" => ViewId::FarmerOrders,
            "/seller/contact" => ViewId::FarmerContact,
            _ => ViewId::NotFound,
        });
    }

    match path {
        "/" => Route::View(ViewId::BuyerLanding),
        "/shop" => Route::View(ViewId::Shop),
        "/auth" if session.is(UserType::Buyer) => Route::Redirect("/shop"),
        "/auth" => Route::View(ViewId::BuyerAuth),
        "/my-orders" if session.is_authenticated() => Route::View(ViewId::BuyerOrders),
        "/my-orders" => Route::View(ViewId::BuyerAuth),
        "/contact" => Route::View(ViewId::Contact),
        _ => Route::View(ViewId::NotFound),
    }
}

/// The buyer navbar shows everywhere except the landing page and the seller portal.
pub fn shows_buyer_navbar(path: &str) -> bool {
    !path.starts_with("/seller") && path != "/"
}
