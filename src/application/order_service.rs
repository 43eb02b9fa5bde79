//! OrderService - order reads and the mutations the client may request.
//!
//! Status transitions themselves are decided by the backend. The checks here
//! only keep obviously pointless requests from leaving the client.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{OrderId, OrderStatus, PhoneNumber, ValidationError};
use crate::domain::order::{Order, PaymentAck, PaymentRequest, StatusUpdate};
use crate::ports::{ApiGateway, HttpMethod, Notice, Notifier};

use super::cart_store::ORDERS_PATH;
use super::wire::{decode, encode};
use super::{ClientError, OrderBook, RefreshSignal, SessionStore};

pub const PAYMENT_PATH: &str = "/api/make-payment/";

pub fn order_path(id: OrderId) -> String {
    format!("/api/orders/{}/", id)
}

pub struct OrderService {
    session: Arc<SessionStore>,
    gateway: Arc<dyn ApiGateway>,
    notifier: Arc<dyn Notifier>,
    refresh: RefreshSignal,
    book: Arc<OrderBook>,
}

impl OrderService {
    pub fn new(
        session: Arc<SessionStore>,
        gateway: Arc<dyn ApiGateway>,
        notifier: Arc<dyn Notifier>,
        refresh: RefreshSignal,
        book: Arc<OrderBook>,
    ) -> Self {
        Self {
            session,
            gateway,
            notifier,
            refresh,
            book,
        }
    }

    /// Fetches the user's orders and replaces the cached list.
    pub async fn list_orders(&self) -> Result<Vec<Order>, ClientError> {
        let token = self.session.require_token()?;
        let response = self
            .gateway
            .request(HttpMethod::Get, ORDERS_PATH, None, Some(&token))
            .await?;
        let orders: Vec<Order> = decode(ORDERS_PATH, response)?;
        tracing::debug!(count = orders.len(), "Orders loaded");
        self.book.replace_all(orders.clone());
        Ok(orders)
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, ClientError> {
        let token = self.session.require_token()?;
        let path = order_path(id);
        let response = self
            .gateway
            .request(HttpMethod::Get, &path, None, Some(&token))
            .await?;
        let order: Order = decode(&path, response)?;
        self.book.upsert(order.clone());
        Ok(order)
    }

    pub fn cached_orders(&self) -> Vec<Order> {
        self.book.all()
    }

    pub fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    /// Starts an M-Pesa STK push for a confirmed order.
    ///
    /// The acknowledgment only says the push was sent; whether the buyer
    /// paid is learned by polling the order.
    pub async fn initiate_payment(&self, order: &Order, phone: &str) -> Result<PaymentAck, ClientError> {
        if !order.status.is_payable() {
            return Err(ValidationError::OrderNotActionable {
                order_id: order.id,
                status: order.status,
                action: "paid",
            }
            .into());
        }
        let phone_number = PhoneNumber::parse(phone)?;
        let token = self.session.require_token()?;

        let body = encode(
            PAYMENT_PATH,
            &PaymentRequest {
                order_id: order.id,
                phone_number,
            },
        )?;
        let response = self
            .gateway
            .request(HttpMethod::Post, PAYMENT_PATH, Some(body), Some(&token))
            .await;

        match response {
            Ok(body) => {
                let ack = PaymentAck::new(body.unwrap_or(Value::Null));
                tracing::info!(order_id = %order.id, checkout_request_id = ?ack.checkout_request_id(), "Payment initiated");
                self.notifier
                    .notify(Notice::info("Payment initiated! Check your phone."));
                Ok(ack)
            }
            Err(e) => {
                self.notifier.notify(Notice::error("Payment initiation failed."));
                Err(e.into())
            }
        }
    }

    /// Cancels a pending or confirmed order.
    pub async fn cancel_order(&self, order: &Order) -> Result<(), ClientError> {
        if !order.status.is_cancellable() {
            return Err(ValidationError::OrderNotActionable {
                order_id: order.id,
                status: order.status,
                action: "cancelled",
            }
            .into());
        }
        let token = self.session.require_token()?;
        self.gateway
            .request(HttpMethod::Delete, &order_path(order.id), None, Some(&token))
            .await?;

        self.book.remove(order.id);
        self.refresh.trigger();
        tracing::info!(order_id = %order.id, "Order cancelled");
        Ok(())
    }

    /// Farmer decision on an incoming order.
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, ClientError> {
        if !status.is_farmer_settable() {
            return Err(ValidationError::StatusNotSettable { status }.into());
        }
        let token = self.session.require_token()?;
        let path = order_path(id);
        let body = encode(&path, &StatusUpdate { status })?;
        let response = self
            .gateway
            .request(HttpMethod::Patch, &path, Some(body), Some(&token))
            .await?;
        let order: Order = decode(&path, response)?;

        self.book.upsert(order.clone());
        self.refresh.trigger();
        tracing::info!(order_id = %id, %status, "Order status updated");
        Ok(order)
    }
}
