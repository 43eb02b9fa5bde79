//! Domain layer containing storefront types and pure client-side rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, statuses, phone numbers, validation errors)
//! - `catalog` - Animal listings and the farmer listing forms
//! - `cart` - Cart aggregate with stock ceilings and derived totals
//! - `order` - Order read model and order/payment request bodies
//! - `session` - User record, bearer tokens, registration form
//! - `dashboard` - Seller metrics
//! - `contact` - Contact form message
//! - `navigation` - Path-to-view dispatch

pub mod cart;
pub mod catalog;
pub mod contact;
pub mod dashboard;
pub mod foundation;
pub mod navigation;
pub mod order;
pub mod session;
