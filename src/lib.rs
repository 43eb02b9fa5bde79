//! Farmart - client core of a livestock storefront
//!
//! Holds the client-side state of the buyer and farmer portals (session,
//! cart, cached orders) and talks to the Farmart REST backend through a
//! single gateway. Payment confirmation is observed by polling the order.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
