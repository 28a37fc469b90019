//! Pack distribution service.
//!
//! Calculates how to fill an order with a configurable set of fixed pack
//! sizes: an exact bounded dynamic program for ordinary orders and a greedy
//! fallback for very large ones. The `api` module exposes it over HTTP.

pub mod api;
pub mod auth;
pub mod calculator;
pub mod config;
pub mod error;
pub mod fallback;
pub mod model;
pub mod optimizer;
pub mod registry;
pub mod selector;
pub mod service;
pub mod types;
