//! Shared storefront services and orchestration modules.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod storefront;
