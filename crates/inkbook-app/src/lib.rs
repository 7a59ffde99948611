//! HTTP surface of the inkbook studio scheduler.

pub mod app;
pub mod config;
pub mod error;
pub mod store_handler;
